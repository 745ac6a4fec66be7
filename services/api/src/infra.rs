use brokerage_listings::config::AppConfig;
use brokerage_listings::error::AppError;
use brokerage_listings::listings::{
    HttpRecordSource, Language, ListingCache, ListingState, SourceKind, SystemClock,
    TranslationCatalog,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the HTTP sources, clock and catalog into one listing cache.
pub(crate) fn build_listing_state(config: &AppConfig) -> Result<ListingState, AppError> {
    let provider_url = config.sources.require_provider_url()?;
    let provider = Arc::new(HttpRecordSource::new(
        SourceKind::Provider,
        provider_url,
        config.sources.provider_api_key.clone(),
    ));

    let mut cache = ListingCache::new(provider, Arc::new(SystemClock), config.sync.stale_after);
    if let Some(cms_url) = &config.sources.cms_url {
        cache = cache.with_fallback(Arc::new(HttpRecordSource::new(
            SourceKind::ContentManagement,
            cms_url.clone(),
            None,
        )));
    }

    let catalog = TranslationCatalog::builtin()?;
    Ok(ListingState::new(
        Arc::new(cache),
        Arc::new(catalog),
        config.sync.default_language,
    ))
}

pub(crate) fn parse_language(raw: &str) -> Result<Language, String> {
    Language::from_tag(raw).ok_or_else(|| format!("'{raw}' is not one of fi, sv, en"))
}
