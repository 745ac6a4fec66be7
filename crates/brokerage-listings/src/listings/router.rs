use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::cache::ListingCache;
use super::catalog::TranslationCatalog;
use super::classify::classify;
use super::domain::{CanonicalListing, ListingCategory};
use super::locale::Language;
use super::view::PropertyViewBuilder;

/// Shared state behind the listing routes.
#[derive(Clone)]
pub struct ListingState {
    pub cache: Arc<ListingCache>,
    pub catalog: Arc<TranslationCatalog>,
    pub default_language: Language,
}

impl ListingState {
    pub fn new(
        cache: Arc<ListingCache>,
        catalog: Arc<TranslationCatalog>,
        default_language: Language,
    ) -> Self {
        Self {
            cache,
            catalog,
            default_language,
        }
    }

    fn language(&self, requested: Option<&str>) -> Result<Language, Response> {
        match requested.map(str::trim).filter(|tag| !tag.is_empty()) {
            None => Ok(self.default_language),
            Some(tag) => Language::from_tag(tag).ok_or_else(|| {
                error_response(StatusCode::BAD_REQUEST, format!("unsupported locale `{tag}`"))
            }),
        }
    }

    /// Serve the current generation; kick off a background refresh when stale.
    fn refresh_if_stale(&self) {
        if !self.cache.needs_refresh() || self.cache.is_refreshing() {
            return;
        }
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            if let Err(err) = cache.refresh().await {
                warn!(error = %err, "background listing refresh failed");
            }
        });
    }

    fn detail_response(
        &self,
        listing: Option<CanonicalListing>,
        language: Language,
        key: &str,
    ) -> Response {
        match listing {
            Some(listing) => {
                let view = PropertyViewBuilder::new(&self.catalog, language).detail(&listing);
                (StatusCode::OK, axum::Json(view)).into_response()
            }
            None => error_response(
                StatusCode::NOT_FOUND,
                self.catalog
                    .translate_with(language, "listing.not_found", &[("slug", key)]),
            ),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub locale: Option<String>,
    pub category: Option<String>,
}

/// Router exposing the listing read API and manual refresh. Sync endpoints
/// live outside `/api/v1/listings` so every slug stays addressable.
pub fn listing_router(state: ListingState) -> Router {
    Router::new()
        .route("/api/v1/listings", get(list_handler))
        .route("/api/v1/sync/refresh", post(refresh_handler))
        .route("/api/v1/sync/status", get(sync_status_handler))
        .route("/api/v1/listings/by-id/:id", get(by_id_handler))
        .route("/api/v1/listings/:slug", get(detail_handler))
        .with_state(state)
}

pub(crate) async fn list_handler(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let language = match state.language(query.locale.as_deref()) {
        Ok(language) => language,
        Err(response) => return response,
    };
    let category = match query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        None => None,
        Some(key) => match ListingCategory::from_key(key) {
            Some(category) => Some(category),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("unknown category `{key}`"),
                )
            }
        },
    };

    state.refresh_if_stale();
    let builder = PropertyViewBuilder::new(&state.catalog, language);
    let generation = state.cache.generation();
    let cards = generation
        .listings
        .iter()
        .filter(|listing| category.map_or(true, |category| classify(listing) == category))
        .map(|listing| builder.card(listing))
        .collect::<Vec<_>>();

    (StatusCode::OK, axum::Json(cards)).into_response()
}

pub(crate) async fn detail_handler(
    State(state): State<ListingState>,
    Path(slug): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let language = match state.language(query.locale.as_deref()) {
        Ok(language) => language,
        Err(response) => return response,
    };
    state.refresh_if_stale();
    state.detail_response(state.cache.by_slug(&slug), language, &slug)
}

pub(crate) async fn by_id_handler(
    State(state): State<ListingState>,
    Path(id): Path<String>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let language = match state.language(query.locale.as_deref()) {
        Ok(language) => language,
        Err(response) => return response,
    };
    state.refresh_if_stale();
    let listing = state
        .cache
        .by_id(&id)
        .or_else(|| state.cache.by_identifier(&id));
    state.detail_response(listing, language, &id)
}

pub(crate) async fn refresh_handler(State(state): State<ListingState>) -> Response {
    match state.cache.refresh().await {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

pub(crate) async fn sync_status_handler(State(state): State<ListingState>) -> Response {
    (StatusCode::OK, axum::Json(state.cache.status())).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (status, axum::Json(payload)).into_response()
}
