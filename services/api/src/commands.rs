use crate::infra::{build_listing_state, parse_language};
use brokerage_listings::config::AppConfig;
use brokerage_listings::error::AppError;
use brokerage_listings::listings::{
    classify, CanonicalListing, Language, ListingCategory, ListingState, PropertyViewBuilder,
    RefreshOutcome, SourceKind,
};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Listing slug, e.g. `makelankatu-12-a`
    pub(crate) slug: String,
    /// Output language (fi, sv or en). Defaults to LISTINGS_DEFAULT_LOCALE.
    #[arg(long, value_parser = parse_language)]
    pub(crate) locale: Option<Language>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SyncSummary {
    pub(crate) outcome: &'static str,
    pub(crate) source: Option<SourceKind>,
    pub(crate) synced_at: Option<String>,
    pub(crate) total: usize,
    pub(crate) categories: BTreeMap<&'static str, usize>,
}

impl SyncSummary {
    pub(crate) fn new(
        outcome: RefreshOutcome,
        synced_at: Option<DateTime<Utc>>,
        listings: &[CanonicalListing],
    ) -> Self {
        let mut categories: BTreeMap<&'static str, usize> = ListingCategory::ordered()
            .into_iter()
            .map(|category| (category.key(), 0))
            .collect();
        for listing in listings {
            *categories.entry(classify(listing).key()).or_default() += 1;
        }

        let (outcome, source) = match outcome {
            RefreshOutcome::Refreshed { source, .. } => ("refreshed", Some(source)),
            RefreshOutcome::Skipped => ("skipped", None),
        };

        Self {
            outcome,
            source,
            synced_at: synced_at.map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            total: listings.len(),
            categories,
        }
    }
}

async fn synced_state() -> Result<(ListingState, RefreshOutcome), AppError> {
    let config = AppConfig::load()?;
    let state = build_listing_state(&config)?;
    let outcome = state.cache.refresh().await?;
    Ok((state, outcome))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) async fn run_sync() -> Result<(), AppError> {
    let (state, outcome) = synced_state().await?;
    let generation = state.cache.generation();
    let summary = SyncSummary::new(outcome, generation.synced_at, &generation.listings);
    print_json(&summary)
}

pub(crate) async fn run_show(args: ShowArgs) -> Result<(), AppError> {
    let (state, _) = synced_state().await?;
    let language = args.locale.unwrap_or(state.default_language);
    let listing = state
        .cache
        .by_slug(&args.slug)
        .ok_or(AppError::ListingNotFound { key: args.slug })?;

    let detail = PropertyViewBuilder::new(&state.catalog, language).detail(&listing);
    print_json(&detail)
}
