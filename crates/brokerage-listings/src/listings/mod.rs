//! Listing ingestion, classification, caching and presentation.
//!
//! Raw provider or content-management records flow through an input adapter
//! into the converter, which produces [`CanonicalListing`]s. The
//! [`ListingCache`] holds the current generation; view builders turn cached
//! listings into locale-specific card and detail models.

pub mod adapters;
pub mod cache;
pub mod catalog;
pub mod classify;
pub mod convert;
pub mod domain;
pub mod format;
pub mod locale;
pub(crate) mod mapping;
pub mod numeric;
pub mod router;
pub mod slug;
pub mod source;
pub mod view;

#[cfg(test)]
mod tests;

pub use adapters::{ListingRecord, RawAgent, RawImage};
pub use cache::{
    spawn_refresh_loop, CacheGeneration, Clock, ListingCache, RefreshOutcome, SyncError,
    SyncState, SyncStatus, SystemClock, DEFAULT_STALENESS,
};
pub use catalog::{CatalogError, TranslationCatalog};
pub use classify::{classify, explain, Classification, DEFAULT_CATEGORY};
pub use convert::{convert, convert_cms, convert_payload, convert_provider};
pub use domain::{
    AgentContact, CanonicalListing, ClassificationInputs, Coordinates, Dimensions,
    EnergyCertificate, EnergyCertificateStatus, FeeKind, Fees, ImageKind, ListingCategory,
    ListingId, ListingImage, Location, Pricing, RentalTerms, SourceKind,
};
pub use locale::{IndicatedValue, Language, LocalizedText, Resolved, ResolutionSource};
pub use numeric::{parse_number, AreaUnit};
pub use router::{listing_router, ListingState};
pub use slug::{derive_slug, slug_for};
pub use source::{HttpRecordSource, RecordSource, TransportError};
pub use view::{PropertyCardViewModel, PropertyDetailViewModel, PropertyViewBuilder};
