//! Property listing pipeline for a Nordic real-estate brokerage site.
//!
//! See [`listings`] for the ingestion, classification, caching and view
//! layers; [`config`], [`error`] and [`telemetry`] carry the service plumbing
//! shared with the API binary.

pub mod config;
pub mod error;
pub mod listings;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
