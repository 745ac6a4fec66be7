//! In-process listing cache refreshed from the upstream sources.
//!
//! One generation is shared by all readers and swapped wholesale after each
//! successful refresh. At most one refresh runs at a time: a call that finds
//! another refresh in flight returns [`RefreshOutcome::Skipped`] immediately.

use super::convert::convert_payload;
use super::domain::{CanonicalListing, SourceKind};
use super::slug::slug_for;
use super::source::{RecordSource, TransportError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

pub const DEFAULT_STALENESS: Duration = Duration::from_secs(10 * 60);

/// Time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Empty,
    Syncing,
    Ready,
}

/// One complete, immutable snapshot of the listing set.
#[derive(Debug, Clone, Default)]
pub struct CacheGeneration {
    pub number: u64,
    pub listings: Vec<CanonicalListing>,
    pub synced_at: Option<DateTime<Utc>>,
    pub source: Option<SourceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    Refreshed { count: usize, source: SourceKind },
    /// Another refresh was already in flight; nothing was done.
    Skipped,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("listing provider fetch failed: {0}")]
    Primary(#[source] TransportError),
    #[error("content fallback fetch failed: {0}")]
    Fallback(#[source] TransportError),
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub generation: u64,
    pub listing_count: usize,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub source: Option<SourceKind>,
    pub stale: bool,
}

pub struct ListingCache {
    primary: Arc<dyn RecordSource>,
    fallback: Option<Arc<dyn RecordSource>>,
    clock: Arc<dyn Clock>,
    staleness: Duration,
    generation: RwLock<Arc<CacheGeneration>>,
    refreshing: AtomicBool,
}

impl ListingCache {
    pub fn new(primary: Arc<dyn RecordSource>, clock: Arc<dyn Clock>, staleness: Duration) -> Self {
        Self {
            primary,
            fallback: None,
            clock,
            staleness,
            generation: RwLock::new(Arc::new(CacheGeneration::default())),
            refreshing: AtomicBool::new(false),
        }
    }

    /// Source consulted when the primary yields zero records.
    pub fn with_fallback(mut self, fallback: Arc<dyn RecordSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Fetch, convert and swap in a new generation.
    ///
    /// On failure the current generation is kept and the error returned;
    /// there is no retry.
    pub async fn refresh(&self) -> Result<RefreshOutcome, SyncError> {
        let Some(_guard) = RefreshGuard::acquire(&self.refreshing) else {
            info!("listing refresh already in flight; skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        info!("refreshing listing cache");
        let (source, records) = match self.fetch_records().await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(error = %err, "listing refresh failed; keeping previous generation");
                return Err(err);
            }
        };

        let listings = convert_payload(source, &records);
        let count = listings.len();
        for (slug, ids) in duplicate_slugs(&listings) {
            warn!(
                slug,
                ids = ?ids,
                "listings share a slug; only the first is reachable by slug"
            );
        }
        let synced_at = self.clock.now();

        {
            let mut slot = self
                .generation
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let number = slot.number + 1;
            *slot = Arc::new(CacheGeneration {
                number,
                listings,
                synced_at: Some(synced_at),
                source: Some(source),
            });
        }

        info!(count, source = source.label(), "listing cache refreshed");
        Ok(RefreshOutcome::Refreshed { count, source })
    }

    async fn fetch_records(
        &self,
    ) -> Result<(SourceKind, Vec<serde_json::Value>), SyncError> {
        let records = self.primary.fetch().await.map_err(SyncError::Primary)?;
        if !records.is_empty() {
            return Ok((self.primary.kind(), records));
        }

        let Some(fallback) = &self.fallback else {
            return Ok((self.primary.kind(), records));
        };

        info!("listing provider returned no records; using content fallback");
        let records = fallback.fetch().await.map_err(SyncError::Fallback)?;
        Ok((fallback.kind(), records))
    }

    /// Current generation; never blocks on an in-flight refresh.
    pub fn generation(&self) -> Arc<CacheGeneration> {
        self.generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn listings(&self) -> Vec<CanonicalListing> {
        self.generation().listings.clone()
    }

    pub fn by_id(&self, id: &str) -> Option<CanonicalListing> {
        self.find(|listing| listing.id.as_str() == id)
    }

    pub fn by_identifier(&self, identifier: &str) -> Option<CanonicalListing> {
        self.find(|listing| listing.identifier.as_deref() == Some(identifier))
    }

    /// Recomputes each candidate's slug rather than trusting a stored index.
    pub fn by_slug(&self, slug: &str) -> Option<CanonicalListing> {
        self.find(|listing| slug_for(listing) == slug)
    }

    fn find(&self, predicate: impl Fn(&CanonicalListing) -> bool) -> Option<CanonicalListing> {
        self.generation()
            .listings
            .iter()
            .find(|listing| predicate(listing))
            .cloned()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SyncState {
        if self.is_refreshing() {
            SyncState::Syncing
        } else if self.generation().synced_at.is_some() {
            SyncState::Ready
        } else {
            SyncState::Empty
        }
    }

    /// True once the staleness window has elapsed since the last success.
    pub fn needs_refresh(&self) -> bool {
        let Some(synced_at) = self.generation().synced_at else {
            return true;
        };
        self.clock
            .now()
            .signed_duration_since(synced_at)
            .to_std()
            .map(|elapsed| elapsed >= self.staleness)
            .unwrap_or(false)
    }

    pub fn status(&self) -> SyncStatus {
        let generation = self.generation();
        SyncStatus {
            state: self.state(),
            generation: generation.number,
            listing_count: generation.listings.len(),
            last_synced_at: generation.synced_at,
            source: generation.source,
            stale: self.needs_refresh(),
        }
    }
}

struct RefreshGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RefreshGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Refresh on a fixed period; the first tick fires immediately.
pub fn spawn_refresh_loop(cache: Arc<ListingCache>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if let Err(err) = cache.refresh().await {
                error!(error = %err, "scheduled listing refresh failed");
            }
        }
    })
}

/// Slugs carried by more than one listing, with the ids sharing each.
pub(crate) fn duplicate_slugs(listings: &[CanonicalListing]) -> Vec<(&str, Vec<&str>)> {
    let mut by_slug: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for listing in listings {
        by_slug
            .entry(listing.slug.as_str())
            .or_default()
            .push(listing.id.as_str());
    }
    by_slug.into_iter().filter(|(_, ids)| ids.len() > 1).collect()
}
