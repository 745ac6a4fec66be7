use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::to_bytes;
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::listings::cache::{Clock, ListingCache, DEFAULT_STALENESS};
use crate::listings::catalog::TranslationCatalog;
use crate::listings::domain::SourceKind;
use crate::listings::locale::Language;
use crate::listings::router::{listing_router, ListingState};
use crate::listings::source::{RecordSource, TransportError};

pub(super) struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub(super) fn new() -> Self {
        let start = DateTime::parse_from_rfc3339("2025-09-24T08:30:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc);
        Self(Mutex::new(start))
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut now = self.0.lock().expect("clock mutex");
        *now += chrono::Duration::from_std(by).expect("duration fits");
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock mutex")
    }
}

/// Serves a fixed payload, or fails once `fail` is set.
#[derive(Default)]
pub(super) struct MemorySource {
    pub(super) records: Mutex<Vec<Value>>,
    pub(super) fail: Mutex<bool>,
    pub(super) calls: AtomicUsize,
}

impl MemorySource {
    pub(super) fn with_records(records: Vec<Value>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub(super) fn fail_next(&self) {
        *self.fail.lock().expect("fail mutex") = true;
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    fn kind(&self) -> SourceKind {
        SourceKind::Provider
    }

    async fn fetch(&self) -> Result<Vec<Value>, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if std::mem::take(&mut *self.fail.lock().expect("fail mutex")) {
            return Err(TransportError::Status {
                status: 503,
                message: "provider maintenance".to_string(),
            });
        }
        Ok(self.records.lock().expect("records mutex").clone())
    }
}

pub(super) fn provider_records() -> Vec<Value> {
    vec![
        json!({
            "id": "80427149",
            "identifier": "1001",
            "address": { "fi": { "value": "Mäkelänkatu 12" } },
            "gate": "B",
            "apartmentNumber": "24",
            "city": { "fi": "Helsinki", "sv": "Helsingfors", "en": "Helsinki" },
            "askPrice": "250 000",
            "debtFreePrice": "300 000",
            "livingArea": "60",
            "listingType": "APARTMENT_HOUSE",
            "description": { "fi": "Valoisa koti", "en": "Bright home" }
        }),
        json!({
            "id": "80427150",
            "address": "Koivutie 5",
            "listingType": "DETACHED_HOUSE",
            "askPrice": "420 000",
            "plotArea": "0,5",
            "plotAreaUnit": "ha"
        }),
        json!({
            "id": "80427151",
            "address": "Hämeentie 40 C",
            "rent": "1 150"
        }),
        json!({
            "id": "80427152",
            "address": "Teollisuuskatu 21",
            "typeOfApartment": "Liiketila",
            "businessArea": "240"
        }),
    ]
}

pub(super) struct Harness {
    pub(super) router: Router,
    pub(super) cache: Arc<ListingCache>,
    pub(super) source: Arc<MemorySource>,
    pub(super) clock: Arc<FixedClock>,
}

pub(super) fn harness() -> Harness {
    let source = Arc::new(MemorySource::with_records(provider_records()));
    let clock = Arc::new(FixedClock::new());
    let cache = Arc::new(ListingCache::new(
        source.clone(),
        clock.clone(),
        DEFAULT_STALENESS,
    ));
    let catalog = Arc::new(TranslationCatalog::builtin().expect("builtin catalogs parse"));
    let router = listing_router(ListingState::new(cache.clone(), catalog, Language::Fi));
    Harness {
        router,
        cache,
        source,
        clock,
    }
}

/// Harness whose cache already holds one generation.
pub(super) async fn synced_harness() -> Harness {
    let harness = harness();
    harness.cache.refresh().await.expect("initial refresh");
    harness
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
