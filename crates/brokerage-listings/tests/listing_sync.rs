use std::sync::Arc;
use std::time::Duration;

use brokerage_listings::listings::{
    classify, explain, slug_for, HttpRecordSource, Language, ListingCache, ListingCategory,
    PropertyViewBuilder, RefreshOutcome, SourceKind, SyncError, SyncState, SystemClock,
    TranslationCatalog,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_payload() -> Value {
    json!({
        "data": [
            {
                "id": "80427149",
                "identifier": "1001",
                "address": { "fi": { "value": "Mäkelänkatu 12" }, "sv": { "value": "Mäkelägatan 12" } },
                "gate": "A",
                "apartmentNumber": "5",
                "city": { "fi": "Helsinki", "sv": "Helsingfors" },
                "askPrice": "500 000",
                "debtFreePrice": "650 000",
                "livingArea": "74,5",
                "listingType": "BLOCK_OF_FLATS",
                "roomLayout": { "fi": "3h+k+s", "sv": "3r+kök+bastu" },
                "maintenanceFee": "310,20"
            },
            {
                "id": "80427150",
                "address": "",
                "askPrice": "700 000",
                "debtFreePrice": "650 000",
                "plotArea": "0,5",
                "plotAreaUnit": "ha"
            },
            "not a record"
        ]
    })
}

fn cms_payload() -> Value {
    json!([
        {
            "id": 311,
            "lang": "sv",
            "title": { "rendered": "Strandvägen 7" },
            "acf": {
                "city": "Esbo",
                "price": "395 000",
                "living_area": "112",
                "type": "Egnahemshus",
                "agent_name": "Maria Lind",
                "agent_email": "maria@example.fi"
            }
        }
    ])
}

fn cache_for(server: &MockServer, with_fallback: bool) -> ListingCache {
    let provider = Arc::new(HttpRecordSource::new(
        SourceKind::Provider,
        format!("{}/provider/listings", server.uri()),
        Some("token".to_string()),
    ));
    let cache = ListingCache::new(provider, Arc::new(SystemClock), Duration::from_secs(600));
    if with_fallback {
        cache.with_fallback(Arc::new(HttpRecordSource::new(
            SourceKind::ContentManagement,
            format!("{}/wp-json/wp/v2/listings", server.uri()),
            None,
        )))
    } else {
        cache
    }
}

#[tokio::test]
async fn provider_payload_flows_into_cache_and_views() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provider/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server, true);
    let outcome = cache.refresh().await.expect("refresh succeeds");
    assert_eq!(
        outcome,
        RefreshOutcome::Refreshed {
            count: 2,
            source: SourceKind::Provider
        }
    );
    assert_eq!(cache.state(), SyncState::Ready);
    assert!(!cache.needs_refresh());

    let apartment = cache.by_slug("makelankatu-12-a").expect("slug resolves");
    assert_eq!(apartment.pricing.sales_price, Some(500_000.0));
    assert_eq!(apartment.pricing.debt_free_price, Some(650_000.0));
    assert_eq!(apartment.pricing.debt_portion, Some(150_000.0));
    assert_eq!(explain(&apartment).rule, Some("apartment_type_code"));

    let plot = cache.by_id("80427150").expect("id resolves");
    assert_eq!(plot.slug, "property-80427150");
    assert_eq!(plot.pricing.debt_portion, Some(0.0));
    assert_eq!(plot.dimensions.plot_area, Some(5_000.0));
    assert_eq!(classify(&plot), ListingCategory::Estate);

    for listing in cache.listings() {
        assert_eq!(slug_for(&listing), listing.slug);
    }

    let catalog = TranslationCatalog::builtin().expect("catalogs");
    let card = PropertyViewBuilder::new(&catalog, Language::Sv).card(&apartment);
    assert_eq!(card.address, "Mäkelägatan 12 A");
    assert_eq!(card.city, "Helsingfors");
    assert_eq!(card.room_layout, "3r+kök+bastu");
    assert_eq!(card.translation_note, None);
}

#[tokio::test]
async fn empty_provider_falls_back_to_content_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provider/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cms_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let cache = cache_for(&server, true);
    let outcome = cache.refresh().await.expect("refresh succeeds");
    assert_eq!(
        outcome,
        RefreshOutcome::Refreshed {
            count: 1,
            source: SourceKind::ContentManagement
        }
    );

    let listing = cache.by_id("311").expect("cms listing");
    assert_eq!(listing.source, SourceKind::ContentManagement);
    assert_eq!(listing.location.address.get(Language::Sv), Some("Strandvägen 7"));
    assert_eq!(classify(&listing), ListingCategory::Estate);
    assert_eq!(
        listing.agent.as_ref().map(|agent| agent.name.as_str()),
        Some("Maria Lind")
    );

    assert_eq!(listing.slug, "strandvagen-7");
    assert_eq!(cache.by_slug("strandvagen-7").map(|l| l.id), Some(listing.id.clone()));

    let catalog = TranslationCatalog::builtin().expect("catalogs");
    let card = PropertyViewBuilder::new(&catalog, Language::Fi).card(&listing);
    assert_eq!(card.address, "Strandvägen 7");
    assert_eq!(card.city, "Esbo");
    assert_eq!(
        card.translation_note.as_deref(),
        Some("Osa tiedoista näytetään kielellä ruotsi")
    );
    assert_eq!(card.category_label, "Kiinteistö");
}

#[tokio::test]
async fn provider_failure_keeps_previous_generation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/provider/listings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_payload()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/provider/listings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let cache = cache_for(&server, false);
    cache.refresh().await.expect("first refresh succeeds");
    let before = cache.generation();

    let error = cache.refresh().await.expect_err("second refresh fails");
    assert!(matches!(error, SyncError::Primary(_)));
    assert!(error.to_string().contains("500"));
    assert!(Arc::ptr_eq(&before, &cache.generation()));
    assert_eq!(cache.listings().len(), 2);
}
