use super::common::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn lists_cards_in_default_locale() {
    let harness = synced_harness().await;
    let response = harness.router.oneshot(get("/api/v1/listings")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let cards = body.as_array().expect("array of cards");
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0]["slug"], "makelankatu-12-b");
    assert_eq!(cards[0]["address"], "Mäkelänkatu 12 B");
    assert_eq!(cards[0]["category_label"], "Asunto");
    assert_eq!(cards[2]["category"], "rental");
}

#[tokio::test]
async fn filters_cards_by_category() {
    let harness = synced_harness().await;
    let response = harness
        .router
        .oneshot(get("/api/v1/listings?category=commercial&locale=en"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let cards = body.as_array().expect("array of cards");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["slug"], "teollisuuskatu-21");
    assert_eq!(cards[0]["category_label"], "Commercial premises");
}

#[tokio::test]
async fn rejects_unknown_locale_and_category() {
    let harness = synced_harness().await;
    let response = harness
        .router
        .clone()
        .oneshot(get("/api/v1/listings?locale=de"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("de"));

    let response = harness
        .router
        .oneshot(get("/api/v1/listings?category=castle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn detail_by_slug_uses_requested_locale() {
    let harness = synced_harness().await;
    let response = harness
        .router
        .oneshot(get("/api/v1/listings/makelankatu-12-b?locale=en"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], "80427149");
    assert_eq!(body["description"], "Bright home");
    assert_eq!(body["description_missing"], false);
    assert_eq!(body["prices"]["debt_portion"], "€50,000");
    assert_eq!(body["address"], "Mäkelänkatu 12 B");
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let harness = synced_harness().await;
    let response = harness
        .router
        .oneshot(get("/api/v1/listings/nowhere"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Kohdetta nowhere ei löytynyt");
}

#[tokio::test]
async fn sync_words_are_ordinary_slugs() {
    let harness = synced_harness().await;
    for slug in ["refresh", "sync-status", "status"] {
        let response = harness
            .router
            .clone()
            .oneshot(get(&format!("/api/v1/listings/{slug}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "slug {slug}");
        let body = json_body(response).await;
        assert_eq!(body["error"], format!("Kohdetta {slug} ei löytynyt"));
    }
}

#[tokio::test]
async fn detail_by_id_falls_back_to_identifier() {
    let harness = synced_harness().await;
    let response = harness
        .router
        .clone()
        .oneshot(get("/api/v1/listings/by-id/80427150"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["slug"], "koivutie-5");

    let response = harness
        .router
        .clone()
        .oneshot(get("/api/v1/listings/by-id/1001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], "80427149");

    let response = harness
        .router
        .oneshot(get("/api/v1/listings/by-id/404"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn refresh_route_reports_outcome_and_transport_failures() {
    let harness = harness();
    let response = harness
        .router
        .clone()
        .oneshot(post("/api/v1/sync/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["outcome"], "refreshed");
    assert_eq!(body["count"], 4);

    harness.source.fail_next();
    let response = harness
        .router
        .clone()
        .oneshot(post("/api/v1/sync/refresh"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert_eq!(harness.cache.generation().listings.len(), 4);
}

#[tokio::test]
async fn sync_status_reports_generation() {
    let harness = harness();
    let response = harness
        .router
        .clone()
        .oneshot(get("/api/v1/sync/status"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["state"], "empty");
    assert_eq!(body["stale"], true);

    harness.cache.refresh().await.expect("refresh");
    let response = harness
        .router
        .oneshot(get("/api/v1/sync/status"))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["state"], "ready");
    assert_eq!(body["listing_count"], 4);
    assert_eq!(body["source"], "provider");
    assert_eq!(body["stale"], false);
    assert_eq!(body["generation"], 1);
}

#[tokio::test]
async fn stale_read_serves_current_generation_and_refreshes_in_background() {
    let harness = synced_harness().await;
    assert_eq!(harness.source.calls(), 1);
    harness.clock.advance(Duration::from_secs(11 * 60));

    let response = harness
        .router
        .oneshot(get("/api/v1/listings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(4));

    for _ in 0..100 {
        if harness.source.calls() == 2 && !harness.cache.is_refreshing() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(harness.source.calls(), 2);
    assert_eq!(harness.cache.generation().number, 2);
}
