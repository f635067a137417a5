use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use procura_api::{app, AppState};
use procura_catalog::{Catalog, CatalogRecord};
use procura_core::{InMemoryPortal, MemoryArtifactStore};
use procura_order::RunSettings;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

const BASE: &str = "https://portal.test";

fn record(sku: &str, item_id: &str, size: &str) -> CatalogRecord {
    CatalogRecord {
        sku: sku.to_string(),
        catalog_id: "123".to_string(),
        list_id: "456".to_string(),
        item_id: item_id.to_string(),
        product_name: Some(format!("Product {sku}")),
        shop_id: Some("shop1".to_string()),
        misc_item_id: None,
        size: Some(size.to_string()),
    }
}

fn test_app() -> Router {
    let catalog = Catalog::from_records([
        record("1823CF33F4", "1", "18x23"),
        record("1218CF33F3", "2", "12x18"),
        record("1218CF34F3", "3", "12x18"),
    ]);

    let portal = catalog
        .records()
        .fold(InMemoryPortal::new(), |portal, rec| {
            portal.with_product(rec.navigable_url(BASE), rec.sku.clone())
        });

    app(AppState {
        portal: Arc::new(portal),
        artifacts: Arc::new(MemoryArtifactStore::new()),
        catalog: Arc::new(catalog),
        settings: RunSettings {
            base_url: BASE.to_string(),
            ..RunSettings::default()
        },
        run_lock: Arc::new(Mutex::new(())),
    })
}

async fn post_run(app: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/runs")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn run_returns_the_full_per_size_breakdown() {
    let (status, body) = post_run(
        test_app(),
        json!({
            "order": [
                { "sku": "1823CF33F4", "quantity": 2 },
                { "sku": "1218CF33F3", "quantity": 1 },
                { "sku": "1218CF34F3", "quantity": 4 }
            ],
            "purchaseOrderNumber": "PO-77"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["resolutionErrors"], json!({}));

    // Two size groups, both checked out
    let sizes = body["sizes"].as_object().unwrap();
    assert_eq!(sizes.len(), 2);
    for outcome in sizes.values() {
        assert!(outcome["jobNumber"].is_string());
        assert!(outcome["confirmationArtifactRef"].is_string());
        assert_eq!(outcome["itemErrors"], json!({}));
        assert!(outcome["groupError"].is_null());
    }
}

#[tokio::test]
async fn unresolved_skus_land_in_resolution_errors() {
    let (status, body) = post_run(
        test_app(),
        json!({
            "order": [
                { "sku": "1823CF33F4", "quantity": 2 },
                { "sku": "NOPE", "quantity": 1 }
            ],
            "purchaseOrderNumber": "PO-77"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resolutionErrors"]["NOPE"], "SKU not found in product data");
    let sizes = body["sizes"].as_object().unwrap();
    assert_eq!(sizes.len(), 1);
    assert!(sizes.contains_key("18x23"));
}

#[tokio::test]
async fn test_mode_substitutes_placeholder_confirmation() {
    let (status, body) = post_run(
        test_app(),
        json!({
            "order": [{ "sku": "1218CF33F3", "quantity": 1 }],
            "purchaseOrderNumber": "PO-9",
            "testMode": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sizes"]["12x18"]["jobNumber"], "TEST-0000000");
    assert_eq!(
        body["sizes"]["12x18"]["confirmationArtifactRef"],
        "PO-9-TEST-0000000.pdf"
    );
}

#[tokio::test]
async fn empty_purchase_order_number_is_rejected() {
    let (status, body) = post_run(
        test_app(),
        json!({
            "order": [{ "sku": "1218CF33F3", "quantity": 1 }],
            "purchaseOrderNumber": "   "
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let (status, _) = post_run(
        test_app(),
        json!({
            "order": [{ "sku": "1218CF33F3", "quantity": 0 }],
            "purchaseOrderNumber": "PO-77"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
