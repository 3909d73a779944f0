//! Catalog reads and writes against a mocked Firestore REST endpoint.

#![allow(clippy::unwrap_used)]

use httpmock::Method::{GET, PATCH};
use httpmock::MockServer;
use screw_plus_core::Price;
use screw_plus_integration_tests::{local_config, sample_seed};
use screw_plus_storefront::browse::search_products;
use screw_plus_storefront::catalog::CatalogError;
use screw_plus_storefront::config::FirebaseConfig;
use screw_plus_storefront::pricing::product_discount;
use screw_plus_storefront::state::AppState;
use serde_json::json;
use url::Url;

const DOCS: &str = "/v1/projects/screw-plus-test/databases/(default)/documents";

async fn app(server: &MockServer, data_dir: &std::path::Path) -> AppState {
    let mut config = local_config(data_dir);
    config.firebase = Some(FirebaseConfig {
        project_id: "screw-plus-test".to_string(),
        api_key: None,
        base_url: Url::parse(&server.base_url()).unwrap(),
    });
    AppState::from_config(config).await.unwrap()
}

fn product_doc(id: &str, title: &str, price: i64, original: i64, brand: &str) -> serde_json::Value {
    json!({
        "name": format!("projects/screw-plus-test/databases/(default)/documents/products/{id}"),
        "fields": {
            "title": { "stringValue": title },
            "price": { "integerValue": price.to_string() },
            "originalPrice": { "doubleValue": original },
            "category": { "stringValue": "Men" },
            "brand": { "stringValue": brand },
            "sizes": { "arrayValue": { "values": [{ "stringValue": "M" }] } },
            "colors": { "arrayValue": { "values": [{ "stringValue": "Navy" }] } },
            "isNew": { "booleanValue": true },
            "createdAt": { "stringValue": "2025-03-01T10:00:00.000Z" }
        },
        "createTime": "2025-03-01T10:00:00Z",
        "updateTime": "2025-03-01T10:00:00Z"
    })
}

#[tokio::test]
async fn browse_and_cart_over_firestore() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();

    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{DOCS}/products"))
                .query_param("orderBy", "createdAt desc");
            then.status(200).json_body(json!({
                "documents": [
                    product_doc("p1", "Oxford Shirt", 1299, 1999, "Allen Solly"),
                    product_doc("p2", "Chino Trousers", 1599, 1599, "Uniqlo"),
                    {
                        "name": format!("projects/screw-plus-test/databases/(default)/documents/products/broken"),
                        "fields": { "price": { "stringValue": "free" } }
                    }
                ]
            }));
        })
        .await;

    let app = app(&server, dir.path()).await;
    let products = app.catalog().products().await.unwrap();

    // The malformed document is skipped, the rest decode.
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].price, Price::from(1299));
    assert_eq!(product_discount(&products[0]), Some(35));
    assert_eq!(product_discount(&products[1]), Some(0));

    let hits = search_products(&products, "uniqlo");
    assert_eq!(hits.len(), 1);
    app.shop().add_to_cart(hits[0], "M", "Navy");
    app.shop().add_to_cart(hits[0], "M", "Navy");
    assert_eq!(app.shop().cart_total(), Price::from(3198));

    // Served from cache the second time.
    app.catalog().products().await.unwrap();
    list.assert_calls_async(1).await;

    let published = app.products().refresh_products(app.catalog()).await.unwrap();
    assert_eq!(published, 2);
    assert_eq!(app.products().current().unwrap().len(), 2);
    list.assert_calls_async(2).await;
}

async fn mock_writes<'a>(server: &'a MockServer, collection: &str) -> httpmock::Mock<'a> {
    let prefix = format!("/documents/{collection}/");
    server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path_includes(prefix)
                .body_includes(r#""createdAt":{"timestampValue":"#);
            then.status(200).json_body(json!({
                "name": format!("projects/screw-plus-test/databases/(default)/documents/{collection}/x"),
                "fields": {}
            }));
        })
        .await
}

#[tokio::test]
async fn seed_import_writes_each_document_by_id() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();

    let products = mock_writes(&server, "products").await;
    let categories = mock_writes(&server, "categories").await;
    let banners = mock_writes(&server, "banners").await;

    let app = app(&server, dir.path()).await;
    let seed = sample_seed();
    let written = app.catalog().import(&seed).await.unwrap();

    assert_eq!(written, seed.len());
    products.assert_calls_async(seed.products.len()).await;
    categories.assert_calls_async(seed.categories.len()).await;
    banners.assert_calls_async(seed.banners.len()).await;
}

#[tokio::test]
async fn backend_errors_surface_with_status() {
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();

    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{DOCS}/categories"));
            then.status(403).json_body(json!({
                "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
            }));
        })
        .await;

    let app = app(&server, dir.path()).await;
    let err = app.catalog().categories().await.unwrap_err();

    match err {
        CatalogError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Missing or insufficient permissions.");
        }
        other => panic!("unexpected error: {other}"),
    }
}
