//! Integration tests for Screw Plus.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p screw-plus-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - Cart and wishlist behaviour through the shared store
//! - `catalog_memory` - Seed import, browsing and pricing over the in-memory store
//! - `catalog_firestore` - Catalog reads and writes against a mocked REST endpoint
//! - `app_state` - Start-up, preferences and cancellation across screens
//!
//! This library holds the fixtures those tests share.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use screw_plus_core::{Price, Product};
use screw_plus_storefront::catalog::{CatalogSeed, CatalogService, MemoryDocumentStore};
use screw_plus_storefront::config::StorefrontConfig;
use screw_plus_storefront::state::SharedDocuments;

/// A small catalog covering every category the home screen shows.
pub const SEED_YAML: &str = r#"
categories:
  - id: men
    name: Men
    productCount: 3
  - id: women
    name: Women
    productCount: 2
  - id: accessories
    name: Accessories
    productCount: 1
banners:
  - id: b2
    title: Monsoon Edit
    subtitle: Layers for the rain
    image: https://cdn.example.com/b2.jpg
    cta: Explore
    isActive: false
    order: 2
  - id: b1
    title: Summer Sale
    subtitle: Up to 50% off
    image: https://cdn.example.com/b1.jpg
    cta: Shop Now
    isActive: true
    order: 1
products:
  - id: "1"
    title: Classic White T-Shirt
    price: 799
    originalPrice: 1299
    category: Men
    brand: Screw Plus
    sizes: [S, M, L]
    colors: [White, Black]
    isNew: true
  - id: "2"
    title: Slim Fit Denim Jeans
    price: 1899
    originalPrice: 2499
    category: Men
    brand: Levi's
    sizes: ["30", "32"]
    colors: [Blue]
    isBestseller: true
    variants:
      - size: "30"
        color: Blue
        price: 1899
      - size: "32"
        color: Blue
        price: 1999
  - id: "3"
    title: Floral Summer Dress
    price: 1499
    category: Women
    brand: Zara
    sizes: [S, M]
    colors: [Red]
    isNew: true
  - id: "4"
    title: Leather Crossbody Bag
    price: 2299
    originalPrice: 2999
    category: Accessories
    brand: Hidesign
    isBestseller: true
  - id: "5"
    title: Linen Shirt
    price: 1199
    category: Men
    brand: Fabindia
  - id: "6"
    title: Pleated Midi Skirt
    price: 999
    category: Women
    brand: Zara
"#;

/// Parse [`SEED_YAML`].
///
/// # Panics
///
/// Panics if the fixture no longer parses.
#[must_use]
#[allow(clippy::expect_used)]
pub fn sample_seed() -> CatalogSeed {
    CatalogSeed::parse(SEED_YAML).expect("fixture seed parses")
}

/// A catalog service over a fresh in-memory store with [`SEED_YAML`]
/// imported.
///
/// # Panics
///
/// Panics if the import fails.
#[allow(clippy::expect_used)]
pub async fn seeded_catalog() -> CatalogService<SharedDocuments> {
    let documents: SharedDocuments = Arc::new(MemoryDocumentStore::new());
    let catalog = CatalogService::new(documents, Duration::from_secs(60));
    catalog
        .import(&sample_seed())
        .await
        .expect("fixture seed imports");
    catalog
}

/// Configuration rooted at `data_dir` with no Firebase project.
#[must_use]
pub fn local_config(data_dir: &Path) -> StorefrontConfig {
    StorefrontConfig {
        data_dir: data_dir.to_path_buf(),
        ..StorefrontConfig::default()
    }
}

/// A bare product at a whole-rupee price.
#[must_use]
pub fn product(id: &str, title: &str, rupees: i64) -> Product {
    Product::new(id, title, Price::from(rupees))
}
