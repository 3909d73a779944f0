//! Seed the Firestore catalog from a file.
//!
//! This command reads products, categories and banners from a YAML or JSON
//! seed file and writes them into the configured Firebase project. Documents
//! keep the ids from the file, so re-running the same seed overwrites
//! instead of duplicating.

use std::path::Path;
use std::sync::Arc;

use screw_plus_storefront::catalog::{CatalogSeed, CatalogService, FirestoreDocumentStore};
use screw_plus_storefront::config::StorefrontConfig;
use screw_plus_storefront::state::SharedDocuments;
use tracing::info;

/// Import a seed file into Firestore.
///
/// # Errors
///
/// Returns an error if Firebase isn't configured, the file can't be read, or
/// a write fails.
pub async fn import(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let firebase = config.require_firebase()?;

    if !path.exists() {
        return Err(format!("File not found: {}", path.display()).into());
    }

    info!(path = %path.display(), "Loading catalog seed");
    let seed = CatalogSeed::load(path).await?;
    if seed.is_empty() {
        return Err("Seed file has no products, categories or banners".into());
    }

    info!(
        project = %firebase.project_id,
        products = seed.products.len(),
        categories = seed.categories.len(),
        banners = seed.banners.len(),
        "Importing catalog"
    );

    let documents: SharedDocuments = Arc::new(FirestoreDocumentStore::new(firebase));
    let catalog = CatalogService::new(documents, config.cache_ttl);
    let written = catalog.import(&seed).await?;

    info!(documents = written, "Seeding complete");
    Ok(())
}
