//! Subcommand implementations.

pub mod browse;
pub mod seed;

use std::path::Path;
use std::sync::Arc;

use screw_plus_storefront::catalog::{
    CatalogSeed, CatalogService, FirestoreDocumentStore, MemoryDocumentStore,
};
use screw_plus_storefront::config::StorefrontConfig;
use screw_plus_storefront::state::SharedDocuments;
use tracing::info;

/// Open the catalog: an in-memory copy of `seed` when given, Firestore
/// otherwise.
///
/// # Errors
///
/// Returns an error if the seed can't be loaded or Firebase isn't configured.
pub async fn open_catalog(
    seed: Option<&Path>,
) -> Result<CatalogService<SharedDocuments>, Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;

    let Some(path) = seed else {
        let firebase = config.require_firebase()?;
        info!(project = %firebase.project_id, "Reading catalog from Firestore");
        let documents: SharedDocuments = Arc::new(FirestoreDocumentStore::new(firebase));
        return Ok(CatalogService::new(documents, config.cache_ttl));
    };

    let seed = CatalogSeed::load(path).await?;
    let documents: SharedDocuments = Arc::new(MemoryDocumentStore::new());
    let catalog = CatalogService::new(documents, config.cache_ttl);
    let imported = catalog.import(&seed).await?;
    info!(path = %path.display(), documents = imported, "Loaded catalog from seed file");
    Ok(catalog)
}
