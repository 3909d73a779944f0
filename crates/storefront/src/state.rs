//! Application state shared across screens.

use std::sync::Arc;

use screw_plus_core::Product;
use tracing::info;

use crate::catalog::{
    CatalogService, DocumentStore, FirestoreDocumentStore, LiveCatalog, ProfileService,
};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::persistence::PreferencesStore;
use crate::store::ShopStore;

/// Document store shared by the catalog and profile services.
pub type SharedDocuments = Arc<dyn DocumentStore>;

/// Application state shared across all screens.
///
/// This struct is cheaply cloneable via `Arc`. Every clone sees the same
/// cart, wishlist, catalog cache and preferences.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    shop: ShopStore,
    catalog: CatalogService<SharedDocuments>,
    profiles: ProfileService<SharedDocuments>,
    preferences: PreferencesStore,
    products: LiveCatalog<Product>,
}

impl AppState {
    /// Create application state over an explicit document store.
    ///
    /// Opens the preferences file and restores the saved cart and wishlist
    /// into the shared store.
    ///
    /// # Errors
    ///
    /// Returns an error if the preferences file is unreadable or corrupt.
    pub async fn new(config: StorefrontConfig, documents: SharedDocuments) -> Result<Self> {
        let preferences = PreferencesStore::open(&config.data_dir).await?;

        let shop = ShopStore::new();
        shop.restore(preferences.load_selection().await);
        info!(
            cart_items = shop.cart_items_count(),
            favorites = shop.favorites().len(),
            "Restored saved selection"
        );

        let catalog = CatalogService::new(Arc::clone(&documents), config.cache_ttl);
        let profiles = ProfileService::new(documents);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                shop,
                catalog,
                profiles,
                preferences,
                products: LiveCatalog::new(),
            }),
        })
    }

    /// Create application state backed by Firestore.
    ///
    /// # Errors
    ///
    /// Returns an error if Firebase is not configured or the preferences
    /// file is unreadable.
    pub async fn from_config(config: StorefrontConfig) -> Result<Self> {
        let documents: SharedDocuments =
            Arc::new(FirestoreDocumentStore::new(config.require_firebase()?));
        Self::new(config, documents).await
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the shared cart/wishlist store.
    #[must_use]
    pub fn shop(&self) -> &ShopStore {
        &self.inner.shop
    }

    /// Get the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService<SharedDocuments> {
        &self.inner.catalog
    }

    /// Get the profile service.
    #[must_use]
    pub fn profiles(&self) -> &ProfileService<SharedDocuments> {
        &self.inner.profiles
    }

    /// Get the preferences store.
    #[must_use]
    pub fn preferences(&self) -> &PreferencesStore {
        &self.inner.preferences
    }

    /// Get the live product list.
    #[must_use]
    pub fn products(&self) -> &LiveCatalog<Product> {
        &self.inner.products
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use screw_plus_core::Price;

    use super::*;
    use crate::catalog::MemoryDocumentStore;

    fn config(dir: &std::path::Path) -> StorefrontConfig {
        StorefrontConfig {
            data_dir: dir.to_path_buf(),
            ..StorefrontConfig::default()
        }
    }

    #[tokio::test]
    async fn test_restores_saved_selection() {
        let dir = tempfile::tempdir().unwrap();
        let documents: SharedDocuments = Arc::new(MemoryDocumentStore::new());

        let first = AppState::new(config(dir.path()), Arc::clone(&documents))
            .await
            .unwrap();
        let tee = Product::new("1", "Classic White T-Shirt", Price::from(799));
        first.shop().add_to_cart(&tee, "L", "White");
        first
            .preferences()
            .save_selection(&first.shop().snapshot())
            .await
            .unwrap();

        let second = AppState::new(config(dir.path()), documents).await.unwrap();
        assert_eq!(second.shop().cart_items_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(config(dir.path()), Arc::new(MemoryDocumentStore::new()))
            .await
            .unwrap();
        let clone = state.clone();

        clone.shop().toggle_favorite("9");
        assert!(state.shop().is_favorite("9"));
    }

    #[tokio::test]
    async fn test_from_config_requires_firebase() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppState::from_config(config(dir.path())).await.err().unwrap();
        assert!(matches!(err, crate::error::AppError::Config(_)));
    }
}
