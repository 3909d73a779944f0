//! Typed catalog reads and admin writes.
//!
//! Product, category and banner lists are cached with `moka` for the
//! configured TTL. Any write to a collection invalidates its cached entries.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use moka::future::Cache;
use screw_plus_core::{Banner, BannerId, Category, CategoryId, Product, ProductId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::{
    BANNERS, BannerDraft, CATEGORIES, CatalogError, CatalogSeed, CategoryDraft, DocumentStore,
    Fields, OrderBy, PRODUCTS, ProductDraft, to_fields,
};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(String),
    Categories,
    Banners,
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
    Categories(Arc<Vec<Category>>),
    Banners(Arc<Vec<Banner>>),
}

/// RFC 3339 value for `createdAt`/`updatedAt`. The Firestore store sends
/// these fields as native timestamps.
pub(crate) fn timestamp(now: DateTime<Utc>) -> serde_json::Value {
    serde_json::Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn stamp_created(fields: &mut Fields, now: DateTime<Utc>) {
    fields.insert("createdAt".to_string(), timestamp(now));
    fields.insert("updatedAt".to_string(), timestamp(now));
}

fn stamp_updated(fields: &mut Fields, now: DateTime<Utc>) {
    fields.insert("updatedAt".to_string(), timestamp(now));
}

/// Catalog service over any [`DocumentStore`].
///
/// Cheap to clone; clones share the store and the cache.
pub struct CatalogService<S> {
    inner: Arc<CatalogInner<S>>,
}

struct CatalogInner<S> {
    store: S,
    cache: Cache<CacheKey, CacheValue>,
}

impl<S> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DocumentStore> CatalogService<S> {
    /// Create a service whose list reads are cached for `ttl`.
    #[must_use]
    pub fn new(store: S, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();

        Self {
            inner: Arc::new(CatalogInner { store, cache }),
        }
    }

    /// The underlying document store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        order: &OrderBy,
    ) -> Result<Vec<T>, CatalogError> {
        let documents = self.inner.store.list(collection, order).await?;
        let mut records = Vec::with_capacity(documents.len());
        for doc in documents {
            let id = doc.id.clone();
            match doc.decode() {
                Ok(record) => records.push(record),
                Err(e) => warn!(collection, id = %id, error = %e, "Skipping malformed document"),
            }
        }
        Ok(records)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// All products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails. Individual documents that
    /// don't decode are skipped.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let products: Vec<Product> = self.list(PRODUCTS, &OrderBy::desc("createdAt")).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::new(products.clone())))
            .await;

        Ok(products)
    }

    /// Drop cached products and read them again.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn reload_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.inner.cache.invalidate(&CacheKey::Products).await;
        self.products().await
    }

    /// One product for the detail screen.
    ///
    /// Read failures are logged and reported as `None`, the same as a missing
    /// product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product_by_id(&self, id: &str) -> Option<Product> {
        let key = CacheKey::Product(id.to_string());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Some(*product);
        }

        let result = match self.inner.store.get(PRODUCTS, id).await {
            Ok(Some(doc)) => doc.decode::<Product>().map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };

        match result {
            Ok(Some(product)) => {
                self.inner
                    .cache
                    .insert(key, CacheValue::Product(Box::new(product.clone())))
                    .await;
                Some(product)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching product");
                None
            }
        }
    }

    async fn invalidate_products(&self) {
        self.inner.cache.invalidate(&CacheKey::Products).await;
    }

    /// Create a product under a generated id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for an incomplete draft, or the
    /// store's error if the write fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_product(&self, draft: &ProductDraft) -> Result<ProductId, CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(draft)?;
        stamp_created(&mut fields, Utc::now());

        let id = self.inner.store.create(PRODUCTS, fields).await?;
        self.invalidate_products().await;
        debug!(id = %id, "Product added");
        Ok(ProductId::new(id))
    }

    /// Overwrite the draft's fields on an existing product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for an incomplete draft, or
    /// [`CatalogError::NotFound`] if the product doesn't exist.
    #[instrument(skip(self, draft), fields(product_id = %id))]
    pub async fn update_product(&self, id: &str, draft: &ProductDraft) -> Result<(), CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(draft)?;
        stamp_updated(&mut fields, Utc::now());

        self.inner.store.update(PRODUCTS, id, fields).await?;
        self.invalidate_products().await;
        self.inner.cache.invalidate(&CacheKey::Product(id.to_string())).await;
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &str) -> Result<(), CatalogError> {
        self.inner.store.delete(PRODUCTS, id).await?;
        self.invalidate_products().await;
        self.inner.cache.invalidate(&CacheKey::Product(id.to_string())).await;
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// All categories by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let categories: Vec<Category> = self.list(CATEGORIES, &OrderBy::asc("name")).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::new(categories.clone())),
            )
            .await;

        Ok(categories)
    }

    /// Create a category under a generated id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for a blank name, or the store's
    /// error if the write fails.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn add_category(&self, draft: &CategoryDraft) -> Result<CategoryId, CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(draft)?;
        stamp_created(&mut fields, Utc::now());

        let id = self.inner.store.create(CATEGORIES, fields).await?;
        self.inner.cache.invalidate(&CacheKey::Categories).await;
        Ok(CategoryId::new(id))
    }

    /// Overwrite the draft's fields on an existing category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] for a blank name, or
    /// [`CatalogError::NotFound`] if the category doesn't exist.
    #[instrument(skip(self, draft), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &str,
        draft: &CategoryDraft,
    ) -> Result<(), CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(draft)?;
        stamp_updated(&mut fields, Utc::now());

        self.inner.store.update(CATEGORIES, id, fields).await?;
        self.inner.cache.invalidate(&CacheKey::Categories).await;
        Ok(())
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &str) -> Result<(), CatalogError> {
        self.inner.store.delete(CATEGORIES, id).await?;
        self.inner.cache.invalidate(&CacheKey::Categories).await;
        Ok(())
    }

    // =========================================================================
    // Banners
    // =========================================================================

    /// All banners by display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, CatalogError> {
        if let Some(CacheValue::Banners(banners)) = self.inner.cache.get(&CacheKey::Banners).await {
            debug!("Cache hit for banners");
            return Ok(banners.as_ref().clone());
        }

        let banners: Vec<Banner> = self.list(BANNERS, &OrderBy::asc("order")).await?;

        self.inner
            .cache
            .insert(CacheKey::Banners, CacheValue::Banners(Arc::new(banners.clone())))
            .await;

        Ok(banners)
    }

    /// Active banners for the home carousel, by display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn active_banners(&self) -> Result<Vec<Banner>, CatalogError> {
        let mut banners = self.banners().await?;
        banners.retain(|banner| banner.is_active);
        Ok(banners)
    }

    /// Create a banner under a generated id. Unset `isActive`/`order` become
    /// `true`/`0`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if a required field is blank, or
    /// the store's error if the write fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_banner(&self, draft: &BannerDraft) -> Result<BannerId, CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(&draft.with_defaults())?;
        stamp_created(&mut fields, Utc::now());

        let id = self.inner.store.create(BANNERS, fields).await?;
        self.inner.cache.invalidate(&CacheKey::Banners).await;
        Ok(BannerId::new(id))
    }

    /// Overwrite the draft's fields on an existing banner. Unset
    /// `isActive`/`order` are left as stored.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if a required field is blank, or
    /// [`CatalogError::NotFound`] if the banner doesn't exist.
    #[instrument(skip(self, draft), fields(banner_id = %id))]
    pub async fn update_banner(&self, id: &str, draft: &BannerDraft) -> Result<(), CatalogError> {
        draft.validate()?;
        let mut fields = to_fields(draft)?;
        stamp_updated(&mut fields, Utc::now());

        self.inner.store.update(BANNERS, id, fields).await?;
        self.inner.cache.invalidate(&CacheKey::Banners).await;
        Ok(())
    }

    /// Delete a banner.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete fails.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn delete_banner(&self, id: &str) -> Result<(), CatalogError> {
        self.inner.store.delete(BANNERS, id).await?;
        self.inner.cache.invalidate(&CacheKey::Banners).await;
        Ok(())
    }

    // =========================================================================
    // Bulk import
    // =========================================================================

    /// Write every seed document under its own id, replacing existing
    /// documents. The whole batch shares one `createdAt` so list reads keep
    /// seed order among them. Returns the number of documents written.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first failed write.
    #[instrument(skip(self, seed), fields(documents = seed.len()))]
    pub async fn import(&self, seed: &CatalogSeed) -> Result<usize, CatalogError> {
        let now = Utc::now();
        let mut written = 0;

        for category in &seed.categories {
            self.put(CATEGORIES, category.id.as_str(), category, now).await?;
            written += 1;
        }
        for product in &seed.products {
            self.put(PRODUCTS, product.id.as_str(), product, now).await?;
            written += 1;
        }
        for banner in &seed.banners {
            self.put(BANNERS, banner.id.as_str(), banner, now).await?;
            written += 1;
        }

        self.inner.cache.invalidate_all();
        debug!(written, "Imported catalog seed");
        Ok(written)
    }

    async fn put<T: serde::Serialize>(
        &self,
        collection: &str,
        id: &str,
        record: &T,
        now: DateTime<Utc>,
    ) -> Result<(), CatalogError> {
        let mut fields = to_fields(record)?;
        stamp_created(&mut fields, now);
        self.inner.store.set(collection, id, fields).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use screw_plus_core::Price;
    use serde_json::json;

    use super::*;
    use crate::catalog::MemoryDocumentStore;

    fn service() -> CatalogService<MemoryDocumentStore> {
        CatalogService::new(MemoryDocumentStore::new(), Duration::from_secs(300))
    }

    fn product_draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            price: Price::from(799),
            image: "https://img.example/p.jpg".to_string(),
            category: "Men".to_string(),
            ..ProductDraft::default()
        }
    }

    fn banner_draft(title: &str) -> BannerDraft {
        BannerDraft {
            title: title.to_string(),
            subtitle: "Limited time".to_string(),
            image: "https://img.example/b.jpg".to_string(),
            cta: "Shop Now".to_string(),
            ..BannerDraft::default()
        }
    }

    #[tokio::test]
    async fn test_add_product_stamps_timestamps() {
        let service = service();
        let id = service.add_product(&product_draft("Tee")).await.unwrap();

        let doc = service.store().get(PRODUCTS, id.as_str()).await.unwrap().unwrap();
        assert!(doc.fields.contains_key("createdAt"));
        assert_eq!(doc.fields["createdAt"], doc.fields["updatedAt"]);
        assert!(!doc.fields.contains_key("id"));
    }

    #[tokio::test]
    async fn test_products_newest_first() {
        let service = service();
        let mut older = Fields::new();
        older.insert("title".to_string(), json!("Old"));
        older.insert("price".to_string(), json!(100));
        older.insert("createdAt".to_string(), json!("2024-01-01T00:00:00.000Z"));
        service.store().set(PRODUCTS, "old", older).await.unwrap();

        service.add_product(&product_draft("New")).await.unwrap();

        let titles: Vec<_> = service
            .products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["New", "Old"]);
    }

    #[tokio::test]
    async fn test_product_reads_are_cached_until_write() {
        let service = service();
        service.add_product(&product_draft("First")).await.unwrap();
        assert_eq!(service.products().await.unwrap().len(), 1);

        // Bypass the service: the cached list is still served.
        let mut raw = Fields::new();
        raw.insert("title".to_string(), json!("Sneaky"));
        raw.insert("price".to_string(), json!(5));
        raw.insert("createdAt".to_string(), json!("2024-01-01T00:00:00.000Z"));
        service.store().set(PRODUCTS, "sneaky", raw).await.unwrap();
        assert_eq!(service.products().await.unwrap().len(), 1);

        // A write through the service invalidates.
        service.add_product(&product_draft("Second")).await.unwrap();
        assert_eq!(service.products().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_documents_are_skipped() {
        let service = service();
        let mut bad = Fields::new();
        bad.insert("title".to_string(), json!(["not", "a", "title"]));
        bad.insert("createdAt".to_string(), json!("2024-01-01T00:00:00.000Z"));
        service.store().set(PRODUCTS, "bad", bad).await.unwrap();
        service.add_product(&product_draft("Good")).await.unwrap();

        let products = service.products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Good");
    }

    #[tokio::test]
    async fn test_product_by_id() {
        let service = service();
        let id = service.add_product(&product_draft("Tee")).await.unwrap();

        let product = service.product_by_id(id.as_str()).await.unwrap();
        assert_eq!(product.id, id);
        assert_eq!(product.title, "Tee");
        assert!(service.product_by_id("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_product_by_id_undecodable_is_none() {
        let service = service();
        service.store().set(PRODUCTS, "broken", Fields::new()).await.unwrap();
        assert!(service.product_by_id("broken").await.is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_product() {
        let service = service();
        let id = service.add_product(&product_draft("Tee")).await.unwrap();
        service.product_by_id(id.as_str()).await.unwrap();

        service
            .update_product(id.as_str(), &product_draft("Renamed Tee"))
            .await
            .unwrap();
        let product = service.product_by_id(id.as_str()).await.unwrap();
        assert_eq!(product.title, "Renamed Tee");

        service.delete_product(id.as_str()).await.unwrap();
        assert!(service.product_by_id(id.as_str()).await.is_none());
        assert!(service.products().await.unwrap().is_empty());

        let err = service
            .update_product("gone", &product_draft("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_drafts_are_not_written() {
        let service = service();
        let err = service.add_product(&ProductDraft::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(service.products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_by_name() {
        let service = service();
        for name in ["Women", "Kids", "Men"] {
            service
                .add_category(&CategoryDraft {
                    name: name.to_string(),
                    ..CategoryDraft::default()
                })
                .await
                .unwrap();
        }

        let names: Vec<_> = service
            .categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Kids", "Men", "Women"]);
    }

    #[tokio::test]
    async fn test_banner_defaults_and_order() {
        let service = service();
        let mut second = banner_draft("Second");
        second.order = Some(2);
        second.is_active = Some(false);
        service.add_banner(&second).await.unwrap();
        let first_id = service.add_banner(&banner_draft("First")).await.unwrap();

        let banners = service.banners().await.unwrap();
        assert_eq!(banners[0].id, first_id);
        assert!(banners[0].is_active);
        assert_eq!(banners[0].order, 0);
        assert_eq!(banners[1].title, "Second");

        let active = service.active_banners().await.unwrap();
        assert_eq!(active.len(), 1);

        service.delete_banner(first_id.as_str()).await.unwrap();
        assert_eq!(service.banners().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_banner_keeps_unset_flags() {
        let service = service();
        let mut draft = banner_draft("Sale");
        draft.is_active = Some(false);
        draft.order = Some(5);
        let id = service.add_banner(&draft).await.unwrap();

        service
            .update_banner(id.as_str(), &banner_draft("Bigger Sale"))
            .await
            .unwrap();

        let banner = &service.banners().await.unwrap()[0];
        assert_eq!(banner.title, "Bigger Sale");
        assert!(!banner.is_active);
        assert_eq!(banner.order, 5);
    }

    #[tokio::test]
    async fn test_import_keeps_seed_order() {
        let service = service();
        let seed = CatalogSeed::parse(
            r#"
products:
  - { id: "a", title: "First", price: 100 }
  - { id: "b", title: "Second", price: 200 }
categories:
  - { id: "men", name: "Men" }
"#,
        )
        .unwrap();

        assert_eq!(service.import(&seed).await.unwrap(), 3);

        let ids: Vec<_> = service
            .products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(service.categories().await.unwrap()[0].id.as_str(), "men");
    }
}
