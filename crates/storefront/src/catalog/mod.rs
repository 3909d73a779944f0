//! Catalog and profile documents behind a pluggable document store.
//!
//! # Architecture
//!
//! - [`DocumentStore`] is the seam every screen reads through. Records are
//!   plain JSON maps; typed services decode them into core types.
//! - [`MemoryDocumentStore`] backs tests and the CLI's `--seed` mode.
//! - [`FirestoreDocumentStore`] talks to the managed document database over
//!   its REST API. The database is the source of truth; nothing is synced
//!   locally beyond the read cache in [`CatalogService`].
//!
//! # Collections
//!
//! | Collection   | Document            | Ordered by        |
//! |--------------|---------------------|-------------------|
//! | `products`   | [`Product`]         | `createdAt` desc  |
//! | `categories` | [`Category`]        | `name` asc        |
//! | `banners`    | [`Banner`]          | `order` asc       |
//! | `users`      | [`UserProfile`]     | keyed by uid      |
//!
//! [`Product`]: screw_plus_core::Product
//! [`Category`]: screw_plus_core::Category
//! [`Banner`]: screw_plus_core::Banner
//! [`UserProfile`]: screw_plus_core::UserProfile

mod draft;
mod firestore;
pub mod live;
mod memory;
mod profile;
mod seed;
mod service;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use draft::{BannerDraft, CategoryDraft, ProductDraft};
pub use firestore::FirestoreDocumentStore;
pub use live::LiveCatalog;
pub use memory::MemoryDocumentStore;
pub use profile::ProfileService;
pub use seed::CatalogSeed;
pub use service::CatalogService;

/// Product collection name.
pub const PRODUCTS: &str = "products";
/// Category collection name.
pub const CATEGORIES: &str = "categories";
/// Banner collection name.
pub const BANNERS: &str = "banners";
/// User profile collection name.
pub const USERS: &str = "users";

/// Document body: field name to JSON value.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Errors from document store reads/writes and document decoding.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The document API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Seed file could not be parsed.
    #[error("Seed parse error: {0}")]
    Seed(#[from] serde_yaml::Error),

    /// Seed file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored value could not be converted.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A draft failed form validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// A stored document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub const fn new(id: String, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Decode into a typed record. The document id is exposed to the record
    /// as an `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if the fields don't match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, CatalogError> {
        let mut fields = self.fields;
        fields.insert("id".to_string(), serde_json::Value::String(self.id));
        Ok(serde_json::from_value(serde_json::Value::Object(fields))?)
    }
}

/// Sort direction for list reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Wire name used by the REST API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Ordering for list reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }
}

/// A collection-oriented document database.
///
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection`, ordered by `order`.
    ///
    /// Documents that lack the order field are not returned.
    async fn list(&self, collection: &str, order: &OrderBy) -> Result<Vec<Document>, CatalogError>;

    /// One document, or `None` if it doesn't exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, CatalogError>;

    /// Insert a document under a generated id and return the id.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, CatalogError>;

    /// Create or fully replace the document with `id`.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError>;

    /// Merge `fields` into an existing document.
    ///
    /// Fails with [`CatalogError::NotFound`] if the document is missing.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), CatalogError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    async fn list(&self, collection: &str, order: &OrderBy) -> Result<Vec<Document>, CatalogError> {
        (**self).list(collection, order).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, CatalogError> {
        (**self).get(collection, id).await
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, CatalogError> {
        (**self).create(collection, fields).await
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        (**self).set(collection, id, fields).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        (**self).update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), CatalogError> {
        (**self).delete(collection, id).await
    }
}

/// Serialize a record into document fields, dropping its `id` (the id lives
/// in the document path, not the body).
pub(crate) fn to_fields<T: serde::Serialize>(record: &T) -> Result<Fields, CatalogError> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(CatalogError::Decode(format!(
            "expected an object, got {other}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use screw_plus_core::Category;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_injects_id() {
        let fields = json!({ "name": "Men", "image": "", "productCount": 12 });
        let doc = Document::new("cat-1".to_string(), fields.as_object().cloned().unwrap());

        let category: Category = doc.decode().unwrap();
        assert_eq!(category.id.as_str(), "cat-1");
        assert_eq!(category.product_count, 12);
    }

    #[test]
    fn test_decode_reports_shape_errors() {
        let fields = json!({ "name": 42 });
        let doc = Document::new("x".to_string(), fields.as_object().cloned().unwrap());
        assert!(matches!(doc.decode::<Category>(), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_to_fields_drops_id() {
        let category = Category {
            id: "c1".into(),
            name: "Kids".to_string(),
            image: String::new(),
            product_count: 0,
        };
        let fields = to_fields(&category).unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["name"], "Kids");
    }
}
