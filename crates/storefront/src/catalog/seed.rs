//! Catalog seed files.
//!
//! A seed is a YAML (or JSON, which YAML parses too) document with optional
//! `products`, `categories` and `banners` lists:
//!
//! ```yaml
//! categories:
//!   - id: men
//!     name: Men
//! products:
//!   - id: "1"
//!     title: Classic White T-Shirt
//!     price: 799
//!     category: Men
//! ```

use std::path::Path;

use screw_plus_core::{Banner, Category, Product};
use serde::{Deserialize, Serialize};

use super::CatalogError;

/// Catalog contents loaded from a seed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub banners: Vec<Banner>,
}

impl CatalogSeed {
    /// Parse seed text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Seed`] if the text is not a valid seed.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file can't be read, or
    /// [`CatalogError::Seed`] if it doesn't parse.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = tokio::fs::read_to_string(path).await?;
        let seed = Self::parse(&text)?;
        tracing::debug!(
            path = %path.display(),
            products = seed.products.len(),
            categories = seed.categories.len(),
            banners = seed.banners.len(),
            "Loaded catalog seed"
        );
        Ok(seed)
    }

    /// Total number of documents in the seed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len() + self.categories.len() + self.banners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
