//! Catalog documents: products, categories and home-screen banners.

use serde::{Deserialize, Serialize};

use super::id::{BannerId, CategoryId, ProductId};
use super::price::Price;

/// A specific size/color combination of a product with its own price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub size: String,
    pub color: String,
    pub price: Price,
}

/// A catalog product.
///
/// Optional fields default when absent so partially-filled admin documents
/// still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// MRP shown struck through next to the sale price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    /// Discount percentage as stored on the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Create a product with the required fields; everything else defaults.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            original_price: None,
            discount: None,
            image: String::new(),
            images: Vec::new(),
            category: String::new(),
            brand: String::new(),
            rating: 0.0,
            reviews: 0,
            sizes: Vec::new(),
            colors: Vec::new(),
            description: String::new(),
            is_new: false,
            is_bestseller: false,
            variants: Vec::new(),
        }
    }

    /// All image URLs, primary first.
    pub fn image_urls(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.image.as_str())
            .filter(|url| !url.is_empty())
            .chain(self.images.iter().map(String::as_str))
    }

    /// First declared size, used when moving wishlist items to the cart.
    #[must_use]
    pub fn first_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// First declared color, used when moving wishlist items to the cart.
    #[must_use]
    pub fn first_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }
}

/// A browse category tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub product_count: u32,
}

/// A home-screen promotional banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub cta: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
}

const fn default_active() -> bool {
    true
}
