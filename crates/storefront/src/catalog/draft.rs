//! Admin form payloads for catalog writes.

use screw_plus_core::{Price, ProductVariant};
use serde::{Deserialize, Serialize};

use super::CatalogError;

const REQUIRED_FIELDS: &str = "Please fill in all required fields";

fn require(value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(REQUIRED_FIELDS.to_string()));
    }
    Ok(())
}

/// Product fields as entered in the admin product form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
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
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl ProductDraft {
    /// Title, category and image are required and the price must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] describing the first failed rule.
    pub fn validate(&self) -> Result<(), CatalogError> {
        require(&self.title)?;
        require(&self.category)?;
        require(&self.image)?;
        if self.price.is_non_positive() {
            return Err(CatalogError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Category fields as entered in the admin category form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub product_count: u32,
}

impl CategoryDraft {
    /// The name is required.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the name is blank.
    pub fn validate(&self) -> Result<(), CatalogError> {
        require(&self.name)
    }
}

/// Banner fields as entered in the admin banner form.
///
/// `is_active` and `order` fall back to `true` and `0` when the form leaves
/// them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDraft {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub cta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl BannerDraft {
    /// Title, subtitle, image and call-to-action are all required.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if any of them is blank.
    pub fn validate(&self) -> Result<(), CatalogError> {
        require(&self.title)?;
        require(&self.subtitle)?;
        require(&self.image)?;
        require(&self.cta)
    }

    /// Copy with the unset defaults filled in.
    #[must_use]
    pub fn with_defaults(&self) -> Self {
        Self {
            is_active: Some(self.is_active.unwrap_or(true)),
            order: Some(self.order.unwrap_or(0)),
            ..self.clone()
        }
    }
}
