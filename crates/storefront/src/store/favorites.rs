//! Wishlist membership.

use screw_plus_core::ProductId;
use serde::{Deserialize, Serialize};

/// Set of favorited product ids.
///
/// Membership is a set; insertion order is kept only so the wishlist renders
/// in the order items were hearted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: Vec<ProductId>,
}

impl FavoriteSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Rebuild from stored ids, dropping duplicates.
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.contains(id.as_str()) {
                set.ids.push(id);
            }
        }
        set
    }

    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.ids.iter().any(|id| id.as_str() == product_id)
    }

    /// Flip membership. Returns `true` if the product is a favorite afterwards.
    pub fn toggle(&mut self, product_id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|id| id.as_str() == product_id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(ProductId::new(product_id));
            true
        }
    }

    /// Remove every id. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
