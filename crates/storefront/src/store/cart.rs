//! Cart lines keyed by product, size and color.
//!
//! A line's identity is the triple (product id, selected size, selected
//! color). The cart never holds two lines with the same identity and never
//! holds a line with quantity zero.

use screw_plus_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};

/// One cart entry.
///
/// The product is a snapshot taken when the line was first added; later
/// catalog price changes do not reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
    pub selected_size: String,
    pub selected_color: String,
}

impl CartLine {
    /// Whether this line has the given identity.
    #[must_use]
    pub fn matches(&self, product_id: &str, size: &str, color: &str) -> bool {
        self.product.id.as_str() == product_id
            && self.selected_size == size
            && self.selected_color == color
    }

    /// Product id of the line.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Captured price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from stored lines, merging duplicate identities and
    /// dropping zero-quantity lines.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add(
                &line.product,
                &line.selected_size,
                &line.selected_color,
                line.quantity,
            );
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines (not units).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Find the line with the given identity.
    #[must_use]
    pub fn find(&self, product_id: &str, size: &str, color: &str) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.matches(product_id, size, color))
    }

    /// Add `quantity` units of a product variant.
    ///
    /// Increments an existing line in place or appends a new one. Returns
    /// `false` (and does nothing) when `quantity` is zero.
    pub fn add(&mut self, product: &Product, size: &str, color: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(product.id.as_str(), size, color))
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product: product.clone(),
                quantity,
                selected_size: size.to_owned(),
                selected_color: color.to_owned(),
            });
        }
        true
    }

    /// Delete the line with the given identity. Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str, size: &str, color: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| !line.matches(product_id, size, color));
        self.lines.len() != before
    }

    /// Set a line's quantity; zero deletes the line.
    ///
    /// Returns whether the cart changed. Absent lines are left alone.
    pub fn set_quantity(
        &mut self,
        product_id: &str,
        size: &str,
        color: &str,
        quantity: u32,
    ) -> bool {
        if quantity == 0 {
            return self.remove(product_id, size, color);
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.matches(product_id, size, color))
        {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove every line. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    /// Sum of captured price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines (the cart badge count).
    #[must_use]
    pub fn items_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }
}
