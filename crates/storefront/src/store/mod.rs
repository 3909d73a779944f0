//! Shared cart and wishlist state.
//!
//! [`ShopStore`] is a cheaply cloneable handle over one observable
//! [`StoreSnapshot`]. Every screen that shows a cart badge, the cart, or the
//! wishlist holds a clone of the same handle (injected through
//! [`AppState`](crate::state::AppState)) and either reads the current
//! snapshot or subscribes to changes.
//!
//! # Semantics
//!
//! - All operations are synchronous and infallible.
//! - Subscribers are notified only when a mutation actually changes state.
//! - Setting a line's quantity to zero deletes the line.
//!
//! # Example
//!
//! ```rust
//! use screw_plus_core::{Price, Product};
//! use screw_plus_storefront::store::ShopStore;
//!
//! let store = ShopStore::new();
//! let tee = Product::new("1", "Classic White T-Shirt", Price::from(799));
//!
//! store.add_to_cart(&tee, "M", "White");
//! store.add_to_cart(&tee, "M", "White");
//!
//! assert_eq!(store.cart_items_count(), 2);
//! assert_eq!(store.cart_total(), Price::from(1598));
//! ```

mod cart;
mod favorites;

use std::sync::Arc;

use screw_plus_core::{Price, Product, ProductId};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

pub use cart::{Cart, CartLine};
pub use favorites::FavoriteSet;

/// Category filter value that passes every product through.
pub const ALL_CATEGORIES: &str = "All";

/// Size used when a wishlist product declares no sizes.
pub const DEFAULT_SIZE: &str = "Default Size";

/// Color used when a wishlist product declares no colors.
pub const DEFAULT_COLOR: &str = "Default Color";

/// Point-in-time copy of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub cart: Cart,
    pub favorites: FavoriteSet,
    pub search_query: String,
    pub selected_category: String,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            cart: Cart::new(),
            favorites: FavoriteSet::new(),
            search_query: String::new(),
            selected_category: ALL_CATEGORIES.to_string(),
        }
    }
}

/// Cart and wishlist selection that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedSelection {
    pub cart: Cart,
    pub favorites: FavoriteSet,
}

impl From<&StoreSnapshot> for SavedSelection {
    fn from(snapshot: &StoreSnapshot) -> Self {
        Self {
            cart: snapshot.cart.clone(),
            favorites: snapshot.favorites.clone(),
        }
    }
}

/// Observable cart/wishlist store.
#[derive(Clone)]
pub struct ShopStore {
    inner: Arc<watch::Sender<StoreSnapshot>>,
}

impl Default for ShopStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShopStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopStore")
            .field("state", &*self.inner.borrow())
            .field("subscribers", &self.inner.receiver_count())
            .finish()
    }
}

impl ShopStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot(StoreSnapshot::default())
    }

    /// Create a store starting from an existing snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        let (tx, _rx) = watch::channel(snapshot);
        Self {
            inner: Arc::new(tx),
        }
    }

    /// Receive a fresh snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot> {
        self.inner.subscribe()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.borrow().clone()
    }

    fn mutate(&self, f: impl FnOnce(&mut StoreSnapshot) -> bool) -> bool {
        self.inner.send_if_modified(f)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of a product variant.
    pub fn add_to_cart(&self, product: &Product, size: &str, color: &str) {
        self.add_to_cart_with_quantity(product, size, color, 1);
    }

    /// Add `quantity` units of a product variant, merging with an existing line.
    pub fn add_to_cart_with_quantity(
        &self,
        product: &Product,
        size: &str,
        color: &str,
        quantity: u32,
    ) {
        if self.mutate(|state| state.cart.add(product, size, color, quantity)) {
            tracing::debug!(product_id = %product.id, size, color, quantity, "Added to cart");
        }
    }

    /// Delete the matching line; absent lines are ignored.
    pub fn remove_from_cart(&self, product_id: &str, size: &str, color: &str) {
        if self.mutate(|state| state.cart.remove(product_id, size, color)) {
            tracing::debug!(product_id, size, color, "Removed from cart");
        }
    }

    /// Replace the matching line's quantity. Zero deletes the line.
    pub fn update_cart_quantity(&self, product_id: &str, size: &str, color: &str, quantity: u32) {
        if self.mutate(|state| state.cart.set_quantity(product_id, size, color, quantity)) {
            tracing::debug!(product_id, size, color, quantity, "Updated cart quantity");
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&self) {
        self.mutate(|state| state.cart.clear());
    }

    /// Current cart lines.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.inner.borrow().cart.lines().to_vec()
    }

    /// Sum of captured price times quantity.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.inner.borrow().cart.total()
    }

    /// Sum of line quantities (the cart badge).
    #[must_use]
    pub fn cart_items_count(&self) -> u32 {
        self.inner.borrow().cart.items_count()
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Flip wishlist membership. Returns `true` if the product is now a favorite.
    pub fn toggle_favorite(&self, product_id: &str) -> bool {
        let mut now_favorite = false;
        self.mutate(|state| {
            now_favorite = state.favorites.toggle(product_id);
            true
        });
        now_favorite
    }

    #[must_use]
    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.inner.borrow().favorites.contains(product_id)
    }

    /// Favorited ids in the order they were added.
    #[must_use]
    pub fn favorites(&self) -> Vec<ProductId> {
        self.inner.borrow().favorites.iter().cloned().collect()
    }

    /// Empty the wishlist.
    pub fn clear_wishlist(&self) {
        self.mutate(|state| state.favorites.clear());
    }

    /// Add every favorited catalog product to the cart, then clear the wishlist.
    ///
    /// Each product goes in with its first declared size and color, or
    /// [`DEFAULT_SIZE`]/[`DEFAULT_COLOR`] when it declares none. Favorites
    /// missing from `catalog` are dropped with the rest of the wishlist.
    /// Returns the number of products moved.
    pub fn move_wishlist_to_cart(&self, catalog: &[Product]) -> usize {
        let mut moved = 0;
        self.mutate(|state| {
            let StoreSnapshot {
                cart, favorites, ..
            } = state;
            for product in catalog
                .iter()
                .filter(|p| favorites.contains(p.id.as_str()))
            {
                let size = product.first_size().unwrap_or(DEFAULT_SIZE);
                let color = product.first_color().unwrap_or(DEFAULT_COLOR);
                cart.add(product, size, color, 1);
                moved += 1;
            }
            let cleared = favorites.clear();
            moved > 0 || cleared
        });
        tracing::debug!(moved, "Moved wishlist to cart");
        moved
    }

    // =========================================================================
    // Browse filters
    // =========================================================================

    pub fn set_search_query(&self, query: &str) {
        self.mutate(|state| {
            if state.search_query == query {
                return false;
            }
            query.clone_into(&mut state.search_query);
            true
        });
    }

    #[must_use]
    pub fn search_query(&self) -> String {
        self.inner.borrow().search_query.clone()
    }

    pub fn set_selected_category(&self, category: &str) {
        self.mutate(|state| {
            if state.selected_category == category {
                return false;
            }
            category.clone_into(&mut state.selected_category);
            true
        });
    }

    #[must_use]
    pub fn selected_category(&self) -> String {
        self.inner.borrow().selected_category.clone()
    }

    // =========================================================================
    // Persistence hooks
    // =========================================================================

    /// The cart and wishlist part of the current state.
    #[must_use]
    pub fn saved_selection(&self) -> SavedSelection {
        SavedSelection::from(&*self.inner.borrow())
    }

    /// Replace cart and wishlist with a previously saved selection.
    ///
    /// Stored lines are normalized on the way in (duplicates merged,
    /// zero-quantity lines dropped).
    pub fn restore(&self, selection: SavedSelection) {
        let cart = Cart::from_lines(selection.cart.lines().iter().cloned());
        let favorites = FavoriteSet::from_ids(selection.favorites.iter().cloned());
        self.mutate(|state| {
            if state.cart == cart && state.favorites == favorites {
                return false;
            }
            state.cart = cart;
            state.favorites = favorites;
            true
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from(price))
    }

    #[test]
    fn test_totals_scenario() {
        let store = ShopStore::new();
        let p1 = product("P1", 100);
        let p2 = product("P2", 250);

        store.add_to_cart_with_quantity(&p1, "M", "Red", 2);
        store.add_to_cart(&p2, "L", "Blue");

        assert_eq!(store.cart_total(), Price::from(450));
        assert_eq!(store.cart_items_count(), 3);

        store.update_cart_quantity("P1", "M", "Red", 0);

        let lines = store.cart_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id().as_str(), "P2");
    }

    #[test]
    fn test_clones_share_state() {
        let store = ShopStore::new();
        let other = store.clone();

        store.add_to_cart(&product("p1", 10), "S", "Black");
        assert_eq!(other.cart_items_count(), 1);
    }

    #[test]
    fn test_instances_are_isolated() {
        let a = ShopStore::new();
        let b = ShopStore::new();
        a.toggle_favorite("p1");
        assert!(a.is_favorite("p1"));
        assert!(!b.is_favorite("p1"));
    }

    #[test]
    fn test_toggle_favorite_twice_restores() {
        let store = ShopStore::new();
        assert!(store.toggle_favorite("p1"));
        assert!(!store.toggle_favorite("p1"));
        assert!(store.favorites().is_empty());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = ShopStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.add_to_cart(&product("p1", 10), "S", "Black");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().cart.items_count(), 1);
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let store = ShopStore::new();
        let mut rx = store.subscribe();

        store.remove_from_cart("missing", "S", "Black");
        store.update_cart_quantity("missing", "S", "Black", 4);
        store.clear_cart();
        store.clear_wishlist();
        store.set_selected_category(ALL_CATEGORIES);

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_filter_setters() {
        let store = ShopStore::new();
        assert_eq!(store.selected_category(), ALL_CATEGORIES);
        assert_eq!(store.search_query(), "");

        store.set_search_query("denim");
        store.set_selected_category("Men");

        assert_eq!(store.search_query(), "denim");
        assert_eq!(store.selected_category(), "Men");
    }

    #[test]
    fn test_move_wishlist_to_cart() {
        let store = ShopStore::new();
        let mut tee = product("tee", 799);
        tee.sizes = vec!["S".to_string(), "M".to_string()];
        tee.colors = vec!["White".to_string()];
        let bag = product("bag", 3499);
        let ignored = product("ignored", 1);

        store.toggle_favorite("tee");
        store.toggle_favorite("bag");
        store.toggle_favorite("gone");

        let moved = store.move_wishlist_to_cart(&[tee, bag, ignored]);

        assert_eq!(moved, 2);
        assert!(store.favorites().is_empty());
        let snapshot = store.snapshot();
        assert!(snapshot.cart.find("tee", "S", "White").is_some());
        assert!(snapshot.cart.find("bag", DEFAULT_SIZE, DEFAULT_COLOR).is_some());
        assert!(snapshot.cart.find("ignored", DEFAULT_SIZE, DEFAULT_COLOR).is_none());
    }

    #[test]
    fn test_restore_replaces_selection() {
        let source = ShopStore::new();
        source.add_to_cart_with_quantity(&product("p1", 10), "S", "Black", 3);
        source.toggle_favorite("p9");
        let saved = source.saved_selection();

        let target = ShopStore::new();
        target.set_search_query("keep me");
        target.restore(saved.clone());

        assert_eq!(target.saved_selection(), saved);
        assert_eq!(target.search_query(), "keep me");
    }
}
