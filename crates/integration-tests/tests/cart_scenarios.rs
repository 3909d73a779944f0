//! Cart and wishlist behaviour through the shared store.
//!
//! Every screen holds a clone of the same store handle, so these tests mutate
//! through one clone and observe through another.

#![allow(clippy::unwrap_used)]

use screw_plus_core::Price;
use screw_plus_integration_tests::{product, seeded_catalog};
use screw_plus_storefront::browse::wishlist_products;
use screw_plus_storefront::store::ShopStore;

// ============================================================================
// Cart lines
// ============================================================================

#[test]
fn adding_same_variant_twice_merges_into_one_line() {
    let store = ShopStore::new();
    let tee = product("1", "Classic White T-Shirt", 799);

    store.add_to_cart(&tee, "M", "White");
    store.add_to_cart(&tee, "M", "White");

    let lines = store.cart_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 2);
}

#[test]
fn different_variants_get_independent_lines() {
    let store = ShopStore::new();
    let tee = product("1", "Classic White T-Shirt", 799);

    store.add_to_cart(&tee, "M", "White");
    store.add_to_cart(&tee, "L", "White");
    store.add_to_cart(&tee, "M", "Black");

    assert_eq!(store.cart_lines().len(), 3);
    store.remove_from_cart("1", "L", "White");
    let lines = store.cart_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.quantity == 1));
}

#[test]
fn removing_unknown_line_is_a_no_op() {
    let store = ShopStore::new();
    store.add_to_cart(&product("1", "Classic White T-Shirt", 799), "M", "White");
    let before = store.snapshot();

    store.remove_from_cart("1", "XL", "White");
    store.remove_from_cart("404", "M", "White");

    assert_eq!(store.snapshot(), before);
}

#[test]
fn totals_use_captured_prices() {
    let store = ShopStore::new();
    let p1 = product("P1", "Graphic Tee", 100);
    let p2 = product("P2", "Chinos", 250);

    store.add_to_cart_with_quantity(&p1, "M", "Red", 2);
    store.add_to_cart(&p2, "L", "Blue");
    assert_eq!(store.cart_total(), Price::from(450));
    assert_eq!(store.cart_items_count(), 3);

    // A later catalog price change does not reach existing lines.
    let repriced = product("P1", "Graphic Tee", 120);
    store.add_to_cart(&repriced, "M", "Red");
    assert_eq!(store.cart_total(), Price::from(550));

    store.update_cart_quantity("P1", "M", "Red", 0);
    let lines = store.cart_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].product_id().as_str(), "P2");
    assert_eq!(store.cart_total(), Price::from(250));
    assert_eq!(store.cart_items_count(), 1);
}

#[test]
fn clones_share_one_cart() {
    let product_screen = ShopStore::new();
    let cart_screen = product_screen.clone();

    product_screen.add_to_cart(&product("1", "Classic White T-Shirt", 799), "S", "Black");
    assert_eq!(cart_screen.cart_items_count(), 1);

    cart_screen.clear_cart();
    assert_eq!(product_screen.cart_items_count(), 0);
}

// ============================================================================
// Wishlist
// ============================================================================

#[test]
fn toggling_twice_restores_favorites() {
    let store = ShopStore::new();
    store.toggle_favorite("3");
    let before = store.favorites();

    assert!(store.toggle_favorite("9"));
    assert!(!store.toggle_favorite("9"));

    assert_eq!(store.favorites(), before);
}

#[tokio::test]
async fn wishlist_moves_to_cart_with_default_variants() {
    let products = seeded_catalog().await.products().await.unwrap();
    let store = ShopStore::new();
    store.toggle_favorite("1");
    store.toggle_favorite("4");
    store.toggle_favorite("deleted-product");

    let snapshot = store.snapshot();
    let wished = wishlist_products(&products, &snapshot.favorites);
    assert_eq!(wished.len(), 2);

    let moved = store.move_wishlist_to_cart(&products);
    assert_eq!(moved, 2);
    assert!(store.favorites().is_empty());

    let lines = store.cart_lines();
    let tee = lines.iter().find(|l| l.product_id().as_str() == "1").unwrap();
    assert_eq!(tee.selected_size, "S");
    assert_eq!(tee.selected_color, "White");

    let bag = lines.iter().find(|l| l.product_id().as_str() == "4").unwrap();
    assert_eq!(bag.selected_size, "Default Size");
    assert_eq!(bag.selected_color, "Default Color");
}

#[tokio::test]
async fn subscribers_see_every_change() {
    let store = ShopStore::new();
    let mut rx = store.subscribe();

    store.toggle_favorite("5");
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().favorites.contains("5"));

    store.add_to_cart(&product("5", "Linen Shirt", 1199), "M", "White");
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().cart.items_count(), 1);
}
