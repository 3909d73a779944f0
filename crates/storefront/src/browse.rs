//! List filtering for the search, category and home screens.
//!
//! All functions are pure linear scans over an in-memory product list and
//! preserve catalog order.

use screw_plus_core::Product;

use crate::store::{ALL_CATEGORIES, FavoriteSet};

/// Products whose category equals `category` exactly.
///
/// [`ALL_CATEGORIES`] passes every product through.
#[must_use]
pub fn filter_by_category<'a>(products: &'a [Product], category: &str) -> Vec<&'a Product> {
    if category == ALL_CATEGORIES {
        return products.iter().collect();
    }
    products.iter().filter(|p| p.category == category).collect()
}

/// Case-insensitive substring search over title, category and brand.
///
/// A blank query yields no results rather than the whole catalog. The query
/// itself is not trimmed, so `"shirt "` only matches text containing the
/// trailing space.
#[must_use]
pub fn search_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| {
            [&p.title, &p.category, &p.brand]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// First `limit` products flagged as new arrivals.
#[must_use]
pub fn new_arrivals(products: &[Product], limit: usize) -> Vec<&Product> {
    products.iter().filter(|p| p.is_new).take(limit).collect()
}

/// First `limit` products flagged as best sellers.
#[must_use]
pub fn best_sellers(products: &[Product], limit: usize) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.is_bestseller)
        .take(limit)
        .collect()
}

/// Catalog products that are in the wishlist, in catalog order.
#[must_use]
pub fn wishlist_products<'a>(products: &'a [Product], favorites: &FavoriteSet) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| favorites.contains(p.id.as_str()))
        .collect()
}

/// Location picker filter. Unlike product search, an empty query keeps every
/// location.
#[must_use]
pub fn filter_locations<'a, S: AsRef<str>>(locations: &'a [S], query: &str) -> Vec<&'a str> {
    let needle = query.to_lowercase();
    locations
        .iter()
        .map(AsRef::as_ref)
        .filter(|location| location.to_lowercase().contains(&needle))
        .collect()
}
