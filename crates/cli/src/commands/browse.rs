//! Read-only catalog commands.

use std::path::Path;

use screw_plus_core::{Price, Product};
use screw_plus_storefront::browse::{filter_by_category, search_products};
use screw_plus_storefront::pricing::{
    discount_percentage, format_inr, product_discount, resolve_variant_price,
};
use tracing::info;

use super::open_catalog;

/// Print products whose title, category or brand contains `query`.
///
/// # Errors
///
/// Returns an error if the catalog can't be opened or read.
pub async fn search(seed: Option<&Path>, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let products = open_catalog(seed).await?.products().await?;
    let matches = search_products(&products, query);
    info!(query, results = matches.len(), "Search complete");
    print_products(&matches);
    Ok(())
}

/// Print products in `category` ("All" lists everything).
///
/// # Errors
///
/// Returns an error if the catalog can't be opened or read.
pub async fn category(
    seed: Option<&Path>,
    category: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = open_catalog(seed).await?.products().await?;
    let matches = filter_by_category(&products, category);
    info!(category, results = matches.len(), "Browse complete");
    print_products(&matches);
    Ok(())
}

/// Print the price of a product variant and its discount against the MRP.
///
/// # Errors
///
/// Returns an error if the catalog can't be opened or the product doesn't
/// exist.
pub async fn price(
    seed: Option<&Path>,
    product_id: &str,
    size: Option<&str>,
    color: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = open_catalog(seed).await?;
    let product = catalog
        .product_by_id(product_id)
        .await
        .ok_or_else(|| format!("Product not found: {product_id}"))?;

    let price = resolve_variant_price(&product, size, color);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", product.title);
        println!(
            "  size {} / color {}",
            size.unwrap_or("-"),
            color.unwrap_or("-")
        );
        match product.original_price {
            Some(mrp) => println!(
                "  {}  (MRP {}, {}% OFF)",
                format_inr(price),
                format_inr(mrp),
                discount_percentage(mrp, price)
            ),
            None => println!("  {}", format_inr(price)),
        }
    }
    Ok(())
}

/// Print the rounded discount between `mrp` and `sale`.
///
/// # Errors
///
/// Returns an error if either amount is not a number.
pub fn discount(mrp: &str, sale: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mrp: Price = mrp.parse()?;
    let sale: Price = sale.parse()?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}% OFF", discount_percentage(mrp, sale));
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_products(products: &[&Product]) {
    if products.is_empty() {
        println!("No products found");
        return;
    }

    for product in products {
        let discount = product_discount(product)
            .map(|pct| format!("  ({pct}% OFF)"))
            .unwrap_or_default();
        println!(
            "{:>6}  {:<40} {:>10}{discount}",
            product.id.as_str(),
            product.title,
            format_inr(product.price)
        );
    }
}
