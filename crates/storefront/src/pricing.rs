//! Discount and variant price helpers used by product cards and the
//! product detail screen.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use screw_plus_core::{Price, Product};

/// Whole-number discount of `sale_price` against `mrp`.
///
/// Computes `round((mrp - sale) / mrp * 100)` with halves rounding up
/// (towards positive infinity). Returns 0 when `mrp` is zero or negative. A
/// sale price above the MRP gives a negative result, which is returned as is.
#[must_use]
pub fn discount_percentage(mrp: Price, sale_price: Price) -> i64 {
    if mrp.is_non_positive() {
        return 0;
    }

    let ratio = (mrp.amount() - sale_price.amount()) / mrp.amount() * Decimal::ONE_HUNDRED;
    (ratio + Decimal::new(5, 1))
        .floor()
        .to_i64()
        .unwrap_or_default()
}

/// Discount of a product's price against its `originalPrice`, if it has one.
#[must_use]
pub fn product_discount(product: &Product) -> Option<i64> {
    product
        .original_price
        .map(|mrp| discount_percentage(mrp, product.price))
}

/// Price for the shopper's current size/color selection.
///
/// 1. Both size and color chosen and a matching variant exists: that variant's price.
/// 2. The product has variants: the cheapest one ("from" price).
/// 3. Otherwise the product's base price.
#[must_use]
pub fn resolve_variant_price(product: &Product, size: Option<&str>, color: Option<&str>) -> Price {
    if let (Some(size), Some(color)) = (size, color)
        && let Some(variant) = product
            .variants
            .iter()
            .find(|v| v.size == size && v.color == color)
    {
        return variant.price;
    }

    product
        .variants
        .iter()
        .map(|v| v.price)
        .min()
        .unwrap_or(product.price)
}

/// Display form such as `₹1299` or `₹799.5`.
#[must_use]
pub fn format_inr(price: Price) -> String {
    price.display()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use screw_plus_core::ProductVariant;

    use super::*;

    fn rupees(amount: &str) -> Price {
        amount.parse().unwrap()
    }

    #[test]
    fn test_discount_examples() {
        assert_eq!(discount_percentage(Price::from(1000), Price::from(750)), 25);
        assert_eq!(discount_percentage(Price::from(1000), Price::from(600)), 40);
        assert_eq!(discount_percentage(Price::from(1299), Price::from(799)), 38);
        assert_eq!(discount_percentage(Price::from(500), Price::from(500)), 0);
    }

    #[test]
    fn test_discount_non_positive_mrp() {
        assert_eq!(discount_percentage(Price::ZERO, Price::from(100)), 0);
        assert_eq!(discount_percentage(Price::from(-10), Price::from(5)), 0);
    }

    #[test]
    fn test_discount_negative_passes_through() {
        assert_eq!(discount_percentage(Price::from(100), Price::from(150)), -50);
    }

    #[test]
    fn test_discount_midpoints_round_up() {
        // 37.5% -> 38
        assert_eq!(discount_percentage(Price::from(400), Price::from(250)), 38);
        // -2.5% -> -2
        assert_eq!(discount_percentage(Price::from(200), Price::from(205)), -2);
        assert_eq!(discount_percentage(Price::from(200), rupees("195")), 3);
    }

    #[test]
    fn test_product_discount() {
        let mut product = Product::new("1", "Tee", Price::from(799));
        assert_eq!(product_discount(&product), None);
        product.original_price = Some(Price::from(1299));
        assert_eq!(product_discount(&product), Some(38));
    }

    fn variant(size: &str, color: &str, price: i64) -> ProductVariant {
        ProductVariant {
            size: size.to_string(),
            color: color.to_string(),
            price: Price::from(price),
        }
    }

    #[test]
    fn test_variant_price_exact_match() {
        let mut product = Product::new("1", "Tee", Price::from(999));
        product.variants = vec![variant("M", "Red", 1099), variant("S", "Red", 899)];

        assert_eq!(
            resolve_variant_price(&product, Some("M"), Some("Red")),
            Price::from(1099)
        );
    }

    #[test]
    fn test_variant_price_falls_back_to_lowest() {
        let mut product = Product::new("1", "Tee", Price::from(999));
        product.variants = vec![variant("M", "Red", 1099), variant("S", "Red", 899)];

        assert_eq!(
            resolve_variant_price(&product, Some("L"), Some("Red")),
            Price::from(899)
        );
        assert_eq!(
            resolve_variant_price(&product, Some("M"), None),
            Price::from(899)
        );
    }

    #[test]
    fn test_variant_price_falls_back_to_base() {
        let product = Product::new("1", "Tee", Price::from(999));
        assert_eq!(
            resolve_variant_price(&product, Some("M"), Some("Red")),
            Price::from(999)
        );
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(Price::from(1299)), "₹1299");
        assert_eq!(format_inr(rupees("799.50")), "₹799.5");
    }
}
