//! Orders as displayed in order history and order detail.
//!
//! Orders are produced by the checkout flow outside this workspace. These
//! types only describe and summarize them.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::{OrderId, ProductId};
use super::price::Price;
use super::status::OrderStatus;

/// One purchased line, shaped like a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: ProductId,
    pub name: String,
    pub size: String,
    pub color: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
    pub quantity: u32,
}

impl OrderItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_address: String,
    pub payment_method: String,
}

impl Order {
    /// Total number of units across all items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of item line totals, before fees and discounts.
    #[must_use]
    pub fn items_subtotal(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Order summary breakdown shown on the order detail and invoice screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub sub_total: Price,
    pub tax_percentage: Decimal,
    pub tax_amount: Price,
    pub delivery_fee: Price,
    pub platform_fee: Price,
    pub discount: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute tax and grand total from the item subtotal and fees.
    ///
    /// Tax is `subtotal * pct / 100` rounded to paise (half away from zero).
    #[must_use]
    pub fn new(
        sub_total: Price,
        tax_percentage: Decimal,
        delivery_fee: Price,
        platform_fee: Price,
        discount: Price,
    ) -> Self {
        let tax = (sub_total.amount() * tax_percentage / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let tax_amount = Price::new(tax);
        let total = sub_total + tax_amount + delivery_fee + platform_fee - discount;

        Self {
            sub_total,
            tax_percentage,
            tax_amount,
            delivery_fee,
            platform_fee,
            discount,
            total,
        }
    }
}
