use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A customer purchase event, composed of line items.
///
/// Orders are read-only inputs to report aggregation. The order total is
/// deliberately not stored here; `aggregator::order_total` derives it from
/// the line items so no cached state is shared between aggregation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub vendor_id: i64,
    pub customer_id: i64,
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Calendar date the order was placed on, used for commission and
    /// promotion lookups.
    pub fn date(&self) -> NaiveDate {
        self.created_at.date()
    }
}

/// One product line within an order.
///
/// Monetary columns come precomputed from the `order_lines` table:
/// `total_amount` is the post-discount, post-VAT amount for the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub product_description: String,
    pub product_price: Decimal,
    pub vat_rate: Decimal,
    pub discount_rate: Decimal,
    pub quantity: i64,
    pub full_price_amount: Decimal,
    pub discounted_amount: Decimal,
    pub vat_amount: Decimal,
    pub total_amount: Decimal,
}
