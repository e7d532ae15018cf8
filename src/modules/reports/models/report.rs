use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Commission sub-report: per-promotion totals plus overall figures.
///
/// `promotions` maps promotion id to the commission accumulated from line
/// items sold under that promotion. A promotion appears only when at least
/// one line item contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionReport {
    pub promotions: BTreeMap<i64, Decimal>,
    pub total: Decimal,
    pub order_average: Decimal,
}

impl CommissionReport {
    pub fn new(promotions: BTreeMap<i64, Decimal>, total: Decimal, order_average: Decimal) -> Self {
        Self {
            promotions,
            total,
            order_average,
        }
    }
}

/// The aggregated sales report for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Number of distinct customers who placed orders
    pub customers: i64,
    /// Sum of every line item's discounted amount
    pub total_discount_amount: Decimal,
    /// Sum of every line item's quantity
    pub items: i64,
    /// Mean order total across the day's orders
    pub order_total_avg: Decimal,
    /// Mean discount rate across the day's line items
    pub discount_rate_avg: Decimal,
    pub commissions: CommissionReport,
}

impl DailyReport {
    pub fn new(
        customers: i64,
        total_discount_amount: Decimal,
        items: i64,
        order_total_avg: Decimal,
        discount_rate_avg: Decimal,
        commissions: CommissionReport,
    ) -> Self {
        Self {
            customers,
            total_discount_amount,
            items,
            order_total_avg,
            discount_rate_avg,
            commissions,
        }
    }
}

/// Terminal outcomes of report generation for a valid date.
///
/// A valid date with no orders is `Empty`, which is distinct from both an
/// error and a report full of zeros.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Report(DailyReport),
    Empty,
}
