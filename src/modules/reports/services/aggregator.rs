//! Pure aggregation functions behind the daily report.
//!
//! Every function here is synchronous and side-effect-free: statistics are
//! derived from the orders passed in plus prefetched lookup tables, never
//! from shared state. Each function independently derives what it needs
//! (order totals in particular are recomputed locally, not cached on the
//! order), so the functions can be called in any order or in isolation.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::core::{AppError, Result};
use crate::modules::reports::models::Order;

/// Commission rates prefetched for a report run, keyed by (date, vendor).
///
/// At most one rate exists per key. A vendor with no configured rate is
/// simply absent; what a miss means is decided by the aggregation functions
/// (fail-fast), not by this table.
#[derive(Debug, Clone, Default)]
pub struct CommissionRates {
    rates: HashMap<(NaiveDate, i64), Decimal>,
}

impl CommissionRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, vendor_id: i64, rate: Decimal) {
        self.rates.insert((date, vendor_id), rate);
    }

    pub fn get(&self, date: NaiveDate, vendor_id: i64) -> Option<Decimal> {
        self.rates.get(&(date, vendor_id)).copied()
    }
}

/// Active promotions prefetched for a report run, keyed by (date, product).
#[derive(Debug, Clone, Default)]
pub struct Promotions {
    active: HashMap<(NaiveDate, i64), i64>,
}

impl Promotions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, product_id: i64, promotion_id: i64) {
        self.active.insert((date, product_id), promotion_id);
    }

    pub fn get(&self, date: NaiveDate, product_id: i64) -> Option<i64> {
        self.active.get(&(date, product_id)).copied()
    }
}

/// Discount figures across all line items of the day's orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountStats {
    pub total_discount_amount: Decimal,
    pub discount_rate_avg: Decimal,
}

/// Item count and mean order value across the day's orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderStats {
    pub items: i64,
    pub order_total_avg: Decimal,
}

/// Overall commission owed across the day's orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommissionStats {
    pub total: Decimal,
    pub order_average: Decimal,
}

/// Number of distinct customers across the orders. Empty input counts zero.
pub fn customer_count(orders: &[Order]) -> i64 {
    let unique: HashSet<i64> = orders.iter().map(|order| order.customer_id).collect();
    unique.len() as i64
}

/// Total discounted amount and mean discount rate across all line items.
///
/// With zero line items both figures are zero; a day of orders without
/// lines is degenerate but not an error.
pub fn discount_stats(orders: &[Order]) -> DiscountStats {
    let mut total_discount_amount = Decimal::ZERO;
    let mut rate_sum = Decimal::ZERO;
    let mut line_count: i64 = 0;

    for line in orders.iter().flat_map(|order| order.lines.iter()) {
        total_discount_amount += line.discounted_amount;
        rate_sum += line.discount_rate;
        line_count += 1;
    }

    let discount_rate_avg = if line_count == 0 {
        Decimal::ZERO
    } else {
        rate_sum / Decimal::from(line_count)
    };

    DiscountStats {
        total_discount_amount,
        discount_rate_avg,
    }
}

/// Total value of a single order: the sum of its line items' totals.
pub fn order_total(order: &Order) -> Decimal {
    order.lines.iter().map(|line| line.total_amount).sum()
}

/// Item count (sum of line quantities) and mean order total.
pub fn order_stats(orders: &[Order]) -> OrderStats {
    let items = orders
        .iter()
        .flat_map(|order| order.lines.iter())
        .map(|line| line.quantity)
        .sum();

    let order_total_avg = if orders.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = orders.iter().map(order_total).sum();
        total / Decimal::from(orders.len() as u64)
    };

    OrderStats {
        items,
        order_total_avg,
    }
}

/// Commission owed per order (vendor rate x order total), summed and
/// averaged across the day's orders.
///
/// An order whose vendor has no rate for its date makes the whole report
/// fail with `AppError::MissingCommissionRate`; partial aggregates are
/// never returned.
pub fn commission_stats(orders: &[Order], rates: &CommissionRates) -> Result<CommissionStats> {
    let mut total = Decimal::ZERO;

    for order in orders {
        let rate = lookup_rate(rates, order)?;
        total += rate * order_total(order);
    }

    let order_average = if orders.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(orders.len() as u64)
    };

    Ok(CommissionStats {
        total,
        order_average,
    })
}

/// Commission attributed to each active promotion.
///
/// For every line item sold under a promotion active on the order's date,
/// `vendor rate x line total` accumulates under that promotion id. Line
/// items without an active promotion contribute nothing, and promotion ids
/// appear in the result only once they have at least one contribution.
pub fn promo_commissions(
    orders: &[Order],
    rates: &CommissionRates,
    promotions: &Promotions,
) -> Result<BTreeMap<i64, Decimal>> {
    let mut totals: BTreeMap<i64, Decimal> = BTreeMap::new();

    for order in orders {
        let date = order.date();
        let rate = lookup_rate(rates, order)?;

        for line in &order.lines {
            if let Some(promotion_id) = promotions.get(date, line.product_id) {
                *totals.entry(promotion_id).or_insert(Decimal::ZERO) += rate * line.total_amount;
            }
        }
    }

    Ok(totals)
}

fn lookup_rate(rates: &CommissionRates, order: &Order) -> Result<Decimal> {
    let date = order.date();
    rates
        .get(date, order.vendor_id)
        .ok_or(AppError::MissingCommissionRate {
            vendor_id: order.vendor_id,
            date,
        })
}
