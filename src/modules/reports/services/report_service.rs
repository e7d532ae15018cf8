use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::reports::models::{CommissionReport, DailyReport, Order, ReportOutcome};
use crate::modules::reports::repositories::ReportRepository;
use crate::modules::reports::services::aggregator::{self, CommissionRates, Promotions};

/// Builds the daily sales report from repository data.
///
/// The repository is held behind the `ReportRepository` trait so tests can
/// substitute an in-memory fixture for the MySQL implementation.
pub struct ReportService {
    repo: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(repo: Arc<dyn ReportRepository>) -> Self {
        Self { repo }
    }

    /// Generate the sales report for a calendar date.
    ///
    /// Three terminal outcomes: an invalid date is `AppError::InvalidDate`,
    /// a valid date with no orders is `ReportOutcome::Empty`, and otherwise
    /// a populated `ReportOutcome::Report`. Nothing in between escapes.
    ///
    /// # Errors
    /// `AppError::InvalidDate` when year/month/day do not form a real date;
    /// `AppError::MissingCommissionRate` when a fetched order's vendor has
    /// no rate for the date; `AppError::Database` on query failure.
    pub async fn generate_report(&self, year: i32, month: u32, day: u32) -> Result<ReportOutcome> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(AppError::InvalidDate)?;

        let orders = self.repo.orders_for_date(date).await?;
        if orders.is_empty() {
            info!(%date, "no orders for date, returning empty report");
            return Ok(ReportOutcome::Empty);
        }

        let rates = self.fetch_commission_rates(date, &orders).await?;
        let promotions = self.fetch_promotions(date, &orders).await?;

        let customers = aggregator::customer_count(&orders);
        let discounts = aggregator::discount_stats(&orders);
        let order_stats = aggregator::order_stats(&orders);
        let commissions = aggregator::commission_stats(&orders, &rates)?;
        let promo_totals = aggregator::promo_commissions(&orders, &rates, &promotions)?;

        info!(
            %date,
            orders = orders.len(),
            customers,
            items = order_stats.items,
            "generated daily report"
        );

        Ok(ReportOutcome::Report(DailyReport::new(
            customers,
            discounts.total_discount_amount,
            order_stats.items,
            order_stats.order_total_avg,
            discounts.discount_rate_avg,
            CommissionReport::new(promo_totals, commissions.total, commissions.order_average),
        )))
    }

    /// Prefetch the commission rate for each distinct vendor in the orders.
    ///
    /// Vendors without a configured rate are left out of the table; the
    /// aggregator turns such a miss into a report-level error.
    async fn fetch_commission_rates(
        &self,
        date: NaiveDate,
        orders: &[Order],
    ) -> Result<CommissionRates> {
        let vendors: BTreeSet<i64> = orders.iter().map(|order| order.vendor_id).collect();

        let mut rates = CommissionRates::new();
        for vendor_id in vendors {
            match self.repo.commission_rate(date, vendor_id).await? {
                Some(rate) => rates.insert(date, vendor_id, rate),
                None => warn!(vendor_id, %date, "no commission rate configured"),
            }
        }
        Ok(rates)
    }

    /// Prefetch the active promotion, if any, for each distinct product in
    /// the orders' line items.
    async fn fetch_promotions(&self, date: NaiveDate, orders: &[Order]) -> Result<Promotions> {
        let products: BTreeSet<i64> = orders
            .iter()
            .flat_map(|order| order.lines.iter())
            .map(|line| line.product_id)
            .collect();

        let mut promotions = Promotions::new();
        for product_id in products {
            if let Some(promotion_id) = self.repo.promotion(date, product_id).await? {
                promotions.insert(date, product_id, promotion_id);
            }
        }
        Ok(promotions)
    }
}
