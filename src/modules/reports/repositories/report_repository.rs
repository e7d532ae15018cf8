use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};
use std::collections::HashMap;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{Order, OrderLine};

/// Data access required to build a daily report.
///
/// Implementations return already-validated rows; the report service and
/// aggregator treat them as read-only inputs.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Orders created within the half-open window `[date, date + 1 day)`,
    /// with their line items attached. A date with no orders yields an
    /// empty vec, never an error.
    async fn orders_for_date(&self, date: NaiveDate) -> Result<Vec<Order>>;

    /// Commission rate for a vendor on a date, if one is configured.
    async fn commission_rate(&self, date: NaiveDate, vendor_id: i64) -> Result<Option<Decimal>>;

    /// Active promotion for a product on a date, if any.
    async fn promotion(&self, date: NaiveDate, product_id: i64) -> Result<Option<i64>>;
}

/// MySQL-backed repository over the orders/order_lines/commissions/
/// product_promotions tables.
pub struct MySqlReportRepository {
    pool: MySqlPool,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    created_at: NaiveDateTime,
    vendor_id: i64,
    customer_id: i64,
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    order_id: i64,
    product_id: i64,
    product_description: String,
    product_price: Decimal,
    product_vat_rate: Decimal,
    discount_rate: Decimal,
    quantity: i64,
    full_price_amount: Decimal,
    discounted_amount: Decimal,
    vat_amount: Decimal,
    total_amount: Decimal,
}

impl OrderLineRow {
    fn into_line(self) -> OrderLine {
        OrderLine {
            product_id: self.product_id,
            product_description: self.product_description,
            product_price: self.product_price,
            vat_rate: self.product_vat_rate,
            discount_rate: self.discount_rate,
            quantity: self.quantity,
            full_price_amount: self.full_price_amount,
            discounted_amount: self.discounted_amount,
            vat_amount: self.vat_amount,
            total_amount: self.total_amount,
        }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn orders_for_date(&self, date: NaiveDate) -> Result<Vec<Order>> {
        let window_start = date.and_time(NaiveTime::MIN);
        let window_end = date
            .succ_opt()
            .ok_or(AppError::InvalidDate)?
            .and_time(NaiveTime::MIN);

        let order_rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, created_at, vendor_id, customer_id
            FROM orders
            WHERE created_at >= ? AND created_at < ?
            ORDER BY id
            "#,
        )
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;

        if order_rows.is_empty() {
            return Ok(Vec::new());
        }

        // MySQL has no array binds; expand one placeholder per order id.
        let placeholders = vec!["?"; order_rows.len()].join(", ");
        let line_sql = format!(
            "SELECT order_id, product_id, product_description, product_price, \
             product_vat_rate, discount_rate, quantity, full_price_amount, \
             discounted_amount, vat_amount, total_amount \
             FROM order_lines WHERE order_id IN ({placeholders})"
        );

        let mut line_query = sqlx::query_as::<_, OrderLineRow>(&line_sql);
        for row in &order_rows {
            line_query = line_query.bind(row.id);
        }
        let line_rows = line_query.fetch_all(&self.pool).await?;

        let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
        for row in line_rows {
            lines_by_order
                .entry(row.order_id)
                .or_default()
                .push(row.into_line());
        }

        let orders = order_rows
            .into_iter()
            .map(|row| Order {
                id: row.id,
                created_at: row.created_at,
                vendor_id: row.vendor_id,
                customer_id: row.customer_id,
                lines: lines_by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect();

        Ok(orders)
    }

    async fn commission_rate(&self, date: NaiveDate, vendor_id: i64) -> Result<Option<Decimal>> {
        let row: Option<(Decimal,)> =
            sqlx::query_as("SELECT rate FROM commissions WHERE date = ? AND vendor_id = ?")
                .bind(date)
                .bind(vendor_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(rate,)| rate))
    }

    async fn promotion(&self, date: NaiveDate, product_id: i64) -> Result<Option<i64>> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT promotion_id FROM product_promotions WHERE date = ? AND product_id = ?",
        )
        .bind(date)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(promotion_id,)| promotion_id))
    }
}
