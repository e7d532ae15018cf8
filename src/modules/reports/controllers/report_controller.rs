use actix_web::{error::ResponseError, web, HttpResponse};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::error;

use crate::core::{AppError, Result};
use crate::modules::reports::models::{CommissionReport, DailyReport, ReportOutcome};
use crate::modules::reports::services::ReportService;

/// Response structure for a populated daily report.
///
/// Field names and nesting are the stable contract consumed by clients;
/// decimal values are serialized as strings for JSON precision.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub customers: i64,
    pub total_discount_amount: String,
    pub items: i64,
    pub order_total_avg: String,
    pub discount_rate_avg: String,
    pub commissions: CommissionReportResponse,
}

#[derive(Debug, Serialize)]
pub struct CommissionReportResponse {
    pub promotions: BTreeMap<i64, String>,
    pub total: String,
    pub order_average: String,
}

impl From<DailyReport> for ReportResponse {
    fn from(report: DailyReport) -> Self {
        Self {
            customers: report.customers,
            total_discount_amount: report.total_discount_amount.to_string(),
            items: report.items,
            order_total_avg: report.order_total_avg.to_string(),
            discount_rate_avg: report.discount_rate_avg.to_string(),
            commissions: CommissionReportResponse::from(report.commissions),
        }
    }
}

impl From<CommissionReport> for CommissionReportResponse {
    fn from(commissions: CommissionReport) -> Self {
        Self {
            promotions: commissions
                .promotions
                .into_iter()
                .map(|(promotion_id, amount)| (promotion_id, amount.to_string()))
                .collect(),
            total: commissions.total.to_string(),
            order_average: commissions.order_average.to_string(),
        }
    }
}

/// GET /report/{year}/{month}/{day}
///
/// Returns the aggregated sales report for the given date. A valid date
/// with no orders returns an empty JSON object; an unparseable or invalid
/// date returns the invalid-date error body.
pub async fn report_by_date(
    service: web::Data<ReportService>,
    path: web::Path<(String, String, String)>,
) -> HttpResponse {
    match handle_report_by_date(service, path).await {
        Ok(response) => response,
        Err(e) => {
            error!("failed to generate report: {e}");
            e.error_response()
        }
    }
}

async fn handle_report_by_date(
    service: web::Data<ReportService>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse> {
    // Path segments are parsed here, not by the router, so non-numeric
    // input produces the invalid-date error body instead of a 404.
    let (year, month, day) = path.into_inner();
    let year: i32 = year.parse().map_err(|_| AppError::InvalidDate)?;
    let month: u32 = month.parse().map_err(|_| AppError::InvalidDate)?;
    let day: u32 = day.parse().map_err(|_| AppError::InvalidDate)?;

    match service.generate_report(year, month, day).await? {
        ReportOutcome::Report(report) => Ok(HttpResponse::Ok().json(ReportResponse::from(report))),
        ReportOutcome::Empty => Ok(HttpResponse::Ok().json(serde_json::json!({}))),
    }
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/report").route("/{year}/{month}/{day}", web::get().to(report_by_date)),
    );
}
