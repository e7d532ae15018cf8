pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CommissionReport, DailyReport, Order, OrderLine, ReportOutcome};
pub use repositories::{MySqlReportRepository, ReportRepository};
pub use services::ReportService;
