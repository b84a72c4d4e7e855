// Dashboard and financial reports, computed on request

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use repositories::{InMemoryReportRepository, MySqlReportRepository, ReportRepository};
pub use services::{ReportCalculator, ReportService};
