pub mod report_calculator;
pub mod report_service;

pub use report_calculator::ReportCalculator;
pub use report_service::ReportService;
