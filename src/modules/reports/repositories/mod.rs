pub mod in_memory_report_repository;
pub mod report_repository;

pub use in_memory_report_repository::InMemoryReportRepository;
pub use report_repository::{MySqlReportRepository, ReportRepository};
