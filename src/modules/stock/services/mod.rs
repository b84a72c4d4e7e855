pub mod fifo_ledger;
pub mod stock_service;

pub use fifo_ledger::{plan_fifo_deduction, Deduction, FifoPlan};
pub use stock_service::StockService;
