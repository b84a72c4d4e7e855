// Stock ledger: purchase batches consumed oldest first

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::StockBatch;
pub use repositories::StockRepository;
pub use services::{plan_fifo_deduction, FifoPlan, StockService};
