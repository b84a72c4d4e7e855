mod stock_batch;

pub use stock_batch::{CreateStockRequest, StockBatch, UpdateStockRequest};
