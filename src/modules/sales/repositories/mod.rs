pub mod sale_repository;

pub use sale_repository::{SaleFilter, SaleRepository};
