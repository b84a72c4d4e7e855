// Sales: stock consumption and the LPO -> invoice -> payment lifecycle they anchor

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Sale, SaleStatus};
pub use repositories::SaleRepository;
pub use services::SaleService;
