// Local purchase orders: one per sale, gate invoicing

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Lpo, LpoStatus};
pub use repositories::LpoRepository;
pub use services::LpoService;
