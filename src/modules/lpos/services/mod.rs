pub mod lpo_service;

pub use lpo_service::LpoService;
