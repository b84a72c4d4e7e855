pub mod lpo_repository;

pub use lpo_repository::LpoRepository;
