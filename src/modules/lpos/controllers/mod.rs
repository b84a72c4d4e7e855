pub mod lpo_controller;

pub use lpo_controller::configure;
