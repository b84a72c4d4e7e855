pub mod client_service;
pub mod project_service;

pub use client_service::ClientService;
pub use project_service::ProjectService;
