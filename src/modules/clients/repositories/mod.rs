pub mod client_repository;
pub mod project_repository;

pub use client_repository::ClientRepository;
pub use project_repository::ProjectRepository;
