// Clients and their projects

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Client, Project};
pub use repositories::{ClientRepository, ProjectRepository};
pub use services::{ClientService, ProjectService};
