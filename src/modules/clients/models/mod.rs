mod client;
mod project;

pub use client::{Client, ClientWithProjects, CreateClientRequest, UpdateClientRequest};
pub use project::{
    CreateProjectRequest, Project, ProjectSummary, ProjectWithClient, UpdateProjectRequest,
};
