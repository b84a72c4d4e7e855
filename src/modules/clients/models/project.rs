use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// A client's site or job that sales are delivered to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Id and name, as embedded in client listings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
        }
    }
}

/// Project as listed, with the owning client's name
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectWithClient {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,
    pub client_name: String,
}

/// Request body for `POST /api/projects`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "clientId", default)]
    pub client_id: String,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<()> {
        validate_project_fields(&self.name, &self.client_id)
    }
}

/// Request body for `PUT /api/projects`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "clientId", default)]
    pub client_id: String,
}

impl UpdateProjectRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Project ID is required"));
        }
        validate_project_fields(&self.name, &self.client_id)
    }
}

fn validate_project_fields(name: &str, client_id: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Project name is required"));
    }
    if client_id.trim().is_empty() {
        return Err(AppError::validation("Client ID is required"));
    }
    Ok(())
}
