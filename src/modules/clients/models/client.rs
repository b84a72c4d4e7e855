use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::project::ProjectSummary;
use crate::core::{AppError, Result};

/// A customer buying fuel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Client as listed, with its projects (most recently updated first)
#[derive(Debug, Clone, Serialize)]
pub struct ClientWithProjects {
    #[serde(flatten)]
    pub client: Client,
    pub projects: Vec<ProjectSummary>,
}

/// Request body for `POST /api/clients`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl CreateClientRequest {
    pub fn validate(&self) -> Result<()> {
        validate_client_fields(&self.name, self.email.as_deref())
    }
}

/// Request body for `PUT /api/clients`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl UpdateClientRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Client ID is required"));
        }
        validate_client_fields(&self.name, self.email.as_deref())
    }
}

fn validate_client_fields(name: &str, email: Option<&str>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Client name is required"));
    }
    if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
        if !email.contains('@') {
            return Err(AppError::validation("Invalid email address"));
        }
    }
    Ok(())
}
