use std::collections::HashMap;

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::params::optional_text;
use crate::core::{in_transaction, AppError, Result};
use crate::modules::clients::models::{
    Client, ClientWithProjects, CreateClientRequest, ProjectSummary, UpdateClientRequest,
};
use crate::modules::clients::repositories::{ClientRepository, ProjectRepository};

/// Service for client records
pub struct ClientService {
    pool: MySqlPool,
    clients: ClientRepository,
    projects: ProjectRepository,
}

impl ClientService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            pool,
        }
    }

    /// All clients with their projects
    pub async fn list(&self) -> Result<Vec<ClientWithProjects>> {
        let clients = self.clients.list().await?;

        // Already ordered by most recent update
        let mut by_client: HashMap<String, Vec<ProjectSummary>> = HashMap::new();
        for entry in self.projects.list().await? {
            by_client
                .entry(entry.project.client_id.clone())
                .or_default()
                .push(ProjectSummary::from(&entry.project));
        }

        Ok(clients
            .into_iter()
            .map(|client| {
                let projects = by_client.remove(&client.id).unwrap_or_default();
                ClientWithProjects { client, projects }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Client> {
        self.clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Client not found"))
    }

    pub async fn create(&self, request: CreateClientRequest) -> Result<Client> {
        request.validate()?;

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            email: optional_text(request.email),
            phone: optional_text(request.phone),
            address: optional_text(request.address),
            created_at: now,
            updated_at: now,
        };

        self.clients.create(&client).await?;

        info!(client_id = client.id.as_str(), "Client created");

        Ok(client)
    }

    pub async fn update(&self, request: UpdateClientRequest) -> Result<Client> {
        request.validate()?;

        let mut client = self.get(&request.id).await?;
        client.name = request.name.trim().to_string();
        client.email = optional_text(request.email);
        client.phone = optional_text(request.phone);
        client.address = optional_text(request.address);
        client.updated_at = Utc::now();

        self.clients.update(&client).await?;

        info!(client_id = client.id.as_str(), "Client updated");

        Ok(client)
    }

    /// Delete a client (and its projects) that has never been sold to
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                if ClientRepository::lock(conn, &id).await?.is_none() {
                    return Err(AppError::not_found("Client not found"));
                }

                if ClientRepository::count_sales(conn, &id).await? > 0 {
                    warn!(client_id = id.as_str(), "Rejected delete of client with sales");
                    return Err(AppError::dependency("Cannot delete client with existing sales"));
                }

                ClientRepository::delete(conn, &id).await?;

                info!(client_id = id.as_str(), "Client deleted");

                Ok(())
            })
        })
        .await
    }
}
