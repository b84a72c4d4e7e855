use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{in_transaction, AppError, Result};
use crate::modules::clients::models::{
    CreateProjectRequest, Project, ProjectWithClient, UpdateProjectRequest,
};
use crate::modules::clients::repositories::{ClientRepository, ProjectRepository};

/// Service for client projects
pub struct ProjectService {
    pool: MySqlPool,
    projects: ProjectRepository,
    clients: ClientRepository,
}

impl ProjectService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            pool,
        }
    }

    /// All projects, most recently updated first
    pub async fn list(&self) -> Result<Vec<ProjectWithClient>> {
        self.projects.list().await
    }

    pub async fn create(&self, request: CreateProjectRequest) -> Result<Project> {
        request.validate()?;
        self.ensure_client_exists(&request.client_id).await?;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            name: request.name.trim().to_string(),
            client_id: request.client_id,
            created_at: now,
            updated_at: now,
        };

        self.projects.create(&project).await?;

        info!(
            project_id = project.id.as_str(),
            client_id = project.client_id.as_str(),
            "Project created"
        );

        Ok(project)
    }

    /// Rename a project or move it to another client.
    ///
    /// A project that already has sales stays with its client, since each sale
    /// records the client it was billed to.
    pub async fn update(&self, request: UpdateProjectRequest) -> Result<Project> {
        request.validate()?;

        let mut project = self
            .projects
            .find_by_id(&request.id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if project.client_id != request.client_id {
            self.ensure_client_exists(&request.client_id).await?;
            if self.projects.count_sales(&project.id).await? > 0 {
                warn!(project_id = project.id.as_str(), "Rejected client change on project with sales");
                return Err(AppError::dependency(
                    "Cannot move a project with existing sales to another client",
                ));
            }
        }

        project.name = request.name.trim().to_string();
        project.client_id = request.client_id;
        project.updated_at = Utc::now();

        self.projects.update(&project).await?;

        info!(project_id = project.id.as_str(), "Project updated");

        Ok(project)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                if ProjectRepository::lock(conn, &id).await?.is_none() {
                    return Err(AppError::not_found("Project not found"));
                }

                if ProjectRepository::count_sales_locked(conn, &id).await? > 0 {
                    warn!(project_id = id.as_str(), "Rejected delete of project with sales");
                    return Err(AppError::dependency(
                        "Cannot delete project with associated sales",
                    ));
                }

                ProjectRepository::delete(conn, &id).await?;

                info!(project_id = id.as_str(), "Project deleted");

                Ok(())
            })
        })
        .await
    }

    async fn ensure_client_exists(&self, client_id: &str) -> Result<()> {
        match self.clients.find_by_id(client_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found("Client not found")),
        }
    }
}
