use sqlx::{MySqlConnection, MySqlPool};

use crate::core::Result;
use crate::modules::clients::models::{Project, ProjectWithClient};

/// Repository for projects
pub struct ProjectRepository {
    pool: MySqlPool,
}

impl ProjectRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// All projects with their client's name, most recently updated first
    pub async fn list(&self) -> Result<Vec<ProjectWithClient>> {
        let projects = sqlx::query_as::<_, ProjectWithClient>(
            r#"
            SELECT p.id, p.name, p.client_id, p.created_at, p.updated_at,
                   c.name AS client_name
            FROM projects p
            JOIN clients c ON c.id = p.client_id
            ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, client_id, created_at, updated_at FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn create(&self, project: &Project) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, client_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.id)
        .bind(&project.name)
        .bind(&project.client_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, project: &Project) -> Result<()> {
        sqlx::query("UPDATE projects SET name = ?, client_id = ?, updated_at = ? WHERE id = ?")
            .bind(&project.name)
            .bind(&project.client_id)
            .bind(project.updated_at)
            .bind(&project.id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Lock a project row for the rest of the transaction
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            "SELECT id, name, client_id, created_at, updated_at FROM projects WHERE id = ? FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(project)
    }

    pub async fn delete(conn: &mut MySqlConnection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Number of sales delivered to the project, read under a shared lock
    pub async fn count_sales_locked(conn: &mut MySqlConnection, id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE project_id = ? LOCK IN SHARE MODE")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }

    /// Number of sales delivered to the project
    pub async fn count_sales(&self, id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE project_id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
