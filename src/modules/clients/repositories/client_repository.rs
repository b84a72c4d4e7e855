use sqlx::{MySqlConnection, MySqlPool};

use crate::core::Result;
use crate::modules::clients::models::Client;

/// Repository for clients
pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM clients
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM clients
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    pub async fn create(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients (id, name, email, phone, address, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&client.id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, email = ?, phone = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.updated_at)
        .bind(&client.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lock a client row for the rest of the transaction.
    ///
    /// Sale inserts check the client foreign key under a shared lock, so none
    /// can land for this client until the transaction ends.
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, name, email, phone, address, created_at, updated_at
            FROM clients
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(client)
    }

    /// Delete a client and its projects
    pub async fn delete(conn: &mut MySqlConnection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE client_id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Number of sales billed to the client, read under a shared lock
    pub async fn count_sales(conn: &mut MySqlConnection, id: &str) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE client_id = ? LOCK IN SHARE MODE")
                .bind(id)
                .fetch_one(&mut *conn)
                .await?;

        Ok(count)
    }
}
