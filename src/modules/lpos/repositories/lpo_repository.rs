use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::lpos::models::{Lpo, LpoStatus};

const LPO_COLUMNS: &str =
    "id, sale_id, lpo_no, lpo_date, status, remarks, created_at, updated_at";

/// Repository for LPOs
pub struct LpoRepository {
    pool: MySqlPool,
}

impl LpoRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// LPOs, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<LpoStatus>) -> Result<Vec<Lpo>> {
        let sql = format!(
            "SELECT {} FROM lpos WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC",
            LPO_COLUMNS
        );
        let status = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, LpoRow>(&sql)
            .bind(status)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LpoRow::into_lpo).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Lpo>> {
        let sql = format!("SELECT {} FROM lpos WHERE id = ?", LPO_COLUMNS);

        let row = sqlx::query_as::<_, LpoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LpoRow::into_lpo).transpose()
    }

    /// LPOs belonging to any of the given sales
    pub async fn list_by_sale_ids(&self, sale_ids: &[String]) -> Result<Vec<Lpo>> {
        self.list_where_in("sale_id", sale_ids).await
    }

    pub async fn list_by_ids(&self, ids: &[String]) -> Result<Vec<Lpo>> {
        self.list_where_in("id", ids).await
    }

    async fn list_where_in(&self, column: &str, values: &[String]) -> Result<Vec<Lpo>> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM lpos WHERE {} IN (",
            LPO_COLUMNS, column
        ));
        let mut separated = query.separated(", ");
        for value in values {
            separated.push_bind(value.as_str());
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<LpoRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(LpoRow::into_lpo).collect()
    }

    /// Read an LPO and hold its row lock until the transaction ends
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Lpo>> {
        let sql = format!("SELECT {} FROM lpos WHERE id = ? FOR UPDATE", LPO_COLUMNS);

        let row = sqlx::query_as::<_, LpoRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(LpoRow::into_lpo).transpose()
    }

    pub async fn exists_for_sale(conn: &mut MySqlConnection, sale_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lpos WHERE sale_id = ?")
            .bind(sale_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count > 0)
    }

    /// Whether another LPO already carries `lpo_no`
    pub async fn lpo_no_taken(
        conn: &mut MySqlConnection,
        lpo_no: &str,
        excluding_id: Option<&str>,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lpos WHERE lpo_no = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(lpo_no)
        .bind(excluding_id)
        .bind(excluding_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    pub async fn insert(conn: &mut MySqlConnection, lpo: &Lpo) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO lpos (id, sale_id, lpo_no, lpo_date, status, remarks, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&lpo.id)
        .bind(&lpo.sale_id)
        .bind(&lpo.lpo_no)
        .bind(lpo.lpo_date)
        .bind(lpo.status.as_str())
        .bind(&lpo.remarks)
        .bind(lpo.created_at)
        .bind(lpo.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_write(e, "LPO number already exists"))?;

        Ok(())
    }

    pub async fn update(conn: &mut MySqlConnection, lpo: &Lpo) -> Result<()> {
        sqlx::query(
            "UPDATE lpos SET lpo_no = ?, lpo_date = ?, remarks = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&lpo.lpo_no)
        .bind(lpo.lpo_date)
        .bind(&lpo.remarks)
        .bind(lpo.updated_at)
        .bind(&lpo.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_write(e, "LPO number already exists"))?;

        Ok(())
    }

    pub async fn set_status(conn: &mut MySqlConnection, id: &str, status: LpoStatus) -> Result<()> {
        sqlx::query("UPDATE lpos SET status = ?, updated_at = NOW(6) WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct LpoRow {
    id: String,
    sale_id: String,
    lpo_no: String,
    lpo_date: NaiveDate,
    status: String,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LpoRow {
    fn into_lpo(self) -> Result<Lpo> {
        let status = LpoStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid LPO status in database: {}", e)))?;

        Ok(Lpo {
            id: self.id,
            sale_id: self.sale_id,
            lpo_no: self.lpo_no,
            lpo_date: self.lpo_date,
            status,
            remarks: self.remarks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
