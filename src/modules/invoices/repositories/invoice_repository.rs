use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::{Invoice, InvoiceStatus};

const INVOICE_COLUMNS: &str =
    "id, lpo_id, invoice_no, invoice_date, status, remarks, created_at, updated_at";

/// Repository for invoices
pub struct InvoiceRepository {
    pool: MySqlPool,
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Invoices, newest first, optionally filtered by status
    pub async fn list(&self, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE (? IS NULL OR status = ?) ORDER BY created_at DESC",
            INVOICE_COLUMNS
        );
        let status = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(status)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        let sql = format!("SELECT {} FROM invoices WHERE id = ?", INVOICE_COLUMNS);

        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    /// Invoices issued against any of the given LPOs
    pub async fn list_by_lpo_ids(&self, lpo_ids: &[String]) -> Result<Vec<Invoice>> {
        if lpo_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM invoices WHERE lpo_id IN (",
            INVOICE_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in lpo_ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<InvoiceRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(InvoiceRow::into_invoice).collect()
    }

    /// Read an invoice and hold its row lock until the transaction ends
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Invoice>> {
        let sql = format!("SELECT {} FROM invoices WHERE id = ? FOR UPDATE", INVOICE_COLUMNS);

        let row = sqlx::query_as::<_, InvoiceRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(InvoiceRow::into_invoice).transpose()
    }

    pub async fn exists_for_lpo(conn: &mut MySqlConnection, lpo_id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE lpo_id = ?")
            .bind(lpo_id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count > 0)
    }

    /// Whether another invoice already carries `invoice_no`
    pub async fn invoice_no_taken(
        conn: &mut MySqlConnection,
        invoice_no: &str,
        excluding_id: Option<&str>,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices WHERE invoice_no = ? AND (? IS NULL OR id <> ?)",
        )
        .bind(invoice_no)
        .bind(excluding_id)
        .bind(excluding_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    pub async fn insert(conn: &mut MySqlConnection, invoice: &Invoice) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, lpo_id, invoice_no, invoice_date, status, remarks, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.lpo_id)
        .bind(&invoice.invoice_no)
        .bind(invoice.invoice_date)
        .bind(invoice.status.as_str())
        .bind(&invoice.remarks)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_write(e, "Invoice number already exists"))?;

        Ok(())
    }

    pub async fn update(conn: &mut MySqlConnection, invoice: &Invoice) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET invoice_no = ?, invoice_date = ?, remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&invoice.invoice_no)
        .bind(invoice.invoice_date)
        .bind(&invoice.remarks)
        .bind(invoice.updated_at)
        .bind(&invoice.id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::from_write(e, "Invoice number already exists"))?;

        Ok(())
    }
}

// Helper struct for database mapping

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    lpo_id: String,
    invoice_no: String,
    invoice_date: NaiveDate,
    status: String,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl InvoiceRow {
    fn into_invoice(self) -> Result<Invoice> {
        let status = InvoiceStatus::from_str(&self.status).map_err(|e| {
            AppError::internal(format!("Invalid invoice status in database: {}", e))
        })?;

        Ok(Invoice {
            id: self.id,
            lpo_id: self.lpo_id,
            invoice_no: self.invoice_no,
            invoice_date: self.invoice_date,
            status,
            remarks: self.remarks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
