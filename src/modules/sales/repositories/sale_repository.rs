use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::sales::models::{Sale, SaleStatus, SaleView};

const SALE_COLUMNS: &str = "s.id, s.client_id, s.project_id, s.quantity, s.unit_price, \
     s.purchase_cost, s.fifo_unit_cost, s.total_amount, s.status, s.sale_date, s.remarks, \
     s.created_at, s.updated_at";

const VIEW_JOINS: &str = "FROM sales s \
     JOIN clients c ON c.id = s.client_id \
     JOIN projects p ON p.id = s.project_id";

/// Filters for sale listings; all optional
#[derive(Debug, Clone, Default)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Repository for sales
pub struct SaleRepository {
    pool: MySqlPool,
}

impl SaleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Sales with client/project names and amounts paid, newest first
    pub async fn list_views(&self, filter: &SaleFilter) -> Result<Vec<SaleView>> {
        let mut query = view_query();
        query.push(" WHERE 1 = 1");
        if let Some(status) = filter.status {
            query.push(" AND s.status = ").push_bind(status.as_str());
        }
        if let Some(start) = filter.start {
            query.push(" AND s.sale_date >= ").push_bind(start);
        }
        if let Some(end) = filter.end {
            query.push(" AND s.sale_date <= ").push_bind(end);
        }
        query.push(" ORDER BY s.created_at DESC");

        let rows = query
            .build_query_as::<SaleViewRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SaleViewRow::into_view).collect()
    }

    /// Views for a set of sales, in no particular order
    pub async fn views_by_ids(&self, ids: &[String]) -> Result<Vec<SaleView>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = view_query();
        query.push(" WHERE s.id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let rows = query
            .build_query_as::<SaleViewRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SaleViewRow::into_view).collect()
    }

    /// Latest sales by sale date, whatever their status
    pub async fn recent_views(&self, limit: u32) -> Result<Vec<SaleView>> {
        let mut query = view_query();
        query
            .push(" ORDER BY s.sale_date DESC, s.created_at DESC LIMIT ")
            .push_bind(limit);

        let rows = query
            .build_query_as::<SaleViewRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(SaleViewRow::into_view).collect()
    }

    pub async fn find_view(&self, id: &str) -> Result<Option<SaleView>> {
        let mut query = view_query();
        query.push(" WHERE s.id = ").push_bind(id);

        let row = query
            .build_query_as::<SaleViewRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(SaleViewRow::into_view).transpose()
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales s WHERE s.id = ?", SALE_COLUMNS);

        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(SaleRow::into_sale).transpose()
    }

    /// Read a sale and hold its row lock until the transaction ends
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Sale>> {
        let sql = format!("SELECT {} FROM sales s WHERE s.id = ? FOR UPDATE", SALE_COLUMNS);

        let row = sqlx::query_as::<_, SaleRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(SaleRow::into_sale).transpose()
    }

    pub async fn insert(conn: &mut MySqlConnection, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO sales (
                id, client_id, project_id, quantity, unit_price, purchase_cost,
                fifo_unit_cost, total_amount, status, sale_date, remarks,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.client_id)
        .bind(&sale.project_id)
        .bind(sale.quantity)
        .bind(sale.unit_price)
        .bind(sale.purchase_cost)
        .bind(sale.fifo_unit_cost)
        .bind(sale.total_amount)
        .bind(sale.status.as_str())
        .bind(sale.sale_date)
        .bind(&sale.remarks)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Persist the editable fields of a sale
    pub async fn update(conn: &mut MySqlConnection, sale: &Sale) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE sales
            SET client_id = ?, project_id = ?, unit_price = ?, purchase_cost = ?,
                total_amount = ?, sale_date = ?, remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&sale.client_id)
        .bind(&sale.project_id)
        .bind(sale.unit_price)
        .bind(sale.purchase_cost)
        .bind(sale.total_amount)
        .bind(sale.sale_date)
        .bind(&sale.remarks)
        .bind(sale.updated_at)
        .bind(&sale.id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn set_status(conn: &mut MySqlConnection, id: &str, status: SaleStatus) -> Result<()> {
        sqlx::query("UPDATE sales SET status = ?, updated_at = NOW(6) WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn delete(conn: &mut MySqlConnection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM sales WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub async fn has_lpo(conn: &mut MySqlConnection, id: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lpos WHERE sale_id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count > 0)
    }

    pub async fn count_payments(conn: &mut MySqlConnection, id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE sale_id = ?")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;

        Ok(count)
    }
}

fn view_query<'a>() -> QueryBuilder<'a, MySql> {
    QueryBuilder::new(format!(
        "SELECT {}, c.name AS client_name, p.name AS project_name, \
         COALESCE((SELECT SUM(pay.amount) FROM payments pay WHERE pay.sale_id = s.id), 0) \
         AS paid_amount {}",
        SALE_COLUMNS, VIEW_JOINS
    ))
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
pub(crate) struct SaleRow {
    id: String,
    client_id: String,
    project_id: String,
    quantity: Decimal,
    unit_price: Decimal,
    purchase_cost: Decimal,
    fifo_unit_cost: Decimal,
    total_amount: Decimal,
    status: String,
    sale_date: NaiveDate,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    pub(crate) fn into_sale(self) -> Result<Sale> {
        let status = SaleStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid sale status in database: {}", e)))?;

        Ok(Sale {
            id: self.id,
            client_id: self.client_id,
            project_id: self.project_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            purchase_cost: self.purchase_cost,
            fifo_unit_cost: self.fifo_unit_cost,
            total_amount: self.total_amount,
            status,
            sale_date: self.sale_date,
            remarks: self.remarks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct SaleViewRow {
    #[sqlx(flatten)]
    sale: SaleRow,
    client_name: String,
    project_name: String,
    paid_amount: Decimal,
}

impl SaleViewRow {
    fn into_view(self) -> Result<SaleView> {
        let sale = self.sale.into_sale()?;
        let remaining_amount = sale.total_amount - self.paid_amount;

        Ok(SaleView {
            sale,
            client_name: self.client_name,
            project_name: self.project_name,
            paid_amount: self.paid_amount,
            remaining_amount,
        })
    }
}
