use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{MySqlConnection, MySqlPool};
use uuid::Uuid;

use crate::core::Result;
use crate::modules::stock::models::StockBatch;
use crate::modules::stock::services::fifo_ledger::FifoPlan;

const BATCH_COLUMNS: &str = "id, supplier, initial_quantity, quantity, purchase_cost, \
     purchase_date, remarks, created_at, updated_at";

/// Repository for stock batches and the allocations sales draw from them
pub struct StockRepository {
    pool: MySqlPool,
}

impl StockRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// List batches purchased within an optional date range, newest first
    pub async fn list(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<StockBatch>> {
        let sql = format!(
            "SELECT {} FROM stock_batches \
             WHERE (? IS NULL OR purchase_date >= ?) AND (? IS NULL OR purchase_date <= ?) \
             ORDER BY purchase_date DESC, created_at DESC",
            BATCH_COLUMNS
        );

        let batches = sqlx::query_as::<_, StockBatch>(&sql)
            .bind(start)
            .bind(start)
            .bind(end)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(batches)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<StockBatch>> {
        let sql = format!("SELECT {} FROM stock_batches WHERE id = ?", BATCH_COLUMNS);

        let batch = sqlx::query_as::<_, StockBatch>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(batch)
    }

    pub async fn create(&self, batch: &StockBatch) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_batches (
                id, supplier, initial_quantity, quantity, purchase_cost,
                purchase_date, remarks, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&batch.id)
        .bind(&batch.supplier)
        .bind(batch.initial_quantity)
        .bind(batch.quantity)
        .bind(batch.purchase_cost)
        .bind(batch.purchase_date)
        .bind(&batch.remarks)
        .bind(batch.created_at)
        .bind(batch.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lock one batch for the rest of the transaction
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<StockBatch>> {
        let sql = format!(
            "SELECT {} FROM stock_batches WHERE id = ? FOR UPDATE",
            BATCH_COLUMNS
        );

        let batch = sqlx::query_as::<_, StockBatch>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(batch)
    }

    /// Write supplier, date and remarks; quantities and cost are left alone
    pub async fn update_details(conn: &mut MySqlConnection, batch: &StockBatch) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE stock_batches
            SET supplier = ?, purchase_date = ?, remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&batch.supplier)
        .bind(batch.purchase_date)
        .bind(&batch.remarks)
        .bind(batch.updated_at)
        .bind(&batch.id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Write every column of a batch no sale has drawn from yet
    pub async fn update_all(conn: &mut MySqlConnection, batch: &StockBatch) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE stock_batches
            SET supplier = ?, initial_quantity = ?, quantity = ?, purchase_cost = ?,
                purchase_date = ?, remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&batch.supplier)
        .bind(batch.initial_quantity)
        .bind(batch.quantity)
        .bind(batch.purchase_cost)
        .bind(batch.purchase_date)
        .bind(&batch.remarks)
        .bind(batch.updated_at)
        .bind(&batch.id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn delete(conn: &mut MySqlConnection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM stock_batches WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Number of sale allocations drawn from a batch.
    ///
    /// A locking read, so allocations committed while waiting on the batch lock
    /// are counted.
    pub async fn count_allocations(conn: &mut MySqlConnection, batch_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stock_allocations WHERE stock_batch_id = ? LOCK IN SHARE MODE",
        )
        .bind(batch_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count)
    }

    /// Gallons remaining across all batches
    pub async fn total_remaining(&self) -> Result<Decimal> {
        let total: Decimal =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM stock_batches")
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Lock every batch with stock left, oldest purchase first.
    ///
    /// Held until the surrounding transaction ends, so two sales cannot plan
    /// against the same levels.
    pub async fn lock_available(conn: &mut MySqlConnection) -> Result<Vec<StockBatch>> {
        let sql = format!(
            "SELECT {} FROM stock_batches WHERE quantity > 0 \
             ORDER BY purchase_date ASC, created_at ASC, id ASC FOR UPDATE",
            BATCH_COLUMNS
        );

        let batches = sqlx::query_as::<_, StockBatch>(&sql)
            .fetch_all(&mut *conn)
            .await?;

        Ok(batches)
    }

    /// Persist a FIFO plan for a sale: new batch levels plus one allocation per deduction
    pub async fn apply_deduction(
        conn: &mut MySqlConnection,
        sale_id: &str,
        plan: &FifoPlan,
    ) -> Result<()> {
        for deduction in &plan.deductions {
            sqlx::query("UPDATE stock_batches SET quantity = ?, updated_at = NOW(6) WHERE id = ?")
                .bind(deduction.remaining)
                .bind(&deduction.batch_id)
                .execute(&mut *conn)
                .await?;

            sqlx::query(
                r#"
                INSERT INTO stock_allocations (id, sale_id, stock_batch_id, quantity, unit_cost)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(sale_id)
            .bind(&deduction.batch_id)
            .bind(deduction.quantity)
            .bind(deduction.unit_cost)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
