use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlConnection, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::payments::models::{Payment, PaymentDetails, PaymentMethod};
use crate::modules::sales::models::SaleStatus;

const PAYMENT_COLUMNS: &str = "pay.id, pay.client_id, pay.sale_id, pay.payment_date, \
     pay.payment_method, pay.reference_no, pay.amount, pay.remarks, pay.created_at, pay.updated_at";

/// Repository for payments
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Payments with sale context, newest payment date first
    pub async fn list_details(&self, sale_id: Option<&str>) -> Result<Vec<PaymentDetails>> {
        let mut query = details_query();
        if let Some(sale_id) = sale_id {
            query.push(" WHERE pay.sale_id = ").push_bind(sale_id);
        }
        query.push(" ORDER BY pay.payment_date DESC, pay.created_at DESC");

        let rows = query
            .build_query_as::<PaymentDetailsRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PaymentDetailsRow::into_details).collect()
    }

    pub async fn find_details(&self, id: &str) -> Result<Option<PaymentDetails>> {
        let mut query = details_query();
        query.push(" WHERE pay.id = ").push_bind(id);

        let row = query
            .build_query_as::<PaymentDetailsRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(PaymentDetailsRow::into_details).transpose()
    }

    /// Payments against any of the given sales, newest payment date first
    pub async fn list_by_sale_ids(&self, sale_ids: &[String]) -> Result<Vec<Payment>> {
        if sale_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new(format!(
            "SELECT {} FROM payments pay WHERE pay.sale_id IN (",
            PAYMENT_COLUMNS
        ));
        let mut separated = query.separated(", ");
        for id in sale_ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(") ORDER BY pay.payment_date DESC, pay.created_at DESC");

        let rows = query
            .build_query_as::<PaymentRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PaymentRow::into_payment).collect()
    }

    /// Read a payment and hold its row lock until the transaction ends
    pub async fn lock(conn: &mut MySqlConnection, id: &str) -> Result<Option<Payment>> {
        let sql = format!(
            "SELECT {} FROM payments pay WHERE pay.id = ? FOR UPDATE",
            PAYMENT_COLUMNS
        );

        let row = sqlx::query_as::<_, PaymentRow>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        row.map(PaymentRow::into_payment).transpose()
    }

    /// Sale a payment belongs to; a plain read, taking no locks
    pub async fn find_sale_id(conn: &mut MySqlConnection, id: &str) -> Result<Option<String>> {
        let sale_id: Option<String> = sqlx::query_scalar("SELECT sale_id FROM payments WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(sale_id)
    }

    /// Sum of a sale's payments, optionally leaving one out.
    ///
    /// A locking read: the summed rows stay locked until the transaction ends.
    pub async fn sum_for_sale(
        conn: &mut MySqlConnection,
        sale_id: &str,
        excluding_id: Option<&str>,
    ) -> Result<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM payments
            WHERE sale_id = ? AND (? IS NULL OR id <> ?)
            FOR UPDATE
            "#,
        )
        .bind(sale_id)
        .bind(excluding_id)
        .bind(excluding_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(total)
    }

    pub async fn insert(conn: &mut MySqlConnection, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, client_id, sale_id, payment_date, payment_method, reference_no,
                amount, remarks, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.client_id)
        .bind(&payment.sale_id)
        .bind(payment.payment_date)
        .bind(payment.payment_method.as_str())
        .bind(&payment.reference_no)
        .bind(payment.amount)
        .bind(&payment.remarks)
        .bind(payment.created_at)
        .bind(payment.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn update(conn: &mut MySqlConnection, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payments
            SET payment_date = ?, payment_method = ?, reference_no = ?, amount = ?,
                remarks = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.payment_date)
        .bind(payment.payment_method.as_str())
        .bind(&payment.reference_no)
        .bind(payment.amount)
        .bind(&payment.remarks)
        .bind(payment.updated_at)
        .bind(&payment.id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn delete(conn: &mut MySqlConnection, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}

fn details_query<'a>() -> QueryBuilder<'a, MySql> {
    QueryBuilder::new(format!(
        "SELECT {}, c.name AS client_name, s.project_id, p.name AS project_name, \
         s.quantity AS sale_quantity, s.unit_price AS sale_unit_price, \
         s.total_amount AS sale_total_amount, s.status AS sale_status, \
         l.lpo_no, i.invoice_no \
         FROM payments pay \
         JOIN sales s ON s.id = pay.sale_id \
         JOIN clients c ON c.id = pay.client_id \
         JOIN projects p ON p.id = s.project_id \
         LEFT JOIN lpos l ON l.sale_id = s.id \
         LEFT JOIN invoices i ON i.lpo_id = l.id",
        PAYMENT_COLUMNS
    ))
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct PaymentRow {
    id: String,
    client_id: String,
    sale_id: String,
    payment_date: NaiveDate,
    payment_method: String,
    reference_no: Option<String>,
    amount: Decimal,
    remarks: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment> {
        let payment_method = PaymentMethod::from_str(&self.payment_method).map_err(|e| {
            AppError::internal(format!("Invalid payment method in database: {}", e))
        })?;

        Ok(Payment {
            id: self.id,
            client_id: self.client_id,
            sale_id: self.sale_id,
            payment_date: self.payment_date,
            payment_method,
            reference_no: self.reference_no,
            amount: self.amount,
            remarks: self.remarks,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PaymentDetailsRow {
    #[sqlx(flatten)]
    payment: PaymentRow,
    client_name: String,
    project_id: String,
    project_name: String,
    sale_quantity: Decimal,
    sale_unit_price: Decimal,
    sale_total_amount: Decimal,
    sale_status: String,
    lpo_no: Option<String>,
    invoice_no: Option<String>,
}

impl PaymentDetailsRow {
    fn into_details(self) -> Result<PaymentDetails> {
        let sale_status = SaleStatus::from_str(&self.sale_status)
            .map_err(|e| AppError::internal(format!("Invalid sale status in database: {}", e)))?;

        Ok(PaymentDetails {
            payment: self.payment.into_payment()?,
            client_name: self.client_name,
            project_id: self.project_id,
            project_name: self.project_name,
            sale_quantity: self.sale_quantity,
            sale_unit_price: self.sale_unit_price,
            sale_total_amount: self.sale_total_amount,
            sale_status,
            lpo_no: self.lpo_no,
            invoice_no: self.invoice_no,
        })
    }
}
