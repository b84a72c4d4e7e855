use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::reconciliation::{ensure_accepts, reconcile, PaymentAction};
use crate::core::params::optional_text;
use crate::core::{in_transaction, AppError, Result};
use crate::modules::payments::models::{
    CreatePaymentRequest, Payment, PaymentDetails, PaymentListQuery, UpdatePaymentRequest,
};
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::sales::repositories::SaleRepository;

/// Result of `GET /api/payments`: one payment by id, or a list
#[derive(Debug)]
pub enum PaymentLookup {
    One(PaymentDetails),
    Many(Vec<PaymentDetails>),
}

/// Service for recording payments and keeping each sale's paid status in step.
///
/// Every mutation runs as one unit of work that locks the sale row first, so
/// concurrent payments against the same sale are applied one after another.
pub struct PaymentService {
    pool: MySqlPool,
    payments: PaymentRepository,
}

impl PaymentService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            payments: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Record a payment against an invoiced sale
    ///
    /// # Errors
    /// * `NotFound` - sale does not exist
    /// * `StateConflict` - sale not invoiced, already settled or cancelled
    /// * `Capacity` - payment would exceed the sale total
    pub async fn create_payment(&self, request: CreatePaymentRequest) -> Result<PaymentDetails> {
        let (payment_date, payment_method) = request.validate()?;

        let payment_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let sale = SaleRepository::lock(conn, &request.sale_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;

                if let Err(err) = ensure_accepts(sale.status, PaymentAction::Create) {
                    warn!(sale_id = sale.id.as_str(), status = %sale.status, "Payment rejected");
                    return Err(err);
                }

                let client_id = match optional_text(request.client_id) {
                    Some(client_id) if client_id != sale.client_id => {
                        return Err(AppError::validation(
                            "Payment client does not match the sale's client",
                        ));
                    }
                    _ => sale.client_id.clone(),
                };

                let paid_before = PaymentRepository::sum_for_sale(conn, &sale.id, None).await?;
                let paid = paid_before
                    .checked_add(request.amount)
                    .ok_or_else(|| AppError::validation("Payment amount is too large"))?;
                let status = match reconcile(sale.total_amount, paid) {
                    Ok(status) => status,
                    Err(err) => {
                        warn!(
                            sale_id = sale.id.as_str(),
                            paid = %paid_before,
                            amount = %request.amount,
                            total = %sale.total_amount,
                            "Payment exceeds remaining balance"
                        );
                        return Err(err);
                    }
                };

                let now = Utc::now();
                let payment = Payment {
                    id: Uuid::new_v4().to_string(),
                    client_id,
                    sale_id: sale.id.clone(),
                    payment_date,
                    payment_method,
                    reference_no: optional_text(request.reference_no),
                    amount: request.amount,
                    remarks: optional_text(request.remarks),
                    created_at: now,
                    updated_at: now,
                };

                PaymentRepository::insert(conn, &payment).await?;
                SaleRepository::set_status(conn, &sale.id, status).await?;

                info!(
                    payment_id = payment.id.as_str(),
                    sale_id = sale.id.as_str(),
                    amount = %payment.amount,
                    from = %sale.status,
                    to = %status,
                    "Payment recorded"
                );

                Ok(payment.id)
            })
        })
        .await?;

        self.get_payment(&payment_id).await
    }

    /// Correct a payment's date, method, reference, amount or remarks
    pub async fn update_payment(&self, request: UpdatePaymentRequest) -> Result<PaymentDetails> {
        let (payment_date, payment_method) = request.validate()?;

        let payment_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                // Sale first, then its payments: the lock order create uses
                let sale_id = PaymentRepository::find_sale_id(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Payment not found"))?;

                if let Some(requested_sale) = optional_text(request.sale_id) {
                    if requested_sale != sale_id {
                        return Err(AppError::validation(
                            "A payment cannot be moved to another sale",
                        ));
                    }
                }

                let sale = SaleRepository::lock(conn, &sale_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;
                ensure_accepts(sale.status, PaymentAction::Update)?;

                let mut payment = PaymentRepository::lock(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Payment not found"))?;

                let others = PaymentRepository::sum_for_sale(conn, &sale.id, Some(payment.id.as_str()))
                    .await?;
                let status = match reconcile(sale.total_amount, others + request.amount) {
                    Ok(status) => status,
                    Err(err) => {
                        warn!(
                            payment_id = payment.id.as_str(),
                            amount = %request.amount,
                            "Payment update exceeds remaining balance"
                        );
                        return Err(err);
                    }
                };

                payment.payment_date = payment_date;
                payment.payment_method = payment_method;
                payment.reference_no = optional_text(request.reference_no);
                payment.amount = request.amount;
                payment.remarks = optional_text(request.remarks);
                payment.updated_at = Utc::now();

                PaymentRepository::update(conn, &payment).await?;
                SaleRepository::set_status(conn, &sale.id, status).await?;

                info!(
                    payment_id = payment.id.as_str(),
                    sale_id = sale.id.as_str(),
                    amount = %payment.amount,
                    to = %status,
                    "Payment updated"
                );

                Ok(payment.id)
            })
        })
        .await?;

        self.get_payment(&payment_id).await
    }

    /// Remove a payment; the sale falls back to partially paid or invoiced
    pub async fn delete_payment(&self, id: &str) -> Result<()> {
        let id = id.to_string();

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let sale_id = PaymentRepository::find_sale_id(conn, &id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Payment not found"))?;

                let sale = SaleRepository::lock(conn, &sale_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;
                ensure_accepts(sale.status, PaymentAction::Delete)?;

                if PaymentRepository::lock(conn, &id).await?.is_none() {
                    return Err(AppError::not_found("Payment not found"));
                }

                let remaining = PaymentRepository::sum_for_sale(conn, &sale.id, Some(id.as_str())).await?;
                let status = reconcile(sale.total_amount, remaining)?;

                PaymentRepository::delete(conn, &id).await?;
                SaleRepository::set_status(conn, &sale.id, status).await?;

                info!(
                    payment_id = id.as_str(),
                    sale_id = sale.id.as_str(),
                    paid = %remaining,
                    to = %status,
                    "Payment deleted"
                );

                Ok(())
            })
        })
        .await
    }

    pub async fn get_payment(&self, id: &str) -> Result<PaymentDetails> {
        self.payments
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found("Payment not found"))
    }

    /// Payments for one sale, or all payments, newest payment date first
    pub async fn list_payments(&self, sale_id: Option<&str>) -> Result<Vec<PaymentDetails>> {
        self.payments.list_details(sale_id).await
    }

    /// Resolve `?id=` / `?saleId=` / no filter
    pub async fn lookup(&self, query: PaymentListQuery) -> Result<PaymentLookup> {
        if let Some(id) = optional_text(query.id) {
            return Ok(PaymentLookup::One(self.get_payment(&id).await?));
        }

        let sale_id = optional_text(query.sale_id);
        Ok(PaymentLookup::Many(self.list_payments(sale_id.as_deref()).await?))
    }
}
