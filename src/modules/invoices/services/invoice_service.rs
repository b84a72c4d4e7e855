use std::collections::HashMap;

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::params::optional_text;
use crate::core::{in_transaction, AppError, Result};
use crate::modules::invoices::models::{
    CreateInvoiceRequest, Invoice, InvoiceDetails, InvoiceListQuery, InvoiceStatus,
    UpdateInvoiceRequest,
};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::lpos::models::LpoStatus;
use crate::modules::lpos::repositories::LpoRepository;
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::sales::models::SaleStatus;
use crate::modules::sales::repositories::SaleRepository;

/// Service for invoicing completed LPOs.
///
/// Creating an invoice completes its LPO and opens the sale for payments,
/// all in one unit of work. Rows are locked sale first, then LPO.
pub struct InvoiceService {
    pool: MySqlPool,
    invoices: InvoiceRepository,
    lpos: LpoRepository,
    sales: SaleRepository,
    payments: PaymentRepository,
}

impl InvoiceService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            invoices: InvoiceRepository::new(pool.clone()),
            lpos: LpoRepository::new(pool.clone()),
            sales: SaleRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Issue the invoice for an LPO awaiting one
    ///
    /// # Errors
    /// * `Validation` - LPO id, invoice number or date missing
    /// * `NotFound` - LPO does not exist
    /// * `StateConflict` - LPO already completed, or already invoiced
    /// * `Uniqueness` - invoice number already used
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> Result<InvoiceDetails> {
        let invoice_date = request.validate()?;
        let invoice_no = request.invoice_no.trim().to_string();
        let sale_id = self
            .lpos
            .find_by_id(&request.lpo_id)
            .await?
            .map(|lpo| lpo.sale_id)
            .ok_or_else(|| AppError::not_found("LPO not found"))?;

        let invoice_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let sale = SaleRepository::lock(conn, &sale_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;
                let lpo = LpoRepository::lock(conn, &request.lpo_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("LPO not found"))?;

                match lpo.status {
                    LpoStatus::InvoicePending => {}
                    LpoStatus::Completed => {
                        warn!(lpo_id = lpo.id.as_str(), "Invoice rejected for completed LPO");
                        return Err(AppError::state_conflict(
                            "LPO is not in the correct state for invoice generation",
                        ));
                    }
                }
                if sale.status == SaleStatus::Cancelled {
                    return Err(AppError::state_conflict("Sale is cancelled"));
                }

                if InvoiceRepository::exists_for_lpo(conn, &lpo.id).await? {
                    return Err(AppError::state_conflict("Invoice already exists for this LPO"));
                }
                if InvoiceRepository::invoice_no_taken(conn, &invoice_no, None).await? {
                    return Err(AppError::uniqueness("Invoice number already exists"));
                }

                let now = Utc::now();
                let invoice = Invoice {
                    id: Uuid::new_v4().to_string(),
                    lpo_id: lpo.id.clone(),
                    invoice_no,
                    invoice_date,
                    status: InvoiceStatus::PendingPayment,
                    remarks: optional_text(request.remarks),
                    created_at: now,
                    updated_at: now,
                };

                InvoiceRepository::insert(conn, &invoice).await?;
                LpoRepository::set_status(conn, &lpo.id, LpoStatus::Completed).await?;
                SaleRepository::set_status(conn, &sale.id, SaleStatus::InvoiceGenerated).await?;

                info!(
                    invoice_id = invoice.id.as_str(),
                    invoice_no = invoice.invoice_no.as_str(),
                    lpo_id = lpo.id.as_str(),
                    sale_id = sale.id.as_str(),
                    "Invoice generated"
                );

                Ok(invoice.id)
            })
        })
        .await?;

        self.get_invoice(&invoice_id).await
    }

    /// Invoices newest first, each with its LPO, sale and payments
    pub async fn list_invoices(&self, query: InvoiceListQuery) -> Result<Vec<InvoiceDetails>> {
        let invoices = self.invoices.list(query.status).await?;
        self.attach(invoices).await
    }

    pub async fn get_invoice(&self, id: &str) -> Result<InvoiceDetails> {
        let invoice = self
            .invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice not found"))?;

        self.attach(vec![invoice])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Invoice disappeared while loading details"))
    }

    /// Change an invoice's number, date or remarks
    pub async fn update_invoice(&self, request: UpdateInvoiceRequest) -> Result<InvoiceDetails> {
        request.validate()?;

        let invoice_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let mut invoice = InvoiceRepository::lock(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Invoice not found"))?;

                if let Some(invoice_no) = request.invoice_no.map(|n| n.trim().to_string()) {
                    if invoice_no != invoice.invoice_no
                        && InvoiceRepository::invoice_no_taken(
                            conn,
                            &invoice_no,
                            Some(invoice.id.as_str()),
                        )
                        .await?
                    {
                        return Err(AppError::uniqueness("Invoice number already exists"));
                    }
                    invoice.invoice_no = invoice_no;
                }
                if let Some(invoice_date) = request.invoice_date {
                    invoice.invoice_date = invoice_date;
                }
                if request.remarks.is_some() {
                    invoice.remarks = optional_text(request.remarks);
                }
                invoice.updated_at = Utc::now();

                InvoiceRepository::update(conn, &invoice).await?;

                info!(invoice_id = invoice.id.as_str(), "Invoice updated");

                Ok(invoice.id)
            })
        })
        .await?;

        self.get_invoice(&invoice_id).await
    }

    async fn attach(&self, invoices: Vec<Invoice>) -> Result<Vec<InvoiceDetails>> {
        let lpo_ids: Vec<String> = invoices.iter().map(|i| i.lpo_id.clone()).collect();
        let mut lpos: HashMap<String, _> = self
            .lpos
            .list_by_ids(&lpo_ids)
            .await?
            .into_iter()
            .map(|lpo| (lpo.id.clone(), lpo))
            .collect();

        let sale_ids: Vec<String> = lpos.values().map(|l| l.sale_id.clone()).collect();
        let mut sales: HashMap<String, _> = self
            .sales
            .views_by_ids(&sale_ids)
            .await?
            .into_iter()
            .map(|view| (view.sale.id.clone(), view))
            .collect();

        let mut payments: HashMap<String, Vec<Payment>> = HashMap::new();
        for payment in self.payments.list_by_sale_ids(&sale_ids).await? {
            payments.entry(payment.sale_id.clone()).or_default().push(payment);
        }

        invoices
            .into_iter()
            .map(|invoice| {
                let lpo = lpos.remove(&invoice.lpo_id).ok_or_else(|| {
                    AppError::internal(format!(
                        "LPO {} missing for invoice {}",
                        invoice.lpo_id, invoice.id
                    ))
                })?;
                let sale = sales.remove(&lpo.sale_id).ok_or_else(|| {
                    AppError::internal(format!("Sale {} missing for LPO {}", lpo.sale_id, lpo.id))
                })?;
                let payments = payments.remove(&lpo.sale_id).unwrap_or_default();
                Ok(InvoiceDetails {
                    invoice,
                    lpo,
                    sale,
                    payments,
                })
            })
            .collect()
    }
}
