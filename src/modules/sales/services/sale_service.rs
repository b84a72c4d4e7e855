use std::collections::HashMap;

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::params::{optional_text, parse_includes};
use crate::core::{in_transaction, AppError, DateRangeQuery, Result};
use crate::modules::clients::repositories::ProjectRepository;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::lpos::models::LpoWithInvoice;
use crate::modules::lpos::repositories::LpoRepository;
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::sales::models::{
    CreateSaleRequest, Sale, SaleDetails, SaleListQuery, SaleStatus, SaleView, UpdateSaleRequest,
};
use crate::modules::sales::repositories::{SaleFilter, SaleRepository};
use crate::modules::stock::repositories::StockRepository;
use crate::modules::stock::services::plan_fifo_deduction;

/// Which companions to embed in a sale listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleIncludes {
    pub lpo: bool,
    pub invoice: bool,
    pub payments: bool,
}

impl SaleIncludes {
    pub fn all() -> Self {
        Self {
            lpo: true,
            invoice: true,
            payments: true,
        }
    }

    /// From `include=lpo,invoice,payments`; an invoice is only embedded inside its LPO
    pub fn parse(raw: Option<&str>) -> Self {
        let names = parse_includes(raw);
        let lpo = names.iter().any(|n| n == "lpo");
        Self {
            lpo,
            invoice: lpo && names.iter().any(|n| n == "invoice"),
            payments: names.iter().any(|n| n == "payments"),
        }
    }
}

/// Service for the sale side of the ledger: creation (which consumes stock),
/// listing and administrative changes.
pub struct SaleService {
    pool: MySqlPool,
    sales: SaleRepository,
    projects: ProjectRepository,
    lpos: LpoRepository,
    invoices: InvoiceRepository,
    payments: PaymentRepository,
}

impl SaleService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            sales: SaleRepository::new(pool.clone()),
            projects: ProjectRepository::new(pool.clone()),
            lpos: LpoRepository::new(pool.clone()),
            invoices: InvoiceRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a sale and draw its quantity from stock, oldest batch first.
    ///
    /// The stock check, batch deductions and the sale row commit together; when
    /// stock is short nothing is written.
    ///
    /// # Errors
    /// * `Validation` - missing or malformed fields, project not owned by the client
    /// * `NotFound` - project does not exist
    /// * `Capacity` - not enough stock on hand
    pub async fn create_sale(&self, request: CreateSaleRequest) -> Result<SaleDetails> {
        request.validate()?;
        self.ensure_project_of_client(&request.project_id, &request.client_id)
            .await?;

        let sale_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let batches = StockRepository::lock_available(conn).await?;
                let plan = match plan_fifo_deduction(&batches, request.quantity) {
                    Ok(plan) => plan,
                    Err(err) => {
                        warn!(quantity = %request.quantity, "Sale rejected: {}", err);
                        return Err(err);
                    }
                };

                let fifo_unit_cost = plan.weighted_unit_cost();
                let now = Utc::now();
                let sale = Sale {
                    id: Uuid::new_v4().to_string(),
                    client_id: request.client_id,
                    project_id: request.project_id,
                    quantity: request.quantity,
                    unit_price: request.unit_price,
                    purchase_cost: request.purchase_cost.unwrap_or(fifo_unit_cost),
                    fifo_unit_cost,
                    total_amount: Sale::compute_total(request.quantity, request.unit_price)?,
                    status: SaleStatus::PendingLpo,
                    sale_date: request.sale_date,
                    remarks: optional_text(request.remarks),
                    created_at: now,
                    updated_at: now,
                };

                SaleRepository::insert(conn, &sale).await?;
                StockRepository::apply_deduction(conn, &sale.id, &plan).await?;

                info!(
                    sale_id = sale.id.as_str(),
                    quantity = %sale.quantity,
                    total_amount = %sale.total_amount,
                    fifo_unit_cost = %sale.fifo_unit_cost,
                    batches = plan.deductions.len(),
                    "Sale created"
                );

                Ok(sale.id)
            })
        })
        .await?;

        self.get_sale(&sale_id).await
    }

    /// Sales newest first, filtered by status and sale date
    pub async fn list_sales(&self, query: SaleListQuery) -> Result<Vec<SaleDetails>> {
        DateRangeQuery {
            start: query.start,
            end: query.end,
        }
        .validate()?;

        let filter = SaleFilter {
            status: query.status,
            start: query.start,
            end: query.end,
        };
        let views = self.sales.list_views(&filter).await?;

        self.attach(views, SaleIncludes::parse(query.include.as_deref()))
            .await
    }

    /// One sale with its LPO, invoice and payments
    pub async fn get_sale(&self, id: &str) -> Result<SaleDetails> {
        let view = self
            .sales
            .find_view(id)
            .await?
            .ok_or_else(|| AppError::not_found("Sale not found"))?;

        let mut details = self.attach(vec![view], SaleIncludes::all()).await?;
        details
            .pop()
            .ok_or_else(|| AppError::internal("Sale disappeared while loading details"))
    }

    /// Update descriptive fields, and pricing while the sale awaits its LPO
    pub async fn update_sale(&self, request: UpdateSaleRequest) -> Result<SaleDetails> {
        request.validate()?;

        let current = self
            .sales
            .find_by_id(&request.id)
            .await?
            .ok_or_else(|| AppError::not_found("Sale not found"))?;

        let client_id = optional_text(request.client_id.clone()).unwrap_or(current.client_id);
        let project_id = optional_text(request.project_id.clone()).unwrap_or(current.project_id);
        self.ensure_project_of_client(&project_id, &client_id).await?;

        let sale_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let mut sale = SaleRepository::lock(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;

                if request.quantity.map_or(false, |q| q != sale.quantity) {
                    return Err(AppError::state_conflict(
                        "Sale quantity cannot change once stock has been consumed",
                    ));
                }
                if request.status.map_or(false, |s| s != sale.status) {
                    return Err(AppError::validation(
                        "Sale status is driven by LPO, invoice and payment records",
                    ));
                }
                if request.changes_pricing(&sale) && !sale.status.is_repriceable() {
                    warn!(sale_id = sale.id.as_str(), status = %sale.status, "Rejected reprice");
                    return Err(AppError::state_conflict(
                        "Pricing can only change while the sale is pending LPO",
                    ));
                }

                if client_id != sale.client_id
                    && SaleRepository::count_payments(conn, &sale.id).await? > 0
                {
                    return Err(AppError::state_conflict(
                        "Cannot change the client of a sale with payments",
                    ));
                }

                if let Some(unit_price) = request.unit_price {
                    sale.unit_price = unit_price;
                    sale.total_amount = Sale::compute_total(sale.quantity, unit_price)?;
                }
                if let Some(purchase_cost) = request.purchase_cost {
                    sale.purchase_cost = purchase_cost;
                }
                if let Some(sale_date) = request.sale_date {
                    sale.sale_date = sale_date;
                }
                if request.remarks.is_some() {
                    sale.remarks = optional_text(request.remarks);
                }
                sale.client_id = client_id;
                sale.project_id = project_id;
                sale.updated_at = Utc::now();

                SaleRepository::update(conn, &sale).await?;

                info!(sale_id = sale.id.as_str(), "Sale updated");

                Ok(sale.id)
            })
        })
        .await?;

        self.get_sale(&sale_id).await
    }

    /// Administrative cancel. Consumed stock is not returned.
    ///
    /// # Errors
    /// * `StateConflict` - already cancelled, or payments have been received
    pub async fn cancel_sale(&self, id: &str) -> Result<SaleDetails> {
        let id = id.to_string();

        let sale_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let sale = SaleRepository::lock(conn, &id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;

                if sale.status == SaleStatus::Cancelled {
                    return Err(AppError::state_conflict("Sale is already cancelled"));
                }
                if SaleRepository::count_payments(conn, &sale.id).await? > 0 {
                    warn!(sale_id = sale.id.as_str(), "Rejected cancel of sale with payments");
                    return Err(AppError::state_conflict(
                        "Cannot cancel a sale with recorded payments",
                    ));
                }

                SaleRepository::set_status(conn, &sale.id, SaleStatus::Cancelled).await?;

                info!(sale_id = sale.id.as_str(), from = %sale.status, "Sale cancelled");

                Ok(sale.id)
            })
        })
        .await?;

        self.get_sale(&sale_id).await
    }

    /// Delete a sale that has no LPO or payments. Consumed stock is not returned.
    pub async fn delete_sale(&self, id: &str) -> Result<()> {
        let id = id.to_string();

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let sale = SaleRepository::lock(conn, &id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;

                if SaleRepository::has_lpo(conn, &sale.id).await? {
                    return Err(AppError::dependency("Cannot delete a sale with an LPO"));
                }
                if SaleRepository::count_payments(conn, &sale.id).await? > 0 {
                    return Err(AppError::dependency("Cannot delete a sale with payments"));
                }

                SaleRepository::delete(conn, &sale.id).await?;

                info!(sale_id = sale.id.as_str(), "Sale deleted");

                Ok(())
            })
        })
        .await
    }

    async fn ensure_project_of_client(&self, project_id: &str, client_id: &str) -> Result<()> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if project.client_id != client_id {
            return Err(AppError::validation("Project does not belong to the client"));
        }
        Ok(())
    }

    async fn attach(&self, views: Vec<SaleView>, includes: SaleIncludes) -> Result<Vec<SaleDetails>> {
        let sale_ids: Vec<String> = views.iter().map(|v| v.sale.id.clone()).collect();

        let mut lpos: HashMap<String, LpoWithInvoice> = HashMap::new();
        if includes.lpo {
            let found = self.lpos.list_by_sale_ids(&sale_ids).await?;

            let mut invoices = HashMap::new();
            if includes.invoice {
                let lpo_ids: Vec<String> = found.iter().map(|l| l.id.clone()).collect();
                for invoice in self.invoices.list_by_lpo_ids(&lpo_ids).await? {
                    invoices.insert(invoice.lpo_id.clone(), invoice);
                }
            }

            for lpo in found {
                let invoice = invoices.remove(&lpo.id);
                lpos.insert(lpo.sale_id.clone(), LpoWithInvoice { lpo, invoice });
            }
        }

        let mut payments: HashMap<String, Vec<Payment>> = HashMap::new();
        if includes.payments {
            for payment in self.payments.list_by_sale_ids(&sale_ids).await? {
                payments.entry(payment.sale_id.clone()).or_default().push(payment);
            }
        }

        Ok(views
            .into_iter()
            .map(|view| {
                let lpo = lpos.remove(&view.sale.id);
                let sale_payments = if includes.payments {
                    Some(payments.remove(&view.sale.id).unwrap_or_default())
                } else {
                    None
                };
                SaleDetails {
                    view,
                    lpo,
                    payments: sale_payments,
                }
            })
            .collect())
    }
}
