use std::collections::HashMap;

use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::params::{optional_text, parse_includes};
use crate::core::{in_transaction, AppError, Result};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::lpos::models::{
    CreateLpoRequest, Lpo, LpoDetails, LpoListQuery, LpoStatus, UpdateLpoRequest,
};
use crate::modules::lpos::repositories::LpoRepository;
use crate::modules::sales::models::SaleStatus;
use crate::modules::sales::repositories::SaleRepository;

/// Service for purchase orders received against sales
pub struct LpoService {
    pool: MySqlPool,
    lpos: LpoRepository,
    sales: SaleRepository,
    invoices: InvoiceRepository,
}

impl LpoService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            lpos: LpoRepository::new(pool.clone()),
            sales: SaleRepository::new(pool.clone()),
            invoices: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }

    /// Record the client's LPO for a sale awaiting one.
    ///
    /// Inserts the LPO as `INVOICE_PENDING` and moves the sale to `LPO_RECEIVED`
    /// in one unit of work.
    ///
    /// # Errors
    /// * `Validation` - sale id, LPO number or date missing
    /// * `Uniqueness` - LPO number already used
    /// * `NotFound` - sale does not exist
    /// * `StateConflict` - sale not pending LPO, or already has one
    pub async fn create_lpo(&self, request: CreateLpoRequest) -> Result<LpoDetails> {
        let lpo_date = request.validate()?;
        let lpo_no = request.lpo_no.trim().to_string();

        let lpo_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                if LpoRepository::lpo_no_taken(conn, &lpo_no, None).await? {
                    return Err(AppError::uniqueness("LPO number already exists"));
                }

                let sale = SaleRepository::lock(conn, &request.sale_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Sale not found"))?;

                match sale.status {
                    SaleStatus::PendingLpo => {}
                    SaleStatus::LpoReceived
                    | SaleStatus::InvoiceGenerated
                    | SaleStatus::PartiallyPaid
                    | SaleStatus::FullyPaid
                    | SaleStatus::Cancelled => {
                        warn!(sale_id = sale.id.as_str(), status = %sale.status, "LPO rejected");
                        return Err(AppError::state_conflict(
                            "Sale is not in the correct state for LPO creation",
                        ));
                    }
                }

                if LpoRepository::exists_for_sale(conn, &sale.id).await? {
                    return Err(AppError::state_conflict("LPO already exists for this sale"));
                }

                let now = Utc::now();
                let lpo = Lpo {
                    id: Uuid::new_v4().to_string(),
                    sale_id: sale.id.clone(),
                    lpo_no,
                    lpo_date,
                    status: LpoStatus::InvoicePending,
                    remarks: optional_text(request.remarks),
                    created_at: now,
                    updated_at: now,
                };

                LpoRepository::insert(conn, &lpo).await?;
                SaleRepository::set_status(conn, &sale.id, SaleStatus::LpoReceived).await?;

                info!(
                    lpo_id = lpo.id.as_str(),
                    lpo_no = lpo.lpo_no.as_str(),
                    sale_id = sale.id.as_str(),
                    "LPO received"
                );

                Ok(lpo.id)
            })
        })
        .await?;

        self.get_lpo(&lpo_id, true).await
    }

    /// LPOs newest first, each with its sale; `include=invoice` embeds invoices
    pub async fn list_lpos(&self, query: LpoListQuery) -> Result<Vec<LpoDetails>> {
        let with_invoice = parse_includes(query.include.as_deref())
            .iter()
            .any(|n| n == "invoice");

        let lpos = self.lpos.list(query.status).await?;
        self.attach(lpos, with_invoice).await
    }

    pub async fn get_lpo(&self, id: &str, with_invoice: bool) -> Result<LpoDetails> {
        let lpo = self
            .lpos
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("LPO not found"))?;

        self.attach(vec![lpo], with_invoice)
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("LPO disappeared while loading details"))
    }

    /// Change an LPO's number, date or remarks; status is left to invoicing
    pub async fn update_lpo(&self, request: UpdateLpoRequest) -> Result<LpoDetails> {
        request.validate()?;

        let lpo_id = in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let mut lpo = LpoRepository::lock(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("LPO not found"))?;

                if let Some(lpo_no) = request.lpo_no.map(|n| n.trim().to_string()) {
                    if lpo_no != lpo.lpo_no
                        && LpoRepository::lpo_no_taken(conn, &lpo_no, Some(lpo.id.as_str())).await?
                    {
                        return Err(AppError::uniqueness("LPO number already exists"));
                    }
                    lpo.lpo_no = lpo_no;
                }
                if let Some(lpo_date) = request.lpo_date {
                    lpo.lpo_date = lpo_date;
                }
                if request.remarks.is_some() {
                    lpo.remarks = optional_text(request.remarks);
                }
                lpo.updated_at = Utc::now();

                LpoRepository::update(conn, &lpo).await?;

                info!(lpo_id = lpo.id.as_str(), "LPO updated");

                Ok(lpo.id)
            })
        })
        .await?;

        self.get_lpo(&lpo_id, true).await
    }

    async fn attach(&self, lpos: Vec<Lpo>, with_invoice: bool) -> Result<Vec<LpoDetails>> {
        let sale_ids: Vec<String> = lpos.iter().map(|l| l.sale_id.clone()).collect();
        let mut sales: HashMap<String, _> = self
            .sales
            .views_by_ids(&sale_ids)
            .await?
            .into_iter()
            .map(|view| (view.sale.id.clone(), view))
            .collect();

        let mut invoices = HashMap::new();
        if with_invoice {
            let lpo_ids: Vec<String> = lpos.iter().map(|l| l.id.clone()).collect();
            for invoice in self.invoices.list_by_lpo_ids(&lpo_ids).await? {
                invoices.insert(invoice.lpo_id.clone(), invoice);
            }
        }

        lpos.into_iter()
            .map(|lpo| {
                let sale = sales.remove(&lpo.sale_id).ok_or_else(|| {
                    AppError::internal(format!("Sale {} missing for LPO {}", lpo.sale_id, lpo.id))
                })?;
                let invoice = invoices.remove(&lpo.id);
                Ok(LpoDetails { lpo, sale, invoice })
            })
            .collect()
    }
}
