use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{in_transaction, AppError, DateRangeQuery, Result};
use crate::modules::stock::models::{CreateStockRequest, StockBatch, UpdateStockRequest};
use crate::modules::stock::repositories::StockRepository;

/// Service for stock intake and maintenance.
///
/// Updates and deletes lock the batch row, the same lock sale creation takes
/// before drawing from it.
pub struct StockService {
    pool: MySqlPool,
    repository: StockRepository,
}

impl StockService {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            repository: StockRepository::new(pool.clone()),
            pool,
        }
    }

    /// List batches purchased within the range (inclusive), newest first
    pub async fn list(&self, range: DateRangeQuery) -> Result<Vec<StockBatch>> {
        range.validate()?;
        self.repository.list(range.start, range.end).await
    }

    /// Record a stock purchase
    pub async fn create(&self, request: CreateStockRequest) -> Result<StockBatch> {
        request.validate()?;

        let now = Utc::now();
        let batch = StockBatch {
            id: Uuid::new_v4().to_string(),
            supplier: request.supplier.trim().to_string(),
            initial_quantity: request.quantity,
            quantity: request.quantity,
            purchase_cost: request.purchase_cost,
            purchase_date: request.purchase_date,
            remarks: request.remarks,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&batch).await?;

        info!(
            stock_id = batch.id.as_str(),
            supplier = batch.supplier.as_str(),
            quantity = %batch.quantity,
            "Stock batch recorded"
        );

        Ok(batch)
    }

    /// Update a batch.
    ///
    /// Once sales have drawn from a batch its quantity and cost are history: only
    /// supplier, purchase date and remarks may change.
    pub async fn update(&self, request: UpdateStockRequest) -> Result<StockBatch> {
        request.validate()?;

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                let mut batch = StockRepository::lock(conn, &request.id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Stock batch not found"))?;

                let consumed = StockRepository::count_allocations(conn, &batch.id).await? > 0;
                let figures_changed = batch.quantity != request.quantity
                    || batch.purchase_cost != request.purchase_cost;

                if consumed && figures_changed {
                    warn!(stock_id = batch.id.as_str(), "Rejected change to consumed stock batch");
                    return Err(AppError::dependency(
                        "Stock batch has been consumed by sales; only supplier, date and remarks can change",
                    ));
                }

                batch.supplier = request.supplier.trim().to_string();
                batch.purchase_date = request.purchase_date;
                batch.remarks = request.remarks;
                batch.updated_at = Utc::now();

                if consumed {
                    StockRepository::update_details(conn, &batch).await?;
                } else {
                    batch.initial_quantity = request.quantity;
                    batch.quantity = request.quantity;
                    batch.purchase_cost = request.purchase_cost;
                    StockRepository::update_all(conn, &batch).await?;
                }

                info!(stock_id = batch.id.as_str(), consumed, "Stock batch updated");

                Ok(batch)
            })
        })
        .await
    }

    /// Delete a batch that no sale has drawn from
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();

        in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                if StockRepository::lock(conn, &id).await?.is_none() {
                    return Err(AppError::not_found("Stock batch not found"));
                }

                if StockRepository::count_allocations(conn, &id).await? > 0 {
                    return Err(AppError::dependency(
                        "Cannot delete stock that has been consumed by sales",
                    ));
                }

                StockRepository::delete(conn, &id).await?;

                info!(stock_id = id.as_str(), "Stock batch deleted");

                Ok(())
            })
        })
        .await
    }
}
