use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::{DateRangeQuery, Result};
use crate::modules::lpos::models::LpoStatus;
use crate::modules::sales::models::{SaleStatus, SaleView};
use crate::modules::sales::repositories::{SaleFilter, SaleRepository};
use crate::modules::stock::models::StockBatch;
use crate::modules::stock::repositories::StockRepository;

/// Read side the reports are computed from
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Sales dated within the range, every status included
    async fn sales(&self, range: DateRangeQuery) -> Result<Vec<SaleView>>;

    /// Stock batches purchased within the range
    async fn purchases(&self, range: DateRangeQuery) -> Result<Vec<StockBatch>>;

    /// Latest sales by sale date
    async fn recent_sales(&self, limit: u32) -> Result<Vec<SaleView>>;

    async fn count_sales(&self, status: SaleStatus) -> Result<i64>;

    async fn count_lpos(&self, status: LpoStatus) -> Result<i64>;

    /// Gallons left across all batches
    async fn stock_remaining(&self) -> Result<Decimal>;
}

pub struct MySqlReportRepository {
    pool: MySqlPool,
    sales: SaleRepository,
    stock: StockRepository,
}

impl MySqlReportRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            sales: SaleRepository::new(pool.clone()),
            stock: StockRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl ReportRepository for MySqlReportRepository {
    async fn sales(&self, range: DateRangeQuery) -> Result<Vec<SaleView>> {
        let filter = SaleFilter {
            status: None,
            start: range.start,
            end: range.end,
        };
        self.sales.list_views(&filter).await
    }

    async fn purchases(&self, range: DateRangeQuery) -> Result<Vec<StockBatch>> {
        self.stock.list(range.start, range.end).await
    }

    async fn recent_sales(&self, limit: u32) -> Result<Vec<SaleView>> {
        self.sales.recent_views(limit).await
    }

    async fn count_sales(&self, status: SaleStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_lpos(&self, status: LpoStatus) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lpos WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn stock_remaining(&self) -> Result<Decimal> {
        self.stock.total_remaining().await
    }
}
