use async_trait::async_trait;
use rust_decimal::Decimal;

use super::ReportRepository;
use crate::core::{DateRangeQuery, Result};
use crate::modules::lpos::models::LpoStatus;
use crate::modules::sales::models::{SaleStatus, SaleView};
use crate::modules::stock::models::StockBatch;

/// Fixed report data held in memory, for exercising the report endpoints
/// without a database
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportRepository {
    sales: Vec<SaleView>,
    purchases: Vec<StockBatch>,
    lpo_statuses: Vec<LpoStatus>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sale(mut self, sale: SaleView) -> Self {
        self.sales.push(sale);
        self
    }

    pub fn with_purchase(mut self, batch: StockBatch) -> Self {
        self.purchases.push(batch);
        self
    }

    pub fn with_lpo(mut self, status: LpoStatus) -> Self {
        self.lpo_statuses.push(status);
        self
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn sales(&self, range: DateRangeQuery) -> Result<Vec<SaleView>> {
        Ok(self
            .sales
            .iter()
            .filter(|view| range.contains(view.sale.sale_date))
            .cloned()
            .collect())
    }

    async fn purchases(&self, range: DateRangeQuery) -> Result<Vec<StockBatch>> {
        Ok(self
            .purchases
            .iter()
            .filter(|batch| range.contains(batch.purchase_date))
            .cloned()
            .collect())
    }

    async fn recent_sales(&self, limit: u32) -> Result<Vec<SaleView>> {
        let mut sales = self.sales.clone();
        sales.sort_by(|a, b| {
            (b.sale.sale_date, b.sale.created_at).cmp(&(a.sale.sale_date, a.sale.created_at))
        });
        sales.truncate(limit as usize);
        Ok(sales)
    }

    async fn count_sales(&self, status: SaleStatus) -> Result<i64> {
        Ok(self.sales.iter().filter(|v| v.sale.status == status).count() as i64)
    }

    async fn count_lpos(&self, status: LpoStatus) -> Result<i64> {
        Ok(self.lpo_statuses.iter().filter(|s| **s == status).count() as i64)
    }

    async fn stock_remaining(&self) -> Result<Decimal> {
        Ok(self.purchases.iter().map(|b| b.quantity).sum())
    }
}
