use std::sync::Arc;

use tracing::info;

use super::report_calculator::ReportCalculator;
use crate::config::AppConfig;
use crate::core::{BusinessCalendar, DateRangeQuery, Result};
use crate::modules::lpos::models::LpoStatus;
use crate::modules::reports::models::{
    Dashboard, DashboardInputs, PendingPaymentsReport, ProfitLossReport, VatReport,
};
use crate::modules::reports::repositories::ReportRepository;
use crate::modules::sales::models::SaleStatus;

/// Service for the dashboard and financial reports.
///
/// Reports are recomputed from current data on every call.
pub struct ReportService {
    repository: Arc<dyn ReportRepository>,
    calculator: ReportCalculator,
    calendar: BusinessCalendar,
    recent_sales_limit: u32,
}

impl ReportService {
    pub fn new(repository: Arc<dyn ReportRepository>, settings: &AppConfig) -> Result<Self> {
        Ok(Self {
            repository,
            calculator: ReportCalculator::new(settings.vat_rate_percent)?,
            calendar: settings.calendar(),
            recent_sales_limit: settings.recent_sales_limit,
        })
    }

    /// Year-to-date figures, pending counts, latest sales and stock on hand
    pub async fn dashboard(&self) -> Result<Dashboard> {
        let today = self.calendar.today();
        let year = DateRangeQuery {
            start: Some(self.calendar.start_of_year(today)),
            end: None,
        };

        let (year_sales, recent_sales, pending_lpo_count, pending_invoice_count, stock_remaining) =
            futures_util::try_join!(
                self.repository.sales(year),
                self.repository.recent_sales(self.recent_sales_limit),
                self.repository.count_sales(SaleStatus::PendingLpo),
                self.repository.count_lpos(LpoStatus::InvoicePending),
                self.repository.stock_remaining(),
            )?;

        Ok(self.calculator.dashboard(DashboardInputs {
            year_sales,
            recent_sales,
            pending_lpo_count,
            pending_invoice_count,
            stock_remaining,
        }))
    }

    /// Input and output VAT over an optional purchase/sale date range
    pub async fn vat(&self, range: DateRangeQuery) -> Result<VatReport> {
        range.validate()?;

        let (purchases, sales) = futures_util::try_join!(
            self.repository.purchases(range),
            self.repository.sales(range),
        )?;
        let report = self.calculator.vat(range, &purchases, &sales);

        info!(
            start = ?range.start,
            end = ?range.end,
            net_vat = %report.net_vat,
            "VAT report generated"
        );

        Ok(report)
    }

    /// Profit and loss; defaults to the current month up to today
    pub async fn profit_loss(&self, range: DateRangeQuery) -> Result<ProfitLossReport> {
        let today = self.calendar.today();
        let start = range
            .start
            .unwrap_or_else(|| self.calendar.start_of_month(today));
        let end = range.end.unwrap_or(today);
        let range = DateRangeQuery {
            start: Some(start),
            end: Some(end),
        };
        range.validate()?;

        let sales = self.repository.sales(range).await?;
        let report = self.calculator.profit_loss(start, end, &sales);

        info!(
            %start,
            %end,
            total_profit = %report.summary.total_profit,
            "Profit and loss report generated"
        );

        Ok(report)
    }

    /// Outstanding balances of unsettled sales per client project
    pub async fn pending_payments(&self) -> Result<PendingPaymentsReport> {
        let sales = self.repository.sales(DateRangeQuery::default()).await?;
        Ok(self.calculator.pending_payments(&sales))
    }
}
