use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modules::sales::models::SaleView;

/// Sales of one day: summed volume, revenue and cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProfit {
    pub sale_date: NaiveDate,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    pub total_quantity: Decimal,
    pub total_amount: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    /// Profit as a percentage of revenue; zero without revenue
    pub profit_margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_quantity: Decimal,
}

/// Year-to-date overview for the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// One entry per sale date, oldest first. The front-end reads this key.
    #[serde(rename = "monthlyProfits")]
    pub daily_profits: Vec<DailyProfit>,
    pub yearly_stats: YearlyStats,
    #[serde(rename = "pendingLPOCount")]
    pub pending_lpo_count: i64,
    pub pending_invoice_count: i64,
    pub recent_sales: Vec<SaleView>,
    pub stock_summary: StockSummary,
}

/// Figures the dashboard is computed from
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    pub year_sales: Vec<SaleView>,
    pub recent_sales: Vec<SaleView>,
    pub pending_lpo_count: i64,
    pub pending_invoice_count: i64,
    pub stock_remaining: Decimal,
}

/// Input VAT on one stock purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatPurchaseLine {
    pub stock_id: String,
    pub purchase_date: NaiveDate,
    pub supplier: String,
    pub quantity: Decimal,
    pub purchase_cost: Decimal,
    pub purchase_value: Decimal,
    pub vat_amount: Decimal,
}

/// Output VAT on one sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatSaleLine {
    pub sale_id: String,
    pub sale_date: NaiveDate,
    pub client: String,
    pub project: String,
    pub total_amount: Decimal,
    pub vat_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub vat_percentage: Decimal,
    pub purchases: Vec<VatPurchaseLine>,
    pub sales: Vec<VatSaleLine>,
    pub total_input_vat: Decimal,
    pub total_output_vat: Decimal,
    /// Output minus input; negative when more VAT was paid than collected
    pub net_vat: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLine {
    pub sale_id: String,
    pub sale_date: NaiveDate,
    pub client: String,
    pub project: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub purchase_cost: Decimal,
    pub total_amount: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_sales: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,
    pub total_quantity: Decimal,
    /// Profit per gallon sold
    pub average_profit: Decimal,
    pub profit_margin: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLossReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub sales: Vec<ProfitLine>,
    pub summary: ProfitSummary,
}

/// Outstanding balance of one client's project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPaymentRow {
    #[serde(rename = "clientId")]
    pub client_id: String,
    pub client: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub project: String,
    pub total_amount: Decimal,
    pub total_paid: Decimal,
    pub pending_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPaymentsReport {
    /// Largest balance first
    pub entries: Vec<PendingPaymentRow>,
    pub total_pending: Decimal,
}
