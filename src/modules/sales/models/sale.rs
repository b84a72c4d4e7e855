use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sale_status::SaleStatus;
use crate::core::{money, AppError, Result};
use crate::modules::lpos::models::LpoWithInvoice;
use crate::modules::payments::models::Payment;

/// A delivery of fuel to a client's project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    /// Gallons delivered
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Cost per gallon used for profit; defaults to `fifo_unit_cost`
    pub purchase_cost: Decimal,
    /// Weighted cost per gallon of the batches consumed at creation
    pub fifo_unit_cost: Decimal,
    /// quantity x unit_price, fixed at creation
    pub total_amount: Decimal,
    pub status: SaleStatus,
    pub sale_date: NaiveDate,
    pub remarks: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Billable amount for a quantity at a unit price, rounded to fils
    pub fn compute_total(quantity: Decimal, unit_price: Decimal) -> Result<Decimal> {
        let total = money::checked_product("Total amount", quantity, unit_price)?;
        Ok(money::round_money(total))
    }

    pub fn cost(&self) -> Decimal {
        self.quantity * self.purchase_cost
    }

    pub fn profit(&self) -> Decimal {
        self.total_amount - self.cost()
    }
}

/// Sale with the names and payment position shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct SaleView {
    #[serde(flatten)]
    pub sale: Sale,
    pub client_name: String,
    pub project_name: String,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

/// Sale with optionally embedded LPO (and invoice) and payments
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetails {
    #[serde(flatten)]
    pub view: SaleView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lpo: Option<LpoWithInvoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Vec<Payment>>,
}

/// Request body for `POST /api/sales`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(rename = "clientId", default)]
    pub client_id: String,
    #[serde(rename = "projectId", default)]
    pub project_id: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Manual cost override; the FIFO cost is used when absent
    #[serde(default)]
    pub purchase_cost: Option<Decimal>,
    /// Checked against quantity x unit_price when supplied
    #[serde(default)]
    pub total_amount: Option<Decimal>,
    pub sale_date: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreateSaleRequest {
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(AppError::validation("Client ID is required"));
        }
        if self.project_id.trim().is_empty() {
            return Err(AppError::validation("Project ID is required"));
        }
        money::validate_positive("Quantity", self.quantity)?;
        money::validate_non_negative("Unit price", self.unit_price)?;
        if let Some(cost) = self.purchase_cost {
            money::validate_non_negative("Purchase cost", cost)?;
        }
        let expected = Sale::compute_total(self.quantity, self.unit_price)?;
        if let Some(total) = self.total_amount {
            if money::round_money(total) != expected {
                return Err(AppError::validation(format!(
                    "Total amount {} does not match quantity x unit price ({})",
                    total, expected
                )));
            }
        }
        Ok(())
    }
}

/// Request body for `PUT /api/sales`.
///
/// `quantity` and `status` are accepted only so that a client echoing the full
/// record back does not fail; changing either is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSaleRequest {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "clientId", default)]
    pub client_id: Option<String>,
    #[serde(rename = "projectId", default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
    #[serde(default)]
    pub purchase_cost: Option<Decimal>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub quantity: Option<Decimal>,
    #[serde(default)]
    pub status: Option<SaleStatus>,
}

impl UpdateSaleRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Sale ID is required"));
        }
        if let Some(price) = self.unit_price {
            money::validate_non_negative("Unit price", price)?;
        }
        if let Some(cost) = self.purchase_cost {
            money::validate_non_negative("Purchase cost", cost)?;
        }
        Ok(())
    }

    pub fn changes_pricing(&self, sale: &Sale) -> bool {
        self.unit_price.map_or(false, |p| p != sale.unit_price)
            || self.purchase_cost.map_or(false, |c| c != sale.purchase_cost)
    }
}

/// Query for `GET /api/sales`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleListQuery {
    #[serde(default)]
    pub status: Option<SaleStatus>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    /// Comma separated: `lpo`, `invoice`, `payments`
    #[serde(default)]
    pub include: Option<String>,
}
