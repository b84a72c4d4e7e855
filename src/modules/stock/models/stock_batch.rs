use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{money, AppError, Result};

/// A purchase of fuel from a supplier, consumed oldest first by sales
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockBatch {
    pub id: String,
    pub supplier: String,
    /// Gallons purchased
    pub initial_quantity: Decimal,
    /// Gallons still available; never negative
    pub quantity: Decimal,
    /// Cost per gallon
    pub purchase_cost: Decimal,
    pub purchase_date: NaiveDate,
    pub remarks: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl StockBatch {
    /// Purchase value of the batch as bought
    pub fn purchase_value(&self) -> Decimal {
        self.initial_quantity * self.purchase_cost
    }

    pub fn is_depleted(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }
}

/// Request body for stock intake
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockRequest {
    pub supplier: String,
    pub quantity: Decimal,
    pub purchase_cost: Decimal,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreateStockRequest {
    pub fn validate(&self) -> Result<()> {
        if self.supplier.trim().is_empty() {
            return Err(AppError::validation("Supplier is required"));
        }
        money::validate_positive("Quantity", self.quantity)?;
        money::validate_non_negative("Purchase cost", self.purchase_cost)?;
        Ok(())
    }
}

/// Request body for `PUT /api/stock`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStockRequest {
    pub id: String,
    pub supplier: String,
    pub quantity: Decimal,
    pub purchase_cost: Decimal,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl UpdateStockRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Stock ID is required"));
        }
        if self.supplier.trim().is_empty() {
            return Err(AppError::validation("Supplier is required"));
        }
        money::validate_non_negative("Quantity", self.quantity)?;
        money::validate_non_negative("Purchase cost", self.purchase_cost)?;
        Ok(())
    }
}
