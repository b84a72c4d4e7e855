use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::invoices::models::Invoice;
use crate::modules::sales::models::SaleView;

/// LPO lifecycle: waiting for an invoice, then completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LpoStatus {
    InvoicePending,
    Completed,
}

impl LpoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LpoStatus::InvoicePending => "INVOICE_PENDING",
            LpoStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for LpoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LpoStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INVOICE_PENDING" => Ok(LpoStatus::InvoicePending),
            "COMPLETED" => Ok(LpoStatus::Completed),
            _ => Err(format!("Invalid LPO status: {}", s)),
        }
    }
}

/// Local purchase order confirming a sale; one per sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lpo {
    pub id: String,
    #[serde(rename = "saleId")]
    pub sale_id: String,
    pub lpo_no: String,
    pub lpo_date: NaiveDate,
    pub status: LpoStatus,
    pub remarks: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// LPO with its invoice, as embedded in sale listings
#[derive(Debug, Clone, Serialize)]
pub struct LpoWithInvoice {
    #[serde(flatten)]
    pub lpo: Lpo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
}

/// LPO as listed: with its sale and, on request, its invoice
#[derive(Debug, Clone, Serialize)]
pub struct LpoDetails {
    #[serde(flatten)]
    pub lpo: Lpo,
    pub sale: SaleView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
}

/// Request body for `POST /api/lpo`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLpoRequest {
    #[serde(rename = "saleId", default)]
    pub sale_id: String,
    #[serde(default)]
    pub lpo_no: String,
    #[serde(default)]
    pub lpo_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreateLpoRequest {
    /// Checks required fields and returns the LPO date
    pub fn validate(&self) -> Result<NaiveDate> {
        if self.sale_id.trim().is_empty() {
            return Err(AppError::validation("Sale ID is required"));
        }
        if self.lpo_no.trim().is_empty() {
            return Err(AppError::validation("LPO number is required"));
        }
        self.lpo_date
            .ok_or_else(|| AppError::validation("LPO date is required"))
    }
}

/// Request body for `PUT /api/lpo`; status is driven by invoicing only
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLpoRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub lpo_no: Option<String>,
    #[serde(default)]
    pub lpo_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl UpdateLpoRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("LPO ID is required"));
        }
        if matches!(self.lpo_no.as_deref().map(str::trim), Some("")) {
            return Err(AppError::validation("LPO number cannot be empty"));
        }
        Ok(())
    }
}

/// Query for `GET /api/lpo`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LpoListQuery {
    #[serde(default)]
    pub status: Option<LpoStatus>,
    #[serde(default)]
    pub include: Option<String>,
}
