use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::lpos::models::Lpo;
use crate::modules::payments::models::Payment;
use crate::modules::sales::models::SaleView;

/// Invoice status. Collection progress is tracked on the sale, so an invoice
/// stays `PENDING_PAYMENT` once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    PendingPayment,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::PendingPayment => "PENDING_PAYMENT",
        }
    }
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::PendingPayment
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING_PAYMENT" => Ok(InvoiceStatus::PendingPayment),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Invoice billing a completed LPO; one per LPO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    #[serde(rename = "lpoId")]
    pub lpo_id: String,
    pub invoice_no: String,
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    pub remarks: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Invoice as listed: with its LPO, the sale and the payments received so far
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetails {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub lpo: Lpo,
    pub sale: SaleView,
    /// Newest payment date first
    pub payments: Vec<Payment>,
}

/// Request body for `POST /api/invoice`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(rename = "lpoId", default)]
    pub lpo_id: String,
    #[serde(default)]
    pub invoice_no: String,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreateInvoiceRequest {
    /// Checks required fields and returns the invoice date
    pub fn validate(&self) -> Result<NaiveDate> {
        if self.lpo_id.trim().is_empty() {
            return Err(AppError::validation("LPO ID is required"));
        }
        if self.invoice_no.trim().is_empty() {
            return Err(AppError::validation("Invoice number is required"));
        }
        self.invoice_date
            .ok_or_else(|| AppError::validation("Invoice date is required"))
    }
}

/// Request body for `PUT /api/invoice`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl UpdateInvoiceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Invoice ID is required"));
        }
        if matches!(self.invoice_no.as_deref().map(str::trim), Some("")) {
            return Err(AppError::validation("Invoice number cannot be empty"));
        }
        Ok(())
    }
}

/// Query for `GET /api/invoice`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListQuery {
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}
