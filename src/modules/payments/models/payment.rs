use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{money, AppError, Result};
use crate::modules::sales::models::SaleStatus;

/// How a client settled (part of) an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Cheque,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Cheque => "CHEQUE",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CASH" => Ok(PaymentMethod::Cash),
            "BANK_TRANSFER" => Ok(PaymentMethod::BankTransfer),
            "CHEQUE" => Ok(PaymentMethod::Cheque),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

/// Money received against a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    #[serde(rename = "clientId")]
    pub client_id: String,
    #[serde(rename = "saleId")]
    pub sale_id: String,
    pub payment_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub reference_no: Option<String>,
    /// Always positive
    pub amount: Decimal,
    pub remarks: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Payment with the sale context shown on payment screens
#[derive(Debug, Clone, Serialize)]
pub struct PaymentDetails {
    #[serde(flatten)]
    pub payment: Payment,
    pub client_name: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub project_name: String,
    pub sale_quantity: Decimal,
    pub sale_unit_price: Decimal,
    pub sale_total_amount: Decimal,
    pub sale_status: SaleStatus,
    pub lpo_no: Option<String>,
    pub invoice_no: Option<String>,
}

/// Request body for `POST /api/payments`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    /// Defaults to the sale's client
    #[serde(rename = "clientId", default)]
    pub client_id: Option<String>,
    #[serde(rename = "saleId", default)]
    pub sale_id: String,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub reference_no: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CreatePaymentRequest {
    /// Checks required fields and returns the payment date and method
    pub fn validate(&self) -> Result<(NaiveDate, PaymentMethod)> {
        if self.sale_id.trim().is_empty() {
            return Err(AppError::validation("Sale ID is required"));
        }
        validate_payment_fields(self.payment_date, self.payment_method, self.amount)
    }
}

/// Request body for `PUT /api/payments`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentRequest {
    #[serde(default)]
    pub id: String,
    /// Echoed back by clients; a payment cannot move to another sale
    #[serde(rename = "saleId", default)]
    pub sale_id: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub reference_no: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl UpdatePaymentRequest {
    pub fn validate(&self) -> Result<(NaiveDate, PaymentMethod)> {
        if self.id.trim().is_empty() {
            return Err(AppError::validation("Payment ID is required"));
        }
        validate_payment_fields(self.payment_date, self.payment_method, self.amount)
    }
}

fn validate_payment_fields(
    payment_date: Option<NaiveDate>,
    payment_method: Option<PaymentMethod>,
    amount: Decimal,
) -> Result<(NaiveDate, PaymentMethod)> {
    let payment_date =
        payment_date.ok_or_else(|| AppError::validation("Payment date is required"))?;
    let payment_method =
        payment_method.ok_or_else(|| AppError::validation("Payment method is required"))?;
    money::validate_positive("Payment amount", amount)?;
    Ok((payment_date, payment_method))
}

/// Query for `GET /api/payments`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentListQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "saleId", default)]
    pub sale_id: Option<String>,
}
