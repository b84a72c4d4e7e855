use serde::{Deserialize, Serialize};

/// Sale lifecycle.
///
/// `PENDING_LPO -> LPO_RECEIVED -> INVOICE_GENERATED -> PARTIALLY_PAID <-> FULLY_PAID`,
/// with `CANCELLED` set only by an explicit administrative cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Stock consumed, waiting for the client's purchase order
    PendingLpo,
    LpoReceived,
    /// Invoiced, nothing paid yet
    InvoiceGenerated,
    PartiallyPaid,
    FullyPaid,
    Cancelled,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 6] = [
        SaleStatus::PendingLpo,
        SaleStatus::LpoReceived,
        SaleStatus::InvoiceGenerated,
        SaleStatus::PartiallyPaid,
        SaleStatus::FullyPaid,
        SaleStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::PendingLpo => "PENDING_LPO",
            SaleStatus::LpoReceived => "LPO_RECEIVED",
            SaleStatus::InvoiceGenerated => "INVOICE_GENERATED",
            SaleStatus::PartiallyPaid => "PARTIALLY_PAID",
            SaleStatus::FullyPaid => "FULLY_PAID",
            SaleStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the sale counts towards revenue, VAT and receivables
    pub fn is_financial(&self) -> bool {
        !matches!(self, SaleStatus::Cancelled)
    }

    /// Whether pricing fields may still be edited
    pub fn is_repriceable(&self) -> bool {
        matches!(self, SaleStatus::PendingLpo)
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::PendingLpo
    }
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PENDING_LPO" => Ok(SaleStatus::PendingLpo),
            "LPO_RECEIVED" => Ok(SaleStatus::LpoReceived),
            "INVOICE_GENERATED" => Ok(SaleStatus::InvoiceGenerated),
            "PARTIALLY_PAID" => Ok(SaleStatus::PartiallyPaid),
            "FULLY_PAID" => Ok(SaleStatus::FullyPaid),
            "CANCELLED" => Ok(SaleStatus::Cancelled),
            _ => Err(format!("Invalid sale status: {}", s)),
        }
    }
}
