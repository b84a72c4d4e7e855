//! Cumulative payment position of a sale.
//!
//! Every payment mutation recomputes the amount paid towards a sale and derives
//! the sale's status from it. Comparisons are exact decimal comparisons.

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::sales::models::SaleStatus;

/// Kind of payment mutation being applied to a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    Create,
    Update,
    Delete,
}

/// Check that a sale in `status` accepts the given payment mutation.
///
/// New payments need an invoiced sale that is not yet settled. Existing payments
/// can be corrected or removed on any invoiced sale, including a settled one.
pub fn ensure_accepts(status: SaleStatus, action: PaymentAction) -> Result<()> {
    let allowed = match status {
        SaleStatus::InvoiceGenerated | SaleStatus::PartiallyPaid => true,
        SaleStatus::FullyPaid => action != PaymentAction::Create,
        SaleStatus::PendingLpo | SaleStatus::LpoReceived | SaleStatus::Cancelled => false,
    };

    if allowed {
        return Ok(());
    }

    Err(match (action, status) {
        (PaymentAction::Create, SaleStatus::FullyPaid) => {
            AppError::state_conflict("Sale is already fully paid")
        }
        (_, SaleStatus::Cancelled) => AppError::state_conflict("Sale is cancelled"),
        _ => AppError::state_conflict("Sale must be invoiced before accepting payments"),
    })
}

/// Sale status for a cumulative `paid` amount against `total`.
///
/// # Errors
/// * `Capacity` - `paid` exceeds `total`
/// * `Validation` - `paid` is negative
pub fn reconcile(total: Decimal, paid: Decimal) -> Result<SaleStatus> {
    if paid < Decimal::ZERO {
        return Err(AppError::validation("Paid amount cannot be negative"));
    }
    if paid > total {
        return Err(AppError::capacity("Payment amount exceeds remaining balance"));
    }

    Ok(if paid.is_zero() {
        SaleStatus::InvoiceGenerated
    } else if paid == total {
        SaleStatus::FullyPaid
    } else {
        SaleStatus::PartiallyPaid
    })
}
