// Property tests for payment reconciliation
//
// - Status is a function of the cumulative amount paid
// - Paid never exceeds the sale total
// - Deleting a payment restores the status implied by the remaining payments

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fueltrade::core::AppError;
use fueltrade::modules::payments::services::{ensure_accepts, reconcile, PaymentAction};
use fueltrade::modules::sales::models::SaleStatus;

fn cents(value: u64) -> Decimal {
    Decimal::new(value as i64, 2)
}

proptest! {
    #[test]
    fn test_status_matches_paid_position(total in 1u64..10_000_000, pct in 0u64..=100) {
        let total = cents(total);
        let paid = (total * Decimal::from(pct) / Decimal::ONE_HUNDRED).round_dp(2).min(total);

        let status = reconcile(total, paid).unwrap();

        let expected = if paid.is_zero() {
            SaleStatus::InvoiceGenerated
        } else if paid == total {
            SaleStatus::FullyPaid
        } else {
            SaleStatus::PartiallyPaid
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn test_overpayment_always_rejected(total in 0u64..10_000_000, extra in 1u64..1_000_000) {
        let total = cents(total);
        let err = reconcile(total, total + cents(extra)).unwrap_err();
        prop_assert!(matches!(err, AppError::Capacity(_)));
    }

    #[test]
    fn test_accepting_payments_in_sequence(
        amounts in prop::collection::vec(1u64..500_000, 1..10),
    ) {
        let total: Decimal = amounts.iter().map(|a| cents(*a)).sum();
        let mut paid = Decimal::ZERO;
        let mut status = SaleStatus::InvoiceGenerated;

        for amount in &amounts {
            prop_assert!(ensure_accepts(status, PaymentAction::Create).is_ok());
            paid += cents(*amount);
            status = reconcile(total, paid).unwrap();
        }

        prop_assert_eq!(status, SaleStatus::FullyPaid);
        prop_assert!(ensure_accepts(status, PaymentAction::Create).is_err());
        prop_assert!(ensure_accepts(status, PaymentAction::Delete).is_ok());
    }
}

#[test]
fn test_partial_then_full_then_delete() {
    let total = dec!(1000);

    let after_first = reconcile(total, dec!(600)).unwrap();
    assert_eq!(after_first, SaleStatus::PartiallyPaid);

    let after_second = reconcile(total, dec!(1000)).unwrap();
    assert_eq!(after_second, SaleStatus::FullyPaid);

    // Removing the 600 payment leaves 400 paid
    let after_delete = reconcile(total, dec!(400)).unwrap();
    assert_eq!(after_delete, SaleStatus::PartiallyPaid);

    // Removing the last payment returns the sale to invoiced
    assert_eq!(reconcile(total, dec!(0)).unwrap(), SaleStatus::InvoiceGenerated);
}

#[test]
fn test_payment_beyond_balance_message() {
    let err = reconcile(dec!(1000), dec!(1000.01)).unwrap_err();
    assert_eq!(err.to_string(), "Payment amount exceeds remaining balance");
}

#[test]
fn test_sales_without_invoice_reject_payments() {
    for status in [SaleStatus::PendingLpo, SaleStatus::LpoReceived] {
        let err = ensure_accepts(status, PaymentAction::Create).unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
        assert_eq!(err.to_string(), "Sale must be invoiced before accepting payments");
    }

    let err = ensure_accepts(SaleStatus::Cancelled, PaymentAction::Update).unwrap_err();
    assert_eq!(err.to_string(), "Sale is cancelled");

    let err = ensure_accepts(SaleStatus::FullyPaid, PaymentAction::Create).unwrap_err();
    assert_eq!(err.to_string(), "Sale is already fully paid");
}

#[test]
fn test_settled_sale_accepts_corrections() {
    assert!(ensure_accepts(SaleStatus::FullyPaid, PaymentAction::Update).is_ok());
    assert!(ensure_accepts(SaleStatus::PartiallyPaid, PaymentAction::Create).is_ok());
}
