use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Decimal places kept for AED amounts in reports (fils)
pub const MONEY_SCALE: u32 = 2;

/// Decimal places accepted on quantities and unit prices
pub const MAX_INPUT_SCALE: u32 = 4;

/// Largest value a `DECIMAL(18,4)` column holds: 99,999,999,999,999.9999
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999_999_999, MAX_INPUT_SCALE)
}

/// Rounds an amount to fils for presentation
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole * 100`, or zero when `whole` is zero
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        round_money(part / whole * Decimal::ONE_HUNDRED)
    }
}

/// `numerator / denominator`, or zero when `denominator` is zero
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Rejects negative values, values beyond `max_amount` and values with more
/// than four decimal places
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(AppError::validation(format!("{} cannot be negative", field)));
    }
    validate_size(field, value)?;
    validate_scale(field, value)
}

/// Rejects zero, negative values, values beyond `max_amount` and values with
/// more than four decimal places
pub fn validate_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be greater than zero",
            field
        )));
    }
    validate_size(field, value)?;
    validate_scale(field, value)
}

/// `a x b`, rejected when the product overflows or does not fit a stored amount
pub fn checked_product(field: &str, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .filter(|product| product.abs() <= max_amount())
        .ok_or_else(|| AppError::validation(format!("{} is too large", field)))
}

fn validate_size(field: &str, value: Decimal) -> Result<()> {
    if value > max_amount() {
        return Err(AppError::validation(format!("{} is too large", field)));
    }
    Ok(())
}

fn validate_scale(field: &str, value: Decimal) -> Result<()> {
    if value.normalize().scale() > MAX_INPUT_SCALE {
        return Err(AppError::validation(format!(
            "{} cannot have more than {} decimal places",
            field, MAX_INPUT_SCALE
        )));
    }
    Ok(())
}

/// Formats an amount for log lines and messages
pub fn format_aed(amount: Decimal) -> String {
    format!("AED {:.2}", round_money(amount))
}
