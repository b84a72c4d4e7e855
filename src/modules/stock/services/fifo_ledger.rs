// FIFO stock depletion
//
// Sales consume stock batches oldest purchase first. Planning is pure: it reads the
// batch levels, decides how much to take from each, and leaves persisting the result
// to the caller's unit of work, so an insufficient-stock rejection never touches a batch.

use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::stock::models::StockBatch;

/// Quantity taken from a single batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deduction {
    pub batch_id: String,
    /// Gallons taken from the batch
    pub quantity: Decimal,
    /// Cost per gallon of the batch
    pub unit_cost: Decimal,
    /// Gallons left in the batch afterwards
    pub remaining: Decimal,
}

/// Ordered set of deductions covering a requested quantity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FifoPlan {
    pub requested: Decimal,
    pub deductions: Vec<Deduction>,
}

impl FifoPlan {
    /// Cost of the consumed gallons at their batches' purchase cost
    pub fn total_cost(&self) -> Decimal {
        self.deductions
            .iter()
            .map(|d| d.quantity * d.unit_cost)
            .sum()
    }

    /// Weighted average cost per gallon of the consumed stock (4 dp), zero for an empty plan
    pub fn weighted_unit_cost(&self) -> Decimal {
        if self.requested.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_cost() / self.requested).round_dp(4)
    }

    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty()
    }
}

/// Total gallons available across batches
pub fn available_quantity(batches: &[StockBatch]) -> Decimal {
    batches
        .iter()
        .filter(|b| b.quantity > Decimal::ZERO)
        .map(|b| b.quantity)
        .sum()
}

/// Plan the depletion of `requested` gallons, oldest purchase first.
///
/// Batches are ordered by purchase date, then intake time, then id, regardless of the
/// order they are passed in. Fails with `Capacity` when the batches hold less than
/// `requested` in total. A zero request yields an empty plan.
pub fn plan_fifo_deduction(batches: &[StockBatch], requested: Decimal) -> Result<FifoPlan> {
    if requested < Decimal::ZERO {
        return Err(AppError::validation("Quantity cannot be negative"));
    }

    let available = available_quantity(batches);
    if available < requested {
        return Err(AppError::capacity(format!(
            "Insufficient stock. Available: {} gallons, Required: {} gallons",
            available.normalize(),
            requested.normalize()
        )));
    }

    let mut ordered: Vec<&StockBatch> = batches
        .iter()
        .filter(|b| b.quantity > Decimal::ZERO)
        .collect();
    ordered.sort_by(|a, b| {
        a.purchase_date
            .cmp(&b.purchase_date)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    let mut remaining = requested;
    let mut deductions = Vec::new();

    for batch in ordered {
        if remaining.is_zero() {
            break;
        }

        let take = remaining.min(batch.quantity);
        deductions.push(Deduction {
            batch_id: batch.id.clone(),
            quantity: take,
            unit_cost: batch.purchase_cost,
            remaining: batch.quantity - take,
        });
        remaining -= take;
    }

    Ok(FifoPlan {
        requested,
        deductions,
    })
}
