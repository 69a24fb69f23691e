use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::loans::models::Installment;

/// Number of overdue installments at which a loan counts as delinquent
pub const OVERDUE_LIMIT: usize = 2;

/// Decimal places a payment amount may carry, matching the DECIMAL(15, 2) columns
pub const AMOUNT_SCALE: u32 = 2;

/// Pure computations over a loan's installment schedule
///
/// Every function takes the schedule in store order and performs no I/O.
pub struct BillingCalculator;

impl BillingCalculator {
    /// Sum of `total_due` over installments that are not paid
    pub fn outstanding(schedule: &[Installment]) -> Decimal {
        schedule
            .iter()
            .filter(|installment| !installment.is_paid())
            .map(|installment| installment.total_due)
            .sum()
    }

    /// True once `OVERDUE_LIMIT` overdue installments have been seen
    pub fn is_delinquent(schedule: &[Installment]) -> bool {
        let mut overdue = 0;
        for installment in schedule {
            if installment.is_overdue() {
                overdue += 1;
            }
            if overdue == OVERDUE_LIMIT {
                return true;
            }
        }
        false
    }

    /// Check a payment amount against the schedule before anything is written
    ///
    /// # Business Rules
    /// - The amount may not exceed the outstanding balance
    /// - The amount, truncated to whole units, must be a multiple of the first
    ///   installment's truncated `total_due`. Schedules are assumed to carry a
    ///   uniform installment amount; uneven schedules (e.g. a balloon final
    ///   installment) are not handled by this rule.
    /// - The untruncated amount must also be an exact multiple of the first
    ///   installment's `total_due`, so the allocation remainder lands on zero
    /// - At most `AMOUNT_SCALE` decimal places
    pub fn validate_payment(schedule: &[Installment], amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("amount must be positive"));
        }

        if amount.normalize().scale() > AMOUNT_SCALE {
            return Err(AppError::validation(format!(
                "amount has more than {} decimal places",
                AMOUNT_SCALE
            )));
        }

        let first = schedule
            .first()
            .ok_or_else(|| AppError::validation("loan has no installments"))?;

        if amount > Self::outstanding(schedule) {
            return Err(AppError::validation("amount exceeds outstanding"));
        }

        let unit = first.total_due.trunc();
        if unit.is_zero() {
            return Err(AppError::validation("installment amount is below one unit"));
        }

        if !(amount.trunc() % unit).is_zero() || !(amount % first.total_due).is_zero() {
            return Err(AppError::validation("amount not a valid multiple"));
        }

        Ok(())
    }

    /// Mark the earliest unpaid installments as paid until `amount` is used up
    ///
    /// Returns only the installments that changed, with their status already
    /// set to paid. The walk stops as soon as the running remainder is exactly
    /// zero; callers are expected to have run `validate_payment` first.
    pub fn allocate(schedule: Vec<Installment>, amount: Decimal) -> Vec<Installment> {
        let mut remaining = amount;
        let mut settled = Vec::new();

        for mut installment in schedule {
            if installment.mark_as_paid() {
                remaining -= installment.total_due;
                settled.push(installment);
            }
            if remaining.is_zero() {
                break;
            }
        }

        settled
    }
}
