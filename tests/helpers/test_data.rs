// Schedule builders for tests

use billing_engine::loans::{Installment, InstallmentStatus};
use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Principal, interest and total of the standard test installment
pub const PRINCIPAL: Decimal = dec!(100000);
pub const INTEREST: Decimal = dec!(10000);
pub const TOTAL_DUE: Decimal = dec!(110000);

/// Timestamp every test payment is stamped with
pub fn payment_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 28, 0, 0, 0).unwrap()
}

/// Monthly installments of 110000 for `loan_id`, one per status, due from 2024-01-01
pub fn uniform_schedule(loan_id: i64, statuses: &[InstallmentStatus]) -> Vec<Installment> {
    schedule_with_total(loan_id, TOTAL_DUE, statuses)
}

/// Monthly installments carrying `total_due` each
pub fn schedule_with_total(
    loan_id: i64,
    total_due: Decimal,
    statuses: &[InstallmentStatus],
) -> Vec<Installment> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    statuses
        .iter()
        .enumerate()
        .map(|(i, status)| {
            let due_date = start + Months::new(i as u32);
            let (principal, interest) = if total_due == TOTAL_DUE {
                (PRINCIPAL, INTEREST)
            } else {
                (total_due, Decimal::ZERO)
            };
            Installment::new(loan_id, due_date, principal, interest, total_due, *status)
        })
        .collect()
}
