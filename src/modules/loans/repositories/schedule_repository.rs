// MySQL-backed schedule store
//
// Implements:
// - Read a loan's installments in due-date order
// - Create single installment
// - Update installment amounts and status

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use super::ScheduleStore;
use crate::core::{AppError, Result};
use crate::modules::loans::models::{Installment, InstallmentStatus};

/// Repository for the `loan_schedule` table
pub struct ScheduleRepository {
    pool: MySqlPool,
}

impl ScheduleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleStore for ScheduleRepository {
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Installment>> {
        let rows = sqlx::query_as::<_, InstallmentRow>(
            r#"
            SELECT
                schedule_id, loan_id, due_date, principal_amount,
                interest_amount, total_due, payment_status
            FROM loan_schedule
            WHERE loan_id = ?
            ORDER BY due_date ASC, schedule_id ASC
            "#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    async fn create(&self, installment: &Installment) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO loan_schedule (
                loan_id, due_date, principal_amount, interest_amount,
                total_due, payment_status
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(installment.loan_id)
        .bind(installment.due_date)
        .bind(installment.principal_amount)
        .bind(installment.interest_amount)
        .bind(installment.total_due)
        .bind(installment.status.as_str())
        .execute(&self.pool)
        .await?;

        i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("schedule_id out of range"))
    }

    async fn update(&self, installment: &Installment) -> Result<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE loan_schedule
            SET
                due_date = ?,
                principal_amount = ?,
                interest_amount = ?,
                total_due = ?,
                payment_status = ?
            WHERE schedule_id = ? AND loan_id = ?
            "#,
        )
        .bind(installment.due_date)
        .bind(installment.principal_amount)
        .bind(installment.interest_amount)
        .bind(installment.total_due)
        .bind(installment.status.as_str())
        .bind(installment.id)
        .bind(installment.loan_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::not_found(format!(
                "Installment {} of loan {}",
                installment.id, installment.loan_id
            )));
        }

        Ok(())
    }
}

/// Database row representation for the loan_schedule table
#[derive(sqlx::FromRow)]
struct InstallmentRow {
    schedule_id: i64,
    loan_id: i64,
    due_date: chrono::NaiveDate,
    principal_amount: Decimal,
    interest_amount: Decimal,
    total_due: Decimal,
    payment_status: String,
}

impl TryFrom<InstallmentRow> for Installment {
    type Error = AppError;

    fn try_from(row: InstallmentRow) -> Result<Self> {
        let status = row
            .payment_status
            .parse::<InstallmentStatus>()
            .map_err(AppError::Store)?;

        Ok(Installment {
            id: row.schedule_id,
            loan_id: row.loan_id,
            due_date: row.due_date,
            principal_amount: row.principal_amount,
            interest_amount: row.interest_amount,
            total_due: row.total_due,
            status,
        })
    }
}
