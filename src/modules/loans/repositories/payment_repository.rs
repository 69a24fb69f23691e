use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use super::PaymentStore;
use crate::core::{AppError, Result};
use crate::modules::loans::models::{Installment, InstallmentStatus, Payment, PaymentStatus};

/// Repository for the `payments` table
///
/// The combined payment write locks the loan's schedule rows for the duration
/// of the transaction and settles each installment with a conditional update,
/// serializing concurrent payments on the same loan.
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    /// Create a new PaymentRepository
    ///
    /// # Arguments
    /// * `pool` - Database connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PaymentRepository {
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT
                payment_id, loan_id, payment_date, amount_paid,
                payment_method, status
            FROM payments
            WHERE loan_id = ?
            ORDER BY payment_date ASC, payment_id ASC
            "#,
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|row| row.try_into()).collect()
    }

    /// Record a payment and settle installments in one transaction
    ///
    /// # Errors
    /// * `AppError::Conflict` - an installment was paid (or removed) since it was read
    /// * `AppError::Database` - any driver failure; nothing is persisted
    async fn create_payment_and_update_schedules(
        &self,
        payment: &Payment,
        installments: &[Installment],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        // Serialize writers on this loan until commit
        sqlx::query("SELECT schedule_id FROM loan_schedule WHERE loan_id = ? FOR UPDATE")
            .bind(payment.loan_id)
            .fetch_all(&mut *tx)
            .await?;

        for installment in installments {
            let rows_affected = sqlx::query(
                r#"
                UPDATE loan_schedule
                SET payment_status = ?
                WHERE schedule_id = ? AND loan_id = ? AND payment_status <> ?
                "#,
            )
            .bind(installment.status.as_str())
            .bind(installment.id)
            .bind(payment.loan_id)
            .bind(InstallmentStatus::Paid.as_str())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            if rows_affected == 0 {
                // Dropping `tx` rolls back the updates applied so far
                return Err(AppError::conflict(format!(
                    "Installment {} of loan {} is no longer payable",
                    installment.id, payment.loan_id
                )));
            }
        }

        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                loan_id, payment_date, amount_paid, payment_method, status
            ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.loan_id)
        .bind(payment.paid_at.naive_utc())
        .bind(payment.amount_paid)
        .bind(&payment.payment_method)
        .bind(payment.status.as_str())
        .execute(&mut *tx)
        .await?;

        let payment_id = i64::try_from(result.last_insert_id())
            .map_err(|_| AppError::internal("payment_id out of range"))?;

        tx.commit().await?;

        Ok(payment_id)
    }
}

/// Database row representation for the payments table
#[derive(sqlx::FromRow)]
struct PaymentRow {
    payment_id: i64,
    loan_id: i64,
    payment_date: chrono::NaiveDateTime,
    amount_paid: Decimal,
    payment_method: String,
    status: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = AppError;

    fn try_from(row: PaymentRow) -> Result<Self> {
        let status = row.status.parse::<PaymentStatus>().map_err(AppError::Store)?;

        Ok(Payment {
            id: Some(row.payment_id),
            loan_id: row.loan_id,
            paid_at: row.payment_date.and_utc(),
            amount_paid: row.amount_paid,
            payment_method: row.payment_method,
            status,
        })
    }
}
