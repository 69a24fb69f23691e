use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{PaymentStore, ScheduleStore};
use crate::core::{AppError, Result};
use crate::modules::loans::models::{Installment, Payment};

/// Schedule and payment store held in process memory
///
/// Implements both store traits behind one lock, so the combined payment
/// write is atomic with respect to every other call on the same store.
#[derive(Debug, Default)]
pub struct InMemoryLoanStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    installments: Vec<Installment>,
    payments: Vec<Payment>,
    last_installment_id: i64,
    last_payment_id: i64,
}

impl InMemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with installments, assigning ids in input order
    pub async fn with_installments(installments: Vec<Installment>) -> Result<Self> {
        let store = Self::new();
        for installment in &installments {
            ScheduleStore::create(&store, installment).await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl ScheduleStore for InMemoryLoanStore {
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Installment>> {
        let state = self.state.lock().await;
        let mut installments: Vec<Installment> = state
            .installments
            .iter()
            .filter(|i| i.loan_id == loan_id)
            .cloned()
            .collect();
        installments.sort_by_key(|i| (i.due_date, i.id));
        Ok(installments)
    }

    async fn create(&self, installment: &Installment) -> Result<i64> {
        let mut state = self.state.lock().await;
        state.last_installment_id += 1;
        let id = state.last_installment_id;
        state.installments.push(Installment {
            id,
            ..installment.clone()
        });
        Ok(id)
    }

    async fn update(&self, installment: &Installment) -> Result<()> {
        let mut state = self.state.lock().await;
        let existing = state
            .installments
            .iter_mut()
            .find(|i| i.id == installment.id && i.loan_id == installment.loan_id)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Installment {} of loan {}",
                    installment.id, installment.loan_id
                ))
            })?;
        *existing = installment.clone();
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for InMemoryLoanStore {
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Payment>> {
        let state = self.state.lock().await;
        let mut payments: Vec<Payment> = state
            .payments
            .iter()
            .filter(|p| p.loan_id == loan_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| (p.paid_at, p.id));
        Ok(payments)
    }

    async fn create_payment_and_update_schedules(
        &self,
        payment: &Payment,
        installments: &[Installment],
    ) -> Result<i64> {
        let mut state = self.state.lock().await;

        // Check every row before touching any of them
        let mut positions = Vec::with_capacity(installments.len());
        for installment in installments {
            let position = state
                .installments
                .iter()
                .position(|i| {
                    i.id == installment.id && i.loan_id == payment.loan_id && !i.is_paid()
                })
                .ok_or_else(|| {
                    AppError::conflict(format!(
                        "Installment {} of loan {} is no longer payable",
                        installment.id, payment.loan_id
                    ))
                })?;
            positions.push(position);
        }

        for (position, installment) in positions.into_iter().zip(installments) {
            state.installments[position].status = installment.status;
        }

        state.last_payment_id += 1;
        let id = state.last_payment_id;
        state.payments.push(payment.clone().with_id(id));
        Ok(id)
    }
}
