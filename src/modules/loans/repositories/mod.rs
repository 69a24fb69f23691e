pub mod memory;
pub mod payment_repository;
pub mod schedule_repository;

use async_trait::async_trait;

use crate::core::Result;
use crate::modules::loans::models::{Installment, Payment};

pub use memory::InMemoryLoanStore;
pub use payment_repository::PaymentRepository;
pub use schedule_repository::ScheduleRepository;

/// Read and write access to loan installment schedules
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// All installments of a loan, due date ascending. Empty if the loan has none.
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Installment>>;

    /// Insert an installment and return its assigned id
    async fn create(&self, installment: &Installment) -> Result<i64>;

    /// Overwrite an existing installment
    async fn update(&self, installment: &Installment) -> Result<()>;
}

/// Persistence for payments
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Payment history of a loan, oldest first
    async fn get_by_loan_id(&self, loan_id: i64) -> Result<Vec<Payment>>;

    /// Record a payment and the installments it settles as one atomic unit.
    ///
    /// Implementations must reject the write with `AppError::Conflict` if any
    /// of `installments` was already paid in the store, so two payments racing
    /// on the same loan cannot both settle the same installment.
    async fn create_payment_and_update_schedules(
        &self,
        payment: &Payment,
        installments: &[Installment],
    ) -> Result<i64>;
}
