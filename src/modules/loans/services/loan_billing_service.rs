// Loan billing operations
//
// Implements:
// - Outstanding balance of a loan
// - Delinquency classification
// - Payment validation and allocation against the earliest unpaid installments
// - Payment history passthrough

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::core::{AppError, Clock, Result};
use crate::modules::loans::{
    models::Payment,
    repositories::{PaymentStore, ScheduleStore},
    services::BillingCalculator,
};

/// Service for loan billing business logic
///
/// Reads schedules through a `ScheduleStore`, writes payments through a
/// `PaymentStore` and stamps payments with the injected `Clock`. It holds no
/// locks of its own: concurrent payments on one loan are serialized by the
/// payment store's combined write.
pub struct LoanBillingService {
    schedules: Arc<dyn ScheduleStore>,
    payments: Arc<dyn PaymentStore>,
    clock: Arc<dyn Clock>,
}

impl LoanBillingService {
    /// Create a new loan billing service
    ///
    /// # Arguments
    /// * `schedules` - Installment schedule store
    /// * `payments` - Payment store providing the atomic payment write
    /// * `clock` - Time source for payment timestamps
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        payments: Arc<dyn PaymentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schedules,
            payments,
            clock,
        }
    }

    /// Outstanding balance of a loan
    ///
    /// # Returns
    /// * `Result<Decimal>` - Sum of unpaid installment totals, zero for an empty schedule
    pub async fn get_outstanding(&self, loan_id: i64) -> Result<Decimal> {
        let schedule = self.schedules.get_by_loan_id(loan_id).await?;
        let outstanding = BillingCalculator::outstanding(&schedule);

        debug!(loan_id, outstanding = %outstanding, "Computed outstanding balance");

        Ok(outstanding)
    }

    /// Whether a loan has reached the overdue limit
    pub async fn is_delinquent(&self, loan_id: i64) -> Result<bool> {
        let schedule = self.schedules.get_by_loan_id(loan_id).await?;
        let delinquent = BillingCalculator::is_delinquent(&schedule);

        debug!(loan_id, delinquent, "Classified loan delinquency");

        Ok(delinquent)
    }

    /// Apply a payment to a loan
    ///
    /// # Arguments
    /// * `loan_id` - Loan to pay against
    /// * `amount` - Amount paid; must cover a whole number of installments
    /// * `payment_method` - Free-form payment method label
    ///
    /// # Returns
    /// * `Result<Payment>` - The recorded payment with its store-assigned id
    ///
    /// # Business Rules
    /// - The schedule is read once and reused for validation and allocation
    /// - Validation happens before any write; a rejected payment changes nothing
    /// - The payment and every settled installment are written as one unit
    pub async fn make_payment(
        &self,
        loan_id: i64,
        amount: Decimal,
        payment_method: &str,
    ) -> Result<Payment> {
        if payment_method.trim().is_empty() {
            return Err(AppError::validation("payment method is required"));
        }

        let schedule = self.schedules.get_by_loan_id(loan_id).await?;

        if let Err(err) = BillingCalculator::validate_payment(&schedule, amount) {
            warn!(loan_id, amount = %amount, error = %err, "Payment rejected");
            return Err(err);
        }

        let payment = Payment::completed(loan_id, self.clock.now(), amount, payment_method);
        let settled = BillingCalculator::allocate(schedule, amount);

        let payment_id = self
            .payments
            .create_payment_and_update_schedules(&payment, &settled)
            .await?;

        info!(
            loan_id,
            payment_id,
            amount = %amount,
            installments_settled = settled.len(),
            "Payment recorded"
        );

        Ok(payment.with_id(payment_id))
    }

    /// Payments recorded for a loan, oldest first
    pub async fn payment_history(&self, loan_id: i64) -> Result<Vec<Payment>> {
        self.payments.get_by_loan_id(loan_id).await
    }
}
