// End-to-end billing flows against the in-memory store

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use billing_engine::core::{AppError, ErrorCategory, FixedClock, Result};
use billing_engine::loans::{
    InMemoryLoanStore, InstallmentStatus, LoanBillingService, PaymentStatus, ScheduleStore,
};
use helpers::*;
use rust_decimal_macros::dec;

use InstallmentStatus::{Due, Overdue, Paid, Unspecified};

async fn setup(statuses: &[InstallmentStatus]) -> (Arc<InMemoryLoanStore>, LoanBillingService) {
    let store = Arc::new(
        InMemoryLoanStore::with_installments(uniform_schedule(1, statuses))
            .await
            .expect("Failed to seed store"),
    );
    let service = LoanBillingService::new(
        store.clone(),
        store.clone(),
        Arc::new(FixedClock::new(payment_time())),
    );
    (store, service)
}

async fn statuses_of(store: &InMemoryLoanStore, loan_id: i64) -> Vec<InstallmentStatus> {
    ScheduleStore::get_by_loan_id(store, loan_id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.status)
        .collect()
}

#[tokio::test]
async fn test_payment_settles_two_earliest_unpaid_installments() -> Result<()> {
    let (store, service) = setup(&[Paid, Paid, Due, Unspecified, Unspecified]).await;
    assert_eq!(service.get_outstanding(1).await?, dec!(330000));

    let payment = service.make_payment(1, dec!(220000), "bank_transfer").await?;

    assert_eq!(payment.id, Some(1));
    assert_eq!(payment.amount_paid, dec!(220000));
    assert_eq!(payment.paid_at, payment_time());
    assert_eq!(payment.status, PaymentStatus::Completed);

    assert_eq!(
        statuses_of(&store, 1).await,
        vec![Paid, Paid, Paid, Paid, Unspecified]
    );
    assert_eq!(service.get_outstanding(1).await?, dec!(110000));

    let history = service.payment_history(1).await?;
    assert_eq!(history, vec![payment]);
    Ok(())
}

#[tokio::test]
async fn test_overdue_installments_are_paid_first_and_clear_delinquency() -> Result<()> {
    let (store, service) = setup(&[Overdue, Overdue, Due, Unspecified]).await;
    assert!(service.is_delinquent(1).await?);

    service.make_payment(1, dec!(110000), "bank_transfer").await?;
    assert!(!service.is_delinquent(1).await?);
    assert_eq!(statuses_of(&store, 1).await, vec![Paid, Overdue, Due, Unspecified]);
    Ok(())
}

#[tokio::test]
async fn test_payment_over_outstanding_changes_nothing() {
    let (store, service) = setup(&[Paid, Paid, Due, Unspecified]).await;

    let err = service
        .make_payment(1, dec!(230000), "bank_transfer")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.category(), ErrorCategory::UserCorrectable);
    assert_eq!(statuses_of(&store, 1).await, vec![Paid, Paid, Due, Unspecified]);
    assert!(service.payment_history(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fractional_overpayment_settles_nothing() {
    let (store, service) = setup(&[Due, Due, Due]).await;

    let err = service
        .make_payment(1, dec!(220000.99), "bank_transfer")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(statuses_of(&store, 1).await, vec![Due, Due, Due]);
    assert_eq!(service.get_outstanding(1).await.unwrap(), dec!(330000));
    assert!(service.payment_history(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sub_cent_amount_is_rejected() {
    let (store, service) = setup(&[Due, Due]).await;

    let err = service
        .make_payment(1, dec!(110000.005), "bank_transfer")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(statuses_of(&store, 1).await, vec![Due, Due]);
}

#[tokio::test]
async fn test_full_payoff_leaves_nothing_outstanding() -> Result<()> {
    let (_store, service) = setup(&[Due, Unspecified, Unspecified]).await;

    service.make_payment(1, dec!(330000), "bank_transfer").await?;
    assert_eq!(service.get_outstanding(1).await?, dec!(0));

    let err = service
        .make_payment(1, dec!(110000), "bank_transfer")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    Ok(())
}

#[tokio::test]
async fn test_unknown_loan_has_nothing_outstanding() -> Result<()> {
    let (_store, service) = setup(&[Due]).await;

    assert_eq!(service.get_outstanding(99).await?, dec!(0));
    assert!(!service.is_delinquent(99).await?);
    assert!(service.make_payment(99, dec!(110000), "bank_transfer").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_payments_never_double_allocate() {
    let (store, service) = setup(&[Due, Unspecified, Unspecified]).await;
    let service = Arc::new(service);

    let first = {
        let service = service.clone();
        tokio::spawn(async move { service.make_payment(1, dec!(220000), "bank_transfer").await })
    };
    let second = {
        let service = service.clone();
        tokio::spawn(async move { service.make_payment(1, dec!(220000), "bank_transfer").await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let succeeded = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(succeeded, 1);
    assert_eq!(statuses_of(&store, 1).await, vec![Paid, Paid, Unspecified]);
    assert_eq!(service.payment_history(1).await.unwrap().len(), 1);
}
