pub mod billing_calculator;
pub mod loan_billing_service;

pub use billing_calculator::{BillingCalculator, AMOUNT_SCALE, OVERDUE_LIMIT};
pub use loan_billing_service::LoanBillingService;
