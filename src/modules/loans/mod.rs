pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Installment, InstallmentStatus, Payment, PaymentStatus};
pub use repositories::{
    InMemoryLoanStore, PaymentRepository, PaymentStore, ScheduleRepository, ScheduleStore,
};
pub use services::{BillingCalculator, LoanBillingService, AMOUNT_SCALE, OVERDUE_LIMIT};
