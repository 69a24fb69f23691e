pub mod installment;
pub mod payment;

pub use installment::{Installment, InstallmentStatus};
pub use payment::{Payment, PaymentStatus};
