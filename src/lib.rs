//! Billing Engine Library
//!
//! Tracks installment loans: outstanding balances, delinquency and payment
//! allocation over a loan's installment schedule.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::loans;
