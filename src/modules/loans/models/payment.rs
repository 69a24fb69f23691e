use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status
///
/// Payments are recorded only once they have been applied, so there is no
/// pending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// A payment event against a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Assigned by the store on insert
    pub id: Option<i64>,
    pub loan_id: i64,
    pub paid_at: DateTime<Utc>,
    /// Full amount requested by the payer
    pub amount_paid: Decimal,
    /// Free-form, e.g. "bank_transfer"
    pub payment_method: String,
    pub status: PaymentStatus,
}

impl Payment {
    /// Create a completed, not-yet-persisted payment
    pub fn completed(
        loan_id: i64,
        paid_at: DateTime<Utc>,
        amount_paid: Decimal,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            loan_id,
            paid_at,
            amount_paid,
            payment_method: payment_method.into(),
            status: PaymentStatus::Completed,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
