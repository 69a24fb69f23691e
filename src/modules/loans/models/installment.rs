use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One scheduled due date of a loan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    /// Store-assigned identifier (0 until persisted)
    pub id: i64,
    pub loan_id: i64,
    pub due_date: NaiveDate,
    pub principal_amount: Decimal,
    pub interest_amount: Decimal,
    /// Principal plus interest, taken as given from the schedule
    pub total_due: Decimal,
    pub status: InstallmentStatus,
}

/// Installment payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    /// Scheduled but not yet due
    Unspecified,
    /// Currently due
    Due,
    /// Payment received
    Paid,
    /// Due date passed without payment
    Overdue,
}

impl InstallmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Due => "due",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstallmentStatus {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "unspecified" => Ok(Self::Unspecified),
            "due" => Ok(Self::Due),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            _ => Err(format!("Invalid installment status: {}", value)),
        }
    }
}

impl Installment {
    /// Build a not-yet-persisted installment
    pub fn new(
        loan_id: i64,
        due_date: NaiveDate,
        principal_amount: Decimal,
        interest_amount: Decimal,
        total_due: Decimal,
        status: InstallmentStatus,
    ) -> Self {
        Self {
            id: 0,
            loan_id,
            due_date,
            principal_amount,
            interest_amount,
            total_due,
            status,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    pub fn is_overdue(&self) -> bool {
        self.status == InstallmentStatus::Overdue
    }

    /// Transition to paid. Returns false if the installment was already paid.
    pub fn mark_as_paid(&mut self) -> bool {
        if self.is_paid() {
            return false;
        }
        self.status = InstallmentStatus::Paid;
        true
    }
}
