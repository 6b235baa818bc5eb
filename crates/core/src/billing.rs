//! Fee Billing

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Settlement status of a fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    /// Nothing paid and not yet due.
    Pending,

    /// Partly paid and not yet due.
    PartiallyPaid,

    /// Paid in full.
    Paid,

    /// Not paid in full after the due date.
    Overdue,
}

impl FeeStatus {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

/// Amount billed against amount received for one fee, in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBalance {
    /// Billed amount.
    pub amount_due: u64,

    /// Sum of deposits applied to the fee.
    pub amount_paid: u64,
}

impl FeeBalance {
    /// Create a balance.
    #[must_use]
    pub const fn new(amount_due: u64, amount_paid: u64) -> Self {
        Self {
            amount_due,
            amount_paid,
        }
    }

    /// Amount still owed; overpayments count as settled.
    #[must_use]
    pub const fn outstanding(self) -> u64 {
        self.amount_due.saturating_sub(self.amount_paid)
    }

    /// Status as of `as_of`. A fee becomes overdue the day after `due_date`.
    #[must_use]
    pub fn status(self, due_date: Date, as_of: Date) -> FeeStatus {
        if self.outstanding() == 0 {
            return FeeStatus::Paid;
        }

        if as_of > due_date {
            return FeeStatus::Overdue;
        }

        if self.amount_paid > 0 {
            FeeStatus::PartiallyPaid
        } else {
            FeeStatus::Pending
        }
    }
}
