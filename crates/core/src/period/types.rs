//! Financial year and period types.

use chrono::NaiveDate;
use mandir_shared::types::{FinancialPeriodId, FinancialYearId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status of a financial year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearStatus {
    /// Year has at least one period that is not closed.
    Open,
    /// All twelve periods are closed and the year is sealed.
    Closed,
}

/// Status of a financial period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodStatus {
    /// Period is open for posting.
    Open,
    /// A close is in flight; posting is already locked.
    Closing,
    /// Period is closed, no new postings allowed.
    Closed,
}

impl PeriodStatus {
    /// Returns true if entries dated in the period may still be posted.
    #[must_use]
    pub const fn allows_posting(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// A monthly financial period within a financial year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialPeriod {
    /// Unique identifier.
    pub id: FinancialPeriodId,
    /// Financial year this period belongs to.
    pub financial_year_id: FinancialYearId,
    /// Period number within the year (1-12, April = 1).
    pub period_number: i32,
    /// Period name (e.g., "April 2025").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period.
    pub end_date: NaiveDate,
    /// Current status.
    pub status: PeriodStatus,
}

impl FinancialPeriod {
    /// Returns true if entries can still be posted to this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.allows_posting()
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Net movement of one account within a period, as input to the close.
#[derive(Debug, Clone)]
pub struct AccountMovement {
    /// The account.
    pub account_id: mandir_shared::types::AccountId,
    /// Sum of debits posted to the account in the period.
    pub debit_total: Decimal,
    /// Sum of credits posted to the account in the period.
    pub credit_total: Decimal,
}

impl AccountMovement {
    /// Net movement, debit-positive.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.debit_total - self.credit_total
    }

    /// Net movement, credit-positive.
    #[must_use]
    pub fn net_credit(&self) -> Decimal {
        self.credit_total - self.debit_total
    }
}
