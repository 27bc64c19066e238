//! Report error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The ledger itself is out of balance. This can only happen through
    /// data corruption and is never presented as a normal report.
    #[error("Trial balance out of balance. Debit: {debit}, Credit: {credit}")]
    TrialBalanceOutOfBalance {
        /// Debit column total.
        debit: Decimal,
        /// Credit column total.
        credit: Decimal,
    },

    /// Start date is after end date.
    #[error("Invalid report range: {from} is after {to}")]
    InvalidRange {
        /// Range start.
        from: chrono::NaiveDate,
        /// Range end.
        to: chrono::NaiveDate,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TrialBalanceOutOfBalance { .. } => "TRIAL_BALANCE_OUT_OF_BALANCE",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if the error indicates ledger corruption.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::TrialBalanceOutOfBalance { .. })
    }
}
