//! Ledger error types for validation and state errors.

use chrono::NaiveDate;
use mandir_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    // ========== Account Errors ==========
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    /// Account type cannot be changed because it has journal lines.
    #[error("Cannot change account type for account {0} because it has journal lines")]
    AccountTypeChangeNotAllowed(AccountId),

    // ========== Period Errors ==========
    /// No financial period exists for the entry date.
    #[error("No financial period exists for date {0}")]
    NoPeriod(NaiveDate),

    /// The period owning the entry date is locked.
    #[error("Financial period containing {0} is locked, no posting allowed")]
    PeriodLocked(NaiveDate),

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// A reversal already exists for this entry.
    #[error("Journal entry {0} has already been reversed")]
    AlreadyReversed(JournalEntryId),

    /// A reversal entry cannot itself be reversed.
    #[error("Journal entry {0} is a reversal and cannot be reversed")]
    CannotReverseReversal(JournalEntryId),

    // ========== Infrastructure ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::AccountTypeChangeNotAllowed(_) => "ACCOUNT_TYPE_CHANGE_NOT_ALLOWED",
            Self::NoPeriod(_) => "NO_PERIOD",
            Self::PeriodLocked(_) => "PERIOD_LOCKED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::CannotReverseReversal(_) => "CANNOT_REVERSE_REVERSAL",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error is caller-correctable input validation.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientLines
                | Self::UnbalancedEntry { .. }
                | Self::ZeroAmount
                | Self::NegativeAmount
                | Self::AccountNotFound(_)
                | Self::AccountInactive(_)
        )
    }

    /// Returns true if the error is a workflow-ordering state violation.
    ///
    /// State errors are never retried automatically.
    #[must_use]
    pub const fn is_state(&self) -> bool {
        matches!(
            self,
            Self::NoPeriod(_)
                | Self::PeriodLocked(_)
                | Self::AlreadyReversed(_)
                | Self::CannotReverseReversal(_)
                | Self::AccountTypeChangeNotAllowed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::UnbalancedEntry {
                debit: dec!(100),
                credit: dec!(50),
            }
            .error_code(),
            "UNBALANCED_ENTRY"
        );
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            LedgerError::PeriodLocked(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()).error_code(),
            "PERIOD_LOCKED"
        );
    }

    #[test]
    fn test_error_taxonomy() {
        let unbalanced = LedgerError::UnbalancedEntry {
            debit: dec!(1),
            credit: dec!(2),
        };
        assert!(unbalanced.is_validation());
        assert!(!unbalanced.is_state());

        let locked = LedgerError::PeriodLocked(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert!(locked.is_state());
        assert!(!locked.is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::UnbalancedEntry {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }
}
