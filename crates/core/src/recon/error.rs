//! Reconciliation error types.

use mandir_shared::types::{
    BankStatementEntryId, BankStatementId, JournalLineId, MatchPairId, ReconciliationId,
};
use thiserror::Error;

/// Errors that can occur during bank reconciliation.
#[derive(Debug, Error)]
pub enum ReconError {
    // ========== Lookup Errors ==========
    /// Reconciliation run not found.
    #[error("Reconciliation not found: {0}")]
    ReconciliationNotFound(ReconciliationId),

    /// Bank statement not found.
    #[error("Bank statement not found: {0}")]
    StatementNotFound(BankStatementId),

    /// Statement entry not found.
    #[error("Bank statement entry not found: {0}")]
    StatementEntryNotFound(BankStatementEntryId),

    /// Journal line not found or not on the reconciled bank account.
    #[error("Journal line not found on the bank account: {0}")]
    JournalLineNotFound(JournalLineId),

    // ========== State Errors ==========
    /// The run is completed; its matches are frozen.
    #[error("Reconciliation {0} is completed and can no longer be modified")]
    ReconciliationCompleted(ReconciliationId),

    /// The statement entry already has a match in this run.
    #[error("Statement entry {0} is already matched")]
    StatementEntryAlreadyMatched(BankStatementEntryId),

    /// The journal line already has a match in this run.
    #[error("Journal line {0} is already matched")]
    JournalLineAlreadyMatched(JournalLineId),

    /// The requested match pair does not exist in this run.
    #[error("Match {0} not found in this reconciliation")]
    MatchNotFound(MatchPairId),

    /// The bank account already has a reconciliation underway.
    #[error("Reconciliation {0} is still in progress for this bank account")]
    ReconciliationInProgress(ReconciliationId),

    // ========== Validation Errors ==========
    /// A manual match requires identical signed amounts.
    #[error("Amounts differ: statement {statement}, book {book}")]
    AmountMismatch {
        /// Signed statement amount.
        statement: rust_decimal::Decimal,
        /// Signed book amount.
        book: rust_decimal::Decimal,
    },

    /// The imported statement has no lines.
    #[error("Bank statement has no entries")]
    EmptyStatement,

    /// The statement's closing balance does not follow from its opening
    /// balance and line amounts.
    #[error("Statement balances do not reconcile: opening {opening} + movement {movement} != closing {closing}")]
    StatementBalanceMismatch {
        /// Declared opening balance.
        opening: rust_decimal::Decimal,
        /// Sum of signed line amounts.
        movement: rust_decimal::Decimal,
        /// Declared closing balance.
        closing: rust_decimal::Decimal,
    },

    // ========== Infrastructure ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReconError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ReconciliationNotFound(_) => "RECONCILIATION_NOT_FOUND",
            Self::StatementNotFound(_) => "STATEMENT_NOT_FOUND",
            Self::StatementEntryNotFound(_) => "STATEMENT_ENTRY_NOT_FOUND",
            Self::JournalLineNotFound(_) => "JOURNAL_LINE_NOT_FOUND",
            Self::ReconciliationCompleted(_) => "RECONCILIATION_COMPLETED",
            Self::StatementEntryAlreadyMatched(_) => "STATEMENT_ENTRY_ALREADY_MATCHED",
            Self::JournalLineAlreadyMatched(_) => "JOURNAL_LINE_ALREADY_MATCHED",
            Self::MatchNotFound(_) => "MATCH_NOT_FOUND",
            Self::ReconciliationInProgress(_) => "RECONCILIATION_IN_PROGRESS",
            Self::AmountMismatch { .. } => "AMOUNT_MISMATCH",
            Self::EmptyStatement => "EMPTY_STATEMENT",
            Self::StatementBalanceMismatch { .. } => "STATEMENT_BALANCE_MISMATCH",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ReconError::ReconciliationCompleted(ReconciliationId::new()).error_code(),
            "RECONCILIATION_COMPLETED"
        );
        assert_eq!(ReconError::EmptyStatement.error_code(), "EMPTY_STATEMENT");
    }
}
