//! Period lifecycle error types.

use chrono::NaiveDate;
use mandir_shared::types::{FinancialPeriodId, FinancialYearId};
use thiserror::Error;

use super::types::PeriodStatus;
use crate::ledger::LedgerError;

/// Errors that can occur during financial year and period operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    // ========== Lookup Errors ==========
    /// Financial year not found.
    #[error("Financial year not found: {0}")]
    YearNotFound(FinancialYearId),

    /// Financial period not found.
    #[error("Financial period not found: {0}")]
    PeriodNotFound(FinancialPeriodId),

    // ========== Close Ordering Errors ==========
    /// Period is already closed.
    #[error("Financial period {0} is already closed")]
    AlreadyClosed(FinancialPeriodId),

    /// An earlier period in the year is still open.
    #[error("Cannot close period {period}: prior period {prior} is not closed")]
    PriorPeriodOpen {
        /// The period being closed.
        period: FinancialPeriodId,
        /// The earlier period still open.
        prior: FinancialPeriodId,
    },

    /// Reopening is blocked because a later period is already closed.
    #[error("Cannot reopen period {period}: later period {next} is already closed")]
    NextPeriodClosed {
        /// The period being reopened.
        period: FinancialPeriodId,
        /// The later period already closed.
        next: FinancialPeriodId,
    },

    /// The closing date must not precede the period's end date.
    #[error("Closing date {closing_date} is before period end {period_end}")]
    ClosingDateBeforePeriodEnd {
        /// Requested closing date.
        closing_date: NaiveDate,
        /// End date of the period being closed.
        period_end: NaiveDate,
    },

    /// The year cannot be closed while any period remains open.
    #[error("Cannot close year {0}: it still has open periods")]
    YearHasOpenPeriods(FinancialYearId),

    /// The year is sealed; its periods cannot be reopened.
    #[error("Financial year {0} is closed")]
    YearClosed(FinancialYearId),

    /// The requested status transition is not allowed.
    #[error("Invalid period status transition from {from:?} to {to:?}")]
    InvalidStatusTransition {
        /// Current status.
        from: PeriodStatus,
        /// Requested status.
        to: PeriodStatus,
    },

    // ========== Setup Errors ==========
    /// Start date must be before end date.
    #[error("Invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The new year's dates overlap an existing year.
    #[error("Date range overlaps existing financial year {0}")]
    OverlappingYear(FinancialYearId),

    // ========== Wrapped ==========
    /// A ledger error raised while building or posting the closing entry.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::YearNotFound(_) => "YEAR_NOT_FOUND",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::AlreadyClosed(_) => "PERIOD_ALREADY_CLOSED",
            Self::PriorPeriodOpen { .. } => "PRIOR_PERIOD_OPEN",
            Self::NextPeriodClosed { .. } => "NEXT_PERIOD_CLOSED",
            Self::ClosingDateBeforePeriodEnd { .. } => "CLOSING_DATE_BEFORE_PERIOD_END",
            Self::YearHasOpenPeriods(_) => "YEAR_HAS_OPEN_PERIODS",
            Self::YearClosed(_) => "YEAR_CLOSED",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::OverlappingYear(_) => "OVERLAPPING_YEAR",
            Self::Ledger(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let id = FinancialPeriodId::new();
        assert_eq!(
            PeriodError::AlreadyClosed(id).error_code(),
            "PERIOD_ALREADY_CLOSED"
        );
        assert_eq!(
            PeriodError::InvalidStatusTransition {
                from: PeriodStatus::Closed,
                to: PeriodStatus::Closing,
            }
            .error_code(),
            "INVALID_STATUS_TRANSITION"
        );
    }

    #[test]
    fn test_ledger_error_passthrough() {
        let err = PeriodError::from(LedgerError::InsufficientLines);
        assert_eq!(err.error_code(), "INSUFFICIENT_LINES");
    }
}
