//! Shared type definitions.

pub mod id;

pub use id::{
    AccountId, BankStatementEntryId, BankStatementId, FinancialPeriodId, FinancialYearId,
    JournalEntryId, JournalLineId, MatchPairId, OutstandingItemId, PeriodClosingId,
    ReconciliationId, UserId,
};
