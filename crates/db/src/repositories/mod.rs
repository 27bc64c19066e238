//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod journal;
pub mod period;
pub mod reconciliation;
pub mod report;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use journal::{EntryFilter, EntryWithLines, JournalError, JournalRepository};
pub use period::{
    CloseOutcome, CreateFinancialYearInput, FiscalError, PeriodRepository, YearWithPeriods,
};
pub use reconciliation::{
    AutoMatchResult, ImportLineInput, ImportStatementInput, ReconciliationError,
    ReconciliationRepository, StatementWithEntries,
};
pub use report::{ReportQueryError, ReportRepository};
