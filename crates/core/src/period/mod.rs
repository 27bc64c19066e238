//! Financial year and period lifecycle.
//!
//! Years run April to March and contain twelve monthly periods. Periods
//! close strictly in sequence; closing computes the period's surplus and
//! transfers it to the reserve fund through a normal journal entry.

pub mod closing;
pub mod error;
pub mod types;

pub use closing::{ClosingComputation, ClosingEntryPlan, ClosingService};
pub use error::PeriodError;
pub use types::{
    AccountMovement, FinancialPeriod, PeriodStatus, YearStatus,
};
