//! Financial reports.
//!
//! Trial balance, balance sheet, income & expenditure account, and the
//! day/cash/bank books. All computed on read from journal lines.

pub mod error;
pub mod service;
pub mod types;

pub use error::ReportError;
pub use service::ReportService;
pub use types::{
    AccountBalance, AccountBookReport, BalanceSheetReport, BalanceSheetSection, BookLineRow,
    DayBookEntry, DayBookReport, IncomeExpenditureReport, IncomeExpenditureSection,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};
