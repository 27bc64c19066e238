//! Double-entry journal logic.
//!
//! A journal entry is the one atomic financial event in the system. Every
//! producing module (donations, sevas, payroll, depreciation) funnels through
//! the same validation path: lines must balance exactly, accounts must be
//! active, and the entry date must fall in an open financial period.

pub mod error;
pub mod reversal;
pub mod types;
pub mod validation;

pub use error::LedgerError;
pub use reversal::{PostedEntry, ReversalEntry, ReversalInput, ReversalService};
pub use types::{
    AccountInfo, AccountType, EntryTotals, JournalLineInput, LineSide, PostEntryInput,
    ResolvedLine, SourceReference, VoucherType,
};
pub use validation::LedgerService;
