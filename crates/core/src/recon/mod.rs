//! Bank reconciliation.
//!
//! A reconciliation run takes one imported bank statement and the journal
//! lines on the corresponding bank account, pairs them conservatively, and
//! reports the unmatched remainder as outstanding items on a summary.

pub mod error;
pub mod matching;
pub mod summary;
pub mod types;

pub use error::ReconError;
pub use matching::MatchEngine;
pub use summary::ReconciliationSummary;
pub use types::{
    AutoMatchOutcome, BookLine, MatchMethod, MatchPair, OutstandingItem, OutstandingSide,
    ReconStatus, StatementLine,
};
