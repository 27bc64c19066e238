//! Bank reconciliation domain types.

use chrono::NaiveDate;
use mandir_shared::types::{BankStatementEntryId, JournalLineId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status of a reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconStatus {
    /// Matching is still underway; pairs may be added or removed.
    InProgress,
    /// The run is finalized; its matches and outstanding items are frozen.
    Completed,
}

/// How a match pair was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Produced by the automatic matcher.
    Auto,
    /// Asserted by an operator.
    Manual,
}

/// Which side an outstanding (unmatched) item sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutstandingSide {
    /// In the books but not on the statement (e.g. cheque not yet presented).
    Book,
    /// On the statement but not in the books (e.g. bank charges not recorded).
    Bank,
}

/// One line of an imported bank statement, as seen by the matcher.
///
/// `amount` is signed from the bank's perspective: positive for a deposit
/// (credit on the statement), negative for a withdrawal.
#[derive(Debug, Clone)]
pub struct StatementLine {
    /// The statement entry's id.
    pub id: BankStatementEntryId,
    /// Value date on the statement.
    pub date: NaiveDate,
    /// Signed amount, deposit-positive.
    pub amount: Decimal,
    /// Bank narration.
    pub description: String,
}

/// One journal line on the bank account, as seen by the matcher.
///
/// `amount` is signed to mirror the statement convention: a debit to the
/// bank account (money in) is positive, a credit (money out) negative.
#[derive(Debug, Clone)]
pub struct BookLine {
    /// The journal line's id.
    pub id: JournalLineId,
    /// Entry date of the owning journal entry.
    pub date: NaiveDate,
    /// Signed amount, debit-positive.
    pub amount: Decimal,
}

impl BookLine {
    /// Builds the signed amount from raw debit/credit columns.
    #[must_use]
    pub fn signed_amount(debit: Decimal, credit: Decimal) -> Decimal {
        debit - credit
    }
}

/// A proposed or confirmed statement-to-book pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    /// The matched statement entry.
    pub statement_entry_id: BankStatementEntryId,
    /// The matched journal line.
    pub journal_line_id: JournalLineId,
    /// How the pair was established.
    pub method: MatchMethod,
}

/// Result of one automatic matching pass.
#[derive(Debug, Clone, Default)]
pub struct AutoMatchOutcome {
    /// Pairs the matcher committed to.
    pub matched: Vec<MatchPair>,
    /// Statement entries left unmatched because two or more book
    /// candidates were equally good.
    pub ambiguous: Vec<BankStatementEntryId>,
    /// Statement entries with no candidate at all.
    pub unmatched: Vec<BankStatementEntryId>,
}

/// An unmatched item carried on the reconciliation summary.
#[derive(Debug, Clone)]
pub struct OutstandingItem {
    /// Which side the item is outstanding on.
    pub side: OutstandingSide,
    /// Date of the underlying line.
    pub date: NaiveDate,
    /// Signed amount, deposit/debit-positive per the side's convention.
    pub amount: Decimal,
    /// Description carried from the underlying line.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_book_line_signing() {
        assert_eq!(BookLine::signed_amount(dec!(500), dec!(0)), dec!(500));
        assert_eq!(BookLine::signed_amount(dec!(0), dec!(750)), dec!(-750));
    }
}
