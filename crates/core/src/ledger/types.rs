//! Ledger domain types for journal entry creation and validation.

use chrono::NaiveDate;
use mandir_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account classification in the chart of accounts.
///
/// Determines the normal balance side:
/// - Asset/Expense accounts are debit-normal
/// - Liability/Equity/Income accounts are credit-normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account (cash, bank, inventory, fixed assets).
    Asset,
    /// Liability account (payables, deposits held).
    Liability,
    /// Equity / fund account (corpus, general reserve).
    Equity,
    /// Income account (donations, seva receipts, interest).
    Income,
    /// Expense account (salaries, maintenance, utilities).
    Expense,
}

impl AccountType {
    /// Returns true if the account's normal balance is a debit.
    #[must_use]
    pub const fn is_debit_normal(self) -> bool {
        matches!(self, Self::Asset | Self::Expense)
    }

    /// Calculates the signed balance change of a line for this account type.
    ///
    /// Debit-normal: balance += debit - credit.
    /// Credit-normal: balance += credit - debit.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

/// Voucher classification of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherType {
    /// Money received (donation, seva booking, interest credit).
    Receipt,
    /// Money paid out (vendor, payroll, refunds).
    Payment,
    /// Non-cash adjustment (depreciation, accruals, closing transfers).
    Journal,
    /// Transfer between cash/bank accounts.
    Contra,
}

/// Side of a journal line: either Debit or Credit.
///
/// Exactly one side carries a nonzero amount per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl LineSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Traceability reference to the producing module's record.
///
/// The ledger treats this as opaque; it exists only so reports can join back
/// to the business record that caused the entry (e.g. `donation:1234`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReference {
    /// Producing module name (e.g. "donation", "seva", "payroll").
    pub module: String,
    /// Record id within the producing module.
    pub record_id: String,
}

impl SourceReference {
    /// Creates a new source reference.
    #[must_use]
    pub fn new(module: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            record_id: record_id.into(),
        }
    }

    /// Parses a `module:record_id` string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (module, record_id) = s.split_once(':')?;
        if module.is_empty() || record_id.is_empty() {
            return None;
        }
        Some(Self::new(module, record_id))
    }
}

impl std::fmt::Display for SourceReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module, self.record_id)
    }
}

/// Input for a single journal line.
///
/// The posting account is an explicit, required input resolved by the caller;
/// the ledger never falls back to a default account.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit line.
    pub side: LineSide,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional memo/description for this line.
    pub memo: Option<String>,
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct PostEntryInput {
    /// The date of the financial event.
    pub entry_date: NaiveDate,
    /// Voucher classification.
    pub voucher_type: VoucherType,
    /// Free-text narration.
    pub narration: String,
    /// Traceability reference to the producing module's record.
    pub source: Option<SourceReference>,
    /// The journal lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
    /// The actor posting the entry.
    pub posted_by: UserId,
}

/// A validated line with debit/credit amounts resolved.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    /// The account to post to.
    pub account_id: AccountId,
    /// The debit amount (0 if credit line).
    pub debit: Decimal,
    /// The credit amount (0 if debit line).
    pub credit: Decimal,
    /// Optional memo/description.
    pub memo: Option<String>,
}

impl ResolvedLine {
    /// Returns the side this line posts to.
    #[must_use]
    pub fn side(&self) -> LineSide {
        if self.debit > Decimal::ZERO {
            LineSide::Debit
        } else {
            LineSide::Credit
        }
    }
}

/// Entry totals for validation and display.
#[derive(Debug, Clone)]
pub struct EntryTotals {
    /// Total debit amount.
    pub total_debit: Decimal,
    /// Total credit amount.
    pub total_credit: Decimal,
    /// Whether the entry is balanced (debits == credits).
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates new entry totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// Information about an account needed for posting validation.
#[derive(Debug, Clone)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// The account type.
    pub account_type: AccountType,
    /// Whether the account is active.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_type_normal_side() {
        assert!(AccountType::Asset.is_debit_normal());
        assert!(AccountType::Expense.is_debit_normal());
        assert!(!AccountType::Liability.is_debit_normal());
        assert!(!AccountType::Equity.is_debit_normal());
        assert!(!AccountType::Income.is_debit_normal());
    }

    #[test]
    fn test_balance_change_debit_normal() {
        assert_eq!(AccountType::Asset.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(AccountType::Asset.balance_change(dec!(0), dec!(40)), dec!(-40));
        assert_eq!(AccountType::Expense.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_balance_change_credit_normal() {
        assert_eq!(AccountType::Income.balance_change(dec!(0), dec!(1000)), dec!(1000));
        assert_eq!(AccountType::Income.balance_change(dec!(100), dec!(0)), dec!(-100));
        assert_eq!(AccountType::Equity.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_line_side_opposite() {
        assert_eq!(LineSide::Debit.opposite(), LineSide::Credit);
        assert_eq!(LineSide::Credit.opposite(), LineSide::Debit);
    }

    #[test]
    fn test_source_reference_roundtrip() {
        let src = SourceReference::new("donation", "1234");
        assert_eq!(src.to_string(), "donation:1234");
        assert_eq!(SourceReference::parse("donation:1234"), Some(src));
    }

    #[test]
    fn test_source_reference_rejects_malformed() {
        assert_eq!(SourceReference::parse("donation"), None);
        assert_eq!(SourceReference::parse(":1234"), None);
        assert_eq!(SourceReference::parse("donation:"), None);
    }

    #[test]
    fn test_entry_totals_balanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_entry_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }

    #[test]
    fn test_resolved_line_side() {
        let debit_line = ResolvedLine {
            account_id: AccountId::new(),
            debit: dec!(100),
            credit: dec!(0),
            memo: None,
        };
        assert_eq!(debit_line.side(), LineSide::Debit);

        let credit_line = ResolvedLine {
            account_id: AccountId::new(),
            debit: dec!(0),
            credit: dec!(100),
            memo: None,
        };
        assert_eq!(credit_line.side(), LineSide::Credit);
    }
}
