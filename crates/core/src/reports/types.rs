//! Report data types.
//!
//! Reports are computed on read from journal lines; nothing here is a
//! stored balance.

use chrono::NaiveDate;
use mandir_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{AccountType, VoucherType};

/// Account balance input for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Total debits posted to the account in scope.
    pub total_debit: Decimal,
    /// Total credits posted to the account in scope.
    pub total_credit: Decimal,
}

impl AccountBalance {
    /// Net balance on the account's normal side.
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.account_type
            .balance_change(self.total_debit, self.total_credit)
    }

    /// Net movement, debit-positive, regardless of account type.
    #[must_use]
    pub fn net_debit(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// One row of the trial balance: the net balance placed in its column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Net balance if it falls on the debit side, else zero.
    pub debit_balance: Decimal,
    /// Net balance if it falls on the credit side, else zero.
    pub credit_balance: Decimal,
}

/// Trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Account rows, zero-balance accounts omitted.
    pub rows: Vec<TrialBalanceRow>,
    /// Column totals. Always equal; an out-of-balance ledger is an
    /// integrity error, not a report.
    pub totals: TrialBalanceTotals,
}

/// Balance sheet section (assets, liabilities, funds).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section with their balances.
    pub accounts: Vec<AccountBalance>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Funds section (corpus, reserves).
    pub funds: BalanceSheetSection,
    /// Income less expense not yet transferred to reserve.
    pub surplus_to_date: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Liabilities plus funds plus surplus to date.
    pub liabilities_and_funds: Decimal,
    /// total_assets - liabilities_and_funds.
    pub difference: Decimal,
    /// Whether the difference is within the rounding tolerance.
    pub is_balanced: bool,
}

/// Income & expenditure section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeExpenditureSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section with their movements.
    pub accounts: Vec<AccountBalance>,
}

/// Income & expenditure account for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeExpenditureReport {
    /// Range start date.
    pub from: NaiveDate,
    /// Range end date.
    pub to: NaiveDate,
    /// Income section.
    pub income: IncomeExpenditureSection,
    /// Expenditure section.
    pub expenditure: IncomeExpenditureSection,
    /// income - expenditure. Negative means a deficit.
    pub surplus: Decimal,
}

/// One journal line as it appears in a book report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookLineRow {
    /// Owning journal entry.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Voucher classification of the owning entry.
    pub voucher_type: VoucherType,
    /// Entry narration.
    pub narration: String,
    /// Debit amount on the book account.
    pub debit: Decimal,
    /// Credit amount on the book account.
    pub credit: Decimal,
    /// Balance on the account after this line.
    pub running_balance: Decimal,
}

/// Cash book or bank book for one account over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBookReport {
    /// The cash or bank account.
    pub account_id: AccountId,
    /// Range start date.
    pub from: NaiveDate,
    /// Range end date.
    pub to: NaiveDate,
    /// Balance brought forward at the start of the range.
    pub opening_balance: Decimal,
    /// Lines in chronological order with running balances.
    pub rows: Vec<BookLineRow>,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}

/// One entry of the day book, with its full line detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBookEntry {
    /// The journal entry.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Voucher classification.
    pub voucher_type: VoucherType,
    /// Narration.
    pub narration: String,
    /// Total debit (== total credit) of the entry.
    pub amount: Decimal,
}

/// Chronological list of every entry in a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayBookReport {
    /// Range start date.
    pub from: NaiveDate,
    /// Range end date.
    pub to: NaiveDate,
    /// Entries in (date, entry id) order.
    pub entries: Vec<DayBookEntry>,
}
