//! Report generation service.
//!
//! Every report is computed from account movements fetched by the caller;
//! the service never stores a balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::types::{
    AccountBalance, AccountBookReport, BalanceSheetReport, BalanceSheetSection, BookLineRow,
    DayBookEntry, DayBookReport, IncomeExpenditureReport, IncomeExpenditureSection,
    TrialBalanceReport, TrialBalanceRow, TrialBalanceTotals,
};
use crate::ledger::AccountType;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance as of a date.
    ///
    /// `accounts` carries cumulative debit/credit totals from inception to
    /// the as-of date. Zero-balance accounts are omitted from the rows.
    ///
    /// # Errors
    ///
    /// Returns `TrialBalanceOutOfBalance` when the column totals differ.
    /// That is an integrity failure, never a report.
    pub fn trial_balance(
        as_of: NaiveDate,
        accounts: Vec<AccountBalance>,
    ) -> Result<TrialBalanceReport, ReportError> {
        let mut rows = Vec::new();
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for account in accounts {
            let net = account.net_debit();
            if net == Decimal::ZERO {
                continue;
            }
            let (debit_balance, credit_balance) = if net > Decimal::ZERO {
                (net, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -net)
            };
            total_debit += debit_balance;
            total_credit += credit_balance;
            rows.push(TrialBalanceRow {
                account_id: account.account_id,
                code: account.code,
                name: account.name,
                account_type: account.account_type,
                debit_balance,
                credit_balance,
            });
        }

        if total_debit != total_credit {
            return Err(ReportError::TrialBalanceOutOfBalance {
                debit: total_debit,
                credit: total_credit,
            });
        }

        Ok(TrialBalanceReport {
            as_of,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
            },
        })
    }

    /// Generates a balance sheet as of a date.
    ///
    /// `accounts` carries cumulative totals to the as-of date for every
    /// account. Income and expense balances not yet swept to reserve by a
    /// period close appear as a single surplus-to-date figure on the funds
    /// side, so the sheet balances mid-period too.
    ///
    /// `tolerance` is the acceptable rounding difference; anything beyond
    /// it flags the sheet unbalanced.
    #[must_use]
    pub fn balance_sheet(
        as_of: NaiveDate,
        accounts: Vec<AccountBalance>,
        tolerance: Decimal,
    ) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut funds = BalanceSheetSection::default();
        let mut surplus_to_date = Decimal::ZERO;

        for account in accounts {
            match account.account_type {
                AccountType::Asset => Self::add_to_section(&mut assets, account),
                AccountType::Liability => Self::add_to_section(&mut liabilities, account),
                AccountType::Equity => Self::add_to_section(&mut funds, account),
                AccountType::Income | AccountType::Expense => {
                    surplus_to_date += account.balance()
                        * if account.account_type == AccountType::Income {
                            Decimal::ONE
                        } else {
                            -Decimal::ONE
                        };
                }
            }
        }

        let total_assets = assets.total;
        let liabilities_and_funds = liabilities.total + funds.total + surplus_to_date;
        let difference = total_assets - liabilities_and_funds;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            funds,
            surplus_to_date,
            total_assets,
            liabilities_and_funds,
            difference,
            is_balanced: difference.abs() <= tolerance,
        }
    }

    /// Generates an income & expenditure account for a date range.
    ///
    /// `accounts` carries only the movements within the range, and only
    /// income and expense accounts contribute.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub fn income_expenditure(
        from: NaiveDate,
        to: NaiveDate,
        accounts: Vec<AccountBalance>,
    ) -> Result<IncomeExpenditureReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }

        let mut income = IncomeExpenditureSection::default();
        let mut expenditure = IncomeExpenditureSection::default();

        for account in accounts {
            match account.account_type {
                AccountType::Income => {
                    income.total += account.balance();
                    income.accounts.push(account);
                }
                AccountType::Expense => {
                    expenditure.total += account.balance();
                    expenditure.accounts.push(account);
                }
                _ => {}
            }
        }

        let surplus = income.total - expenditure.total;
        Ok(IncomeExpenditureReport {
            from,
            to,
            income,
            expenditure,
            surplus,
        })
    }

    /// Builds a cash or bank book with running balances.
    ///
    /// `rows` must be the account's lines within the range in chronological
    /// order, with `running_balance` left at zero; the service fills it in
    /// starting from `opening_balance`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub fn account_book(
        account_id: mandir_shared::types::AccountId,
        from: NaiveDate,
        to: NaiveDate,
        opening_balance: Decimal,
        mut rows: Vec<BookLineRow>,
    ) -> Result<AccountBookReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }

        let mut balance = opening_balance;
        for row in &mut rows {
            // Cash and bank accounts are debit-normal.
            balance += row.debit - row.credit;
            row.running_balance = balance;
        }

        Ok(AccountBookReport {
            account_id,
            from,
            to,
            opening_balance,
            rows,
            closing_balance: balance,
        })
    }

    /// Builds the day book for a date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub fn day_book(
        from: NaiveDate,
        to: NaiveDate,
        mut entries: Vec<DayBookEntry>,
    ) -> Result<DayBookReport, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }
        entries.sort_by_key(|e| (e.date, e.entry_id));
        Ok(DayBookReport { from, to, entries })
    }

    fn add_to_section(section: &mut BalanceSheetSection, account: AccountBalance) {
        section.total += account.balance();
        section.accounts.push(account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::VoucherType;
    use mandir_shared::types::{AccountId, JournalEntryId};
    use rust_decimal_macros::dec;

    fn balance(
        account_type: AccountType,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> AccountBalance {
        AccountBalance {
            account_id: AccountId::new(),
            code: "1000".to_string(),
            name: "Test".to_string(),
            account_type,
            total_debit,
            total_credit,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_trial_balance_balanced() {
        let accounts = vec![
            balance(AccountType::Asset, dec!(10000), dec!(2000)),
            balance(AccountType::Income, dec!(0), dec!(10000)),
            balance(AccountType::Expense, dec!(2000), dec!(0)),
        ];

        let report = ReportService::trial_balance(as_of(), accounts).unwrap();
        assert_eq!(report.totals.total_debit, dec!(10000));
        assert_eq!(report.totals.total_credit, dec!(10000));
        assert_eq!(report.rows.len(), 3);
    }

    #[test]
    fn test_trial_balance_omits_zero_balances() {
        let accounts = vec![
            balance(AccountType::Asset, dec!(500), dec!(500)),
            balance(AccountType::Asset, dec!(100), dec!(0)),
            balance(AccountType::Income, dec!(0), dec!(100)),
        ];

        let report = ReportService::trial_balance(as_of(), accounts).unwrap();
        assert_eq!(report.rows.len(), 2);
    }

    #[test]
    fn test_trial_balance_out_of_balance_is_error() {
        let accounts = vec![balance(AccountType::Asset, dec!(100), dec!(0))];
        let result = ReportService::trial_balance(as_of(), accounts);
        assert!(matches!(
            result,
            Err(ReportError::TrialBalanceOutOfBalance { .. })
        ));
        if let Err(e) = ReportService::trial_balance(
            as_of(),
            vec![balance(AccountType::Asset, dec!(100), dec!(0))],
        ) {
            assert!(e.is_integrity());
        }
    }

    #[test]
    fn test_balance_sheet_balances_mid_period() {
        // Cash 10000 funded by donations: income not yet swept to reserve
        // shows as surplus to date.
        let accounts = vec![
            balance(AccountType::Asset, dec!(10000), dec!(0)),
            balance(AccountType::Income, dec!(0), dec!(10000)),
        ];

        let report = ReportService::balance_sheet(as_of(), accounts, dec!(0.01));
        assert_eq!(report.total_assets, dec!(10000));
        assert_eq!(report.surplus_to_date, dec!(10000));
        assert_eq!(report.liabilities_and_funds, dec!(10000));
        assert!(report.is_balanced);
    }

    #[test]
    fn test_balance_sheet_after_close() {
        // Post-close: income/expense are zero, reserve carries the surplus.
        let accounts = vec![
            balance(AccountType::Asset, dec!(6000), dec!(0)),
            balance(AccountType::Equity, dec!(0), dec!(6000)),
            balance(AccountType::Income, dec!(10000), dec!(10000)),
            balance(AccountType::Expense, dec!(4000), dec!(4000)),
        ];

        let report = ReportService::balance_sheet(as_of(), accounts, dec!(0.01));
        assert_eq!(report.surplus_to_date, dec!(0));
        assert_eq!(report.funds.total, dec!(6000));
        assert!(report.is_balanced);
    }

    #[test]
    fn test_balance_sheet_flags_difference_beyond_tolerance() {
        let accounts = vec![balance(AccountType::Asset, dec!(100), dec!(0))];
        let report = ReportService::balance_sheet(as_of(), accounts, dec!(0.01));
        assert!(!report.is_balanced);
        assert_eq!(report.difference, dec!(100));
    }

    #[test]
    fn test_income_expenditure_surplus() {
        let accounts = vec![
            balance(AccountType::Income, dec!(0), dec!(10000)),
            balance(AccountType::Expense, dec!(4000), dec!(0)),
            balance(AccountType::Asset, dec!(6000), dec!(0)),
        ];

        let report = ReportService::income_expenditure(
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            accounts,
        )
        .unwrap();

        assert_eq!(report.income.total, dec!(10000));
        assert_eq!(report.expenditure.total, dec!(4000));
        assert_eq!(report.surplus, dec!(6000));
        // Asset accounts never appear.
        assert_eq!(report.income.accounts.len(), 1);
        assert_eq!(report.expenditure.accounts.len(), 1);
    }

    #[test]
    fn test_income_expenditure_rejects_inverted_range() {
        let result = ReportService::income_expenditure(
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            vec![],
        );
        assert!(matches!(result, Err(ReportError::InvalidRange { .. })));
    }

    #[test]
    fn test_account_book_running_balance() {
        let row = |debit, credit| BookLineRow {
            entry_id: JournalEntryId::new(),
            date: as_of(),
            voucher_type: VoucherType::Receipt,
            narration: String::new(),
            debit,
            credit,
            running_balance: Decimal::ZERO,
        };

        let report = ReportService::account_book(
            AccountId::new(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            as_of(),
            dec!(1000),
            vec![row(dec!(500), dec!(0)), row(dec!(0), dec!(200))],
        )
        .unwrap();

        assert_eq!(report.rows[0].running_balance, dec!(1500));
        assert_eq!(report.rows[1].running_balance, dec!(1300));
        assert_eq!(report.closing_balance, dec!(1300));
    }

    #[test]
    fn test_day_book_sorted_chronologically() {
        let entry = |day| DayBookEntry {
            entry_id: JournalEntryId::new(),
            date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            voucher_type: VoucherType::Receipt,
            narration: String::new(),
            amount: dec!(100),
        };

        let report = ReportService::day_book(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            as_of(),
            vec![entry(20), entry(5), entry(12)],
        )
        .unwrap();

        let days: Vec<u32> = report
            .entries
            .iter()
            .map(|e| chrono::Datelike::day(&e.date))
            .collect();
        assert_eq!(days, vec![5, 12, 20]);
    }
}
