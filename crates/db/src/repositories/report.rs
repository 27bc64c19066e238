//! Report repository.
//!
//! Fetches journal lines and aggregates them in memory, then delegates the
//! report shaping to the pure report service. No balance is ever stored.

use std::collections::HashMap;

use chrono::NaiveDate;
use mandir_core::reports::{
    AccountBalance, AccountBookReport, BalanceSheetReport, BookLineRow, DayBookEntry,
    DayBookReport, IncomeExpenditureReport, ReportError, ReportService, TrialBalanceReport,
};
use mandir_shared::types::{AccountId, JournalEntryId};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{accounts, journal_entries, journal_lines};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportQueryError {
    /// The report inputs violated a report rule, or the ledger failed an
    /// integrity check.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance as of a date, from cumulative movements to that date.
    ///
    /// # Errors
    ///
    /// Returns `TrialBalanceOutOfBalance` when the ledger itself is
    /// corrupt; that error must surface, never be swallowed.
    pub async fn trial_balance(
        &self,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportQueryError> {
        let balances = self.balances_in_range(None, as_of).await?;
        Ok(ReportService::trial_balance(as_of, balances)?)
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn balance_sheet(
        &self,
        as_of: NaiveDate,
        tolerance: Decimal,
    ) -> Result<BalanceSheetReport, ReportQueryError> {
        let balances = self.balances_in_range(None, as_of).await?;
        Ok(ReportService::balance_sheet(as_of, balances, tolerance))
    }

    /// Income & expenditure account over a date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub async fn income_expenditure(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeExpenditureReport, ReportQueryError> {
        let balances = self.balances_in_range(Some(from), to).await?;
        Ok(ReportService::income_expenditure(from, to, balances)?)
    }

    /// Cash or bank book for one account over a date range.
    ///
    /// The opening balance is computed from every line dated before the
    /// range; rows within the range get running balances.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `InvalidRange` on bad input.
    pub async fn account_book(
        &self,
        account_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AccountBookReport, ReportQueryError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(ReportQueryError::AccountNotFound(account_id))?;

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::EntryDate.lte(to))
            .all(&self.db)
            .await?;
        let entry_info: HashMap<Uuid, &journal_entries::Model> =
            entries.iter().map(|e| (e.id, e)).collect();
        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let lines = if entry_ids.is_empty() {
            Vec::new()
        } else {
            journal_lines::Entity::find()
                .filter(journal_lines::Column::AccountId.eq(account_id))
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .all(&self.db)
                .await?
        };

        let mut opening_balance = Decimal::ZERO;
        let mut in_range = Vec::new();
        for line in lines {
            let Some(entry) = entry_info.get(&line.entry_id) else {
                continue;
            };
            if entry.entry_date < from {
                opening_balance += line.debit - line.credit;
            } else {
                in_range.push((line, *entry));
            }
        }

        in_range.sort_by_key(|(line, entry)| (entry.entry_date, entry.id, line.line_number));
        let rows = in_range
            .into_iter()
            .map(|(line, entry)| BookLineRow {
                entry_id: JournalEntryId(entry.id),
                date: entry.entry_date,
                voucher_type: entry.voucher_type.clone().into(),
                narration: entry.narration.clone(),
                debit: line.debit,
                credit: line.credit,
                running_balance: Decimal::ZERO,
            })
            .collect();

        Ok(ReportService::account_book(
            AccountId(account_id),
            from,
            to,
            opening_balance,
            rows,
        )?)
    }

    /// Day book: every entry in a date range with its total amount.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `from` is after `to`.
    pub async fn day_book(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<DayBookReport, ReportQueryError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::EntryDate.gte(from))
            .filter(journal_entries::Column::EntryDate.lte(to))
            .all(&self.db)
            .await?;
        let entry_ids: Vec<Uuid> = entries.iter().map(|e| e.id).collect();

        let mut debit_totals: HashMap<Uuid, Decimal> = HashMap::new();
        if !entry_ids.is_empty() {
            let lines = journal_lines::Entity::find()
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .all(&self.db)
                .await?;
            for line in lines {
                *debit_totals.entry(line.entry_id).or_default() += line.debit;
            }
        }

        let rows = entries
            .into_iter()
            .map(|entry| DayBookEntry {
                entry_id: JournalEntryId(entry.id),
                date: entry.entry_date,
                voucher_type: entry.voucher_type.into(),
                narration: entry.narration,
                amount: debit_totals.get(&entry.id).copied().unwrap_or_default(),
            })
            .collect();

        Ok(ReportService::day_book(from, to, rows)?)
    }

    /// Cumulative debit/credit totals per account over lines whose entry
    /// date falls in `[from, to]` (`from = None` means from inception).
    /// Every account appears, including those with no movement.
    async fn balances_in_range(
        &self,
        from: Option<NaiveDate>,
        to: NaiveDate,
    ) -> Result<Vec<AccountBalance>, ReportQueryError> {
        let mut entry_query =
            journal_entries::Entity::find().filter(journal_entries::Column::EntryDate.lte(to));
        if let Some(from) = from {
            entry_query = entry_query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        let entry_ids: Vec<Uuid> = entry_query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        if !entry_ids.is_empty() {
            let lines = journal_lines::Entity::find()
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .all(&self.db)
                .await?;
            for line in lines {
                let slot = totals.entry(line.account_id).or_default();
                slot.0 += line.debit;
                slot.1 += line.credit;
            }
        }

        let accounts = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(accounts
            .into_iter()
            .map(|account| {
                let (total_debit, total_credit) =
                    totals.get(&account.id).copied().unwrap_or_default();
                AccountBalance {
                    account_id: AccountId(account.id),
                    code: account.code,
                    name: account.name,
                    account_type: account.account_type.into(),
                    total_debit,
                    total_credit,
                }
            })
            .collect())
    }
}
