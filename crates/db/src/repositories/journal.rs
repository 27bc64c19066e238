//! Journal repository for posting, reversing, and reading entries.

use chrono::{NaiveDate, Utc};
use mandir_core::ledger::{
    LedgerError, LedgerService, PostEntryInput, PostedEntry, ResolvedLine, ReversalInput,
    ReversalService, VoucherType,
};
use mandir_shared::types::{AccountId, JournalEntryId, JournalLineId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    accounts, financial_periods, journal_entries, journal_lines,
    sea_orm_active_enums::{PeriodStatus, VoucherType as DbVoucherType},
};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// A ledger validation or state error.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A journal entry with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Lines ordered by line number.
    pub lines: Vec<journal_lines::Model>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by voucher type.
    pub voucher_type: Option<DbVoucherType>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
    /// Filter by account (entries with at least one line on the account).
    pub account_id: Option<Uuid>,
    /// Filter by producing module.
    pub source_module: Option<String>,
}

/// Journal repository for posting and reading entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and posts a journal entry.
    ///
    /// The entry date must fall in an open financial period, every account
    /// must exist and be active, and the lines must balance exactly. The
    /// header and lines are inserted in one database transaction.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` for any validation or state failure; nothing
    /// is persisted on failure.
    pub async fn post_entry(&self, input: PostEntryInput) -> Result<EntryWithLines, JournalError> {
        let period = self.find_open_period(input.entry_date).await?;

        let (resolved, _totals) = self.validate(&input).await?;

        let txn = self.db.begin().await?;
        let entry = Self::insert_entry(
            &txn,
            &input,
            period.id,
            &resolved,
            None,
        )
        .await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Posts the reversing entry for a posted original.
    ///
    /// The reversal mirrors the original with debit and credit swapped, is
    /// dated `input.reversal_date` (which must fall in an open period), and
    /// is idempotent: a second attempt fails with `AlreadyReversed`. A
    /// unique constraint on `reversal_of` backs this up under concurrency.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `AlreadyReversed`, `CannotReverseReversal`,
    /// or a period error for the reversal date.
    pub async fn reverse_entry(
        &self,
        entry_id: Uuid,
        input: ReversalInput,
    ) -> Result<EntryWithLines, JournalError> {
        let original = self.get_entry(entry_id).await?;

        let existing_reversal = journal_entries::Entity::find()
            .filter(journal_entries::Column::ReversalOf.eq(entry_id))
            .one(&self.db)
            .await?;

        let posted = PostedEntry {
            id: JournalEntryId(original.entry.id),
            narration: original.entry.narration.clone(),
            reversal_of: original.entry.reversal_of.map(JournalEntryId),
            has_reversal: existing_reversal.is_some(),
            lines: original
                .lines
                .iter()
                .map(|l| ResolvedLine {
                    account_id: AccountId(l.account_id),
                    debit: l.debit,
                    credit: l.credit,
                    memo: l.memo.clone(),
                })
                .collect(),
        };

        let reversal = ReversalService::build_reversal(&posted, &input)
            .map_err(JournalError::Ledger)?;

        let period = self.find_open_period(reversal.entry_date).await?;

        let post_input = PostEntryInput {
            entry_date: reversal.entry_date,
            voucher_type: VoucherType::Journal,
            narration: reversal.narration.clone(),
            source: None,
            lines: Vec::new(),
            posted_by: reversal.posted_by,
        };

        let txn = self.db.begin().await?;
        let entry = Self::insert_entry(
            &txn,
            &post_input,
            period.id,
            &reversal.lines,
            Some(entry_id),
        )
        .await?;
        txn.commit().await?;

        Ok(entry)
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the entry does not exist.
    pub async fn get_entry(&self, entry_id: Uuid) -> Result<EntryWithLines, JournalError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerError::EntryNotFound(JournalEntryId(entry_id)))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry_id))
            .order_by_asc(journal_lines::Column::LineNumber)
            .all(&self.db)
            .await?;

        Ok(EntryWithLines { entry, lines })
    }

    /// Lists entries matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_entries(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, JournalError> {
        let mut query = journal_entries::Entity::find();

        if let Some(voucher_type) = filter.voucher_type {
            query = query.filter(journal_entries::Column::VoucherType.eq(voucher_type));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }
        if let Some(source_module) = filter.source_module {
            query = query.filter(journal_entries::Column::SourceModule.eq(source_module));
        }
        if let Some(account_id) = filter.account_id {
            let entry_ids: Vec<Uuid> = journal_lines::Entity::find()
                .filter(journal_lines::Column::AccountId.eq(account_id))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|l| l.entry_id)
                .collect();
            query = query.filter(journal_entries::Column::Id.is_in(entry_ids));
        }

        Ok(query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds the open period containing a date.
    ///
    /// # Errors
    ///
    /// Returns `NoPeriod` when no period covers the date and `PeriodLocked`
    /// when the covering period is not open.
    pub async fn find_open_period(
        &self,
        date: NaiveDate,
    ) -> Result<financial_periods::Model, JournalError> {
        let period = financial_periods::Entity::find()
            .filter(financial_periods::Column::StartDate.lte(date))
            .filter(financial_periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await?
            .ok_or(LedgerError::NoPeriod(date))?;

        if period.status != PeriodStatus::Open {
            return Err(LedgerError::PeriodLocked(date).into());
        }

        Ok(period)
    }

    /// Runs the full ledger validation against the current chart of
    /// accounts. The period check is done separately before this.
    async fn validate(
        &self,
        input: &PostEntryInput,
    ) -> Result<(Vec<ResolvedLine>, mandir_core::ledger::EntryTotals), JournalError> {
        let account_ids: Vec<Uuid> = input.lines.iter().map(|l| l.account_id.0).collect();
        let accounts = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await?;

        let info_map: std::collections::HashMap<Uuid, mandir_core::ledger::AccountInfo> = accounts
            .into_iter()
            .map(|a| {
                (
                    a.id,
                    mandir_core::ledger::AccountInfo {
                        id: AccountId(a.id),
                        account_type: a.account_type.into(),
                        is_active: a.is_active,
                    },
                )
            })
            .collect();

        let result = LedgerService::validate_and_resolve(
            input,
            |id| {
                info_map
                    .get(&id.0)
                    .cloned()
                    .ok_or(LedgerError::AccountNotFound(id))
            },
            // Already verified against the periods table.
            |_date| Ok(()),
        )?;

        Ok(result)
    }

    /// Inserts an entry header and its lines inside an open transaction.
    ///
    /// Shared with the period repository, which posts closing entries
    /// within its own transaction.
    pub(crate) async fn insert_entry<C: ConnectionTrait>(
        txn: &C,
        input: &PostEntryInput,
        period_id: Uuid,
        lines: &[ResolvedLine],
        reversal_of: Option<Uuid>,
    ) -> Result<EntryWithLines, JournalError> {
        let now = Utc::now().into();
        let entry_id = JournalEntryId::new().0;

        let entry = journal_entries::ActiveModel {
            id: Set(entry_id),
            entry_date: Set(input.entry_date),
            voucher_type: Set(input.voucher_type.into()),
            narration: Set(input.narration.clone()),
            source_module: Set(input.source.as_ref().map(|s| s.module.clone())),
            source_record_id: Set(input.source.as_ref().map(|s| s.record_id.clone())),
            financial_period_id: Set(period_id),
            reversal_of: Set(reversal_of),
            posted_by: Set(input.posted_by.0),
            posted_at: Set(now),
            created_at: Set(now),
        };
        let entry = entry.insert(txn).await?;

        let mut inserted_lines = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            let line_number = i16::try_from(index + 1)
                .map_err(|_| LedgerError::Internal("too many lines".to_string()))?;
            let model = journal_lines::ActiveModel {
                id: Set(JournalLineId::new().0),
                entry_id: Set(entry_id),
                line_number: Set(line_number),
                account_id: Set(line.account_id.0),
                debit: Set(line.debit),
                credit: Set(line.credit),
                memo: Set(line.memo.clone()),
                created_at: Set(now),
            };
            inserted_lines.push(model.insert(txn).await?);
        }

        Ok(EntryWithLines {
            entry,
            lines: inserted_lines,
        })
    }

    /// Reversal posted through `reverse_entry` is built and validated in
    /// core; this helper exposes the same path for the period repository
    /// when it rolls back a closing entry.
    pub(crate) async fn reverse_in_txn(
        txn: &DatabaseTransaction,
        original: &EntryWithLines,
        reversal_date: NaiveDate,
        period_id: Uuid,
        reversed_by: UserId,
        reason: &str,
    ) -> Result<EntryWithLines, JournalError> {
        let posted = PostedEntry {
            id: JournalEntryId(original.entry.id),
            narration: original.entry.narration.clone(),
            reversal_of: original.entry.reversal_of.map(JournalEntryId),
            has_reversal: false,
            lines: original
                .lines
                .iter()
                .map(|l| ResolvedLine {
                    account_id: AccountId(l.account_id),
                    debit: l.debit,
                    credit: l.credit,
                    memo: l.memo.clone(),
                })
                .collect(),
        };

        let reversal = ReversalService::build_reversal(
            &posted,
            &ReversalInput {
                reversal_date,
                reason: Some(reason.to_string()),
                reversed_by,
            },
        )
        .map_err(JournalError::Ledger)?;

        let post_input = PostEntryInput {
            entry_date: reversal.entry_date,
            voucher_type: VoucherType::Journal,
            narration: reversal.narration.clone(),
            source: None,
            lines: Vec::new(),
            posted_by: reversal.posted_by,
        };

        Self::insert_entry(txn, &post_input, period_id, &reversal.lines, Some(original.entry.id))
            .await
    }
}
