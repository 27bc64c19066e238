//! Bank reconciliation repository.
//!
//! Statement import, run lifecycle, conservative auto-matching, manual
//! match assertions, and completion with outstanding items and summary.

use chrono::{Days, NaiveDate, Utc};
use mandir_core::recon::{
    BookLine, MatchEngine, MatchPair, ReconError, ReconciliationSummary, StatementLine,
};
use mandir_shared::types::{
    BankStatementEntryId, BankStatementId, JournalLineId, MatchPairId, OutstandingItemId,
    ReconciliationId,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    bank_statement_entries, bank_statements, journal_entries, journal_lines, outstanding_items,
    reconciliation_matches, reconciliations,
    sea_orm_active_enums::{MatchMethod, OutstandingSide, ReconciliationStatus},
};

/// Error types for reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    /// A reconciliation rule was violated.
    #[error(transparent)]
    Recon(#[from] ReconError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One line of a statement being imported.
#[derive(Debug, Clone)]
pub struct ImportLineInput {
    /// Value date on the statement.
    pub value_date: NaiveDate,
    /// Signed amount, deposit-positive. Must be nonzero.
    pub amount: Decimal,
    /// Bank narration.
    pub description: String,
    /// Bank reference such as a cheque or UTR number.
    pub reference: Option<String>,
}

/// Input for importing a bank statement.
#[derive(Debug, Clone)]
pub struct ImportStatementInput {
    /// The bank account in the chart of accounts.
    pub bank_account_id: Uuid,
    /// Statement range start.
    pub from_date: NaiveDate,
    /// Statement range end.
    pub to_date: NaiveDate,
    /// Declared opening balance.
    pub opening_balance: Decimal,
    /// Declared closing balance.
    pub closing_balance: Decimal,
    /// Statement lines in statement order.
    pub lines: Vec<ImportLineInput>,
    /// The importing actor.
    pub imported_by: Uuid,
}

/// A statement with its entries.
#[derive(Debug, Clone)]
pub struct StatementWithEntries {
    /// Statement header.
    pub statement: bank_statements::Model,
    /// Entries in line order.
    pub entries: Vec<bank_statement_entries::Model>,
}

/// Result of one auto-match pass, with database-facing ids.
#[derive(Debug, Clone)]
pub struct AutoMatchResult {
    /// Match rows inserted by this pass.
    pub matched: Vec<reconciliation_matches::Model>,
    /// Statement entries left for an operator because two candidates tied.
    pub ambiguous: Vec<Uuid>,
    /// Statement entries with no candidate.
    pub unmatched: Vec<Uuid>,
}

/// Bank reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Imports a bank statement.
    ///
    /// The declared closing balance must equal the opening balance plus the
    /// sum of the signed line amounts. A re-import for a range that
    /// overlaps an earlier statement of the same account marks the earlier
    /// statement superseded; its data stays for audit.
    ///
    /// # Errors
    ///
    /// Returns `EmptyStatement` or `StatementBalanceMismatch` on invalid
    /// input.
    pub async fn import_statement(
        &self,
        input: ImportStatementInput,
    ) -> Result<StatementWithEntries, ReconciliationError> {
        if input.lines.is_empty() {
            return Err(ReconError::EmptyStatement.into());
        }

        let movement: Decimal = input.lines.iter().map(|l| l.amount).sum();
        if input.opening_balance + movement != input.closing_balance {
            return Err(ReconError::StatementBalanceMismatch {
                opening: input.opening_balance,
                movement,
                closing: input.closing_balance,
            }
            .into());
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let statement_id = BankStatementId::new().0;

        let statement = bank_statements::ActiveModel {
            id: Set(statement_id),
            bank_account_id: Set(input.bank_account_id),
            from_date: Set(input.from_date),
            to_date: Set(input.to_date),
            opening_balance: Set(input.opening_balance),
            closing_balance: Set(input.closing_balance),
            superseded_by: Set(None),
            imported_by: Set(input.imported_by),
            imported_at: Set(now),
        };
        let statement = statement.insert(&txn).await?;

        let mut entries = Vec::with_capacity(input.lines.len());
        for (index, line) in input.lines.iter().enumerate() {
            let line_number = i32::try_from(index + 1)
                .map_err(|e| DbErr::Custom(e.to_string()))?;
            let entry = bank_statement_entries::ActiveModel {
                id: Set(BankStatementEntryId::new().0),
                statement_id: Set(statement_id),
                line_number: Set(line_number),
                value_date: Set(line.value_date),
                amount: Set(line.amount),
                description: Set(line.description.clone()),
                reference: Set(line.reference.clone()),
                created_at: Set(now),
            };
            entries.push(entry.insert(&txn).await?);
        }

        // Soft-mark overlapping earlier statements as replaced.
        let overlapping = bank_statements::Entity::find()
            .filter(bank_statements::Column::BankAccountId.eq(input.bank_account_id))
            .filter(bank_statements::Column::Id.ne(statement_id))
            .filter(bank_statements::Column::SupersededBy.is_null())
            .filter(bank_statements::Column::FromDate.lte(input.to_date))
            .filter(bank_statements::Column::ToDate.gte(input.from_date))
            .all(&txn)
            .await?;
        for prior in overlapping {
            let mut active: bank_statements::ActiveModel = prior.into();
            active.superseded_by = Set(Some(statement_id));
            active.update(&txn).await?;
        }

        txn.commit().await?;

        Ok(StatementWithEntries { statement, entries })
    }

    /// Starts a reconciliation run for a statement.
    ///
    /// A bank account carries at most one in-progress run at a time; a
    /// partial unique index backs this up under concurrency.
    ///
    /// # Errors
    ///
    /// Returns `StatementNotFound` if the statement does not exist, or
    /// `ReconciliationInProgress` if a run is already underway for the
    /// account.
    pub async fn start_reconciliation(
        &self,
        statement_id: Uuid,
        started_by: Uuid,
    ) -> Result<reconciliations::Model, ReconciliationError> {
        let statement = bank_statements::Entity::find_by_id(statement_id)
            .one(&self.db)
            .await?
            .ok_or(ReconError::StatementNotFound(BankStatementId(statement_id)))?;

        let active = reconciliations::Entity::find()
            .filter(reconciliations::Column::BankAccountId.eq(statement.bank_account_id))
            .filter(reconciliations::Column::Status.eq(ReconciliationStatus::InProgress))
            .one(&self.db)
            .await?;
        if let Some(active) = active {
            return Err(ReconError::ReconciliationInProgress(ReconciliationId(active.id)).into());
        }

        let run = reconciliations::ActiveModel {
            id: Set(ReconciliationId::new().0),
            bank_account_id: Set(statement.bank_account_id),
            statement_id: Set(statement_id),
            status: Set(ReconciliationStatus::InProgress),
            book_balance: Set(None),
            adjusted_bank_balance: Set(None),
            adjusted_book_balance: Set(None),
            difference: Set(None),
            notes: Set(None),
            started_by: Set(started_by),
            started_at: Set(Utc::now().into()),
            completed_at: Set(None),
        };

        Ok(run.insert(&self.db).await?)
    }

    /// Runs one conservative auto-match pass.
    ///
    /// Only still-unmatched statement entries and book lines participate,
    /// so re-running never moves an existing pair. The run row is locked
    /// for the duration of the pass, serializing concurrent passes.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationCompleted` if the run is already finalized.
    pub async fn auto_match(
        &self,
        reconciliation_id: Uuid,
        window_days: i64,
    ) -> Result<AutoMatchResult, ReconciliationError> {
        let txn = self.db.begin().await?;
        let run = Self::lock_run(&txn, reconciliation_id).await?;

        let statement_lines = Self::unmatched_statement_lines(&txn, &run).await?;
        let book_lines = Self::unmatched_book_lines(&txn, &run, window_days).await?;

        let engine = MatchEngine::new(window_days);
        let outcome = engine.auto_match(&statement_lines, &book_lines);

        let now = Utc::now().into();
        let mut inserted = Vec::with_capacity(outcome.matched.len());
        for MatchPair {
            statement_entry_id,
            journal_line_id,
            ..
        } in &outcome.matched
        {
            let row = reconciliation_matches::ActiveModel {
                id: Set(MatchPairId::new().0),
                reconciliation_id: Set(run.id),
                statement_entry_id: Set(statement_entry_id.0),
                journal_line_id: Set(journal_line_id.0),
                method: Set(MatchMethod::Auto),
                note: Set(None),
                matched_by: Set(None),
                matched_at: Set(now),
            };
            inserted.push(row.insert(&txn).await?);
        }

        txn.commit().await?;

        tracing::debug!(
            reconciliation = %reconciliation_id,
            matched = inserted.len(),
            ambiguous = outcome.ambiguous.len(),
            unmatched = outcome.unmatched.len(),
            "auto-match pass finished"
        );

        Ok(AutoMatchResult {
            matched: inserted,
            ambiguous: outcome.ambiguous.into_iter().map(|id| id.0).collect(),
            unmatched: outcome.unmatched.into_iter().map(|id| id.0).collect(),
        })
    }

    /// Asserts a manual match between a statement entry and a book line.
    ///
    /// The signed amounts must be identical; dates are not constrained.
    ///
    /// # Errors
    ///
    /// Returns `AmountMismatch`, `StatementEntryAlreadyMatched`, or
    /// `JournalLineAlreadyMatched` on conflicts.
    pub async fn manual_match(
        &self,
        reconciliation_id: Uuid,
        statement_entry_id: Uuid,
        journal_line_id: Uuid,
        matched_by: Uuid,
        note: Option<String>,
    ) -> Result<reconciliation_matches::Model, ReconciliationError> {
        let txn = self.db.begin().await?;
        let run = Self::lock_run(&txn, reconciliation_id).await?;

        let entry = bank_statement_entries::Entity::find_by_id(statement_entry_id)
            .filter(bank_statement_entries::Column::StatementId.eq(run.statement_id))
            .one(&txn)
            .await?
            .ok_or(ReconError::StatementEntryNotFound(BankStatementEntryId(
                statement_entry_id,
            )))?;

        let line = journal_lines::Entity::find_by_id(journal_line_id)
            .filter(journal_lines::Column::AccountId.eq(run.bank_account_id))
            .one(&txn)
            .await?
            .ok_or(ReconError::JournalLineNotFound(JournalLineId(
                journal_line_id,
            )))?;

        let book_signed = line.debit - line.credit;
        if book_signed != entry.amount {
            return Err(ReconError::AmountMismatch {
                statement: entry.amount,
                book: book_signed,
            }
            .into());
        }

        let entry_taken = reconciliation_matches::Entity::find()
            .filter(reconciliation_matches::Column::ReconciliationId.eq(run.id))
            .filter(reconciliation_matches::Column::StatementEntryId.eq(statement_entry_id))
            .one(&txn)
            .await?;
        if entry_taken.is_some() {
            return Err(ReconError::StatementEntryAlreadyMatched(BankStatementEntryId(
                statement_entry_id,
            ))
            .into());
        }

        let line_taken = reconciliation_matches::Entity::find()
            .filter(reconciliation_matches::Column::JournalLineId.eq(journal_line_id))
            .one(&txn)
            .await?;
        if line_taken.is_some() {
            return Err(
                ReconError::JournalLineAlreadyMatched(JournalLineId(journal_line_id)).into(),
            );
        }

        let row = reconciliation_matches::ActiveModel {
            id: Set(MatchPairId::new().0),
            reconciliation_id: Set(run.id),
            statement_entry_id: Set(statement_entry_id),
            journal_line_id: Set(journal_line_id),
            method: Set(MatchMethod::Manual),
            note: Set(note),
            matched_by: Set(Some(matched_by)),
            matched_at: Set(Utc::now().into()),
        };
        let row = row.insert(&txn).await?;
        txn.commit().await?;

        Ok(row)
    }

    /// Removes a match pair.
    ///
    /// # Errors
    ///
    /// Returns `MatchNotFound` if the pair does not belong to this run and
    /// `ReconciliationCompleted` once the run is frozen.
    pub async fn unmatch(
        &self,
        reconciliation_id: Uuid,
        match_id: Uuid,
    ) -> Result<(), ReconciliationError> {
        let txn = self.db.begin().await?;
        let run = Self::lock_run(&txn, reconciliation_id).await?;

        let existing = reconciliation_matches::Entity::find_by_id(match_id)
            .filter(reconciliation_matches::Column::ReconciliationId.eq(run.id))
            .one(&txn)
            .await?
            .ok_or(ReconError::MatchNotFound(MatchPairId(match_id)))?;

        existing.delete(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Completes a reconciliation run.
    ///
    /// Every still-unmatched statement entry becomes a bank-side
    /// outstanding item and every unmatched book line in the statement
    /// range a book-side item; the summary is computed from the statement
    /// closing balance, the book balance as of the statement end, and the
    /// outstanding items, then frozen on the run.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationCompleted` if the run was already finalized.
    pub async fn complete(
        &self,
        reconciliation_id: Uuid,
        notes: Option<String>,
    ) -> Result<(reconciliations::Model, ReconciliationSummary), ReconciliationError> {
        let txn = self.db.begin().await?;
        let run = Self::lock_run(&txn, reconciliation_id).await?;

        let statement = bank_statements::Entity::find_by_id(run.statement_id)
            .one(&txn)
            .await?
            .ok_or(ReconError::StatementNotFound(BankStatementId(
                run.statement_id,
            )))?;

        let unmatched_statement = Self::unmatched_statement_entries(&txn, &run).await?;
        let unmatched_book = Self::unmatched_book_line_models(&txn, &run, 0).await?;

        let now = Utc::now().into();
        let mut outstanding = Vec::new();

        for entry in &unmatched_statement {
            let item = outstanding_items::ActiveModel {
                id: Set(OutstandingItemId::new().0),
                reconciliation_id: Set(run.id),
                side: Set(OutstandingSide::Bank),
                item_date: Set(entry.value_date),
                amount: Set(entry.amount),
                description: Set(Some(entry.description.clone())),
                statement_entry_id: Set(Some(entry.id)),
                journal_line_id: Set(None),
                created_at: Set(now),
            };
            item.insert(&txn).await?;
            outstanding.push(mandir_core::recon::OutstandingItem {
                side: mandir_core::recon::OutstandingSide::Bank,
                date: entry.value_date,
                amount: entry.amount,
                description: Some(entry.description.clone()),
            });
        }

        for (line, entry_date) in &unmatched_book {
            let item = outstanding_items::ActiveModel {
                id: Set(OutstandingItemId::new().0),
                reconciliation_id: Set(run.id),
                side: Set(OutstandingSide::Book),
                item_date: Set(*entry_date),
                amount: Set(line.debit - line.credit),
                description: Set(line.memo.clone()),
                statement_entry_id: Set(None),
                journal_line_id: Set(Some(line.id)),
                created_at: Set(now),
            };
            item.insert(&txn).await?;
            outstanding.push(mandir_core::recon::OutstandingItem {
                side: mandir_core::recon::OutstandingSide::Book,
                date: *entry_date,
                amount: line.debit - line.credit,
                description: line.memo.clone(),
            });
        }

        let book_balance =
            Self::book_balance_as_of(&txn, run.bank_account_id, statement.to_date).await?;
        let summary = ReconciliationSummary::compute(
            statement.closing_balance,
            book_balance,
            &outstanding,
        );

        let mut active: reconciliations::ActiveModel = run.into();
        active.status = Set(ReconciliationStatus::Completed);
        active.book_balance = Set(Some(summary.book_balance));
        active.adjusted_bank_balance = Set(Some(summary.adjusted_bank_balance));
        active.adjusted_book_balance = Set(Some(summary.adjusted_book_balance));
        active.difference = Set(Some(summary.difference));
        active.notes = Set(notes);
        active.completed_at = Set(Some(now));
        let run = active.update(&txn).await?;

        txn.commit().await?;

        if !summary.is_reconciled() {
            tracing::warn!(
                reconciliation = %run.id,
                difference = %summary.difference,
                "reconciliation completed with unexplained difference"
            );
        }

        Ok((run, summary))
    }

    /// Gets a run with its matches and outstanding items.
    ///
    /// # Errors
    ///
    /// Returns `ReconciliationNotFound` if the run does not exist.
    pub async fn get_reconciliation(
        &self,
        reconciliation_id: Uuid,
    ) -> Result<
        (
            reconciliations::Model,
            Vec<reconciliation_matches::Model>,
            Vec<outstanding_items::Model>,
        ),
        ReconciliationError,
    > {
        let run = reconciliations::Entity::find_by_id(reconciliation_id)
            .one(&self.db)
            .await?
            .ok_or(ReconError::ReconciliationNotFound(ReconciliationId(
                reconciliation_id,
            )))?;

        let matches = reconciliation_matches::Entity::find()
            .filter(reconciliation_matches::Column::ReconciliationId.eq(reconciliation_id))
            .all(&self.db)
            .await?;

        let items = outstanding_items::Entity::find()
            .filter(outstanding_items::Column::ReconciliationId.eq(reconciliation_id))
            .order_by_asc(outstanding_items::Column::ItemDate)
            .all(&self.db)
            .await?;

        Ok((run, matches, items))
    }

    /// Loads the run with a row lock, rejecting completed runs.
    async fn lock_run(
        txn: &DatabaseTransaction,
        reconciliation_id: Uuid,
    ) -> Result<reconciliations::Model, ReconciliationError> {
        let run = reconciliations::Entity::find_by_id(reconciliation_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(ReconError::ReconciliationNotFound(ReconciliationId(
                reconciliation_id,
            )))?;

        if run.status == ReconciliationStatus::Completed {
            return Err(ReconError::ReconciliationCompleted(ReconciliationId(run.id)).into());
        }

        Ok(run)
    }

    /// Statement entries of the run's statement with no match in this run.
    async fn unmatched_statement_entries(
        txn: &DatabaseTransaction,
        run: &reconciliations::Model,
    ) -> Result<Vec<bank_statement_entries::Model>, ReconciliationError> {
        let matched_ids: Vec<Uuid> = reconciliation_matches::Entity::find()
            .filter(reconciliation_matches::Column::ReconciliationId.eq(run.id))
            .all(txn)
            .await?
            .into_iter()
            .map(|m| m.statement_entry_id)
            .collect();

        let mut query = bank_statement_entries::Entity::find()
            .filter(bank_statement_entries::Column::StatementId.eq(run.statement_id));
        if !matched_ids.is_empty() {
            query = query.filter(bank_statement_entries::Column::Id.is_not_in(matched_ids));
        }

        Ok(query
            .order_by_asc(bank_statement_entries::Column::LineNumber)
            .all(txn)
            .await?)
    }

    async fn unmatched_statement_lines(
        txn: &DatabaseTransaction,
        run: &reconciliations::Model,
    ) -> Result<Vec<StatementLine>, ReconciliationError> {
        Ok(Self::unmatched_statement_entries(txn, run)
            .await?
            .into_iter()
            .map(|e| StatementLine {
                id: BankStatementEntryId(e.id),
                date: e.value_date,
                amount: e.amount,
                description: e.description,
            })
            .collect())
    }

    /// Bank-account journal lines dated within the statement range widened
    /// by the window, plus book-side items still outstanding from the
    /// account's last completed run, excluding lines matched in any run.
    async fn unmatched_book_line_models(
        txn: &DatabaseTransaction,
        run: &reconciliations::Model,
        window_days: i64,
    ) -> Result<Vec<(journal_lines::Model, NaiveDate)>, ReconciliationError> {
        let statement = bank_statements::Entity::find_by_id(run.statement_id)
            .one(txn)
            .await?
            .ok_or(ReconError::StatementNotFound(BankStatementId(
                run.statement_id,
            )))?;

        let window = Days::new(window_days.unsigned_abs());
        let from = statement
            .from_date
            .checked_sub_days(window)
            .unwrap_or(statement.from_date);
        let to = statement
            .to_date
            .checked_add_days(window)
            .unwrap_or(statement.to_date);

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::EntryDate.gte(from))
            .filter(journal_entries::Column::EntryDate.lte(to))
            .all(txn)
            .await?;
        let mut entry_dates: std::collections::HashMap<Uuid, NaiveDate> =
            entries.iter().map(|e| (e.id, e.entry_date)).collect();
        let entry_ids: Vec<Uuid> = entries.into_iter().map(|e| e.id).collect();

        let mut lines = if entry_ids.is_empty() {
            Vec::new()
        } else {
            journal_lines::Entity::find()
                .filter(journal_lines::Column::AccountId.eq(run.bank_account_id))
                .filter(journal_lines::Column::EntryId.is_in(entry_ids))
                .all(txn)
                .await?
        };

        // Uncleared book items from the last completed run carry forward,
        // even when their entry dates fall before this statement's range.
        let carried_ids = Self::carried_book_line_ids(txn, run).await?;
        let known: std::collections::HashSet<Uuid> = lines.iter().map(|l| l.id).collect();
        let missing: Vec<Uuid> = carried_ids
            .into_iter()
            .filter(|id| !known.contains(id))
            .collect();
        if !missing.is_empty() {
            let carried = journal_lines::Entity::find()
                .filter(journal_lines::Column::Id.is_in(missing))
                .all(txn)
                .await?;
            let carried_entry_ids: Vec<Uuid> = carried
                .iter()
                .filter(|l| !entry_dates.contains_key(&l.entry_id))
                .map(|l| l.entry_id)
                .collect();
            if !carried_entry_ids.is_empty() {
                for entry in journal_entries::Entity::find()
                    .filter(journal_entries::Column::Id.is_in(carried_entry_ids))
                    .all(txn)
                    .await?
                {
                    entry_dates.insert(entry.id, entry.entry_date);
                }
            }
            lines.extend(carried);
        }

        let line_ids: Vec<Uuid> = lines.iter().map(|l| l.id).collect();
        let matched_ids: std::collections::HashSet<Uuid> =
            reconciliation_matches::Entity::find()
                .filter(reconciliation_matches::Column::JournalLineId.is_in(line_ids))
                .all(txn)
                .await?
                .into_iter()
                .map(|m| m.journal_line_id)
                .collect();

        Ok(lines
            .into_iter()
            .filter(|l| !matched_ids.contains(&l.id))
            .filter_map(|l| entry_dates.get(&l.entry_id).map(|d| (l, *d)))
            .collect())
    }

    /// Journal line ids left outstanding on the book side by the bank
    /// account's most recent completed run.
    async fn carried_book_line_ids(
        txn: &DatabaseTransaction,
        run: &reconciliations::Model,
    ) -> Result<Vec<Uuid>, ReconciliationError> {
        let previous = reconciliations::Entity::find()
            .filter(reconciliations::Column::BankAccountId.eq(run.bank_account_id))
            .filter(reconciliations::Column::Status.eq(ReconciliationStatus::Completed))
            .filter(reconciliations::Column::Id.ne(run.id))
            .order_by_desc(reconciliations::Column::CompletedAt)
            .one(txn)
            .await?;
        let Some(previous) = previous else {
            return Ok(Vec::new());
        };

        Ok(outstanding_items::Entity::find()
            .filter(outstanding_items::Column::ReconciliationId.eq(previous.id))
            .filter(outstanding_items::Column::Side.eq(OutstandingSide::Book))
            .all(txn)
            .await?
            .into_iter()
            .filter_map(|item| item.journal_line_id)
            .collect())
    }

    async fn unmatched_book_lines(
        txn: &DatabaseTransaction,
        run: &reconciliations::Model,
        window_days: i64,
    ) -> Result<Vec<BookLine>, ReconciliationError> {
        Ok(Self::unmatched_book_line_models(txn, run, window_days)
            .await?
            .into_iter()
            .map(|(l, date)| BookLine {
                id: JournalLineId(l.id),
                date,
                amount: l.debit - l.credit,
            })
            .collect())
    }

    /// Signed balance of the bank account per the books as of a date.
    async fn book_balance_as_of(
        txn: &DatabaseTransaction,
        bank_account_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<Decimal, ReconciliationError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::EntryDate.lte(as_of))
            .all(txn)
            .await?;
        let entry_ids: Vec<Uuid> = entries.into_iter().map(|e| e.id).collect();

        if entry_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(bank_account_id))
            .filter(journal_lines::Column::EntryId.is_in(entry_ids))
            .all(txn)
            .await?;

        Ok(lines.iter().map(|l| l.debit - l.credit).sum())
    }
}
