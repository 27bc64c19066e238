//! Financial year and period repository.
//!
//! Owns the period lifecycle: year creation with auto-generated monthly
//! periods, the sequential close with surplus transfer, reopening, and
//! sealing the year.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use mandir_core::ledger::{AccountType as CoreAccountType, PostEntryInput, VoucherType};
use mandir_core::period::{
    AccountMovement, ClosingService, FinancialPeriod as CorePeriod, PeriodError,
    YearStatus as CoreYearStatus,
};
use mandir_shared::types::{
    AccountId, FinancialPeriodId, FinancialYearId, PeriodClosingId, UserId,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::journal::{JournalError, JournalRepository};
use crate::entities::{
    accounts, financial_periods, financial_years, journal_entries, journal_lines, period_closings,
    sea_orm_active_enums::{PeriodStatus, YearStatus},
};

/// Error types for fiscal operations.
#[derive(Debug, thiserror::Error)]
pub enum FiscalError {
    /// A period lifecycle rule was violated.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalError> for FiscalError {
    fn from(value: JournalError) -> Self {
        match value {
            JournalError::Ledger(e) => Self::Period(PeriodError::Ledger(e)),
            JournalError::Database(e) => Self::Database(e),
        }
    }
}

/// Input for creating a financial year.
#[derive(Debug, Clone)]
pub struct CreateFinancialYearInput {
    /// Year label (e.g., "FY 2025-26").
    pub label: String,
    /// Start date (April 1 by convention, not enforced).
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
}

/// Financial year with nested periods.
#[derive(Debug, Clone)]
pub struct YearWithPeriods {
    /// The year record.
    pub year: financial_years::Model,
    /// Periods ordered by period number.
    pub periods: Vec<financial_periods::Model>,
}

/// Outcome of a successful period close.
#[derive(Debug, Clone)]
pub struct CloseOutcome {
    /// The closed period.
    pub period: financial_periods::Model,
    /// The closing record.
    pub closing: period_closings::Model,
}

/// Financial year and period repository.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a financial year with auto-generated monthly periods.
    ///
    /// # Errors
    ///
    /// Returns an error if the date range is invalid, overlaps an existing
    /// year, or the database operation fails.
    pub async fn create_financial_year(
        &self,
        input: CreateFinancialYearInput,
    ) -> Result<YearWithPeriods, FiscalError> {
        if input.start_date >= input.end_date {
            return Err(PeriodError::InvalidDateRange {
                start: input.start_date,
                end: input.end_date,
            }
            .into());
        }

        let overlapping = financial_years::Entity::find()
            .filter(financial_years::Column::StartDate.lte(input.end_date))
            .filter(financial_years::Column::EndDate.gte(input.start_date))
            .one(&self.db)
            .await?;
        if let Some(existing) = overlapping {
            return Err(PeriodError::OverlappingYear(FinancialYearId(existing.id)).into());
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let year_id = FinancialYearId::new().0;

        let year = financial_years::ActiveModel {
            id: Set(year_id),
            label: Set(input.label),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(YearStatus::Open),
            closed_by: Set(None),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let year = year.insert(&txn).await?;

        let mut periods = Vec::new();
        for spec in generate_monthly_periods(input.start_date, input.end_date) {
            let period = financial_periods::ActiveModel {
                id: Set(FinancialPeriodId::new().0),
                financial_year_id: Set(year_id),
                period_number: Set(spec.period_number),
                name: Set(spec.name),
                start_date: Set(spec.start_date),
                end_date: Set(spec.end_date),
                status: Set(PeriodStatus::Open),
                closed_by: Set(None),
                closed_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            periods.push(period.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(YearWithPeriods { year, periods })
    }

    /// Lists financial years with nested periods, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_years(&self) -> Result<Vec<YearWithPeriods>, FiscalError> {
        let years = financial_years::Entity::find()
            .order_by_desc(financial_years::Column::StartDate)
            .all(&self.db)
            .await?;

        let mut results = Vec::with_capacity(years.len());
        for year in years {
            let periods = financial_periods::Entity::find()
                .filter(financial_periods::Column::FinancialYearId.eq(year.id))
                .order_by_asc(financial_periods::Column::PeriodNumber)
                .all(&self.db)
                .await?;
            results.push(YearWithPeriods { year, periods });
        }

        Ok(results)
    }

    /// Finds the period containing a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_period_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<financial_periods::Model>, FiscalError> {
        Ok(financial_periods::Entity::find()
            .filter(financial_periods::Column::StartDate.lte(date))
            .filter(financial_periods::Column::EndDate.gte(date))
            .one(&self.db)
            .await?)
    }

    /// Closes a period.
    ///
    /// Runs in one database transaction: validates ordering, computes the
    /// period's income and expense movements, posts the closing entry that
    /// zeroes them against the reserve account, records the closing, and
    /// marks the period closed. Any failure rolls the whole close back and
    /// leaves the period open.
    ///
    /// # Errors
    ///
    /// Returns an error if the period is not open, an earlier period is
    /// still open, the closing date precedes the period end, or the
    /// database operation fails.
    pub async fn close_period(
        &self,
        period_id: Uuid,
        closing_date: NaiveDate,
        reserve_account_id: Uuid,
        closed_by: Uuid,
        notes: Option<String>,
    ) -> Result<CloseOutcome, FiscalError> {
        let txn = self.db.begin().await?;

        let period = financial_periods::Entity::find_by_id(period_id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::PeriodNotFound(FinancialPeriodId(period_id)))?;

        let siblings = financial_periods::Entity::find()
            .filter(financial_periods::Column::FinancialYearId.eq(period.financial_year_id))
            .all(&txn)
            .await?;

        let core_period = to_core_period(&period);
        let core_siblings: Vec<CorePeriod> = siblings.iter().map(to_core_period).collect();
        ClosingService::validate_close(&core_period, &core_siblings, closing_date)
            .map_err(FiscalError::Period)?;

        // Lock out concurrent posting while the close computes.
        let now = Utc::now().into();
        let mut active: financial_periods::ActiveModel = period.clone().into();
        active.status = Set(PeriodStatus::Closing);
        active.updated_at = Set(now);
        let period = active.update(&txn).await?;

        let movements = Self::compute_movements(&txn, period.id).await?;
        let computation = ClosingService::compute_closing(&movements);

        let plan = ClosingService::build_closing_entry(
            &core_period,
            closing_date,
            &movements,
            AccountId(reserve_account_id),
            UserId(closed_by),
        );

        let closing_entry_id = if let Some(plan) = plan {
            let post_input = PostEntryInput {
                entry_date: plan.entry_date,
                voucher_type: VoucherType::Journal,
                narration: plan.narration.clone(),
                source: None,
                lines: Vec::new(),
                posted_by: plan.posted_by,
            };
            let entry =
                JournalRepository::insert_entry(&txn, &post_input, period.id, &plan.lines, None)
                    .await?;
            Some(entry.entry.id)
        } else {
            None
        };

        let closing = period_closings::ActiveModel {
            id: Set(PeriodClosingId::new().0),
            period_id: Set(period.id),
            closing_date: Set(closing_date),
            income_total: Set(computation.income_total),
            expense_total: Set(computation.expense_total),
            surplus: Set(computation.surplus),
            closing_entry_id: Set(closing_entry_id),
            reserve_account_id: Set(reserve_account_id),
            closed_by: Set(closed_by),
            notes: Set(notes),
            created_at: Set(now),
        };
        let closing = closing.insert(&txn).await?;

        let mut active: financial_periods::ActiveModel = period.into();
        active.status = Set(PeriodStatus::Closed);
        active.closed_by = Set(Some(closed_by));
        active.closed_at = Set(Some(now));
        active.updated_at = Set(now);
        let period = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            period = %period.name,
            surplus = %closing.surplus,
            "period closed"
        );

        Ok(CloseOutcome { period, closing })
    }

    /// Reopens a closed period.
    ///
    /// Reverses the closing entry, deletes the closing record, and sets the
    /// period back to open. Blocked when a later period is already closed
    /// or the year is sealed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reopen preconditions fail or the database
    /// operation fails.
    pub async fn reopen_period(
        &self,
        period_id: Uuid,
        reopened_by: Uuid,
        reason: &str,
    ) -> Result<financial_periods::Model, FiscalError> {
        let txn = self.db.begin().await?;

        let period = financial_periods::Entity::find_by_id(period_id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::PeriodNotFound(FinancialPeriodId(period_id)))?;

        let year = financial_years::Entity::find_by_id(period.financial_year_id)
            .one(&txn)
            .await?
            .ok_or(PeriodError::YearNotFound(FinancialYearId(
                period.financial_year_id,
            )))?;

        let siblings = financial_periods::Entity::find()
            .filter(financial_periods::Column::FinancialYearId.eq(period.financial_year_id))
            .all(&txn)
            .await?;

        let core_siblings: Vec<CorePeriod> = siblings.iter().map(to_core_period).collect();
        ClosingService::validate_reopen(
            &to_core_period(&period),
            &core_siblings,
            to_core_year_status(&year.status),
        )
        .map_err(FiscalError::Period)?;

        let closing = period_closings::Entity::find()
            .filter(period_closings::Column::PeriodId.eq(period_id))
            .one(&txn)
            .await?;

        if let Some(closing) = closing {
            if let Some(closing_entry_id) = closing.closing_entry_id {
                let entry = journal_entries::Entity::find_by_id(closing_entry_id)
                    .one(&txn)
                    .await?;
                if let Some(entry) = entry {
                    let lines = journal_lines::Entity::find()
                        .filter(journal_lines::Column::EntryId.eq(entry.id))
                        .order_by_asc(journal_lines::Column::LineNumber)
                        .all(&txn)
                        .await?;
                    JournalRepository::reverse_in_txn(
                        &txn,
                        &super::journal::EntryWithLines { entry, lines },
                        closing.closing_date,
                        period.id,
                        UserId(reopened_by),
                        reason,
                    )
                    .await?;
                }
            }
            closing.delete(&txn).await?;
        }

        let now = Utc::now().into();
        let mut active: financial_periods::ActiveModel = period.into();
        active.status = Set(PeriodStatus::Open);
        active.closed_by = Set(None);
        active.closed_at = Set(None);
        active.updated_at = Set(now);
        let period = active.update(&txn).await?;

        txn.commit().await?;

        tracing::warn!(
            period = %period.name,
            reopened_by = %reopened_by,
            reason,
            "closed period reopened"
        );

        Ok(period)
    }

    /// Seals a financial year. All twelve periods must already be closed.
    ///
    /// # Errors
    ///
    /// Returns `YearHasOpenPeriods` if any period is not closed.
    pub async fn close_year(
        &self,
        year_id: Uuid,
        closed_by: Uuid,
    ) -> Result<financial_years::Model, FiscalError> {
        let year = financial_years::Entity::find_by_id(year_id)
            .one(&self.db)
            .await?
            .ok_or(PeriodError::YearNotFound(FinancialYearId(year_id)))?;

        let periods = financial_periods::Entity::find()
            .filter(financial_periods::Column::FinancialYearId.eq(year_id))
            .all(&self.db)
            .await?;

        let core_periods: Vec<CorePeriod> = periods.iter().map(to_core_period).collect();
        ClosingService::validate_close_year(FinancialYearId(year_id), &core_periods)
            .map_err(FiscalError::Period)?;

        let now = Utc::now().into();
        let mut active: financial_years::ActiveModel = year.into();
        active.status = Set(YearStatus::Closed);
        active.closed_by = Set(Some(closed_by));
        active.closed_at = Set(Some(now));
        active.updated_at = Set(now);

        Ok(active.update(&self.db).await?)
    }

    /// Sums each account's debit/credit movement within a period.
    async fn compute_movements<C: ConnectionTrait>(
        txn: &C,
        period_id: Uuid,
    ) -> Result<Vec<(AccountMovement, CoreAccountType)>, FiscalError> {
        let entry_ids: Vec<Uuid> = journal_entries::Entity::find()
            .filter(journal_entries::Column::FinancialPeriodId.eq(period_id))
            .all(txn)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        if entry_ids.is_empty() {
            return Ok(Vec::new());
        }

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.is_in(entry_ids))
            .all(txn)
            .await?;

        let mut totals: HashMap<Uuid, AccountMovement> = HashMap::new();
        for line in &lines {
            let movement = totals
                .entry(line.account_id)
                .or_insert_with(|| AccountMovement {
                    account_id: AccountId(line.account_id),
                    debit_total: rust_decimal::Decimal::ZERO,
                    credit_total: rust_decimal::Decimal::ZERO,
                });
            movement.debit_total += line.debit;
            movement.credit_total += line.credit;
        }

        let account_ids: Vec<Uuid> = totals.keys().copied().collect();
        let account_types: HashMap<Uuid, CoreAccountType> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(txn)
            .await?
            .into_iter()
            .map(|a| (a.id, a.account_type.into()))
            .collect();

        let mut movements: Vec<(AccountMovement, CoreAccountType)> = totals
            .into_iter()
            .filter_map(|(id, movement)| {
                account_types.get(&id).map(|t| (movement, *t))
            })
            .collect();
        // Deterministic closing entry line order.
        movements.sort_by_key(|(m, _)| m.account_id);

        Ok(movements)
    }
}

fn to_core_period(model: &financial_periods::Model) -> CorePeriod {
    CorePeriod {
        id: FinancialPeriodId(model.id),
        financial_year_id: FinancialYearId(model.financial_year_id),
        period_number: i32::from(model.period_number),
        name: model.name.clone(),
        start_date: model.start_date,
        end_date: model.end_date,
        status: model.status.clone().into(),
    }
}

const fn to_core_year_status(status: &YearStatus) -> CoreYearStatus {
    match status {
        YearStatus::Open => CoreYearStatus::Open,
        YearStatus::Closed => CoreYearStatus::Closed,
    }
}

/// Generated period data before insertion.
struct PeriodSpec {
    period_number: i16,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

/// Generates monthly periods covering a date range.
fn generate_monthly_periods(start_date: NaiveDate, end_date: NaiveDate) -> Vec<PeriodSpec> {
    let mut periods = Vec::new();
    let mut current = start_date;
    let mut period_number: i16 = 1;

    while current <= end_date {
        let month_end = last_day_of_month(current.year(), current.month());
        let period_end = if month_end > end_date { end_date } else { month_end };

        periods.push(PeriodSpec {
            period_number,
            name: format!("{} {}", month_name(current.month()), current.year()),
            start_date: current,
            end_date: period_end,
        });

        current = if current.month() == 12 {
            NaiveDate::from_ymd_opt(current.year() + 1, 1, 1).unwrap_or(NaiveDate::MAX)
        } else {
            NaiveDate::from_ymd_opt(current.year(), current.month() + 1, 1).unwrap_or(NaiveDate::MAX)
        };
        period_number += 1;
    }

    periods
}

/// Returns the last day of a month.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MIN)
}

/// Returns the month name.
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_monthly_periods_indian_fy() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        let periods = generate_monthly_periods(start, end);

        assert_eq!(periods.len(), 12);
        assert_eq!(periods[0].name, "April 2025");
        assert_eq!(periods[0].period_number, 1);
        assert_eq!(
            periods[0].end_date,
            NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
        );
        assert_eq!(periods[11].name, "March 2026");
        assert_eq!(periods[11].period_number, 12);
        assert_eq!(
            periods[11].end_date,
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_generate_monthly_periods_contiguous() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();

        let periods = generate_monthly_periods(start, end);
        for pair in periods.windows(2) {
            assert_eq!(
                pair[0].end_date.succ_opt().unwrap(),
                pair[1].start_date,
                "periods must tile the year with no gaps"
            );
        }
    }

    #[test]
    fn test_generate_monthly_periods_partial() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

        let periods = generate_monthly_periods(start, end);
        assert_eq!(periods.len(), 3);
        assert_eq!(
            periods[2].end_date,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2025, 2),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2025, 12),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }
}
