//! Period close computation and closing entry construction.
//!
//! Closing a period zeroes out every income and expense account's movement
//! for that period and transfers the net surplus (or deficit) to the
//! general reserve fund. The whole close runs in a single database
//! transaction; these functions only decide whether it may run and what
//! the closing entry looks like.

use chrono::NaiveDate;
use mandir_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;

use super::error::PeriodError;
use super::types::{AccountMovement, FinancialPeriod, PeriodStatus, YearStatus};
use crate::ledger::{AccountType, LineSide, ResolvedLine, VoucherType};

/// The computed income/expense totals for a period close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingComputation {
    /// Net credit movement across all income accounts.
    pub income_total: Decimal,
    /// Net debit movement across all expense accounts.
    pub expense_total: Decimal,
    /// income_total - expense_total. Negative means a deficit.
    pub surplus: Decimal,
}

/// A closing entry ready to be posted through the normal ledger path.
#[derive(Debug, Clone)]
pub struct ClosingEntryPlan {
    /// Posting date (the requested closing date).
    pub entry_date: NaiveDate,
    /// Always `Journal`.
    pub voucher_type: VoucherType,
    /// Generated narration naming the period.
    pub narration: String,
    /// Lines zeroing income/expense plus the reserve transfer line.
    pub lines: Vec<ResolvedLine>,
    /// The actor closing the period.
    pub posted_by: UserId,
}

/// Service for period close validation and entry construction.
pub struct ClosingService;

impl ClosingService {
    /// Validates a period status transition.
    ///
    /// Allowed: Open -> Closing, Closing -> Closed, Closing -> Open
    /// (rollback of a failed close), Closed -> Open (explicit reopen).
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatusTransition` for any other pair.
    pub const fn validate_status_transition(
        from: PeriodStatus,
        to: PeriodStatus,
    ) -> Result<(), PeriodError> {
        match (from, to) {
            (PeriodStatus::Open, PeriodStatus::Closing)
            | (PeriodStatus::Closing, PeriodStatus::Closed | PeriodStatus::Open)
            | (PeriodStatus::Closed, PeriodStatus::Open) => Ok(()),
            (from, to) => Err(PeriodError::InvalidStatusTransition { from, to }),
        }
    }

    /// Validates that a period may be closed.
    ///
    /// `prior_periods` must be the periods of the same year with a lower
    /// period number, in any order.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyClosed`, `InvalidStatusTransition`,
    /// `ClosingDateBeforePeriodEnd`, or `PriorPeriodOpen`.
    pub fn validate_close(
        period: &FinancialPeriod,
        prior_periods: &[FinancialPeriod],
        closing_date: NaiveDate,
    ) -> Result<(), PeriodError> {
        match period.status {
            PeriodStatus::Open => {}
            PeriodStatus::Closed => return Err(PeriodError::AlreadyClosed(period.id)),
            PeriodStatus::Closing => {
                return Err(PeriodError::InvalidStatusTransition {
                    from: PeriodStatus::Closing,
                    to: PeriodStatus::Closing,
                });
            }
        }

        if closing_date < period.end_date {
            return Err(PeriodError::ClosingDateBeforePeriodEnd {
                closing_date,
                period_end: period.end_date,
            });
        }

        if let Some(open_prior) = prior_periods
            .iter()
            .filter(|p| p.period_number < period.period_number)
            .find(|p| p.status != PeriodStatus::Closed)
        {
            return Err(PeriodError::PriorPeriodOpen {
                period: period.id,
                prior: open_prior.id,
            });
        }

        Ok(())
    }

    /// Validates that a closed period may be reopened.
    ///
    /// `later_periods` must be the periods of the same year with a higher
    /// period number.
    ///
    /// # Errors
    ///
    /// Returns `YearClosed`, `InvalidStatusTransition`, or
    /// `NextPeriodClosed`.
    pub fn validate_reopen(
        period: &FinancialPeriod,
        later_periods: &[FinancialPeriod],
        year_status: YearStatus,
    ) -> Result<(), PeriodError> {
        if year_status == YearStatus::Closed {
            return Err(PeriodError::YearClosed(period.financial_year_id));
        }

        if period.status != PeriodStatus::Closed {
            return Err(PeriodError::InvalidStatusTransition {
                from: period.status,
                to: PeriodStatus::Open,
            });
        }

        if let Some(closed_later) = later_periods
            .iter()
            .filter(|p| p.period_number > period.period_number)
            .find(|p| p.status == PeriodStatus::Closed)
        {
            return Err(PeriodError::NextPeriodClosed {
                period: period.id,
                next: closed_later.id,
            });
        }

        Ok(())
    }

    /// Computes income/expense totals and the surplus for a period close.
    ///
    /// Only income and expense accounts contribute; movements on other
    /// account types are ignored.
    #[must_use]
    pub fn compute_closing(movements: &[(AccountMovement, AccountType)]) -> ClosingComputation {
        let income_total: Decimal = movements
            .iter()
            .filter(|(_, t)| *t == AccountType::Income)
            .map(|(m, _)| m.net_credit())
            .sum();
        let expense_total: Decimal = movements
            .iter()
            .filter(|(_, t)| *t == AccountType::Expense)
            .map(|(m, _)| m.net_debit())
            .sum();

        ClosingComputation {
            income_total,
            expense_total,
            surplus: income_total - expense_total,
        }
    }

    /// Builds the closing entry for a period.
    ///
    /// Each income account is debited by its net credit movement and each
    /// expense account credited by its net debit movement, bringing both to
    /// zero for the period; a contra movement (negative net) posts on the
    /// opposite side. The balancing line posts the surplus to the reserve
    /// account: credit for a surplus, debit for a deficit.
    ///
    /// Returns `None` when no income or expense account moved, in which case
    /// no entry is required and the period closes without one.
    #[must_use]
    pub fn build_closing_entry(
        period: &FinancialPeriod,
        closing_date: NaiveDate,
        movements: &[(AccountMovement, AccountType)],
        reserve_account_id: AccountId,
        closed_by: UserId,
    ) -> Option<ClosingEntryPlan> {
        let mut lines = Vec::new();

        for (movement, account_type) in movements {
            let (side, amount) = match account_type {
                AccountType::Income => (LineSide::Debit, movement.net_credit()),
                AccountType::Expense => (LineSide::Credit, movement.net_debit()),
                _ => continue,
            };
            if amount == Decimal::ZERO {
                continue;
            }
            // Contra movement: post the absolute amount on the other side.
            let (side, amount) = if amount < Decimal::ZERO {
                (side.opposite(), -amount)
            } else {
                (side, amount)
            };
            lines.push(make_line(movement.account_id, side, amount));
        }

        if lines.is_empty() {
            return None;
        }

        let computation = Self::compute_closing(movements);
        if computation.surplus > Decimal::ZERO {
            lines.push(make_line(
                reserve_account_id,
                LineSide::Credit,
                computation.surplus,
            ));
        } else if computation.surplus < Decimal::ZERO {
            lines.push(make_line(
                reserve_account_id,
                LineSide::Debit,
                -computation.surplus,
            ));
        }

        Some(ClosingEntryPlan {
            entry_date: closing_date,
            voucher_type: VoucherType::Journal,
            narration: format!("Period close: {}", period.name),
            lines,
            posted_by: closed_by,
        })
    }

    /// Validates that a year may be sealed.
    ///
    /// # Errors
    ///
    /// Returns `YearHasOpenPeriods` if any period of the year is not closed.
    pub fn validate_close_year(
        year_id: mandir_shared::types::FinancialYearId,
        periods: &[FinancialPeriod],
    ) -> Result<(), PeriodError> {
        if periods.iter().any(|p| p.status != PeriodStatus::Closed) {
            return Err(PeriodError::YearHasOpenPeriods(year_id));
        }
        Ok(())
    }
}

fn make_line(account_id: AccountId, side: LineSide, amount: Decimal) -> ResolvedLine {
    let (debit, credit) = match side {
        LineSide::Debit => (amount, Decimal::ZERO),
        LineSide::Credit => (Decimal::ZERO, amount),
    };
    ResolvedLine {
        account_id,
        debit,
        credit,
        memo: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandir_shared::types::{FinancialPeriodId, FinancialYearId};
    use rust_decimal_macros::dec;

    fn period(number: i32, status: PeriodStatus) -> FinancialPeriod {
        let raw = 3 + number; // April = 1
        let (year, month) = if raw > 12 { (2026, raw - 12) } else { (2025, raw) };
        FinancialPeriod {
            id: FinancialPeriodId::new(),
            financial_year_id: FinancialYearId::new(),
            period_number: number,
            name: format!("Period {number}"),
            start_date: NaiveDate::from_ymd_opt(year, u32::try_from(month).unwrap(), 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(year, u32::try_from(month).unwrap(), 28).unwrap(),
            status,
        }
    }

    fn movement(debit: Decimal, credit: Decimal) -> AccountMovement {
        AccountMovement {
            account_id: AccountId::new(),
            debit_total: debit,
            credit_total: credit,
        }
    }

    #[test]
    fn test_status_transitions() {
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Open, PeriodStatus::Closing)
                .is_ok()
        );
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Closing, PeriodStatus::Closed)
                .is_ok()
        );
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Closing, PeriodStatus::Open)
                .is_ok()
        );
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Closed, PeriodStatus::Open)
                .is_ok()
        );
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Open, PeriodStatus::Closed)
                .is_err()
        );
        assert!(
            ClosingService::validate_status_transition(PeriodStatus::Closed, PeriodStatus::Closing)
                .is_err()
        );
    }

    #[test]
    fn test_close_requires_prior_periods_closed() {
        let target = period(3, PeriodStatus::Open);
        let priors = vec![period(1, PeriodStatus::Closed), period(2, PeriodStatus::Open)];

        let result = ClosingService::validate_close(&target, &priors, target.end_date);
        assert!(matches!(result, Err(PeriodError::PriorPeriodOpen { .. })));
    }

    #[test]
    fn test_close_ok_when_priors_closed() {
        let target = period(3, PeriodStatus::Open);
        let priors = vec![period(1, PeriodStatus::Closed), period(2, PeriodStatus::Closed)];

        assert!(ClosingService::validate_close(&target, &priors, target.end_date).is_ok());
    }

    #[test]
    fn test_close_rejects_early_closing_date() {
        let target = period(1, PeriodStatus::Open);
        let early = target.end_date.pred_opt().unwrap();

        let result = ClosingService::validate_close(&target, &[], early);
        assert!(matches!(
            result,
            Err(PeriodError::ClosingDateBeforePeriodEnd { .. })
        ));
    }

    #[test]
    fn test_close_rejects_already_closed() {
        let target = period(1, PeriodStatus::Closed);
        let result = ClosingService::validate_close(&target, &[], target.end_date);
        assert!(matches!(result, Err(PeriodError::AlreadyClosed(_))));
    }

    #[test]
    fn test_reopen_blocked_by_later_closed_period() {
        let target = period(2, PeriodStatus::Closed);
        let later = vec![period(3, PeriodStatus::Closed)];

        let result = ClosingService::validate_reopen(&target, &later, YearStatus::Open);
        assert!(matches!(result, Err(PeriodError::NextPeriodClosed { .. })));
    }

    #[test]
    fn test_reopen_blocked_when_year_closed() {
        let target = period(12, PeriodStatus::Closed);
        let result = ClosingService::validate_reopen(&target, &[], YearStatus::Closed);
        assert!(matches!(result, Err(PeriodError::YearClosed(_))));
    }

    #[test]
    fn test_reopen_ok_when_latest_closed() {
        let target = period(2, PeriodStatus::Closed);
        let later = vec![period(3, PeriodStatus::Open)];

        assert!(ClosingService::validate_reopen(&target, &later, YearStatus::Open).is_ok());
    }

    #[test]
    fn test_compute_closing_surplus() {
        let movements = vec![
            (movement(dec!(0), dec!(10000)), AccountType::Income),
            (movement(dec!(4000), dec!(0)), AccountType::Expense),
            (movement(dec!(500), dec!(500)), AccountType::Asset),
        ];

        let computation = ClosingService::compute_closing(&movements);
        assert_eq!(computation.income_total, dec!(10000));
        assert_eq!(computation.expense_total, dec!(4000));
        assert_eq!(computation.surplus, dec!(6000));
    }

    #[test]
    fn test_compute_closing_deficit() {
        let movements = vec![
            (movement(dec!(0), dec!(1000)), AccountType::Income),
            (movement(dec!(2500), dec!(0)), AccountType::Expense),
        ];

        let computation = ClosingService::compute_closing(&movements);
        assert_eq!(computation.surplus, dec!(-1500));
    }

    #[test]
    fn test_closing_entry_is_balanced() {
        let target = period(1, PeriodStatus::Open);
        let movements = vec![
            (movement(dec!(0), dec!(10000)), AccountType::Income),
            (movement(dec!(100), dec!(3100)), AccountType::Income),
            (movement(dec!(4000), dec!(0)), AccountType::Expense),
        ];

        let plan = ClosingService::build_closing_entry(
            &target,
            target.end_date,
            &movements,
            AccountId::new(),
            UserId::new(),
        )
        .unwrap();

        let debit: Decimal = plan.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = plan.lines.iter().map(|l| l.credit).sum();
        assert_eq!(debit, credit);
        // Income 10000 + 3000 debited; expense 4000 credited; surplus 9000 credited.
        assert_eq!(debit, dec!(13000));
        assert_eq!(plan.voucher_type, VoucherType::Journal);
    }

    #[test]
    fn test_closing_entry_deficit_debits_reserve() {
        let target = period(1, PeriodStatus::Open);
        let reserve = AccountId::new();
        let movements = vec![
            (movement(dec!(0), dec!(1000)), AccountType::Income),
            (movement(dec!(2500), dec!(0)), AccountType::Expense),
        ];

        let plan = ClosingService::build_closing_entry(
            &target,
            target.end_date,
            &movements,
            reserve,
            UserId::new(),
        )
        .unwrap();

        let reserve_line = plan
            .lines
            .iter()
            .find(|l| l.account_id == reserve)
            .unwrap();
        assert_eq!(reserve_line.debit, dec!(1500));
        assert_eq!(reserve_line.credit, dec!(0));
    }

    #[test]
    fn test_closing_entry_contra_income_movement() {
        // Income account with a net debit movement (refunds exceeded receipts)
        // posts on the credit side of the closing entry.
        let target = period(1, PeriodStatus::Open);
        let movements = vec![
            (movement(dec!(0), dec!(5000)), AccountType::Income),
            (movement(dec!(300), dec!(0)), AccountType::Income),
        ];

        let plan = ClosingService::build_closing_entry(
            &target,
            target.end_date,
            &movements,
            AccountId::new(),
            UserId::new(),
        )
        .unwrap();

        let contra = plan
            .lines
            .iter()
            .find(|l| l.account_id == movements[1].0.account_id)
            .unwrap();
        assert_eq!(contra.credit, dec!(300));

        let debit: Decimal = plan.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = plan.lines.iter().map(|l| l.credit).sum();
        assert_eq!(debit, credit);
    }

    #[test]
    fn test_no_entry_when_no_movement() {
        let target = period(1, PeriodStatus::Open);
        let movements = vec![(movement(dec!(500), dec!(500)), AccountType::Asset)];

        let plan = ClosingService::build_closing_entry(
            &target,
            target.end_date,
            &movements,
            AccountId::new(),
            UserId::new(),
        );
        assert!(plan.is_none());
    }

    #[test]
    fn test_year_close_requires_all_periods_closed() {
        let year_id = FinancialYearId::new();
        let mut periods: Vec<_> = (1..=12).map(|n| period(n, PeriodStatus::Closed)).collect();
        assert!(ClosingService::validate_close_year(year_id, &periods).is_ok());

        periods[11].status = PeriodStatus::Open;
        assert!(matches!(
            ClosingService::validate_close_year(year_id, &periods),
            Err(PeriodError::YearHasOpenPeriods(_))
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn movement_strategy() -> impl Strategy<Value = (AccountMovement, AccountType)> {
            (
                0i64..1_000_000i64,
                0i64..1_000_000i64,
                prop_oneof![Just(AccountType::Income), Just(AccountType::Expense)],
            )
                .prop_map(|(d, c, t)| (movement(Decimal::new(d, 2), Decimal::new(c, 2)), t))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Any closing entry the builder produces is exactly balanced
            /// and has no zero-amount lines.
            #[test]
            fn prop_closing_entry_balanced(
                movements in prop::collection::vec(movement_strategy(), 1..10)
            ) {
                let target = period(1, PeriodStatus::Open);
                let plan = ClosingService::build_closing_entry(
                    &target,
                    target.end_date,
                    &movements,
                    AccountId::new(),
                    UserId::new(),
                );

                if let Some(plan) = plan {
                    let debit: Decimal = plan.lines.iter().map(|l| l.debit).sum();
                    let credit: Decimal = plan.lines.iter().map(|l| l.credit).sum();
                    prop_assert_eq!(debit, credit);
                    for line in &plan.lines {
                        prop_assert!(line.debit + line.credit > Decimal::ZERO);
                    }
                }
            }

            /// surplus always equals income_total - expense_total.
            #[test]
            fn prop_surplus_identity(
                movements in prop::collection::vec(movement_strategy(), 0..10)
            ) {
                let c = ClosingService::compute_closing(&movements);
                prop_assert_eq!(c.surplus, c.income_total - c.expense_total);
            }
        }
    }
}
