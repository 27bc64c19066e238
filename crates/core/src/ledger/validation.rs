//! Journal entry validation and resolution.
//!
//! This is the single validation path for every posted entry, regardless of
//! which producing module created it. The service contains pure business
//! logic with no database dependencies; account and period lookups are
//! injected by the caller.

use chrono::NaiveDate;
use mandir_shared::types::AccountId;
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{
    AccountInfo, EntryTotals, JournalLineInput, LineSide, PostEntryInput, ResolvedLine,
};

/// Ledger service for journal entry validation and resolution.
pub struct LedgerService;

impl LedgerService {
    /// Validate and resolve a journal entry before persisting.
    ///
    /// Validation steps:
    /// 1. Minimum lines (at least 2)
    /// 2. Each line amount is positive and nonzero
    /// 3. All referenced accounts exist and are active
    /// 4. The entry date falls in an open financial period
    /// 5. sum(debit) == sum(credit) exactly, both totals > 0
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any validation step fails. No side effects
    /// occur on failure.
    pub fn validate_and_resolve<A, P>(
        input: &PostEntryInput,
        account_lookup: A,
        period_check: P,
    ) -> Result<(Vec<ResolvedLine>, EntryTotals), LedgerError>
    where
        A: Fn(AccountId) -> Result<AccountInfo, LedgerError>,
        P: Fn(NaiveDate) -> Result<(), LedgerError>,
    {
        if input.lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        // Reject locked/missing periods before touching line data so the
        // caller gets the workflow error rather than a validation error
        // when both apply.
        period_check(input.entry_date)?;

        let mut resolved = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            resolved.push(Self::resolve_line(line, &account_lookup)?);
        }

        let totals = Self::calculate_totals(&resolved);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedEntry {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok((resolved, totals))
    }

    /// Resolve a single line against the chart of accounts.
    fn resolve_line<A>(
        line: &JournalLineInput,
        account_lookup: &A,
    ) -> Result<ResolvedLine, LedgerError>
    where
        A: Fn(AccountId) -> Result<AccountInfo, LedgerError>,
    {
        if line.amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }

        let account = account_lookup(line.account_id)?;
        if !account.is_active {
            return Err(LedgerError::AccountInactive(line.account_id));
        }

        let (debit, credit) = match line.side {
            LineSide::Debit => (line.amount, Decimal::ZERO),
            LineSide::Credit => (Decimal::ZERO, line.amount),
        };

        Ok(ResolvedLine {
            account_id: line.account_id,
            debit,
            credit,
            memo: line.memo.clone(),
        })
    }

    /// Calculate entry totals from resolved lines.
    #[must_use]
    pub fn calculate_totals(lines: &[ResolvedLine]) -> EntryTotals {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();
        EntryTotals::new(total_debit, total_credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{AccountType, SourceReference, VoucherType};
    use mandir_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn make_line(side: LineSide, amount: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: AccountId::new(),
            side,
            amount,
            memo: None,
        }
    }

    fn make_input(lines: Vec<JournalLineInput>) -> PostEntryInput {
        PostEntryInput {
            entry_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            voucher_type: VoucherType::Receipt,
            narration: "Hundi collection".to_string(),
            source: Some(SourceReference::new("donation", "1234")),
            lines,
            posted_by: UserId::new(),
        }
    }

    fn ok_account_lookup(id: AccountId) -> Result<AccountInfo, LedgerError> {
        Ok(AccountInfo {
            id,
            account_type: AccountType::Asset,
            is_active: true,
        })
    }

    fn open_period_check(_date: NaiveDate) -> Result<(), LedgerError> {
        Ok(())
    }

    #[test]
    fn test_validate_balanced_entry() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(1000)),
            make_line(LineSide::Credit, dec!(1000)),
        ]);

        let (resolved, totals) =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check)
                .unwrap();

        assert_eq!(resolved.len(), 2);
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(1000));
        assert_eq!(totals.total_credit, dec!(1000));
    }

    #[test]
    fn test_validate_unbalanced_entry() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(1000)),
            make_line(LineSide::Credit, dec!(999.99)),
        ]);

        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_no_rounding_slack_at_entry_level() {
        // One paisa off is still unbalanced; the tolerance in the balance
        // sheet never applies here.
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(0.01)),
            make_line(LineSide::Credit, dec!(0.02)),
        ]);

        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_validate_insufficient_lines() {
        let input = make_input(vec![make_line(LineSide::Debit, dec!(100))]);
        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::InsufficientLines)));
    }

    #[test]
    fn test_validate_zero_amount() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(0)),
            make_line(LineSide::Credit, dec!(100)),
        ]);
        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn test_validate_negative_amount() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(-100)),
            make_line(LineSide::Credit, dec!(100)),
        ]);
        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::NegativeAmount)));
    }

    #[test]
    fn test_validate_inactive_account() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(100)),
            make_line(LineSide::Credit, dec!(100)),
        ]);

        let inactive_lookup = |id: AccountId| -> Result<AccountInfo, LedgerError> {
            Ok(AccountInfo {
                id,
                account_type: AccountType::Asset,
                is_active: false,
            })
        };

        let result =
            LedgerService::validate_and_resolve(&input, inactive_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::AccountInactive(_))));
    }

    #[test]
    fn test_validate_missing_account() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(100)),
            make_line(LineSide::Credit, dec!(100)),
        ]);

        let missing_lookup =
            |id: AccountId| -> Result<AccountInfo, LedgerError> { Err(LedgerError::AccountNotFound(id)) };

        let result = LedgerService::validate_and_resolve(&input, missing_lookup, open_period_check);
        assert!(matches!(result, Err(LedgerError::AccountNotFound(_))));
    }

    #[test]
    fn test_validate_locked_period() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(100)),
            make_line(LineSide::Credit, dec!(100)),
        ]);

        let locked_check =
            |date: NaiveDate| -> Result<(), LedgerError> { Err(LedgerError::PeriodLocked(date)) };

        let result = LedgerService::validate_and_resolve(&input, ok_account_lookup, locked_check);
        assert!(matches!(result, Err(LedgerError::PeriodLocked(_))));
    }

    #[test]
    fn test_validate_missing_period() {
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(100)),
            make_line(LineSide::Credit, dec!(100)),
        ]);

        let no_period_check =
            |date: NaiveDate| -> Result<(), LedgerError> { Err(LedgerError::NoPeriod(date)) };

        let result =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, no_period_check);
        assert!(matches!(result, Err(LedgerError::NoPeriod(_))));
    }

    #[test]
    fn test_multi_line_entry() {
        // Compound receipt: cash + bank against two income heads.
        let input = make_input(vec![
            make_line(LineSide::Debit, dec!(600)),
            make_line(LineSide::Debit, dec!(400)),
            make_line(LineSide::Credit, dec!(750)),
            make_line(LineSide::Credit, dec!(250)),
        ]);

        let (resolved, totals) =
            LedgerService::validate_and_resolve(&input, ok_account_lookup, open_period_check)
                .unwrap();

        assert_eq!(resolved.len(), 4);
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, dec!(1000));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        /// Strategy for positive paise-precision amounts.
        fn amount_strategy() -> impl Strategy<Value = Decimal> {
            (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Mirrored debit/credit pairs always validate and always
            /// produce exactly-equal totals.
            #[test]
            fn prop_mirrored_lines_balance(amounts in prop::collection::vec(amount_strategy(), 1..10)) {
                let mut lines = Vec::new();
                for amount in &amounts {
                    lines.push(make_line(LineSide::Debit, *amount));
                    lines.push(make_line(LineSide::Credit, *amount));
                }
                let input = make_input(lines);

                let result = LedgerService::validate_and_resolve(
                    &input,
                    ok_account_lookup,
                    open_period_check,
                );
                prop_assert!(result.is_ok());
                let (_, totals) = result.unwrap();
                prop_assert!(totals.is_balanced);
                prop_assert_eq!(totals.difference(), Decimal::ZERO);
            }

            /// Adding any positive amount to one side only breaks the entry.
            #[test]
            fn prop_lopsided_entry_rejected(
                amount in amount_strategy(),
                extra in amount_strategy(),
            ) {
                let input = make_input(vec![
                    make_line(LineSide::Debit, amount + extra),
                    make_line(LineSide::Credit, amount),
                ]);

                let result = LedgerService::validate_and_resolve(
                    &input,
                    ok_account_lookup,
                    open_period_check,
                );
                let unbalanced = matches!(result, Err(LedgerError::UnbalancedEntry { .. }));
                prop_assert!(unbalanced);
            }

            /// Totals are order-independent: shuffling lines never changes
            /// the computed debit/credit sums.
            #[test]
            fn prop_totals_order_independent(amounts in prop::collection::vec(amount_strategy(), 1..8)) {
                let mut lines = Vec::new();
                for amount in &amounts {
                    lines.push(make_line(LineSide::Debit, *amount));
                    lines.push(make_line(LineSide::Credit, *amount));
                }

                let forward = make_input(lines.clone());
                lines.reverse();
                let backward = make_input(lines);

                let (_, t1) = LedgerService::validate_and_resolve(
                    &forward, ok_account_lookup, open_period_check,
                ).unwrap();
                let (_, t2) = LedgerService::validate_and_resolve(
                    &backward, ok_account_lookup, open_period_check,
                ).unwrap();

                prop_assert_eq!(t1.total_debit, t2.total_debit);
                prop_assert_eq!(t1.total_credit, t2.total_credit);
            }
        }
    }
}
