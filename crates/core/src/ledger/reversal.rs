//! Reversal entry construction.
//!
//! Posted entries are immutable. The only correction mechanism is a new
//! reversing entry that mirrors the original with debit and credit swapped
//! on every line. At most one reversal may exist per entry, and a reversal
//! can never itself be reversed.

use chrono::NaiveDate;
use mandir_shared::types::{JournalEntryId, UserId};

use super::error::LedgerError;
use super::types::{ResolvedLine, VoucherType};

/// A posted entry as seen by the reversal builder.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// The entry's id.
    pub id: JournalEntryId,
    /// Original narration.
    pub narration: String,
    /// The entry this one reverses, if it is itself a reversal.
    pub reversal_of: Option<JournalEntryId>,
    /// Whether a reversal already exists for this entry.
    pub has_reversal: bool,
    /// The resolved lines of the original entry.
    pub lines: Vec<ResolvedLine>,
}

/// Input for building a reversal.
#[derive(Debug, Clone)]
pub struct ReversalInput {
    /// The date the reversal is posted (must fall in an open period).
    pub reversal_date: NaiveDate,
    /// Optional reason appended to the generated narration.
    pub reason: Option<String>,
    /// The actor posting the reversal.
    pub reversed_by: UserId,
}

/// The fully-built reversing entry, ready for persistence.
#[derive(Debug, Clone)]
pub struct ReversalEntry {
    /// The entry being reversed.
    pub reversal_of: JournalEntryId,
    /// Posting date of the reversal.
    pub entry_date: NaiveDate,
    /// Always `Journal` for reversals.
    pub voucher_type: VoucherType,
    /// Generated narration referencing the original.
    pub narration: String,
    /// Mirrored lines with debit and credit swapped.
    pub lines: Vec<ResolvedLine>,
    /// The actor posting the reversal.
    pub posted_by: UserId,
}

/// Service for building reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Build the reversing entry for a posted original.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyReversed` if a reversal exists for the original, and
    /// `CannotReverseReversal` if the original is itself a reversal. The
    /// caller enforces the period-open check for `reversal_date` through the
    /// normal posting path.
    pub fn build_reversal(
        original: &PostedEntry,
        input: &ReversalInput,
    ) -> Result<ReversalEntry, LedgerError> {
        if original.reversal_of.is_some() {
            return Err(LedgerError::CannotReverseReversal(original.id));
        }
        if original.has_reversal {
            return Err(LedgerError::AlreadyReversed(original.id));
        }

        let lines = original
            .lines
            .iter()
            .map(|line| ResolvedLine {
                account_id: line.account_id,
                debit: line.credit,
                credit: line.debit,
                memo: line.memo.clone(),
            })
            .collect();

        let narration = match &input.reason {
            Some(reason) => format!("Reversal of entry {}: {reason}", original.id),
            None => format!("Reversal of entry {}: {}", original.id, original.narration),
        };

        Ok(ReversalEntry {
            reversal_of: original.id,
            entry_date: input.reversal_date,
            voucher_type: VoucherType::Journal,
            narration,
            lines,
            posted_by: input.reversed_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandir_shared::types::AccountId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn make_entry(lines: Vec<ResolvedLine>) -> PostedEntry {
        PostedEntry {
            id: JournalEntryId::new(),
            narration: "Hundi collection".to_string(),
            reversal_of: None,
            has_reversal: false,
            lines,
        }
    }

    fn make_input() -> ReversalInput {
        ReversalInput {
            reversal_date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            reason: None,
            reversed_by: UserId::new(),
        }
    }

    fn line(debit: Decimal, credit: Decimal) -> ResolvedLine {
        ResolvedLine {
            account_id: AccountId::new(),
            debit,
            credit,
            memo: Some("cash".to_string()),
        }
    }

    #[test]
    fn test_reversal_swaps_sides() {
        let original = make_entry(vec![line(dec!(1000), dec!(0)), line(dec!(0), dec!(1000))]);
        let reversal = ReversalService::build_reversal(&original, &make_input()).unwrap();

        assert_eq!(reversal.lines.len(), 2);
        assert_eq!(reversal.lines[0].debit, dec!(0));
        assert_eq!(reversal.lines[0].credit, dec!(1000));
        assert_eq!(reversal.lines[1].debit, dec!(1000));
        assert_eq!(reversal.lines[1].credit, dec!(0));
        assert_eq!(reversal.reversal_of, original.id);
        assert_eq!(reversal.voucher_type, VoucherType::Journal);
    }

    #[test]
    fn test_reversal_preserves_accounts_and_memos() {
        let original = make_entry(vec![line(dec!(500), dec!(0)), line(dec!(0), dec!(500))]);
        let reversal = ReversalService::build_reversal(&original, &make_input()).unwrap();

        for (orig, rev) in original.lines.iter().zip(&reversal.lines) {
            assert_eq!(orig.account_id, rev.account_id);
            assert_eq!(orig.memo, rev.memo);
        }
    }

    #[test]
    fn test_reversal_is_balanced() {
        let original = make_entry(vec![
            line(dec!(600), dec!(0)),
            line(dec!(400), dec!(0)),
            line(dec!(0), dec!(1000)),
        ]);
        let reversal = ReversalService::build_reversal(&original, &make_input()).unwrap();

        let debit: Decimal = reversal.lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = reversal.lines.iter().map(|l| l.credit).sum();
        assert_eq!(debit, credit);
        assert_eq!(debit, dec!(1000));
    }

    #[test]
    fn test_reversal_narration_references_original() {
        let original = make_entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]);
        let reversal = ReversalService::build_reversal(&original, &make_input()).unwrap();

        assert!(reversal.narration.contains(&original.id.to_string()));
        assert!(reversal.narration.contains("Hundi collection"));
    }

    #[test]
    fn test_reversal_narration_uses_reason_when_given() {
        let original = make_entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]);
        let mut input = make_input();
        input.reason = Some("duplicate voucher".to_string());

        let reversal = ReversalService::build_reversal(&original, &input).unwrap();
        assert!(reversal.narration.contains("duplicate voucher"));
    }

    #[test]
    fn test_cannot_reverse_twice() {
        let mut original = make_entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]);
        original.has_reversal = true;

        let result = ReversalService::build_reversal(&original, &make_input());
        assert!(matches!(result, Err(LedgerError::AlreadyReversed(_))));
    }

    #[test]
    fn test_cannot_reverse_a_reversal() {
        let mut original = make_entry(vec![line(dec!(100), dec!(0)), line(dec!(0), dec!(100))]);
        original.reversal_of = Some(JournalEntryId::new());

        let result = ReversalService::build_reversal(&original, &make_input());
        assert!(matches!(result, Err(LedgerError::CannotReverseReversal(_))));
    }
}
