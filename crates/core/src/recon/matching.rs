//! Conservative automatic statement matching.
//!
//! The matcher only asserts pairs it cannot be wrong about: the signed
//! amounts must be identical and the dates within a small window. When two
//! book candidates are equally close in date, the statement entry is left
//! for an operator rather than guessed at.

use std::collections::HashSet;

use mandir_shared::types::JournalLineId;

use super::types::{AutoMatchOutcome, BookLine, MatchMethod, MatchPair, StatementLine};

/// Automatic matcher over one statement and the book lines of one account.
pub struct MatchEngine {
    /// Maximum date distance, in days, for a candidate pair.
    window_days: i64,
}

impl MatchEngine {
    /// Creates a matcher with the given date window.
    #[must_use]
    pub const fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    /// Runs one matching pass.
    ///
    /// Statement entries are processed in (date, id) order. For each entry
    /// the candidates are the not-yet-claimed book lines with an identical
    /// signed amount dated within the window; candidates rank by date
    /// distance, ties broken by line id. An entry whose two best candidates
    /// are equally distant is reported as ambiguous and left unmatched.
    ///
    /// The pass is deterministic: the same inputs always produce the same
    /// outcome. Callers re-running a reconciliation pass only the still
    /// unmatched lines, which makes the pass idempotent.
    #[must_use]
    pub fn auto_match(
        &self,
        statement_lines: &[StatementLine],
        book_lines: &[BookLine],
    ) -> AutoMatchOutcome {
        let mut ordered: Vec<&StatementLine> = statement_lines.iter().collect();
        ordered.sort_by_key(|s| (s.date, s.id));

        let mut outcome = AutoMatchOutcome::default();
        let mut claimed: HashSet<JournalLineId> = HashSet::new();

        for statement in ordered {
            let mut candidates: Vec<&BookLine> = book_lines
                .iter()
                .filter(|b| !claimed.contains(&b.id))
                .filter(|b| b.amount == statement.amount)
                .filter(|b| {
                    (b.date - statement.date).num_days().abs() <= self.window_days
                })
                .collect();
            candidates
                .sort_by_key(|b| ((b.date - statement.date).num_days().abs(), b.id));

            match candidates.as_slice() {
                [] => outcome.unmatched.push(statement.id),
                [best, second, ..]
                    if (best.date - statement.date).num_days().abs()
                        == (second.date - statement.date).num_days().abs() =>
                {
                    outcome.ambiguous.push(statement.id);
                }
                [best, ..] => {
                    claimed.insert(best.id);
                    outcome.matched.push(MatchPair {
                        statement_entry_id: statement.id,
                        journal_line_id: best.id,
                        method: MatchMethod::Auto,
                    });
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mandir_shared::types::BankStatementEntryId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    fn statement(day: u32, amount: Decimal) -> StatementLine {
        StatementLine {
            id: BankStatementEntryId::new(),
            date: date(day),
            amount,
            description: "NEFT".to_string(),
        }
    }

    fn book(day: u32, amount: Decimal) -> BookLine {
        BookLine {
            id: JournalLineId::new(),
            date: date(day),
            amount,
        }
    }

    #[test]
    fn test_exact_match_within_window() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        // Posted two days before the bank cleared it.
        let books = vec![book(8, dec!(500))];

        let outcome = engine.auto_match(&statements, &books);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].journal_line_id, books[0].id);
        assert_eq!(outcome.matched[0].method, MatchMethod::Auto);
        assert!(outcome.ambiguous.is_empty());
        assert!(outcome.unmatched.is_empty());
    }

    #[test]
    fn test_no_match_outside_window() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let books = vec![book(6, dec!(500))];

        let outcome = engine.auto_match(&statements, &books);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched, vec![statements[0].id]);
    }

    #[test]
    fn test_no_match_on_amount_difference() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let books = vec![book(10, dec!(500.01))];

        let outcome = engine.auto_match(&statements, &books);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched.len(), 1);
    }

    #[test]
    fn test_signed_amounts_never_cross_sides() {
        // A 500 deposit never matches a 500 withdrawal.
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let books = vec![book(10, dec!(-500))];

        let outcome = engine.auto_match(&statements, &books);
        assert!(outcome.matched.is_empty());
    }

    #[test]
    fn test_prefers_closer_date() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let near = book(9, dec!(500));
        let far = book(7, dec!(500));
        let books = vec![far.clone(), near.clone()];

        let outcome = engine.auto_match(&statements, &books);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].journal_line_id, near.id);
    }

    #[test]
    fn test_equidistant_candidates_are_ambiguous() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let books = vec![book(9, dec!(500)), book(11, dec!(500))];

        let outcome = engine.auto_match(&statements, &books);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.ambiguous, vec![statements[0].id]);
    }

    #[test]
    fn test_same_day_duplicates_are_ambiguous() {
        // Two identical book postings on the statement date: no guessing.
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500))];
        let books = vec![book(10, dec!(500)), book(10, dec!(500))];

        let outcome = engine.auto_match(&statements, &books);
        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.ambiguous.len(), 1);
    }

    #[test]
    fn test_book_line_claimed_once() {
        let engine = MatchEngine::new(3);
        let statements = vec![statement(10, dec!(500)), statement(12, dec!(500))];
        let books = vec![book(10, dec!(500))];

        let outcome = engine.auto_match(&statements, &books);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.unmatched.len(), 1);
    }

    #[test]
    fn test_deterministic_across_input_order() {
        let engine = MatchEngine::new(3);
        let statements = vec![
            statement(10, dec!(500)),
            statement(12, dec!(-250)),
            statement(15, dec!(1000)),
        ];
        let books = vec![
            book(15, dec!(1000)),
            book(11, dec!(-250)),
            book(9, dec!(500)),
        ];

        let forward = engine.auto_match(&statements, &books);

        let mut statements_rev = statements.clone();
        statements_rev.reverse();
        let mut books_rev = books.clone();
        books_rev.reverse();
        let backward = engine.auto_match(&statements_rev, &books_rev);

        assert_eq!(forward.matched, backward.matched);
    }

    #[test]
    fn test_empty_inputs() {
        let engine = MatchEngine::new(3);
        let outcome = engine.auto_match(&[], &[]);
        assert!(outcome.matched.is_empty());
        assert!(outcome.ambiguous.is_empty());
        assert!(outcome.unmatched.is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn amount_strategy() -> impl Strategy<Value = Decimal> {
            (1i64..5000i64, prop::bool::ANY)
                .prop_map(|(n, neg)| {
                    let d = Decimal::new(n * 100, 2);
                    if neg { -d } else { d }
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Every matched pair has identical signed amounts and a date
            /// distance within the window, and no book line is claimed twice.
            #[test]
            fn prop_matches_respect_invariants(
                raw in prop::collection::vec((1u32..28, amount_strategy(), 1u32..28, amount_strategy()), 0..20),
                window in 0i64..7,
            ) {
                let statements: Vec<StatementLine> =
                    raw.iter().map(|(d, a, _, _)| statement(*d, *a)).collect();
                let books: Vec<BookLine> =
                    raw.iter().map(|(_, _, d, a)| book(*d, *a)).collect();

                let engine = MatchEngine::new(window);
                let outcome = engine.auto_match(&statements, &books);

                let mut seen_book = HashSet::new();
                let mut seen_statement = HashSet::new();
                for pair in &outcome.matched {
                    prop_assert!(seen_book.insert(pair.journal_line_id));
                    prop_assert!(seen_statement.insert(pair.statement_entry_id));

                    let s = statements.iter().find(|s| s.id == pair.statement_entry_id).unwrap();
                    let b = books.iter().find(|b| b.id == pair.journal_line_id).unwrap();
                    prop_assert_eq!(s.amount, b.amount);
                    prop_assert!((b.date - s.date).num_days().abs() <= window);
                }

                // Every statement entry lands in exactly one bucket.
                let total = outcome.matched.len() + outcome.ambiguous.len() + outcome.unmatched.len();
                prop_assert_eq!(total, statements.len());
            }
        }
    }
}
