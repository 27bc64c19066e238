//! Reconciliation summary computation.

use rust_decimal::Decimal;

use super::types::{OutstandingItem, OutstandingSide};

/// The bank reconciliation statement for one run.
///
/// Both adjusted balances use the signed deposit-positive convention:
/// a book item not yet on the statement moves the bank side toward the
/// books, and a statement item not yet in the books moves the book side
/// toward the bank. When every difference is a genuine timing difference
/// the two adjusted balances meet exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationSummary {
    /// Closing balance declared on the statement.
    pub statement_closing_balance: Decimal,
    /// Balance of the bank account per the books as of the statement end.
    pub book_balance: Decimal,
    /// Statement closing balance adjusted for outstanding book items.
    pub adjusted_bank_balance: Decimal,
    /// Book balance adjusted for outstanding bank items.
    pub adjusted_book_balance: Decimal,
    /// adjusted_bank_balance - adjusted_book_balance.
    pub difference: Decimal,
}

impl ReconciliationSummary {
    /// Computes the summary from the two closing balances and the
    /// outstanding items of the run.
    #[must_use]
    pub fn compute(
        statement_closing_balance: Decimal,
        book_balance: Decimal,
        outstanding: &[OutstandingItem],
    ) -> Self {
        let book_side: Decimal = outstanding
            .iter()
            .filter(|i| i.side == OutstandingSide::Book)
            .map(|i| i.amount)
            .sum();
        let bank_side: Decimal = outstanding
            .iter()
            .filter(|i| i.side == OutstandingSide::Bank)
            .map(|i| i.amount)
            .sum();

        let adjusted_bank_balance = statement_closing_balance + book_side;
        let adjusted_book_balance = book_balance + bank_side;

        Self {
            statement_closing_balance,
            book_balance,
            adjusted_bank_balance,
            adjusted_book_balance,
            difference: adjusted_bank_balance - adjusted_book_balance,
        }
    }

    /// Returns true when the adjusted balances meet exactly.
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.difference == Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn item(side: OutstandingSide, amount: Decimal) -> OutstandingItem {
        OutstandingItem {
            side,
            date: NaiveDate::from_ymd_opt(2025, 6, 28).unwrap(),
            amount,
            description: None,
        }
    }

    #[test]
    fn test_fully_matched_run_reconciles() {
        let summary = ReconciliationSummary::compute(dec!(50000), dec!(50000), &[]);
        assert!(summary.is_reconciled());
        assert_eq!(summary.difference, Decimal::ZERO);
    }

    #[test]
    fn test_unpresented_cheque() {
        // Books show a 3000 payment the bank has not cleared. Book balance
        // is 47000, statement still says 50000. The outstanding book item
        // is money out, so it carries a negative sign.
        let outstanding = vec![item(OutstandingSide::Book, dec!(-3000))];
        let summary = ReconciliationSummary::compute(dec!(50000), dec!(47000), &outstanding);

        assert_eq!(summary.adjusted_bank_balance, dec!(47000));
        assert_eq!(summary.adjusted_book_balance, dec!(47000));
        assert!(summary.is_reconciled());
    }

    #[test]
    fn test_unrecorded_bank_charges() {
        // The statement shows 150 of charges the books have not recorded.
        let outstanding = vec![item(OutstandingSide::Bank, dec!(-150))];
        let summary = ReconciliationSummary::compute(dec!(49850), dec!(50000), &outstanding);

        assert_eq!(summary.adjusted_bank_balance, dec!(49850));
        assert_eq!(summary.adjusted_book_balance, dec!(49850));
        assert!(summary.is_reconciled());
    }

    #[test]
    fn test_deposit_in_transit_and_charges_together() {
        let outstanding = vec![
            item(OutstandingSide::Book, dec!(5000)),
            item(OutstandingSide::Bank, dec!(-150)),
        ];
        let summary = ReconciliationSummary::compute(dec!(44850), dec!(50000), &outstanding);

        assert_eq!(summary.adjusted_bank_balance, dec!(49850));
        assert_eq!(summary.adjusted_book_balance, dec!(49850));
        assert!(summary.is_reconciled());
    }

    #[test]
    fn test_genuine_discrepancy_surfaces() {
        // Nothing outstanding but the balances differ: something is wrong
        // in the books or on the statement, and the summary must say so.
        let summary = ReconciliationSummary::compute(dec!(50000), dec!(49900), &[]);
        assert!(!summary.is_reconciled());
        assert_eq!(summary.difference, dec!(100));
    }
}
