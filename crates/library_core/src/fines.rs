//! crates/library_core/src/fines.rs
//!
//! The fine calculator: prices overdue intervals on open loans and
//! settles the reader's whole balance through the payment recorder.
//!
//! Settlement computes its figure once, at one instant, and applies
//! exactly that figure everywhere; it never recomputes against a later
//! "now" between charging and stamping.

use chrono::{DateTime, Utc};

use crate::domain::{Money, PaymentMethod, PaymentPurpose, PaymentRecord, DAILY_FINE_RATE};
use crate::error::{LibraryError, LibraryResult};
use crate::library::Library;
use crate::ports::IdProvider;

/// One overdue open loan, priced at a given instant.
#[derive(Debug, Clone)]
pub struct OverdueLine {
    pub issue_id: String,
    pub book_title: String,
    pub overdue_days: i64,
    /// Total fine assessed on the loan: `overdue_days x rate`.
    pub accrued: Money,
    /// The part of `accrued` not yet collected by an earlier settlement.
    pub outstanding: Money,
}

/// The result of a successful settlement.
#[derive(Debug, Clone)]
pub struct FineSettlement {
    pub payment: PaymentRecord,
    pub total: Money,
    pub lines: Vec<OverdueLine>,
}

impl Library {
    /// Prices every currently overdue open loan of the reader at `now`.
    pub fn overdue_loans(&self, phone: &str, now: DateTime<Utc>) -> Vec<OverdueLine> {
        self.open_loans_for(phone)
            .into_iter()
            .filter_map(|l| {
                let days = l.overdue_days(now);
                if days == 0 {
                    return None;
                }
                let accrued = days * DAILY_FINE_RATE;
                Some(OverdueLine {
                    issue_id: l.issue_id.clone(),
                    book_title: l.book_title.clone(),
                    overdue_days: days,
                    accrued,
                    outstanding: (accrued - l.fine_amount).max(0),
                })
            })
            .collect()
    }

    /// The reader's total fine obligation at `now`: uncollected accrual
    /// on open loans plus the recorded pending balance. Pure; mutates
    /// nothing.
    pub fn pending_fine_for(&self, phone: &str, now: DateTime<Utc>) -> Money {
        let accrued: Money = self.overdue_loans(phone, now).iter().map(|l| l.outstanding).sum();
        let recorded = self.reader_by_phone(phone).map_or(0, |r| r.pending_fine);
        accrued + recorded
    }

    /// Collects the reader's entire fine balance in one payment.
    ///
    /// The breakdown is computed once; the same figures are then charged,
    /// stamped on the overdue loans, and added to the reader's lifetime
    /// total. Settling again without further accrual fails `NothingDue`.
    pub fn settle_fines(
        &mut self,
        phone: &str,
        method: PaymentMethod,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<FineSettlement> {
        let recorded = self.require_reader(phone)?.pending_fine;
        let lines = self.overdue_loans(phone, now);
        let total: Money = recorded + lines.iter().map(|l| l.outstanding).sum::<Money>();
        if total == 0 {
            return Err(LibraryError::NothingDue);
        }

        let payment = self.record_payment(
            phone,
            total,
            PaymentPurpose::Fine,
            method,
            "Overdue book fine".to_string(),
            ids,
            now,
        )?;

        for line in &lines {
            if let Some(loan) = self.loans.iter_mut().find(|l| l.issue_id == line.issue_id) {
                loan.fine_amount = line.accrued;
            }
        }
        if let Some(reader) = self.reader_by_phone_mut(phone) {
            reader.pending_fine = 0;
            reader.total_fine_paid += total;
        }

        Ok(FineSettlement { payment, total, lines })
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{PaymentMethod, PaymentPurpose, LOAN_PERIOD_DAYS};
    use crate::error::LibraryError;
    use crate::library::Library;
    use crate::testutil::{book_spec, day, register, SeqIds};

    const PHONE: &str = "9876543210";

    fn setup() -> (Library, SeqIds) {
        let ids = SeqIds::new();
        let mut lib = Library::new();
        lib.add_book(book_spec("Dune"), &ids).unwrap();
        lib.add_book(book_spec("Hyperion"), &ids).unwrap();
        register(&mut lib, PHONE, &ids);
        (lib, ids)
    }

    #[test]
    fn pending_fine_sums_open_overdue_loans() {
        let (mut lib, ids) = setup();
        lib.issue_book(PHONE, "Dune", &ids, day(0)).unwrap();
        lib.issue_book(PHONE, "Hyperion", &ids, day(0)).unwrap();

        // Nothing owed before the due date.
        assert_eq!(lib.pending_fine_for(PHONE, day(LOAN_PERIOD_DAYS)), 0);

        // Two loans, each 2 days over: 2 x 2 x 5.
        let at = day(LOAN_PERIOD_DAYS + 2);
        assert_eq!(lib.pending_fine_for(PHONE, at), 20);
        assert_eq!(lib.overdue_loans(PHONE, at).len(), 2);

        // The computation is a pure read.
        assert_eq!(lib.reader_by_phone(PHONE).unwrap().pending_fine, 0);
    }

    #[test]
    fn settlement_collects_once_and_is_idempotent() {
        let (mut lib, ids) = setup();
        lib.issue_book(PHONE, "Dune", &ids, day(0)).unwrap();

        let at = day(LOAN_PERIOD_DAYS + 4);
        let settlement = lib.settle_fines(PHONE, PaymentMethod::Upi, &ids, at).unwrap();
        assert_eq!(settlement.total, 20);
        assert_eq!(settlement.payment.purpose, PaymentPurpose::Fine);
        assert_eq!(settlement.lines.len(), 1);

        let reader = lib.reader_by_phone(PHONE).unwrap();
        assert_eq!(reader.pending_fine, 0);
        assert_eq!(reader.total_fine_paid, 20);
        assert_eq!(lib.open_loans_for(PHONE)[0].fine_amount, 20);

        // Same instant, same due dates: nothing further is owed.
        let err = lib.settle_fines(PHONE, PaymentMethod::Upi, &ids, at).unwrap_err();
        assert_eq!(err, LibraryError::NothingDue);
        assert_eq!(lib.payments().len(), 1);
    }

    #[test]
    fn only_new_accrual_is_charged_after_a_settlement() {
        let (mut lib, ids) = setup();
        let loan = lib.issue_book(PHONE, "Dune", &ids, day(0)).unwrap();

        lib.settle_fines(PHONE, PaymentMethod::Cash, &ids, day(LOAN_PERIOD_DAYS + 4)).unwrap();

        // Two more days pass before the book comes back.
        assert_eq!(lib.pending_fine_for(PHONE, day(LOAN_PERIOD_DAYS + 6)), 10);
        lib.return_book(&loan.issue_id, day(LOAN_PERIOD_DAYS + 6)).unwrap();

        let reader = lib.reader_by_phone(PHONE).unwrap();
        assert_eq!(reader.pending_fine, 10);
        // The record carries the full assessed figure.
        assert_eq!(lib.loans_for(PHONE)[0].fine_amount, 30);
    }

    #[test]
    fn settling_with_nothing_due_changes_nothing() {
        let (mut lib, ids) = setup();
        lib.issue_book(PHONE, "Dune", &ids, day(0)).unwrap();

        let err = lib.settle_fines(PHONE, PaymentMethod::Cash, &ids, day(1)).unwrap_err();
        assert_eq!(err, LibraryError::NothingDue);
        assert!(lib.payments().is_empty());
        assert_eq!(lib.reader_by_phone(PHONE).unwrap().total_fine_paid, 0);
    }

    #[test]
    fn settlement_covers_the_recorded_balance_from_late_returns() {
        let (mut lib, ids) = setup();
        let loan = lib.issue_book(PHONE, "Dune", &ids, day(0)).unwrap();
        lib.return_book(&loan.issue_id, day(LOAN_PERIOD_DAYS + 3)).unwrap();

        assert_eq!(lib.pending_fine_for(PHONE, day(LOAN_PERIOD_DAYS + 3)), 15);
        let settlement = lib
            .settle_fines(PHONE, PaymentMethod::Card, &ids, day(LOAN_PERIOD_DAYS + 3))
            .unwrap();
        assert_eq!(settlement.total, 15);
        assert!(settlement.lines.is_empty());
        assert_eq!(lib.reader_by_phone(PHONE).unwrap().pending_fine, 0);
    }
}
