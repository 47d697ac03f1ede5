//! End-to-end walk through the borrowing workflow: registration,
//! membership purchase, issuing up to the limit, overdue settlement and
//! the discounted purchase path.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};
use library_core::{
    BookSpec, IdProvider, Library, LibraryError, LoanStatus, MembershipPlan, MembershipStatus,
    PaymentMethod, PaymentPurpose, ReaderSpec,
};

struct SeqIds(Cell<u32>);

impl SeqIds {
    fn new() -> Self {
        Self(Cell::new(0))
    }

    fn bump(&self) -> u32 {
        self.0.set(self.0.get() + 1);
        self.0.get()
    }
}

impl IdProvider for SeqIds {
    fn reader_id(&self, phone: &str, _now: DateTime<Utc>) -> String {
        format!("READ{phone}")
    }

    fn issue_id(&self) -> String {
        format!("ISSUE-{:04}", self.bump())
    }

    fn payment_id(&self, _now: DateTime<Utc>) -> String {
        format!("PAY{:04}", self.bump())
    }

    fn membership_id(&self, phone: &str, _now: DateTime<Utc>) -> String {
        format!("MEM{phone}{:02}", self.bump())
    }

    fn transaction_ref(&self) -> String {
        format!("TXN{:06}", self.bump())
    }

    fn isbn13(&self) -> String {
        format!("978{:010}", self.bump())
    }
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap() + Duration::days(n)
}

fn spec(title: &str, price: i64) -> BookSpec {
    BookSpec {
        title: title.to_string(),
        author: "Author".to_string(),
        year: 2001,
        genre: "Fiction".to_string(),
        pages: 250,
        rating: 4.0,
        language: "English".to_string(),
        stock: 2,
        price,
    }
}

#[test]
fn full_borrowing_lifecycle() {
    let ids = SeqIds::new();
    let mut lib = Library::new();

    for i in 0..6 {
        lib.add_book(spec(&format!("Volume {i}"), 200), &ids).unwrap();
    }

    let reader = lib
        .register_reader(
            ReaderSpec {
                name: "Asha".to_string(),
                phone: "9000000001".to_string(),
                email: "asha@example.com".to_string(),
                address: "12 Hill Road".to_string(),
            },
            &ids,
            day(0),
        )
        .unwrap();
    let phone = reader.phone.clone();

    // A Premium member may hold five books at once.
    let (membership, fee) = lib
        .purchase_membership(&phone, MembershipPlan::Premium, PaymentMethod::Card, &ids, day(0))
        .unwrap();
    assert_eq!(membership.status, MembershipStatus::Active);
    assert_eq!(fee.amount, 1000);

    for i in 0..5 {
        lib.issue_book(&phone, &format!("Volume {i}"), &ids, day(1)).unwrap();
    }
    assert_eq!(
        lib.issue_book(&phone, "Volume 5", &ids, day(1)).unwrap_err(),
        LibraryError::LimitReached { limit: 5 }
    );
    assert_eq!(lib.open_loans_for(&phone).len(), 5);
    assert_eq!(lib.all_open_loans().len(), 5);

    // Day 1 + 7 is the due date; two days later each loan owes 10.
    let overdue_at = day(10);
    assert_eq!(lib.pending_fine_for(&phone, overdue_at), 50);

    let settlement = lib.settle_fines(&phone, PaymentMethod::Upi, &ids, overdue_at).unwrap();
    assert_eq!(settlement.total, 50);
    assert_eq!(settlement.lines.len(), 5);
    assert_eq!(
        lib.settle_fines(&phone, PaymentMethod::Upi, &ids, overdue_at).unwrap_err(),
        LibraryError::NothingDue
    );

    // Return everything one more day late: 5 units newly owed per loan.
    let return_at = day(11);
    let loan_ids: Vec<String> =
        lib.open_loans_for(&phone).iter().map(|l| l.issue_id.clone()).collect();
    for id in &loan_ids {
        let returned = lib.return_book(id, return_at).unwrap();
        assert_eq!(returned.status, LoanStatus::Returned);
        assert_eq!(returned.fine_amount, 15);
    }
    assert_eq!(lib.reader_by_phone(&phone).unwrap().pending_fine, 25);
    assert!(lib.all_open_loans().is_empty());

    // Every copy is back on the shelf.
    for i in 0..5 {
        let title = format!("Volume {i}");
        assert_eq!(lib.match_book(&title).unwrap().stock, 2);
    }

    // The remaining balance blocks a fresh issue until settled.
    assert_eq!(
        lib.issue_book(&phone, "Volume 0", &ids, return_at).unwrap_err(),
        LibraryError::PendingFine(25)
    );
    lib.settle_fines(&phone, PaymentMethod::Cash, &ids, return_at).unwrap();
    lib.issue_book(&phone, "Volume 0", &ids, return_at).unwrap();

    // A Premium member buys at 10% off.
    let purchase =
        lib.purchase_book(&phone, "Volume 5", PaymentMethod::DigitalWallet, &ids, day(12)).unwrap();
    assert_eq!(purchase.final_price, 180);

    // Fee, two settlements, one purchase.
    let history = lib.payments_for(&phone);
    assert_eq!(history.len(), 4);
    assert!(history.iter().any(|p| p.purpose == PaymentPurpose::Purchase));

    let reader = lib.reader_by_phone(&phone).unwrap();
    assert_eq!(reader.total_books_issued, 6);
    assert_eq!(reader.total_fine_paid, 75);
    assert_eq!(reader.pending_fine, 0);
}
