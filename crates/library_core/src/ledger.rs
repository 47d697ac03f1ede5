//! crates/library_core/src/ledger.rs
//!
//! The loan ledger: the system of record for borrowing state. A record
//! moves `Issued -> Returned` exactly once and is immutable afterwards.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    LoanRecord, LoanStatus, DAILY_FINE_RATE, LOAN_PERIOD_DAYS, NON_MEMBER_BOOK_LIMIT,
};
use crate::error::{LibraryError, LibraryResult};
use crate::library::Library;
use crate::ports::IdProvider;

impl Library {
    /// Issues a matching book to a registered reader.
    ///
    /// Preconditions, checked in order so exactly one error is reported:
    /// the applicable borrow limit (membership limit, or the non-member
    /// default of 2), a zero pending-fine balance, the book existing,
    /// stock on hand, and the reader not already holding that title.
    /// Nothing is mutated until every check has passed.
    pub fn issue_book(
        &mut self,
        phone: &str,
        title: &str,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<LoanRecord> {
        // Lazy-expires as a side effect, so this comes before the reads.
        let (limit, discount) = match self.active_membership_for(phone, now) {
            Some(m) => (m.book_limit, m.discount_percent),
            None => (NON_MEMBER_BOOK_LIMIT, 0),
        };

        let reader = self.require_reader(phone)?;
        let reader_id = reader.id.clone();
        let reader_name = reader.name.clone();
        let pending = reader.pending_fine;

        let open = self.open_loans_for(phone).len() as u32;
        if open >= limit {
            return Err(LibraryError::LimitReached { limit });
        }
        if pending > 0 {
            return Err(LibraryError::PendingFine(pending));
        }

        let book = self
            .match_book(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
        if book.stock == 0 {
            return Err(LibraryError::OutOfStock(book.title.clone()));
        }
        let exact_title = book.title.clone();
        let already_held = self.loans.iter().any(|l| {
            l.reader_phone == phone
                && l.book_title == exact_title
                && l.status == LoanStatus::Issued
        });
        if already_held {
            return Err(LibraryError::AlreadyHeld(exact_title));
        }

        // All preconditions hold; mutate.
        let record = {
            let book = self
                .books
                .iter_mut()
                .find(|b| b.title == exact_title)
                .ok_or_else(|| LibraryError::BookNotFound(exact_title.clone()))?;
            book.stock -= 1;
            LoanRecord {
                issue_id: ids.issue_id(),
                reader_id,
                reader_name,
                reader_phone: phone.to_string(),
                book_id: book.id,
                book_title: book.title.clone(),
                book_author: book.author.clone(),
                book_isbn: book.isbn.clone(),
                issued_at: now,
                due_at: now + Duration::days(LOAN_PERIOD_DAYS),
                returned_at: None,
                status: LoanStatus::Issued,
                fine_amount: 0,
                membership_discount: discount,
            }
        };
        if let Some(reader) = self.reader_by_phone_mut(phone) {
            reader.total_books_issued += 1;
        }
        self.loans.push(record.clone());
        Ok(record)
    }

    /// Returns an issued loan, stamping the return instant and any
    /// overdue fine on the record, and putting the copy back in stock.
    ///
    /// A fine that accrued is added to the reader's pending balance; the
    /// fine calculator collects it on settlement.
    pub fn return_book(&mut self, issue_id: &str, now: DateTime<Utc>) -> LibraryResult<LoanRecord> {
        let pos = self
            .loans
            .iter()
            .position(|l| l.issue_id == issue_id)
            .ok_or_else(|| LibraryError::LoanNotFound(issue_id.to_string()))?;
        if self.loans[pos].status == LoanStatus::Returned {
            return Err(LibraryError::AlreadyReturned(issue_id.to_string()));
        }

        // `fine_amount` on an open loan is what settlement has already
        // collected for it; only the remainder becomes a new obligation.
        let accrued = self.loans[pos].overdue_days(now) * DAILY_FINE_RATE;
        let outstanding = (accrued - self.loans[pos].fine_amount).max(0);

        let loan = &mut self.loans[pos];
        loan.returned_at = Some(now);
        loan.status = LoanStatus::Returned;
        loan.fine_amount = accrued;
        let title = loan.book_title.clone();
        let phone = loan.reader_phone.clone();
        let record = loan.clone();

        if let Some(book) = self.books.iter_mut().find(|b| b.title == title) {
            book.stock += 1;
        }
        if outstanding > 0 {
            if let Some(reader) = self.reader_by_phone_mut(&phone) {
                reader.pending_fine += outstanding;
            }
        }
        Ok(record)
    }

    /// The reader's currently issued loans.
    pub fn open_loans_for(&self, phone: &str) -> Vec<&LoanRecord> {
        self.loans
            .iter()
            .filter(|l| l.reader_phone == phone && l.status == LoanStatus::Issued)
            .collect()
    }

    /// Every loan still issued, across all readers.
    pub fn all_open_loans(&self) -> Vec<&LoanRecord> {
        self.loans.iter().filter(|l| l.status == LoanStatus::Issued).collect()
    }

    /// The reader's full borrowing history, issued and returned alike.
    pub fn loans_for(&self, phone: &str) -> Vec<&LoanRecord> {
        self.loans.iter().filter(|l| l.reader_phone == phone).collect()
    }
}
