//! crates/library_core/src/library.rs
//!
//! The `Library` context object: a single owner for the five persisted
//! collections. All mutating operations live in the component modules
//! (`catalog`, `membership`, `ledger`, `fines`, `payments`) as
//! `impl Library` blocks; there is no ambient mutable state anywhere.

use chrono::{DateTime, Utc};

use crate::domain::{Book, LoanRecord, Membership, PaymentRecord, Reader, ReaderSpec};
use crate::error::{LibraryError, LibraryResult};
use crate::ports::IdProvider;

/// The in-memory system of record.
///
/// Failing operations leave every collection untouched: each operation
/// validates all of its preconditions before the first mutation.
#[derive(Debug, Default)]
pub struct Library {
    pub(crate) books: Vec<Book>,
    pub(crate) readers: Vec<Reader>,
    pub(crate) loans: Vec<LoanRecord>,
    pub(crate) memberships: Vec<Membership>,
    pub(crate) payments: Vec<PaymentRecord>,
}

impl Library {
    /// Creates an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reassembles a library from previously persisted collections.
    pub fn from_parts(
        books: Vec<Book>,
        readers: Vec<Reader>,
        loans: Vec<LoanRecord>,
        memberships: Vec<Membership>,
        payments: Vec<PaymentRecord>,
    ) -> Self {
        Self { books, readers, loans, memberships, payments }
    }

    // Read-only views, used by the store and the reporting layer.

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn readers(&self) -> &[Reader] {
        &self.readers
    }

    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    //=====================================================================================
    // Reader registry
    //=====================================================================================

    /// Looks up a reader by the stable phone key.
    pub fn reader_by_phone(&self, phone: &str) -> Option<&Reader> {
        self.readers.iter().find(|r| r.phone == phone)
    }

    pub(crate) fn reader_by_phone_mut(&mut self, phone: &str) -> Option<&mut Reader> {
        self.readers.iter_mut().find(|r| r.phone == phone)
    }

    /// Like `reader_by_phone` but an absent reader is an error.
    pub(crate) fn require_reader(&self, phone: &str) -> LibraryResult<&Reader> {
        self.reader_by_phone(phone)
            .ok_or_else(|| LibraryError::ReaderNotFound(phone.to_string()))
    }

    /// Registers a first-time reader. Readers are created once per phone
    /// number and never deleted.
    pub fn register_reader(
        &mut self,
        spec: ReaderSpec,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<Reader> {
        if self.reader_by_phone(&spec.phone).is_some() {
            return Err(LibraryError::DuplicateReader(spec.phone));
        }
        let reader = Reader {
            id: ids.reader_id(&spec.phone, now),
            name: spec.name,
            phone: spec.phone,
            email: spec.email,
            address: spec.address,
            registered_at: now,
            total_books_issued: 0,
            total_fine_paid: 0,
            pending_fine: 0,
        };
        self.readers.push(reader.clone());
        Ok(reader)
    }
}
