//! crates/library_core/src/testutil.rs
//!
//! Test doubles and fixtures shared by the core unit tests.

use std::cell::Cell;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{BookSpec, Reader, ReaderSpec};
use crate::library::Library;
use crate::ports::IdProvider;

/// Deterministic id source: every id embeds a simple counter.
pub(crate) struct SeqIds {
    counter: Cell<u32>,
}

impl SeqIds {
    pub(crate) fn new() -> Self {
        Self { counter: Cell::new(0) }
    }

    fn bump(&self) -> u32 {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        next
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

/// A fixed base instant plus `n` days. All core tests drive time with
/// explicit instants instead of the wall clock.
pub(crate) fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap() + Duration::days(n)
}

pub(crate) fn book_spec(title: &str) -> BookSpec {
    BookSpec {
        title: title.to_string(),
        author: "An Author".to_string(),
        year: 1999,
        genre: "Fiction".to_string(),
        pages: 320,
        rating: 4.2,
        language: "English".to_string(),
        stock: 3,
        price: 200,
    }
}

pub(crate) fn register(lib: &mut Library, phone: &str, ids: &SeqIds) -> Reader {
    lib.register_reader(
        ReaderSpec {
            name: "Test Reader".to_string(),
            phone: phone.to_string(),
            email: String::new(),
            address: String::new(),
        },
        ids,
        day(0),
    )
    .unwrap()
}
