//! services/cli/src/adapters/store.rs
//!
//! This module contains the JSON-file adapter, which is the concrete
//! implementation of the `StateStore` port from the `core` crate. Each
//! collection lives in its own file and is rewritten as a whole after
//! every successful mutating operation.
//!
//! Writes go to a temporary file first and are renamed into place, so a
//! crash mid-write leaves the previous durable state intact.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use library_core::{
    Book, Library, LoanRecord, Membership, PaymentRecord, PortError, PortResult, Reader,
    StateStore,
};

const BOOKS_FILE: &str = "books.json";
const READERS_FILE: &str = "readers.json";
const LOANS_FILE: &str = "loans.json";
const MEMBERSHIPS_FILE: &str = "memberships.json";
const PAYMENTS_FILE: &str = "payments.json";

/// Current on-disk schema. Files written before the envelope was
/// introduced hold a bare record array and are treated as version 0.
const SCHEMA_VERSION: u32 = 1;

fn storage<E: std::fmt::Display>(e: E) -> PortError {
    PortError::Storage(e.to_string())
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A filesystem adapter that implements the `StateStore` port.
#[derive(Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Creates a new `JsonStore` rooted at `dir`. The directory is
    /// created on the first write.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn load_collection<T: DeserializeOwned>(&self, name: &str) -> PortResult<Vec<T>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path).map_err(storage)?;
        let value: serde_json::Value = serde_json::from_str(&raw).map_err(storage)?;

        // Migration happens here, once, at load time: files from before
        // the envelope hold a bare array (schema version 0).
        if value.is_array() {
            return serde_json::from_value(value).map_err(storage);
        }

        let envelope: Envelope<T> = serde_json::from_value(value).map_err(storage)?;
        if envelope.version > SCHEMA_VERSION {
            return Err(PortError::Storage(format!(
                "{name} has schema version {} but this build understands {SCHEMA_VERSION}",
                envelope.version
            )));
        }
        Ok(envelope.records)
    }

    fn save_collection<T: Serialize>(&self, name: &str, records: Vec<T>) -> PortResult<()> {
        fs::create_dir_all(&self.dir).map_err(storage)?;
        let path = self.dir.join(name);
        let body = serde_json::to_string_pretty(&Envelope { version: SCHEMA_VERSION, records })
            .map_err(storage)?;

        let tmp = tmp_path(&path);
        fs::write(&tmp, body).map_err(storage)?;
        fs::rename(&tmp, &path).map_err(storage)?;
        debug!(file = name, "collection persisted");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp");
    PathBuf::from(os)
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    records: Vec<T>,
}

//=========================================================================================
// "Impure" File Record Structs
//
// Field names match the collection files; enum fields round-trip through
// the domain string vocabularies.
//=========================================================================================

#[derive(Serialize, Deserialize)]
struct BookRecord {
    id: u32,
    title: String,
    author: String,
    year: i32,
    genre: String,
    pages: u32,
    isbn: String,
    rating: f32,
    language: String,
    stock: u32,
    price: i64,
}

impl BookRecord {
    fn from_domain(b: &Book) -> Self {
        Self {
            id: b.id,
            title: b.title.clone(),
            author: b.author.clone(),
            year: b.year,
            genre: b.genre.clone(),
            pages: b.pages,
            isbn: b.isbn.clone(),
            rating: b.rating,
            language: b.language.clone(),
            stock: b.stock,
            price: b.price,
        }
    }

    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            year: self.year,
            genre: self.genre,
            pages: self.pages,
            isbn: self.isbn,
            rating: self.rating,
            language: self.language,
            stock: self.stock,
            price: self.price,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ReaderRecord {
    reader_id: String,
    name: String,
    phone: String,
    // Optional in old files; defaulted during the load-time migration.
    #[serde(default)]
    email: String,
    #[serde(default)]
    address: String,
    registration_date: DateTime<Utc>,
    #[serde(default)]
    total_books_issued: u32,
    #[serde(default)]
    total_fine_paid: i64,
    #[serde(default)]
    pending_fine: i64,
}

impl ReaderRecord {
    fn from_domain(r: &Reader) -> Self {
        Self {
            reader_id: r.id.clone(),
            name: r.name.clone(),
            phone: r.phone.clone(),
            email: r.email.clone(),
            address: r.address.clone(),
            registration_date: r.registered_at,
            total_books_issued: r.total_books_issued,
            total_fine_paid: r.total_fine_paid,
            pending_fine: r.pending_fine,
        }
    }

    fn to_domain(self) -> Reader {
        Reader {
            id: self.reader_id,
            name: self.name,
            phone: self.phone,
            email: self.email,
            address: self.address,
            registered_at: self.registration_date,
            total_books_issued: self.total_books_issued,
            total_fine_paid: self.total_fine_paid,
            pending_fine: self.pending_fine,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct LoanRow {
    issue_id: String,
    reader_id: String,
    reader_name: String,
    reader_phone: String,
    book_id: u32,
    book_title: String,
    book_author: String,
    book_isbn: String,
    issue_date: DateTime<Utc>,
    return_date: DateTime<Utc>,
    actual_return_date: Option<DateTime<Utc>>,
    status: String,
    fine_amount: i64,
    #[serde(default)]
    membership_discount: u8,
}

impl LoanRow {
    fn from_domain(l: &LoanRecord) -> Self {
        Self {
            issue_id: l.issue_id.clone(),
            reader_id: l.reader_id.clone(),
            reader_name: l.reader_name.clone(),
            reader_phone: l.reader_phone.clone(),
            book_id: l.book_id,
            book_title: l.book_title.clone(),
            book_author: l.book_author.clone(),
            book_isbn: l.book_isbn.clone(),
            issue_date: l.issued_at,
            return_date: l.due_at,
            actual_return_date: l.returned_at,
            status: l.status.to_string(),
            fine_amount: l.fine_amount,
            membership_discount: l.membership_discount,
        }
    }

    fn to_domain(self) -> PortResult<LoanRecord> {
        Ok(LoanRecord {
            issue_id: self.issue_id,
            reader_id: self.reader_id,
            reader_name: self.reader_name,
            reader_phone: self.reader_phone,
            book_id: self.book_id,
            book_title: self.book_title,
            book_author: self.book_author,
            book_isbn: self.book_isbn,
            issued_at: self.issue_date,
            due_at: self.return_date,
            returned_at: self.actual_return_date,
            status: self.status.parse().map_err(storage)?,
            fine_amount: self.fine_amount,
            membership_discount: self.membership_discount,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct MembershipRecord {
    membership_id: String,
    reader_name: String,
    reader_phone: String,
    plan: String,
    start_date: DateTime<Utc>,
    expiry_date: DateTime<Utc>,
    status: String,
    book_limit: u32,
    discount: u8,
}

impl MembershipRecord {
    fn from_domain(m: &Membership) -> Self {
        Self {
            membership_id: m.id.clone(),
            reader_name: m.reader_name.clone(),
            reader_phone: m.reader_phone.clone(),
            plan: m.plan.to_string(),
            start_date: m.started_at,
            expiry_date: m.expires_at,
            status: m.status.to_string(),
            book_limit: m.book_limit,
            discount: m.discount_percent,
        }
    }

    fn to_domain(self) -> PortResult<Membership> {
        Ok(Membership {
            id: self.membership_id,
            reader_name: self.reader_name,
            reader_phone: self.reader_phone,
            plan: self.plan.parse().map_err(storage)?,
            started_at: self.start_date,
            expires_at: self.expiry_date,
            status: self.status.parse().map_err(storage)?,
            book_limit: self.book_limit,
            discount_percent: self.discount,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct PaymentRow {
    payment_id: String,
    reader_phone: String,
    amount: i64,
    payment_method: String,
    payment_type: String,
    description: String,
    payment_date: DateTime<Utc>,
    status: String,
    transaction_ref: String,
}

impl PaymentRow {
    fn from_domain(p: &PaymentRecord) -> Self {
        Self {
            payment_id: p.payment_id.clone(),
            reader_phone: p.reader_phone.clone(),
            amount: p.amount,
            payment_method: p.method.to_string(),
            payment_type: p.purpose.to_string(),
            description: p.description.clone(),
            payment_date: p.paid_at,
            status: p.status.to_string(),
            transaction_ref: p.transaction_ref.clone(),
        }
    }

    fn to_domain(self) -> PortResult<PaymentRecord> {
        Ok(PaymentRecord {
            payment_id: self.payment_id,
            reader_phone: self.reader_phone,
            amount: self.amount,
            method: self.payment_method.parse().map_err(storage)?,
            purpose: self.payment_type.parse().map_err(storage)?,
            description: self.description,
            paid_at: self.payment_date,
            status: self.status.parse().map_err(storage)?,
            transaction_ref: self.transaction_ref,
        })
    }
}

//=========================================================================================
// `StateStore` Trait Implementation
//=========================================================================================

impl StateStore for JsonStore {
    fn load(&self) -> PortResult<Library> {
        let books = self
            .load_collection::<BookRecord>(BOOKS_FILE)?
            .into_iter()
            .map(BookRecord::to_domain)
            .collect();
        let readers = self
            .load_collection::<ReaderRecord>(READERS_FILE)?
            .into_iter()
            .map(ReaderRecord::to_domain)
            .collect();
        let loans = self
            .load_collection::<LoanRow>(LOANS_FILE)?
            .into_iter()
            .map(LoanRow::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        let memberships = self
            .load_collection::<MembershipRecord>(MEMBERSHIPS_FILE)?
            .into_iter()
            .map(MembershipRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        let payments = self
            .load_collection::<PaymentRow>(PAYMENTS_FILE)?
            .into_iter()
            .map(PaymentRow::to_domain)
            .collect::<PortResult<Vec<_>>>()?;

        Ok(Library::from_parts(books, readers, loans, memberships, payments))
    }

    fn save(&self, library: &Library) -> PortResult<()> {
        self.save_collection(
            BOOKS_FILE,
            library.books().iter().map(BookRecord::from_domain).collect(),
        )?;
        self.save_collection(
            READERS_FILE,
            library.readers().iter().map(ReaderRecord::from_domain).collect(),
        )?;
        self.save_collection(
            LOANS_FILE,
            library.loans().iter().map(LoanRow::from_domain).collect(),
        )?;
        self.save_collection(
            MEMBERSHIPS_FILE,
            library.memberships().iter().map(MembershipRecord::from_domain).collect(),
        )?;
        self.save_collection(
            PAYMENTS_FILE,
            library.payments().iter().map(PaymentRow::from_domain).collect(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use library_core::{LoanStatus, MembershipPlan, MembershipStatus};

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("library-store-{}", uuid::Uuid::new_v4()))
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
    }

    fn sample_library() -> Library {
        let book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            genre: "Science Fiction".to_string(),
            pages: 412,
            isbn: "9780441013593".to_string(),
            rating: 4.5,
            language: "English".to_string(),
            stock: 2,
            price: 200,
        };
        let reader = Reader {
            id: "READ32100301".to_string(),
            name: "Asha".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 Hill Road".to_string(),
            registered_at: instant(),
            total_books_issued: 1,
            total_fine_paid: 15,
            pending_fine: 0,
        };
        let loan = LoanRecord {
            issue_id: "ISSUE-0001".to_string(),
            reader_id: reader.id.clone(),
            reader_name: reader.name.clone(),
            reader_phone: reader.phone.clone(),
            book_id: 1,
            book_title: book.title.clone(),
            book_author: book.author.clone(),
            book_isbn: book.isbn.clone(),
            issued_at: instant(),
            due_at: instant() + chrono::Duration::days(7),
            returned_at: None,
            status: LoanStatus::Issued,
            fine_amount: 0,
            membership_discount: 10,
        };
        let membership = Membership {
            id: "MEM3210202503".to_string(),
            reader_name: reader.name.clone(),
            reader_phone: reader.phone.clone(),
            plan: MembershipPlan::Premium,
            started_at: instant(),
            expires_at: instant() + chrono::Duration::days(360),
            status: MembershipStatus::Active,
            book_limit: 5,
            discount_percent: 10,
        };
        let payment = PaymentRecord {
            payment_id: "PAY202501031000123".to_string(),
            reader_phone: reader.phone.clone(),
            amount: 1000,
            method: "Card".parse().unwrap(),
            purpose: "Membership Fee".parse().unwrap(),
            description: "Premium Membership".to_string(),
            paid_at: instant(),
            status: "Completed".parse().unwrap(),
            transaction_ref: "TXN123456".to_string(),
        };
        Library::from_parts(
            vec![book],
            vec![reader],
            vec![loan],
            vec![membership],
            vec![payment],
        )
    }

    #[test]
    fn a_saved_library_loads_back_identically() {
        let dir = scratch_dir();
        let store = JsonStore::new(dir.clone());
        store.save(&sample_library()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.books().len(), 1);
        assert_eq!(loaded.books()[0].title, "Dune");
        assert_eq!(loaded.readers()[0].total_fine_paid, 15);
        assert_eq!(loaded.loans()[0].status, LoanStatus::Issued);
        assert_eq!(loaded.memberships()[0].plan, MembershipPlan::Premium);
        assert_eq!(loaded.payments()[0].amount, 1000);

        // The rename step leaves no temporaries behind.
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_files_load_as_an_empty_library() {
        let store = JsonStore::new(scratch_dir());
        let loaded = store.load().unwrap();
        assert!(loaded.books().is_empty());
        assert!(loaded.readers().is_empty());
    }

    #[test]
    fn legacy_bare_arrays_migrate_at_load() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();

        // A version-0 reader file: bare array, several fields absent.
        fs::write(
            dir.join(READERS_FILE),
            r#"[{"reader_id":"READ00010101","name":"Old Timer","phone":"9000000001",
                 "registration_date":"2024-01-01T08:00:00Z"}]"#,
        )
        .unwrap();

        let store = JsonStore::new(dir.clone());
        let loaded = store.load().unwrap();
        let reader = &loaded.readers()[0];
        assert_eq!(reader.name, "Old Timer");
        assert_eq!(reader.email, "");
        assert_eq!(reader.pending_fine, 0);
        assert_eq!(reader.total_books_issued, 0);

        // Saving rewrites the file under the versioned envelope.
        store.save(&loaded).unwrap();
        let raw = fs::read_to_string(dir.join(READERS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["records"][0]["phone"], "9000000001");

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn a_newer_schema_is_refused() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(BOOKS_FILE), r#"{"version":99,"records":[]}"#).unwrap();

        let store = JsonStore::new(dir.clone());
        assert!(store.load().is_err());

        fs::remove_dir_all(dir).unwrap();
    }
}
