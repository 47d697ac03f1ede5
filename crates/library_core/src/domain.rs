//! crates/library_core/src/domain.rs
//!
//! Defines the pure, core data structures for the library system.
//! These structs are independent of any storage or serialization format.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::LibraryError;

/// Whole currency units. Fines and plan fees are always whole amounts.
pub type Money = i64;

/// Days a reader may keep a book before it is overdue.
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Fine accrued per whole day a loan stays issued past its due date.
pub const DAILY_FINE_RATE: Money = 5;

/// Borrowing cap for readers without an active membership.
pub const NON_MEMBER_BOOK_LIMIT: u32 = 2;

//=========================================================================================
// Catalog
//=========================================================================================

/// A catalog entry. The title is unique case-insensitively and `stock`
/// never goes below zero.
#[derive(Debug, Clone)]
pub struct Book {
    pub id: u32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: u32,
    pub isbn: String,
    pub rating: f32,
    pub language: String,
    pub stock: u32,
    pub price: Money,
}

/// Everything a caller supplies when adding a book; the id and ISBN are
/// assigned by the catalog.
#[derive(Debug, Clone)]
pub struct BookSpec {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub genre: String,
    pub pages: u32,
    pub rating: f32,
    pub language: String,
    pub stock: u32,
    pub price: Money,
}

/// A partial update for an existing book. `None` fields keep their
/// current value.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub pages: Option<u32>,
    pub isbn: Option<String>,
    pub rating: Option<f32>,
    pub language: Option<String>,
    pub stock: Option<u32>,
    pub price: Option<Money>,
}

/// The book fields a catalog search may match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Genre,
    Language,
}

//=========================================================================================
// Readers
//=========================================================================================

/// A registered reader. The phone number is the stable lookup key.
///
/// The reader carries lifetime aggregates only; the list of books
/// currently held is always derived from the loan ledger, never stored
/// here.
#[derive(Debug, Clone)]
pub struct Reader {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub registered_at: DateTime<Utc>,
    pub total_books_issued: u32,
    pub total_fine_paid: Money,
    pub pending_fine: Money,
}

/// Registration details for a first-time reader.
#[derive(Debug, Clone)]
pub struct ReaderSpec {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

//=========================================================================================
// Loan ledger
//=========================================================================================

/// The two states of a loan. `Returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStatus {
    Issued,
    Returned,
}

/// One ledger entry. Reader and book details are snapshotted at issue
/// time; the ledger references live entities by phone and title.
#[derive(Debug, Clone)]
pub struct LoanRecord {
    pub issue_id: String,
    pub reader_id: String,
    pub reader_name: String,
    pub reader_phone: String,
    pub book_id: u32,
    pub book_title: String,
    pub book_author: String,
    pub book_isbn: String,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    pub fine_amount: Money,
    pub membership_discount: u8,
}

impl LoanRecord {
    /// Whole days this loan is past due at `now`; zero when on time.
    pub fn overdue_days(&self, now: DateTime<Utc>) -> i64 {
        if now > self.due_at {
            (now - self.due_at).num_days()
        } else {
            0
        }
    }
}

//=========================================================================================
// Memberships
//=========================================================================================

/// The fixed set of membership plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipPlan {
    Basic,
    Premium,
    Vip,
}

impl MembershipPlan {
    pub const ALL: [MembershipPlan; 3] = [
        MembershipPlan::Basic,
        MembershipPlan::Premium,
        MembershipPlan::Vip,
    ];

    pub fn fee(self) -> Money {
        match self {
            MembershipPlan::Basic => 500,
            MembershipPlan::Premium => 1000,
            MembershipPlan::Vip => 2000,
        }
    }

    pub fn duration_months(self) -> i64 {
        match self {
            MembershipPlan::Basic => 6,
            MembershipPlan::Premium => 12,
            MembershipPlan::Vip => 24,
        }
    }

    pub fn book_limit(self) -> u32 {
        match self {
            MembershipPlan::Basic => 3,
            MembershipPlan::Premium => 5,
            MembershipPlan::Vip => 10,
        }
    }

    pub fn discount_percent(self) -> u8 {
        match self {
            MembershipPlan::Basic => 0,
            MembershipPlan::Premium => 10,
            MembershipPlan::Vip => 20,
        }
    }
}

/// Membership lifecycle. A purchase demotes the prior `Active` record to
/// `Replaced`; `Expired` is only ever set lazily on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
    Expired,
    Replaced,
}

#[derive(Debug, Clone)]
pub struct Membership {
    pub id: String,
    pub reader_name: String,
    pub reader_phone: String,
    pub plan: MembershipPlan,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: MembershipStatus,
    pub book_limit: u32,
    pub discount_percent: u8,
}

//=========================================================================================
// Payments
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    NetBanking,
    DigitalWallet,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::Upi,
        PaymentMethod::NetBanking,
        PaymentMethod::DigitalWallet,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentPurpose {
    MembershipFee,
    Fine,
    Purchase,
}

/// Payments always complete once a method has been chosen; collecting a
/// live gateway response is outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
}

/// One immutable entry in the append-only payment ledger.
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub payment_id: String,
    pub reader_phone: String,
    pub amount: Money,
    pub method: PaymentMethod,
    pub purpose: PaymentPurpose,
    pub description: String,
    pub paid_at: DateTime<Utc>,
    pub status: PaymentStatus,
    pub transaction_ref: String,
}

//=========================================================================================
// String vocabularies
//
// These match the values the data files use, so the persistence adapter
// can round-trip records without tables of its own.
//=========================================================================================

/// Raised when a stored string does not belong to an enum vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {field} value '{value}'")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanStatus::Issued => write!(f, "issued"),
            LoanStatus::Returned => write!(f, "returned"),
        }
    }
}

impl FromStr for LoanStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(LoanStatus::Issued),
            "returned" => Ok(LoanStatus::Returned),
            other => Err(ParseEnumError { field: "loan status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for MembershipPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipPlan::Basic => write!(f, "Basic"),
            MembershipPlan::Premium => write!(f, "Premium"),
            MembershipPlan::Vip => write!(f, "VIP"),
        }
    }
}

impl FromStr for MembershipPlan {
    type Err = LibraryError;

    /// Case-insensitive, so operator input like "vip" resolves too.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(MembershipPlan::Basic),
            "premium" => Ok(MembershipPlan::Premium),
            "vip" => Ok(MembershipPlan::Vip),
            _ => Err(LibraryError::UnknownPlan(s.trim().to_string())),
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipStatus::Active => write!(f, "active"),
            MembershipStatus::Expired => write!(f, "expired"),
            MembershipStatus::Replaced => write!(f, "replaced"),
        }
    }
}

impl FromStr for MembershipStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MembershipStatus::Active),
            "expired" => Ok(MembershipStatus::Expired),
            "replaced" => Ok(MembershipStatus::Replaced),
            other => Err(ParseEnumError { field: "membership status", value: other.to_string() }),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Card => write!(f, "Card"),
            PaymentMethod::Upi => write!(f, "UPI"),
            PaymentMethod::NetBanking => write!(f, "Net Banking"),
            PaymentMethod::DigitalWallet => write!(f, "Digital Wallet"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "Card" => Ok(PaymentMethod::Card),
            "UPI" => Ok(PaymentMethod::Upi),
            "Net Banking" => Ok(PaymentMethod::NetBanking),
            "Digital Wallet" => Ok(PaymentMethod::DigitalWallet),
            other => Err(ParseEnumError { field: "payment method", value: other.to_string() }),
        }
    }
}

impl fmt::Display for PaymentPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentPurpose::MembershipFee => write!(f, "Membership Fee"),
            PaymentPurpose::Fine => write!(f, "Fine Payment"),
            PaymentPurpose::Purchase => write!(f, "Book Purchase"),
        }
    }
}

impl FromStr for PaymentPurpose {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Membership Fee" => Ok(PaymentPurpose::MembershipFee),
            "Fine Payment" => Ok(PaymentPurpose::Fine),
            "Book Purchase" => Ok(PaymentPurpose::Purchase),
            other => Err(ParseEnumError { field: "payment purpose", value: other.to_string() }),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" => Ok(PaymentStatus::Completed),
            other => Err(ParseEnumError { field: "payment status", value: other.to_string() }),
        }
    }
}
