//! crates/library_core/src/error.rs
//!
//! Defines the error type shared by every core operation.
//!
//! All of these are recoverable at the call site: an operation that fails
//! leaves every collection untouched, and the caller decides whether to
//! retry or abandon that single request.

use crate::domain::Money;

/// The error type returned by all `Library` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("no book matching '{0}' in the catalog")]
    BookNotFound(String),

    #[error("no reader registered with phone {0}")]
    ReaderNotFound(String),

    #[error("no loan with issue id '{0}'")]
    LoanNotFound(String),

    #[error("a book titled '{0}' already exists in the catalog")]
    DuplicateTitle(String),

    #[error("a reader with phone {0} is already registered")]
    DuplicateReader(String),

    #[error("reader already holds an issued copy of '{0}'")]
    AlreadyHeld(String),

    #[error("loan '{0}' has already been returned")]
    AlreadyReturned(String),

    #[error("borrowing limit of {limit} book(s) reached")]
    LimitReached { limit: u32 },

    #[error("stock of '{0}' cannot go below zero")]
    StockUnderflow(String),

    #[error("'{0}' is currently out of stock")]
    OutOfStock(String),

    #[error("a pending fine of {0} must be settled before issuing")]
    PendingFine(Money),

    #[error("cannot remove '{0}': copies are out on loan")]
    BookInUse(String),

    #[error("unknown membership plan '{0}'")]
    UnknownPlan(String),

    #[error("no fine is due for this reader")]
    NothingDue,

    #[error("payment amount must be greater than zero")]
    InvalidAmount,
}

/// A convenience alias used throughout the core.
pub type LibraryResult<T> = Result<T, LibraryError>;
