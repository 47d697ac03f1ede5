//! crates/library_core/src/ports.rs
//!
//! Defines the service contracts (traits) at the boundary of the core.
//! These traits keep the core independent of specific external
//! implementations such as the on-disk store or the system clock.
//!
//! Everything here is synchronous: one logical operation is in flight at
//! a time and runs to completion before the next begins.

use chrono::{DateTime, Utc};

use crate::library::Library;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of external collaborators
/// (filesystem, serialization, ...).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Supplies the current instant. Core operations take the instant as an
/// explicit argument so that a single operation observes a single `now`.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Produces identifiers for newly created records.
///
/// The core requires only uniqueness within the respective collection;
/// the concrete formats are an adapter concern.
pub trait IdProvider {
    /// Identifier for a newly registered reader.
    fn reader_id(&self, phone: &str, now: DateTime<Utc>) -> String;
    /// Identifier for a new loan ledger entry.
    fn issue_id(&self) -> String;
    /// Identifier for a new payment record.
    fn payment_id(&self, now: DateTime<Utc>) -> String;
    /// Identifier for a new membership record.
    fn membership_id(&self, phone: &str, now: DateTime<Utc>) -> String;
    /// Reference string attached to a completed payment.
    fn transaction_ref(&self) -> String;
    /// A plausibly-unique ISBN-13 for a newly catalogued book.
    fn isbn13(&self) -> String;
}

/// Loads the whole library state at startup and persists a full snapshot
/// after each successful mutating operation.
pub trait StateStore {
    fn load(&self) -> PortResult<Library>;
    fn save(&self, library: &Library) -> PortResult<()>;
}
