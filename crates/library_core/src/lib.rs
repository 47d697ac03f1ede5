pub mod catalog;
pub mod domain;
pub mod error;
pub mod fines;
pub mod ledger;
pub mod library;
pub mod membership;
pub mod payments;
pub mod ports;

#[cfg(test)]
pub(crate) mod testutil;

pub use domain::{
    Book, BookPatch, BookSpec, LoanRecord, LoanStatus, Membership, MembershipPlan,
    MembershipStatus, Money, PaymentMethod, PaymentPurpose, PaymentRecord, PaymentStatus, Reader,
    ReaderSpec, SearchField, DAILY_FINE_RATE, LOAN_PERIOD_DAYS, NON_MEMBER_BOOK_LIMIT,
};
pub use error::{LibraryError, LibraryResult};
pub use fines::{FineSettlement, OverdueLine};
pub use library::Library;
pub use payments::BookPurchase;
pub use ports::{Clock, IdProvider, PortError, PortResult, StateStore};
