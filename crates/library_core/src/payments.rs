//! crates/library_core/src/payments.rs
//!
//! The payment recorder: an append-only ledger of completed payments,
//! plus the over-the-counter book purchase that prices against the
//! buyer's membership discount.

use chrono::{DateTime, Utc};

use crate::domain::{
    Money, PaymentMethod, PaymentPurpose, PaymentRecord, PaymentStatus,
};
use crate::error::{LibraryError, LibraryResult};
use crate::library::Library;
use crate::ports::IdProvider;

/// A priced and paid book purchase.
#[derive(Debug, Clone)]
pub struct BookPurchase {
    pub payment: PaymentRecord,
    pub book_title: String,
    pub original_price: Money,
    pub discount_percent: u8,
    pub final_price: Money,
}

impl Library {
    /// Appends a completed payment for a registered reader.
    ///
    /// The amount must be positive; beyond that a payment always
    /// succeeds, since collecting a live gateway response is outside
    /// this system. Records are never mutated or removed.
    pub fn record_payment(
        &mut self,
        phone: &str,
        amount: Money,
        purpose: PaymentPurpose,
        method: PaymentMethod,
        description: String,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<PaymentRecord> {
        if amount <= 0 {
            return Err(LibraryError::InvalidAmount);
        }
        self.require_reader(phone)?;

        let record = PaymentRecord {
            payment_id: ids.payment_id(now),
            reader_phone: phone.to_string(),
            amount,
            method,
            purpose,
            description,
            paid_at: now,
            status: PaymentStatus::Completed,
            transaction_ref: ids.transaction_ref(),
        };
        self.payments.push(record.clone());
        Ok(record)
    }

    /// The reader's payment history, in insertion order.
    pub fn payments_for(&self, phone: &str) -> Vec<&PaymentRecord> {
        self.payments.iter().filter(|p| p.reader_phone == phone).collect()
    }

    /// Sells a matching book to a reader, applying the discount of an
    /// active membership to the catalog price.
    pub fn purchase_book(
        &mut self,
        phone: &str,
        title: &str,
        method: PaymentMethod,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<BookPurchase> {
        let discount = self
            .active_membership_for(phone, now)
            .map_or(0, |m| m.discount_percent);

        let book = self
            .match_book(title)
            .ok_or_else(|| LibraryError::BookNotFound(title.to_string()))?;
        let book_title = book.title.clone();
        let original_price = book.price;
        let final_price = original_price - original_price * Money::from(discount) / 100;

        let payment = self.record_payment(
            phone,
            final_price,
            PaymentPurpose::Purchase,
            method,
            format!("Purchase: {book_title}"),
            ids,
            now,
        )?;

        Ok(BookPurchase {
            payment,
            book_title,
            original_price,
            discount_percent: discount,
            final_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{MembershipPlan, PaymentMethod, PaymentPurpose, PaymentStatus};
    use crate::error::LibraryError;
    use crate::library::Library;
    use crate::testutil::{book_spec, day, register, SeqIds};

    const PHONE: &str = "9876543210";

    fn setup() -> (Library, SeqIds) {
        let ids = SeqIds::new();
        let mut lib = Library::new();
        lib.add_book(book_spec("Dune"), &ids).unwrap();
        register(&mut lib, PHONE, &ids);
        (lib, ids)
    }

    #[test]
    fn amounts_must_be_positive() {
        let (mut lib, ids) = setup();
        for amount in [0, -50] {
            let err = lib
                .record_payment(
                    PHONE,
                    amount,
                    PaymentPurpose::Fine,
                    PaymentMethod::Cash,
                    "bad".to_string(),
                    &ids,
                    day(0),
                )
                .unwrap_err();
            assert_eq!(err, LibraryError::InvalidAmount);
        }
        assert!(lib.payments().is_empty());
    }

    #[test]
    fn recorded_payments_complete_with_a_transaction_ref() {
        let (mut lib, ids) = setup();
        let payment = lib
            .record_payment(
                PHONE,
                500,
                PaymentPurpose::MembershipFee,
                PaymentMethod::NetBanking,
                "Basic Membership".to_string(),
                &ids,
                day(0),
            )
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_ref.starts_with("TXN"));
        assert_eq!(lib.payments_for(PHONE).len(), 1);
    }

    #[test]
    fn a_vip_pays_160_for_a_200_book() {
        let (mut lib, ids) = setup();
        lib.purchase_membership(PHONE, MembershipPlan::Vip, PaymentMethod::Cash, &ids, day(0))
            .unwrap();

        let purchase = lib
            .purchase_book(PHONE, "Dune", PaymentMethod::Card, &ids, day(1))
            .unwrap();
        assert_eq!(purchase.original_price, 200);
        assert_eq!(purchase.discount_percent, 20);
        assert_eq!(purchase.final_price, 160);
        assert_eq!(purchase.payment.amount, 160);
    }

    #[test]
    fn non_members_pay_the_catalog_price() {
        let (mut lib, ids) = setup();
        let purchase = lib
            .purchase_book(PHONE, "Dune", PaymentMethod::Cash, &ids, day(0))
            .unwrap();
        assert_eq!(purchase.final_price, 200);
        assert_eq!(purchase.discount_percent, 0);
    }
}
