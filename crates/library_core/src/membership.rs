//! crates/library_core/src/membership.rs
//!
//! The membership registry: plan lookup with lazy expiry, and plan
//! purchase with its payment precondition.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    Membership, MembershipPlan, MembershipStatus, PaymentMethod, PaymentPurpose, PaymentRecord,
};
use crate::error::LibraryResult;
use crate::library::Library;
use crate::ports::IdProvider;

/// Plan durations are flat 30-day months.
const DAYS_PER_MONTH: i64 = 30;

impl Library {
    /// The reader's active membership, if any.
    ///
    /// An active record whose expiry has passed is demoted to `Expired`
    /// here, as a side effect of the read; expiry is never applied
    /// proactively anywhere else.
    pub fn active_membership_for(&mut self, phone: &str, now: DateTime<Utc>) -> Option<Membership> {
        for m in &mut self.memberships {
            if m.reader_phone != phone || m.status != MembershipStatus::Active {
                continue;
            }
            if m.expires_at > now {
                return Some(m.clone());
            }
            m.status = MembershipStatus::Expired;
        }
        None
    }

    /// Purchases (or upgrades to) `plan` for a registered reader.
    ///
    /// The plan fee is charged first; only after the payment record
    /// exists is any prior active membership demoted to `Replaced` and
    /// the new record inserted, so a reader never ends up with two
    /// active records.
    pub fn purchase_membership(
        &mut self,
        phone: &str,
        plan: MembershipPlan,
        method: PaymentMethod,
        ids: &dyn IdProvider,
        now: DateTime<Utc>,
    ) -> LibraryResult<(Membership, PaymentRecord)> {
        let reader_name = self.require_reader(phone)?.name.clone();

        let payment = self.record_payment(
            phone,
            plan.fee(),
            PaymentPurpose::MembershipFee,
            method,
            format!("{plan} Membership"),
            ids,
            now,
        )?;

        for m in &mut self.memberships {
            if m.reader_phone == phone && m.status == MembershipStatus::Active {
                m.status = MembershipStatus::Replaced;
            }
        }

        let membership = Membership {
            id: ids.membership_id(phone, now),
            reader_name,
            reader_phone: phone.to_string(),
            plan,
            started_at: now,
            expires_at: now + Duration::days(plan.duration_months() * DAYS_PER_MONTH),
            status: MembershipStatus::Active,
            book_limit: plan.book_limit(),
            discount_percent: plan.discount_percent(),
        };
        self.memberships.push(membership.clone());
        Ok((membership, payment))
    }
}
