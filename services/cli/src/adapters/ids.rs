//! services/cli/src/adapters/ids.rs
//!
//! The concrete implementation of the `IdProvider` port. Identifier
//! formats follow the conventions of the existing data files; the core
//! only relies on uniqueness, which comes from UUID v4 entropy.

use chrono::{DateTime, Utc};
use library_core::IdProvider;
use uuid::Uuid;

/// An adapter that implements the `IdProvider` port using `uuid` and
/// timestamp prefixes.
#[derive(Clone, Copy, Default)]
pub struct GeneratedIds;

impl GeneratedIds {
    /// A pseudo-random number in `[lo, hi)` drawn from UUID entropy.
    fn random_in(lo: u64, hi: u64) -> u64 {
        let bytes = Uuid::new_v4().into_bytes();
        let mut x = 0u64;
        for b in &bytes[..8] {
            x = (x << 8) | u64::from(*b);
        }
        lo + x % (hi - lo)
    }

    fn last_four(phone: &str) -> &str {
        let start = phone.len().saturating_sub(4);
        phone.get(start..).unwrap_or(phone)
    }
}

impl IdProvider for GeneratedIds {
    fn reader_id(&self, phone: &str, now: DateTime<Utc>) -> String {
        format!("READ{}{}", Self::last_four(phone), now.format("%m%d"))
    }

    fn issue_id(&self) -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("ISSUE-{}", &hex[..8])
    }

    fn payment_id(&self, now: DateTime<Utc>) -> String {
        format!("PAY{}{}", now.format("%Y%d%m%H%M"), Self::random_in(100, 1000))
    }

    fn membership_id(&self, phone: &str, now: DateTime<Utc>) -> String {
        format!("MEM{}{}", Self::last_four(phone), now.format("%Y%m"))
    }

    fn transaction_ref(&self) -> String {
        format!("TXN{}", Self::random_in(100_000, 1_000_000))
    }

    /// A random `978`-prefixed ISBN-13 with a valid check digit.
    fn isbn13(&self) -> String {
        let entropy = Uuid::new_v4().into_bytes();
        let mut digits: Vec<u32> = vec![9, 7, 8];
        digits.extend(entropy[..9].iter().map(|b| u32::from(b % 10)));

        // Alternating 1/3 weights over the first twelve digits.
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
            .sum();
        digits.push((10 - sum % 10) % 10);

        digits.into_iter().map(|d| char::from_digit(d, 10).unwrap_or('0')).collect()
    }
}
