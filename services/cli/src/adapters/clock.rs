//! services/cli/src/adapters/clock.rs
//!
//! The wall-clock implementation of the `Clock` port.

use chrono::{DateTime, Utc};
use library_core::Clock;

/// An adapter that implements the `Clock` port with the system clock.
#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
