// SPDX-License-Identifier: MPL-2.0
//! Wall-clock abstraction used for expiry decisions.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Injected into the engine so expiry can be decided against a fake clock
/// in tests (see [`ManualClock`](crate::testing::ManualClock)).
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
