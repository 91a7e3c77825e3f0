// SPDX-License-Identifier: MPL-2.0
//! Deferred, cancellable dismissal.
//!
//! A [`DismissalTimer`] runs one callback once after a delay. Cancelling is
//! synchronous: once `cancel` returns, the callback will not run.
//!
//! - [`TokioTimer`] schedules on a tokio runtime
//! - [`ManualClock`](crate::testing::ManualClock) fires on explicit
//!   `advance` calls, for tests

mod tokio_timer;

pub use tokio_timer::TokioTimer;

use crate::config::{DEFAULT_AUTO_DISMISS_TIMEOUT_MS, MIN_AUTO_DISMISS_TIMEOUT_MS};
use std::time::Duration;

/// Callback run when a timer fires.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CancelHandle(u64);

impl CancelHandle {
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Schedules single deferred callbacks.
pub trait DismissalTimer: Send + Sync {
    /// Runs `on_fire` once after `duration`, unless cancelled first.
    fn arm(&self, duration: Duration, on_fire: TimerCallback) -> CancelHandle;

    /// Cancels an armed timer. Cancelling a fired or unknown handle is a no-op.
    fn cancel(&self, handle: CancelHandle);
}

/// Auto-dismiss delay in milliseconds.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is never zero. There is no upper bound.
///
/// # Example
///
/// ```
/// use banner_engine::timer::AutoDismissTimeout;
///
/// let timeout = AutoDismissTimeout::new(1_000);
/// assert_eq!(timeout.as_millis(), 1_000);
///
/// // Zero is raised to the minimum; long delays are kept as given
/// assert_eq!(AutoDismissTimeout::new(0).as_millis(), 1);
/// assert_eq!(AutoDismissTimeout::new(900_000).as_millis(), 900_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AutoDismissTimeout(u64);

impl AutoDismissTimeout {
    /// Creates a new timeout, raising zero to the minimum.
    #[must_use]
    pub fn new(millis: u64) -> Self {
        Self(millis.max(MIN_AUTO_DISMISS_TIMEOUT_MS))
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for AutoDismissTimeout {
    fn default() -> Self {
        Self(DEFAULT_AUTO_DISMISS_TIMEOUT_MS)
    }
}

impl From<Duration> for AutoDismissTimeout {
    fn from(duration: Duration) -> Self {
        Self::new(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}
