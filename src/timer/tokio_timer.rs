// SPDX-License-Identifier: MPL-2.0
//! Dismissal timer backed by a tokio runtime.

use super::{CancelHandle, DismissalTimer, TimerCallback};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

struct Slot {
    on_fire: TimerCallback,
    task: Option<AbortHandle>,
}

/// Armed callbacks keyed by handle. Firing and cancelling both remove the
/// slot under the lock, so exactly one of them wins.
type Slots = Arc<Mutex<HashMap<u64, Slot>>>;

/// [`DismissalTimer`] that sleeps on a tokio runtime.
pub struct TokioTimer {
    runtime: Handle,
    slots: Slots,
    next_id: AtomicU64,
}

impl TokioTimer {
    /// Creates a timer spawning onto `runtime`.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            slots: Arc::default(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Creates a timer on the runtime of the calling context, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of timers armed and not yet fired or cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.lock().len()
    }
}

impl DismissalTimer for TokioTimer {
    fn arm(&self, duration: Duration, on_fire: TimerCallback) -> CancelHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().insert(
            id,
            Slot {
                on_fire,
                task: None,
            },
        );

        let slots = Arc::clone(&self.slots);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            let slot = slots.lock().remove(&id);
            if let Some(slot) = slot {
                (slot.on_fire)();
            }
        });

        if let Some(slot) = self.slots.lock().get_mut(&id) {
            slot.task = Some(task.abort_handle());
        }

        CancelHandle::from_raw(id)
    }

    fn cancel(&self, handle: CancelHandle) {
        let slot = self.slots.lock().remove(&handle.raw());
        if let Some(task) = slot.and_then(|slot| slot.task) {
            task.abort();
        }
    }
}

impl fmt::Debug for TokioTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioTimer")
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
