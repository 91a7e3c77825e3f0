// SPDX-License-Identifier: MPL-2.0
//! Deterministic collaborators for exercising the engine in tests.
//!
//! - [`ManualClock`] - virtual time that is both the [`Clock`] and the
//!   [`DismissalTimer`]; nothing happens until [`ManualClock::advance`]
//! - [`RecordingRenderer`] - records cues and holds exit completions
//! - [`FailingStorage`] - storage whose reads or writes always fail

use crate::clock::Clock;
use crate::error::StorageError;
use crate::notification::NotificationId;
use crate::presentation::{AnimationCue, AnimationRenderer, ExitCompletion};
use crate::storage::KeyValueStorage;
use crate::timer::{CancelHandle, DismissalTimer, TimerCallback};
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Start of virtual time: 2024-01-01T00:00:00Z.
const DEFAULT_START_SECS: i64 = 1_704_067_200;

struct PendingTimer {
    id: u64,
    deadline: Duration,
    on_fire: TimerCallback,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
}

/// Virtual clock and timer.
pub struct ManualClock {
    start: DateTime<Utc>,
    state: Mutex<ManualState>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(DateTime::from_timestamp(DEFAULT_START_SECS, 0).unwrap_or_default())
    }

    #[must_use]
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            state: Mutex::new(ManualState::default()),
        }
    }

    /// Virtual time elapsed since construction.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed
    }

    /// Number of armed timers that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Moves time forward, firing every timer whose deadline is reached, in
    /// deadline order. Callbacks run without the clock locked and may arm or
    /// cancel other timers.
    pub fn advance(&self, by: Duration) {
        let target = {
            let mut state = self.state.lock();
            state.elapsed = state.elapsed.saturating_add(by);
            state.elapsed
        };

        while let Some(timer) = self.take_due(target) {
            (timer.on_fire)();
        }
    }

    fn take_due(&self, now: Duration) -> Option<PendingTimer> {
        let mut state = self.state.lock();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.id))
            .map(|(index, _)| index)?;
        Some(state.pending.remove(index))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.elapsed()).unwrap_or(TimeDelta::MAX);
        self.start
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl DismissalTimer for ManualClock {
    fn arm(&self, duration: Duration, on_fire: TimerCallback) -> CancelHandle {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.elapsed.saturating_add(duration);
        state.pending.push(PendingTimer {
            id,
            deadline,
            on_fire,
        });
        CancelHandle::from_raw(id)
    }

    fn cancel(&self, handle: CancelHandle) {
        let removed = {
            let mut state = self.state.lock();
            let index = state
                .pending
                .iter()
                .position(|timer| timer.id == handle.raw());
            index.map(|index| state.pending.remove(index))
        };
        // Dropped outside the lock; the callback may own other handles.
        drop(removed);
    }
}

/// Renderer that records cues.
///
/// By default exit completions are held until [`complete_exits`](Self::complete_exits);
/// an [`auto_completing`](Self::auto_completing) renderer finishes every
/// exit immediately.
#[derive(Default)]
pub struct RecordingRenderer {
    auto_complete: bool,
    cues: Mutex<Vec<(NotificationId, AnimationCue)>>,
    completions: Mutex<Vec<ExitCompletion>>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auto_completing() -> Self {
        Self {
            auto_complete: true,
            ..Self::default()
        }
    }

    /// Every cue received, in order.
    #[must_use]
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.cues.lock().iter().map(|(_, cue)| *cue).collect()
    }

    /// Cues received for one notification.
    #[must_use]
    pub fn cues_for(&self, id: &NotificationId) -> Vec<AnimationCue> {
        self.cues
            .lock()
            .iter()
            .filter(|(cue_id, _)| cue_id == id)
            .map(|(_, cue)| *cue)
            .collect()
    }

    #[must_use]
    pub fn pending_exits(&self) -> usize {
        self.completions.lock().len()
    }

    /// Finishes every held exit animation. Returns how many were finished.
    pub fn complete_exits(&self) -> usize {
        let completions = std::mem::take(&mut *self.completions.lock());
        let count = completions.len();
        for completion in completions {
            completion.complete();
        }
        count
    }
}

impl AnimationRenderer for RecordingRenderer {
    fn on_enter_start(&self, id: &NotificationId) {
        self.cues.lock().push((id.clone(), AnimationCue::Enter));
    }

    fn on_exit_start(&self, id: &NotificationId, completion: ExitCompletion) {
        self.cues.lock().push((id.clone(), AnimationCue::Exit));
        if self.auto_complete {
            completion.complete();
        } else {
            self.completions.lock().push(completion);
        }
    }
}

/// Storage that fails on read, on write, or both.
#[derive(Debug, Default)]
pub struct FailingStorage {
    fail_reads: bool,
    fail_writes: bool,
    write_attempts: AtomicUsize,
}

impl FailingStorage {
    /// `get` fails; `set` is accepted and discarded.
    #[must_use]
    pub fn unreadable() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// `get` finds nothing; `set` fails.
    #[must_use]
    pub fn unwritable() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

impl KeyValueStorage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read("storage offline".to_string()));
        }
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(StorageError::Write("storage is read-only".to_string()));
        }
        Ok(())
    }
}
