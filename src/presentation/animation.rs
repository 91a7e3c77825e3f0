// SPDX-License-Identifier: MPL-2.0
//! Animation intents handed to an external renderer.
//!
//! The engine never tweens. It tells the renderer to start the enter or the
//! exit transition. The exit transition carries an [`ExitCompletion`] that
//! the renderer must run when the animation finishes; only then does the
//! session become hidden and the notification get marked as seen.

use crate::notification::NotificationId;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Directional cue for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationCue {
    Enter,
    Exit,
}

/// Receives animation cues for a single banner.
pub trait AnimationRenderer: Send + Sync {
    /// Starts the show transition. Nothing waits on it finishing.
    fn on_enter_start(&self, id: &NotificationId);

    /// Starts the hide transition. `completion` must be run once it ends.
    fn on_exit_start(&self, id: &NotificationId, completion: ExitCompletion);
}

/// One-shot signal that the exit animation ended.
///
/// Keeps its session alive, even after the handle is dropped, until it is
/// run or dropped.
#[must_use = "the session stays in `Dismissing` until the completion runs"]
pub struct ExitCompletion {
    on_complete: Box<dyn FnOnce() + Send + 'static>,
}

impl ExitCompletion {
    pub(crate) fn new(on_complete: impl FnOnce() + Send + 'static) -> Self {
        Self {
            on_complete: Box::new(on_complete),
        }
    }

    /// Signals that the exit animation ended.
    pub fn complete(self) {
        (self.on_complete)();
    }
}

impl fmt::Debug for ExitCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitCompletion").finish_non_exhaustive()
    }
}

/// Forwards cues to a renderer, each at most once.
pub(crate) struct CueEmitter {
    renderer: Arc<dyn AnimationRenderer>,
    entered: AtomicBool,
    exited: AtomicBool,
}

impl CueEmitter {
    pub(crate) fn new(renderer: Arc<dyn AnimationRenderer>) -> Self {
        Self {
            renderer,
            entered: AtomicBool::new(false),
            exited: AtomicBool::new(false),
        }
    }

    pub(crate) fn enter(&self, id: &NotificationId) {
        if self.entered.swap(true, Ordering::SeqCst) {
            tracing::warn!(%id, cue = ?AnimationCue::Enter, "cue already emitted");
            return;
        }
        self.renderer.on_enter_start(id);
    }

    pub(crate) fn exit(&self, id: &NotificationId, completion: ExitCompletion) {
        if self.exited.swap(true, Ordering::SeqCst) {
            tracing::warn!(%id, cue = ?AnimationCue::Exit, "cue already emitted");
            return;
        }
        self.renderer.on_exit_start(id, completion);
    }

    pub(crate) fn emitted(&self) -> Vec<AnimationCue> {
        let mut cues = Vec::new();
        if self.entered.load(Ordering::SeqCst) {
            cues.push(AnimationCue::Enter);
        }
        if self.exited.load(Ordering::SeqCst) {
            cues.push(AnimationCue::Exit);
        }
        cues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRenderer;

    #[test]
    fn cues_are_forwarded_once() {
        let renderer = Arc::new(RecordingRenderer::new());
        let emitter = CueEmitter::new(renderer.clone());
        let id = NotificationId::new("n1");

        emitter.enter(&id);
        emitter.enter(&id);
        emitter.exit(&id, ExitCompletion::new(|| {}));
        emitter.exit(&id, ExitCompletion::new(|| {}));

        assert_eq!(renderer.cues(), vec![AnimationCue::Enter, AnimationCue::Exit]);
        assert_eq!(emitter.emitted(), vec![AnimationCue::Enter, AnimationCue::Exit]);
    }

    #[test]
    fn completion_runs_its_callback() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        ExitCompletion::new(move || flag.store(true, Ordering::SeqCst)).complete();
        assert!(ran.load(Ordering::SeqCst));
    }
}
