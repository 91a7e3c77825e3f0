// SPDX-License-Identifier: MPL-2.0
//! Caller-facing presentation API.
//!
//! [`Engine::present`] validates a notification, gathers the seen and
//! expiry facts, mounts a [`Session`] and returns a [`SessionHandle`]. The
//! handle is the session's lifetime: dropping it tears the session down and
//! cancels any outstanding dismissal timer. An exit animation already
//! running keeps the session alive until its [`ExitCompletion`] runs.
//!
//! Effects are carried out with no lock held, so renderers and timers may
//! call back into the session synchronously.

use super::animation::{AnimationCue, AnimationRenderer, CueEmitter, ExitCompletion};
use super::state::{Effect, Event, HiddenReason, MountCheck, PresentationState, Session};
use crate::clock::Clock;
use crate::config::{Config, DEFAULT_AUTO_DISMISS};
use crate::error::PresentError;
use crate::notification::{is_expired, Notification, NotificationId};
use crate::seen_set::{SeenSet, SeenSetStore};
use crate::storage::KeyValueStorage;
use crate::timer::{AutoDismissTimeout, CancelHandle, DismissalTimer};
use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};

/// Invoked with the notification id once a dismissal has been persisted.
pub type DismissCallback = Arc<dyn Fn(&NotificationId) + Send + Sync>;

/// Per-notification presentation options.
#[derive(Clone)]
pub struct PresentOptions {
    pub auto_dismiss: bool,
    pub auto_dismiss_timeout: AutoDismissTimeout,
    pub dismiss_callback: Option<DismissCallback>,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            auto_dismiss: DEFAULT_AUTO_DISMISS,
            auto_dismiss_timeout: AutoDismissTimeout::default(),
            dismiss_callback: None,
        }
    }
}

impl PresentOptions {
    /// Options taken from the `[presentation]` settings.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            auto_dismiss: config.presentation.auto_dismiss(),
            auto_dismiss_timeout: config.presentation.auto_dismiss_timeout(),
            dismiss_callback: None,
        }
    }

    #[must_use]
    pub fn with_auto_dismiss(mut self, enabled: bool) -> Self {
        self.auto_dismiss = enabled;
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, millis: u64) -> Self {
        self.auto_dismiss_timeout = AutoDismissTimeout::new(millis);
        self
    }

    #[must_use]
    pub fn on_dismiss(mut self, callback: impl Fn(&NotificationId) + Send + Sync + 'static) -> Self {
        self.dismiss_callback = Some(Arc::new(callback));
        self
    }
}

impl fmt::Debug for PresentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentOptions")
            .field("auto_dismiss", &self.auto_dismiss)
            .field("auto_dismiss_timeout", &self.auto_dismiss_timeout)
            .field("dismiss_callback", &self.dismiss_callback.is_some())
            .finish()
    }
}

/// Shared collaborators for every session it presents.
///
/// Sessions are independent: the engine imposes no ordering between
/// notifications presented at the same time.
pub struct Engine {
    seen: Arc<dyn SeenSet>,
    clock: Arc<dyn Clock>,
    timer: Arc<dyn DismissalTimer>,
    defaults: PresentOptions,
}

impl Engine {
    pub fn new(
        seen: Arc<dyn SeenSet>,
        clock: Arc<dyn Clock>,
        timer: Arc<dyn DismissalTimer>,
    ) -> Self {
        Self {
            seen,
            clock,
            timer,
            defaults: PresentOptions::default(),
        }
    }

    /// Builds an engine whose seen-set lives in `storage` under the
    /// configured key, with default options taken from `config`.
    pub fn from_config<S>(
        config: &Config,
        storage: S,
        clock: Arc<dyn Clock>,
        timer: Arc<dyn DismissalTimer>,
    ) -> Self
    where
        S: KeyValueStorage + 'static,
    {
        let seen = SeenSetStore::with_key(storage, config.storage.seen_set_key());
        Self::new(Arc::new(seen), clock, timer).with_defaults(PresentOptions::from_config(config))
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: PresentOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Default options, to be adjusted per call.
    #[must_use]
    pub fn options(&self) -> PresentOptions {
        self.defaults.clone()
    }

    /// Starts a presentation session for `notification`.
    ///
    /// Seen and expired notifications produce a handle that is already
    /// hidden; no animation cue is emitted and no timer is armed for them.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::InvalidNotification`] before any transition
    /// if the notification fails validation.
    pub fn present(
        &self,
        notification: Notification,
        options: PresentOptions,
        renderer: Arc<dyn AnimationRenderer>,
    ) -> Result<SessionHandle, PresentError> {
        notification.validate()?;

        let already_seen = self.seen.has(notification.id());
        let expired = is_expired(&notification, self.clock.now());
        let check = MountCheck {
            already_seen,
            expired,
            auto_dismiss: options
                .auto_dismiss
                .then(|| options.auto_dismiss_timeout.as_duration()),
        };

        if already_seen {
            tracing::debug!(id = %notification.id(), "skipping notification already seen");
        } else if expired {
            tracing::debug!(id = %notification.id(), "skipping expired notification");
        }

        let machine = Session::new(
            notification.id().clone(),
            notification.is_dismissible(),
            notification.action().is_some(),
        );
        let inner = Arc::new(SessionInner {
            notification,
            machine: Mutex::new(machine),
            timer_handle: Mutex::new(None),
            cues: CueEmitter::new(renderer),
            seen: Arc::clone(&self.seen),
            timer: Arc::clone(&self.timer),
            on_dismissed: options.dismiss_callback,
        });

        let effects = inner.machine.lock().mount(check);
        inner.apply(effects);

        Ok(SessionHandle { inner })
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

struct SessionInner {
    notification: Notification,
    machine: Mutex<Session>,
    timer_handle: Mutex<Option<CancelHandle>>,
    cues: CueEmitter,
    seen: Arc<dyn SeenSet>,
    timer: Arc<dyn DismissalTimer>,
    on_dismissed: Option<DismissCallback>,
}

impl SessionInner {
    fn id(&self) -> &NotificationId {
        self.notification.id()
    }

    fn dispatch(self: &Arc<Self>, event: Event) {
        let effects = self.machine.lock().handle(event);
        self.apply(effects);
    }

    fn apply(self: &Arc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::EmitEnter => self.cues.enter(self.id()),
                Effect::ArmTimer(duration) => {
                    let session = Arc::downgrade(self);
                    let handle = self.timer.arm(
                        duration,
                        Box::new(move || dispatch_weak(&session, Event::TimerFired)),
                    );
                    *self.timer_handle.lock() = Some(handle);
                }
                Effect::CancelTimer => {
                    let handle = self.timer_handle.lock().take();
                    if let Some(handle) = handle {
                        self.timer.cancel(handle);
                    }
                }
                Effect::RunAction => {
                    if let Some(action) = self.notification.action() {
                        action.invoke();
                    }
                }
                Effect::EmitExit => {
                    // Strong: teardown must not lose the dismissal.
                    let session = Arc::clone(self);
                    let completion = ExitCompletion::new(move || {
                        session.dispatch(Event::ExitCompleted);
                    });
                    self.cues.exit(self.id(), completion);
                }
                Effect::PersistSeen => self.seen.add(self.id()),
                Effect::NotifyDismissed => {
                    if let Some(callback) = &self.on_dismissed {
                        callback(self.id());
                    }
                }
            }
        }
    }
}

/// Delivers an event to a session that may already be gone.
fn dispatch_weak(session: &Weak<SessionInner>, event: Event) {
    match session.upgrade() {
        Some(session) => session.dispatch(event),
        None => tracing::debug!(?event, "dropping event for discarded session"),
    }
}

/// A live presentation session.
///
/// Renderer input is forwarded through [`request_dismiss`](Self::request_dismiss)
/// and [`invoke_action`](Self::invoke_action). Dropping the handle unmounts
/// the banner.
pub struct SessionHandle {
    inner: Arc<SessionInner>,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> &NotificationId {
        self.inner.id()
    }

    #[must_use]
    pub fn notification(&self) -> &Notification {
        &self.inner.notification
    }

    #[must_use]
    pub fn state(&self) -> PresentationState {
        self.inner.machine.lock().state()
    }

    #[must_use]
    pub fn hidden_reason(&self) -> Option<HiddenReason> {
        self.inner.machine.lock().hidden_reason()
    }

    /// Cues emitted to the renderer so far.
    #[must_use]
    pub fn cues(&self) -> Vec<AnimationCue> {
        self.inner.cues.emitted()
    }

    /// The user asked to close the banner.
    pub fn request_dismiss(&self) {
        self.inner.dispatch(Event::DismissRequested);
    }

    /// The user triggered the notification's action.
    pub fn invoke_action(&self) {
        self.inner.dispatch(Event::ActionInvoked);
    }

    /// Unmounts the banner. Also performed on drop.
    pub fn teardown(&self) {
        self.inner.dispatch(Event::Teardown);
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.inner.dispatch(Event::Teardown);
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", self.id())
            .field("state", &self.state())
            .finish()
    }
}
