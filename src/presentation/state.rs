// SPDX-License-Identifier: MPL-2.0
//! Presentation state machine.
//!
//! [`Session`] holds no collaborators. Each transition returns the
//! [`Effect`]s the engine must carry out, in order:
//!
//! ```text
//! Pending ──seen/expired──────────────────────────────▶ Hidden
//!    │
//!    └─mount─▶ Visible ──timer/dismiss/action─▶ Dismissing ──exit complete─▶ Hidden
//!                 │
//!                 └────────────── teardown ─────────────────────────────────▶ Hidden
//! ```
//!
//! Teardown while `Dismissing` only cancels the timer. The running exit
//! animation still completes and the dismissal is still persisted.

use crate::notification::NotificationId;
use std::fmt;
use std::time::Duration;

/// Visual state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresentationState {
    #[default]
    Pending,
    Visible,
    Dismissing,
    /// Terminal.
    Hidden,
}

impl PresentationState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == PresentationState::Hidden
    }
}

impl fmt::Display for PresentationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PresentationState::Pending => "pending",
            PresentationState::Visible => "visible",
            PresentationState::Dismissing => "dismissing",
            PresentationState::Hidden => "hidden",
        };
        f.write_str(name)
    }
}

/// Facts gathered before mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountCheck {
    pub already_seen: bool,
    pub expired: bool,
    /// `None` disables auto-dismiss.
    pub auto_dismiss: Option<Duration>,
}

/// External events driving a mounted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TimerFired,
    DismissRequested,
    ActionInvoked,
    ExitCompleted,
    Teardown,
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    EmitEnter,
    ArmTimer(Duration),
    CancelTimer,
    RunAction,
    EmitExit,
    PersistSeen,
    NotifyDismissed,
}

/// Why a session ended up hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HiddenReason {
    AlreadySeen,
    Expired,
    Dismissed,
    TornDown,
}

/// State machine for one notification during one mount.
#[derive(Debug, Clone)]
pub struct Session {
    id: NotificationId,
    state: PresentationState,
    dismissible: bool,
    has_action: bool,
    timer_armed: bool,
    seen_write_in_flight: bool,
    hidden_reason: Option<HiddenReason>,
}

impl Session {
    #[must_use]
    pub fn new(id: NotificationId, dismissible: bool, has_action: bool) -> Self {
        Self {
            id,
            state: PresentationState::Pending,
            dismissible,
            has_action,
            timer_armed: false,
            seen_write_in_flight: false,
            hidden_reason: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> PresentationState {
        self.state
    }

    #[must_use]
    pub fn hidden_reason(&self) -> Option<HiddenReason> {
        self.hidden_reason
    }

    /// Whether a dismissal timer is armed and may still fire.
    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.timer_armed
    }

    /// Leaves `Pending`, either becoming visible or going straight to hidden.
    ///
    /// Only the first call has an effect.
    pub fn mount(&mut self, check: MountCheck) -> Vec<Effect> {
        if self.state != PresentationState::Pending {
            tracing::warn!(id = %self.id, state = %self.state, "session already mounted");
            return Vec::new();
        }

        if check.already_seen {
            self.hide(HiddenReason::AlreadySeen);
            return Vec::new();
        }
        if check.expired {
            self.hide(HiddenReason::Expired);
            return Vec::new();
        }

        self.transition(PresentationState::Visible);
        let mut effects = vec![Effect::EmitEnter];
        if let Some(duration) = check.auto_dismiss {
            self.timer_armed = true;
            effects.push(Effect::ArmTimer(duration));
        }
        effects
    }

    /// Applies an event. Events that are not valid in the current state are
    /// ignored and produce no effects.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match (self.state, event) {
            (PresentationState::Visible, Event::TimerFired) => {
                self.timer_armed = false;
                self.begin_dismiss(Vec::new())
            }
            (PresentationState::Visible, Event::DismissRequested) => {
                if self.dismissible {
                    self.begin_dismiss(Vec::new())
                } else {
                    tracing::warn!(id = %self.id, "ignoring dismiss of non-dismissible notification");
                    Vec::new()
                }
            }
            (PresentationState::Visible, Event::ActionInvoked) => {
                if self.has_action {
                    self.begin_dismiss(vec![Effect::RunAction])
                } else {
                    tracing::warn!(id = %self.id, "ignoring action on notification without one");
                    Vec::new()
                }
            }
            (PresentationState::Dismissing, Event::ExitCompleted) => {
                self.hide(HiddenReason::Dismissed);
                if self.seen_write_in_flight {
                    return Vec::new();
                }
                self.seen_write_in_flight = true;
                vec![Effect::PersistSeen, Effect::NotifyDismissed]
            }
            (PresentationState::Visible, Event::Teardown) => {
                self.hide(HiddenReason::TornDown);
                self.cancel_timer()
            }
            (PresentationState::Dismissing | PresentationState::Hidden, Event::Teardown) => {
                self.cancel_timer()
            }
            (PresentationState::Pending, Event::Teardown) => {
                self.hide(HiddenReason::TornDown);
                Vec::new()
            }
            (state, Event::TimerFired) => {
                self.timer_armed = false;
                tracing::warn!(id = %self.id, %state, "ignoring stale timer fire");
                Vec::new()
            }
            (state, event) => {
                tracing::debug!(id = %self.id, %state, ?event, "ignoring event");
                Vec::new()
            }
        }
    }

    fn begin_dismiss(&mut self, mut effects: Vec<Effect>) -> Vec<Effect> {
        self.transition(PresentationState::Dismissing);
        effects.push(Effect::EmitExit);
        effects
    }

    fn cancel_timer(&mut self) -> Vec<Effect> {
        if self.timer_armed {
            self.timer_armed = false;
            vec![Effect::CancelTimer]
        } else {
            Vec::new()
        }
    }

    fn hide(&mut self, reason: HiddenReason) {
        self.hidden_reason = Some(reason);
        self.transition(PresentationState::Hidden);
    }

    fn transition(&mut self, to: PresentationState) {
        tracing::debug!(id = %self.id, from = %self.state, %to, "presentation transition");
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(5_000);

    fn session() -> Session {
        Session::new(NotificationId::new("n1"), true, true)
    }

    fn visible(auto_dismiss: Option<Duration>) -> Session {
        let mut session = session();
        session.mount(MountCheck {
            auto_dismiss,
            ..MountCheck::default()
        });
        session
    }

    #[test]
    fn new_session_is_pending() {
        let session = session();
        assert_eq!(session.state(), PresentationState::Pending);
        assert!(session.hidden_reason().is_none());
    }

    #[test]
    fn seen_notification_hides_without_effects() {
        let mut session = session();
        let effects = session.mount(MountCheck {
            already_seen: true,
            expired: false,
            auto_dismiss: Some(TIMEOUT),
        });

        assert!(effects.is_empty());
        assert_eq!(session.state(), PresentationState::Hidden);
        assert_eq!(session.hidden_reason(), Some(HiddenReason::AlreadySeen));
    }

    #[test]
    fn expired_notification_hides_without_effects() {
        let mut session = session();
        let effects = session.mount(MountCheck {
            already_seen: false,
            expired: true,
            auto_dismiss: Some(TIMEOUT),
        });

        assert!(effects.is_empty());
        assert_eq!(session.hidden_reason(), Some(HiddenReason::Expired));
    }

    #[test]
    fn mount_emits_enter_and_arms_timer() {
        let mut session = session();
        let effects = session.mount(MountCheck {
            auto_dismiss: Some(TIMEOUT),
            ..MountCheck::default()
        });

        assert_eq!(effects, vec![Effect::EmitEnter, Effect::ArmTimer(TIMEOUT)]);
        assert_eq!(session.state(), PresentationState::Visible);
        assert!(session.timer_armed());
    }

    #[test]
    fn mount_without_auto_dismiss_does_not_arm() {
        let session = visible(None);
        assert!(!session.timer_armed());
    }

    #[test]
    fn second_mount_is_ignored() {
        let mut session = visible(Some(TIMEOUT));
        let effects = session.mount(MountCheck {
            auto_dismiss: Some(TIMEOUT),
            ..MountCheck::default()
        });
        assert!(effects.is_empty());
        assert_eq!(session.state(), PresentationState::Visible);
    }

    #[test]
    fn timer_fire_starts_exit() {
        let mut session = visible(Some(TIMEOUT));
        let effects = session.handle(Event::TimerFired);

        assert_eq!(effects, vec![Effect::EmitExit]);
        assert_eq!(session.state(), PresentationState::Dismissing);
        assert!(!session.timer_armed());
    }

    #[test]
    fn dismiss_request_starts_exit() {
        let mut session = visible(None);
        assert_eq!(session.handle(Event::DismissRequested), vec![Effect::EmitExit]);
        assert_eq!(session.state(), PresentationState::Dismissing);
    }

    #[test]
    fn non_dismissible_ignores_user_dismiss_but_not_timer() {
        let mut session = Session::new(NotificationId::new("n1"), false, false);
        session.mount(MountCheck {
            auto_dismiss: Some(TIMEOUT),
            ..MountCheck::default()
        });

        assert!(session.handle(Event::DismissRequested).is_empty());
        assert_eq!(session.state(), PresentationState::Visible);

        assert_eq!(session.handle(Event::TimerFired), vec![Effect::EmitExit]);
    }

    #[test]
    fn action_runs_then_exits() {
        let mut session = visible(None);
        assert_eq!(
            session.handle(Event::ActionInvoked),
            vec![Effect::RunAction, Effect::EmitExit]
        );
    }

    #[test]
    fn action_on_non_dismissible_still_dismisses() {
        let mut session = Session::new(NotificationId::new("n1"), false, true);
        session.mount(MountCheck::default());
        assert_eq!(
            session.handle(Event::ActionInvoked),
            vec![Effect::RunAction, Effect::EmitExit]
        );
    }

    #[test]
    fn action_without_callback_is_ignored() {
        let mut session = Session::new(NotificationId::new("n1"), true, false);
        session.mount(MountCheck::default());
        assert!(session.handle(Event::ActionInvoked).is_empty());
        assert_eq!(session.state(), PresentationState::Visible);
    }

    #[test]
    fn action_runs_at_most_once() {
        let mut session = visible(None);
        session.handle(Event::ActionInvoked);
        assert!(session.handle(Event::ActionInvoked).is_empty());
    }

    #[test]
    fn exit_completion_persists_then_notifies() {
        let mut session = visible(None);
        session.handle(Event::DismissRequested);

        assert_eq!(
            session.handle(Event::ExitCompleted),
            vec![Effect::PersistSeen, Effect::NotifyDismissed]
        );
        assert_eq!(session.state(), PresentationState::Hidden);
        assert_eq!(session.hidden_reason(), Some(HiddenReason::Dismissed));
    }

    #[test]
    fn exit_completion_only_persists_once() {
        let mut session = visible(None);
        session.handle(Event::DismissRequested);
        session.handle(Event::ExitCompleted);
        assert!(session.handle(Event::ExitCompleted).is_empty());
    }

    #[test]
    fn exit_completion_before_exit_is_ignored() {
        let mut session = visible(None);
        assert!(session.handle(Event::ExitCompleted).is_empty());
        assert_eq!(session.state(), PresentationState::Visible);
    }

    #[test]
    fn timer_fire_while_dismissing_is_ignored() {
        let mut session = visible(Some(TIMEOUT));
        session.handle(Event::DismissRequested);
        assert!(session.handle(Event::TimerFired).is_empty());
        assert_eq!(session.state(), PresentationState::Dismissing);
    }

    #[test]
    fn teardown_while_visible_cancels_timer() {
        let mut session = visible(Some(TIMEOUT));
        assert_eq!(session.handle(Event::Teardown), vec![Effect::CancelTimer]);
        assert_eq!(session.hidden_reason(), Some(HiddenReason::TornDown));
        assert!(session.handle(Event::TimerFired).is_empty());
    }

    #[test]
    fn teardown_while_dismissing_cancels_timer_and_keeps_exit() {
        let mut session = visible(Some(TIMEOUT));
        session.handle(Event::DismissRequested);

        assert_eq!(session.handle(Event::Teardown), vec![Effect::CancelTimer]);
        assert_eq!(session.state(), PresentationState::Dismissing);
        assert!(!session.timer_armed());

        assert_eq!(
            session.handle(Event::ExitCompleted),
            vec![Effect::PersistSeen, Effect::NotifyDismissed]
        );
        assert_eq!(session.hidden_reason(), Some(HiddenReason::Dismissed));
    }

    #[test]
    fn repeated_teardown_while_dismissing_has_no_effects() {
        let mut session = visible(None);
        session.handle(Event::DismissRequested);
        assert!(session.handle(Event::Teardown).is_empty());
        assert!(session.handle(Event::Teardown).is_empty());
        assert_eq!(session.state(), PresentationState::Dismissing);
    }

    #[test]
    fn teardown_after_dismissal_cancels_leftover_timer() {
        let mut session = visible(Some(TIMEOUT));
        session.handle(Event::DismissRequested);
        session.handle(Event::ExitCompleted);

        assert!(session.timer_armed());
        assert_eq!(session.handle(Event::Teardown), vec![Effect::CancelTimer]);
        assert!(session.handle(Event::Teardown).is_empty());
    }

    #[test]
    fn stale_timer_fire_after_dismissal_disarms() {
        let mut session = visible(Some(TIMEOUT));
        session.handle(Event::DismissRequested);
        session.handle(Event::ExitCompleted);

        assert!(session.handle(Event::TimerFired).is_empty());
        assert!(!session.timer_armed());
        assert!(session.handle(Event::Teardown).is_empty());
    }

    #[test]
    fn teardown_after_timer_fired_has_nothing_to_cancel() {
        let mut session = visible(Some(TIMEOUT));
        session.handle(Event::TimerFired);
        assert!(session.handle(Event::Teardown).is_empty());
    }
}
