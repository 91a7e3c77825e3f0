// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! A [`Notification`] is an immutable value owned by the caller. Whether it
//! has been seen is never stored on it; that lives in the seen-set, keyed by
//! [`NotificationId`].

use crate::error::PresentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque identity of a notification, stable across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NotificationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Presentation hint carried through to the renderer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Event,
}

impl NotificationKind {
    /// Parses a kind name case-insensitively. Unknown names map to `Info`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "success" => NotificationKind::Success,
            "warning" => NotificationKind::Warning,
            "error" => NotificationKind::Error,
            "event" => NotificationKind::Event,
            _ => NotificationKind::Info,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Event => "event",
        }
    }
}

/// Labelled call-to-action attached to a notification.
///
/// The engine runs the callback at most once per session, and running it
/// always dismisses the notification.
#[derive(Clone)]
pub struct NotificationAction {
    label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl NotificationAction {
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A notification to be presented to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    title: String,
    body: String,
    /// Absent means the notification never expires.
    expires_at: Option<DateTime<Utc>>,
    /// When false the user cannot close it; auto-dismiss still applies.
    dismissible: bool,
    action: Option<NotificationAction>,
}

impl Notification {
    pub fn new(
        id: impl Into<NotificationId>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            body: body.into(),
            expires_at: None,
            dismissible: true,
            action: None,
        }
    }

    /// Creates an info notification.
    pub fn info(
        id: impl Into<NotificationId>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(id, NotificationKind::Info, title, body)
    }

    /// Sets the instant after which the notification is no longer shown.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    #[must_use]
    pub fn with_dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    #[must_use]
    pub fn with_action(
        mut self,
        label: impl Into<String>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(NotificationAction::new(label, callback));
        self
    }

    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    #[must_use]
    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    #[must_use]
    pub fn action(&self) -> Option<&NotificationAction> {
        self.action.as_ref()
    }

    /// Checks the fields the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PresentError::InvalidNotification`] if the id is blank or
    /// the action has no label.
    pub fn validate(&self) -> Result<(), PresentError> {
        if self.id.as_str().trim().is_empty() {
            return Err(PresentError::invalid("id must not be empty"));
        }
        if let Some(action) = &self.action {
            if action.label().trim().is_empty() {
                return Err(PresentError::invalid("action label must not be empty"));
            }
        }
        Ok(())
    }
}

/// Notification as delivered by the remote API.
///
/// `expires_at` is an RFC 3339 timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dismissible: Option<bool>,
}

impl TryFrom<NotificationPayload> for Notification {
    type Error = PresentError;

    fn try_from(payload: NotificationPayload) -> Result<Self, Self::Error> {
        let id = payload
            .id
            .ok_or_else(|| PresentError::invalid("missing id"))?;
        let kind = payload
            .kind
            .as_deref()
            .map(NotificationKind::from_name)
            .unwrap_or_default();

        let mut notification = Notification::new(id, kind, payload.title, payload.body)
            .with_dismissible(payload.dismissible.unwrap_or(true));
        notification.expires_at = payload.expires_at;

        notification.validate()?;
        Ok(notification)
    }
}
