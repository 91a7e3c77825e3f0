// SPDX-License-Identifier: MPL-2.0
//! Expiry evaluation.

use super::notification::Notification;
use chrono::{DateTime, Utc};

/// Returns whether the notification's validity window has elapsed at `now`.
///
/// A notification without `expires_at` never expires. The comparison is
/// strict: at exactly `expires_at` the notification is still valid.
#[must_use]
pub fn is_expired(notification: &Notification, now: DateTime<Utc>) -> bool {
    notification
        .expires_at()
        .is_some_and(|expires_at| now > expires_at)
}
