// SPDX-License-Identifier: MPL-2.0
//! Notification values and the expiry evaluator.
//!
//! # Components
//!
//! - [`notification`] - `Notification`, its id, kind and optional action,
//!   plus the `NotificationPayload` wire shape received from the API
//! - [`expiry`] - pure `is_expired` check against an injected instant

mod expiry;
#[allow(clippy::module_inception)]
mod notification;

pub use expiry::is_expired;
pub use notification::{
    Notification, NotificationAction, NotificationId, NotificationKind, NotificationPayload,
};
