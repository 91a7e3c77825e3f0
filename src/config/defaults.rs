// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Auto-dismiss**: Whether banners close themselves and after how long
//! - **Storage**: Where the seen-set is kept

// ==========================================================================
// Auto-dismiss Defaults
// ==========================================================================

/// Whether a presented notification dismisses itself by default.
pub const DEFAULT_AUTO_DISMISS: bool = true;

/// Default delay before an auto-dismiss fires (in milliseconds).
pub const DEFAULT_AUTO_DISMISS_TIMEOUT_MS: u64 = 5_000;

/// Minimum auto-dismiss delay (in milliseconds). A zero delay is raised to it.
pub const MIN_AUTO_DISMISS_TIMEOUT_MS: u64 = 1;

// ==========================================================================
// Storage Defaults
// ==========================================================================

/// Storage key under which the seen-set blob is persisted.
pub const DEFAULT_SEEN_SET_KEY: &str = "seen_notifications";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_AUTO_DISMISS_TIMEOUT_MS > 0);
    assert!(DEFAULT_AUTO_DISMISS_TIMEOUT_MS >= MIN_AUTO_DISMISS_TIMEOUT_MS);
    assert!(!DEFAULT_SEEN_SET_KEY.is_empty());
};
