// SPDX-License-Identifier: MPL-2.0
//! `banner_engine` decides how in-app notification banners are presented.
//!
//! It tracks which notifications the user has already seen across
//! sessions, skips expired ones, auto-dismisses after a timeout and tells an
//! external renderer when to play the enter and exit animations. Rendering,
//! navigation and transport are left to the host application.

pub mod clock;
pub mod config;
pub mod error;
pub mod notification;
pub mod paths;
pub mod presentation;
pub mod seen_set;
pub mod storage;
pub mod testing;
pub mod timer;
