// SPDX-License-Identifier: MPL-2.0
//! Notification presentation engine.
//!
//! Decides whether a notification is shown, drives its enter/exit cues,
//! auto-dismisses it and records it as seen exactly once.
//!
//! # Components
//!
//! - [`state`] - `Session`, the pure state machine returning effects
//! - [`animation`] - `AnimationRenderer` contract and one-shot cues
//! - [`engine`] - `Engine::present` and the `SessionHandle` it returns
//!
//! # Usage
//!
//! ```
//! use banner_engine::clock::SystemClock;
//! use banner_engine::notification::Notification;
//! use banner_engine::presentation::{Engine, PresentationState};
//! use banner_engine::seen_set::SeenSetStore;
//! use banner_engine::storage::MemoryStorage;
//! use banner_engine::testing::{ManualClock, RecordingRenderer};
//! use std::sync::Arc;
//!
//! let timer = Arc::new(ManualClock::new());
//! let engine = Engine::new(
//!     Arc::new(SeenSetStore::new(MemoryStorage::new())),
//!     Arc::new(SystemClock),
//!     timer,
//! );
//! let renderer = Arc::new(RecordingRenderer::auto_completing());
//!
//! let handle = engine
//!     .present(
//!         Notification::info("welcome", "Welcome", "Browse the marketplace"),
//!         engine.options().with_auto_dismiss(false),
//!         renderer,
//!     )
//!     .expect("valid notification");
//! assert_eq!(handle.state(), PresentationState::Visible);
//!
//! handle.request_dismiss();
//! assert_eq!(handle.state(), PresentationState::Hidden);
//! ```

pub mod animation;
pub mod engine;
pub mod state;

pub use animation::{AnimationCue, AnimationRenderer, ExitCompletion};
pub use engine::{DismissCallback, Engine, PresentOptions, SessionHandle};
pub use state::{Effect, Event, HiddenReason, MountCheck, PresentationState, Session};
