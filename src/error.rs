// SPDX-License-Identifier: MPL-2.0
//! Error types for the presentation engine.
//!
//! Only [`PresentError`] ever reaches a caller of
//! [`Engine::present`](crate::presentation::Engine::present). Storage
//! failures are recovered inside the seen-set store and only logged.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Storage Error: {0}")]
    Storage(#[from] StorageError),
    #[error("Present Error: {0}")]
    Present(#[from] PresentError),
}

/// Failures of the durable key-value layer.
///
/// `Read` and `Corrupt` are read-side failures: the seen-set treats them
/// as "not seen". `Write` and `Unavailable` are write-side failures: the
/// dismissal still completes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Backing store could not be read.
    #[error("failed to read storage: {0}")]
    Read(String),

    /// Backing store could not be written.
    #[error("failed to write storage: {0}")]
    Write(String),

    /// Backing store was readable but its contents could not be decoded.
    #[error("storage contents are corrupt: {0}")]
    Corrupt(String),

    /// No location for the backing store could be resolved.
    #[error("storage location is unavailable")]
    Unavailable,
}

impl StorageError {
    /// Returns true for failures that happened while reading.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, StorageError::Read(_) | StorageError::Corrupt(_))
    }
}

/// Rejections raised by `present()` before a session is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    #[error("invalid notification: {reason}")]
    InvalidNotification { reason: String },
}

impl PresentError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PresentError::InvalidNotification {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
