// SPDX-License-Identifier: MPL-2.0
//! Engine settings, loaded from and saved to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[presentation]` - Auto-dismiss behaviour applied when a caller does not
//!   override it per notification
//! - `[storage]` - Key used for the persisted seen-set
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set `BANNER_ENGINE_CONFIG_DIR` environment variable
//! 3. Falls back to platform-specific config directory
//!
//! # Examples
//!
//! ```no_run
//! use banner_engine::config;
//!
//! let (mut config, _warning) = config::load();
//! config.presentation.auto_dismiss_timeout_ms = Some(8_000);
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use crate::timer::AutoDismissTimeout;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// Default presentation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationConfig {
    /// Whether banners dismiss themselves after a delay.
    #[serde(
        default = "default_auto_dismiss",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_dismiss: Option<bool>,

    /// Auto-dismiss delay in milliseconds.
    #[serde(
        default = "default_auto_dismiss_timeout_ms",
        skip_serializing_if = "Option::is_none"
    )]
    pub auto_dismiss_timeout_ms: Option<u64>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            auto_dismiss: default_auto_dismiss(),
            auto_dismiss_timeout_ms: default_auto_dismiss_timeout_ms(),
        }
    }
}

impl PresentationConfig {
    /// Effective auto-dismiss flag.
    #[must_use]
    pub fn auto_dismiss(&self) -> bool {
        self.auto_dismiss.unwrap_or(DEFAULT_AUTO_DISMISS)
    }

    /// Effective auto-dismiss delay; zero is raised to the minimum.
    #[must_use]
    pub fn auto_dismiss_timeout(&self) -> AutoDismissTimeout {
        self.auto_dismiss_timeout_ms
            .map(AutoDismissTimeout::new)
            .unwrap_or_default()
    }
}

/// Seen-set persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Key of the seen-set blob in the key-value store.
    #[serde(
        default = "default_seen_set_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub seen_set_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seen_set_key: default_seen_set_key(),
        }
    }
}

impl StorageConfig {
    /// Effective seen-set key. Blank values fall back to the default.
    #[must_use]
    pub fn seen_set_key(&self) -> &str {
        match self.seen_set_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => DEFAULT_SEEN_SET_KEY,
        }
    }
}

/// Engine configuration with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub presentation: PresentationConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

// =============================================================================
// Default Value Functions
// =============================================================================

fn default_auto_dismiss() -> Option<bool> {
    Some(DEFAULT_AUTO_DISMISS)
}

fn default_auto_dismiss_timeout_ms() -> Option<u64> {
    Some(DEFAULT_AUTO_DISMISS_TIMEOUT_MS)
}

fn default_seen_set_key() -> Option<String> {
    Some(DEFAULT_SEEN_SET_KEY.to_string())
}

fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
                    return (Config::default(), Some("config-load-error".to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    if let Some(path) = get_config_path_with_override(base_dir) {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}
