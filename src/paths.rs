// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for engine data and settings.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - parameter to the `_with_override()` functions
//! 2. **Environment variables** (`BANNER_ENGINE_DATA_DIR`, `BANNER_ENGINE_CONFIG_DIR`)
//! 3. **Platform default** - via `dirs` crate, with the application folder appended

use std::path::PathBuf;

/// Application name used for directory naming.
const APP_NAME: &str = "BannerEngine";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "BANNER_ENGINE_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "BANNER_ENGINE_CONFIG_DIR";

/// Returns the data directory holding persisted engine state (the seen-set).
///
/// Returns `None` if no directory can be determined.
pub fn get_data_dir() -> Option<PathBuf> {
    get_data_dir_with_override(None)
}

/// Returns the data directory, preferring `override_path` when given.
pub fn get_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_DATA_DIR, dirs::data_dir)
}

/// Returns the config directory holding `settings.toml`.
pub fn get_config_dir() -> Option<PathBuf> {
    get_config_dir_with_override(None)
}

/// Returns the config directory, preferring `override_path` when given.
pub fn get_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_CONFIG_DIR, dirs::config_dir)
}

fn resolve(
    override_path: Option<PathBuf>,
    env_var: &str,
    platform_dir: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform_dir().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}
