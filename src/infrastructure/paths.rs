//! Data directory resolution.
//!
//! Persistent files (the favorites store and the span log) live in one data
//! directory, resolved in this order:
//!
//! 1. `data_dir` from [`Config`]
//! 2. `$XDG_DATA_HOME/movie-finder`
//! 3. `$HOME/.local/share/movie-finder`
//! 4. `./.movie-finder`

use crate::Config;
use std::env;
use std::path::PathBuf;

/// Directory name used under the platform data root.
pub const APP_DIR_NAME: &str = "movie-finder";

/// File holding the key-value store, inside the data directory.
const FAVORITES_FILE: &str = "favorites.json";

/// Returns the data directory for `config`. Does not create it.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return dir.clone();
    }
    resolve(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

/// Path of the durable key-value store file.
#[must_use]
pub fn favorites_path(config: &Config) -> PathBuf {
    data_dir(config).join(FAVORITES_FILE)
}

fn resolve(xdg_data_home: Option<std::ffi::OsString>, home: Option<std::ffi::OsString>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR_NAME);
    }
    PathBuf::from(format!(".{APP_DIR_NAME}"))
}
