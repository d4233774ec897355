//! Filesystem locations used by the coordinator.

use crate::Config;
use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "hangar-coordinator";

/// Resolves the directory holding trace output.
///
/// Order: `data_dir` from the config, `$XDG_DATA_HOME/hangar-coordinator`,
/// `$HOME/.local/share/hangar-coordinator`, then the system temp directory.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return expand_tilde(dir);
    }
    if let Some(xdg) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }
    env::temp_dir().join(APP_DIR)
}

/// Expands a leading `~` to `$HOME`. Paths without one are returned as is.
#[must_use]
pub fn expand_tilde(path: &std::path::Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    env::var_os("HOME").map_or_else(|| path.to_path_buf(), |home| PathBuf::from(home).join(rest))
}
