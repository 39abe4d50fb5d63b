//! Environment handling utilities
//!
//! Locates the CF CLI configuration the same way the `cf` binary does:
//! `$CF_HOME/.cf/config.json`, falling back to the user's home directory.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory the CF CLI keeps its state in, relative to CF home
pub const CF_STATE_DIR: &str = ".cf";

/// Name of the CF CLI configuration file
pub const CF_CONFIG_FILE: &str = "config.json";

/// Resolve the CF home directory.
///
/// An explicit directory (from `--cf-home` or `CF_HOME`) wins; otherwise the
/// user's home directory is used. Returns `None` when neither is known.
pub fn resolve_cf_home(explicit: Option<&Path>) -> Option<PathBuf> {
    let resolved = explicit.map(Path::to_path_buf).or_else(dirs::home_dir);
    debug!("Resolved CF home: {:?}", resolved);
    resolved
}

/// Path of the CF CLI configuration file inside a CF home directory
pub fn cf_config_path(cf_home: &Path) -> PathBuf {
    cf_home.join(CF_STATE_DIR).join(CF_CONFIG_FILE)
}
