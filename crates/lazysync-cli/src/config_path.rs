use lazysync_core::config::DEFAULT_CONFIG_PATH;
use lazysync_core::io::expand_tilde;
use std::path::{Path, PathBuf};

/// Resolve the config file location.
///
/// Priority:
/// 1. `--config` flag / `LAZYSYNC_CONFIG` env var (passed in as `explicit`)
/// 2. `~/.notmuch-lazysync.yaml`
///
/// A leading `~` is expanded in both cases.
pub fn resolve_config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    let raw = match explicit {
        Some(p) => p.to_string_lossy().into_owned(),
        None => DEFAULT_CONFIG_PATH.to_string(),
    };
    Ok(expand_tilde(&raw)?)
}
