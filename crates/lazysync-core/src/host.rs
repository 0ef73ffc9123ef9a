use crate::error::{LazysyncError, Result};

/// Overrides the detected host name. Mostly useful for tests that simulate
/// several machines against one database.
pub const HOST_ENV: &str = "LAZYSYNC_HOST";

/// Resolve the identifier under which this machine acknowledges commands.
///
/// Priority:
/// 1. `LAZYSYNC_HOST` if set and non-empty
/// 2. the machine's network host name
pub fn current_host() -> Result<String> {
    resolve(std::env::var(HOST_ENV).ok())
}

fn resolve(override_value: Option<String>) -> Result<String> {
    if let Some(host) = override_value.filter(|h| !h.trim().is_empty()) {
        return Ok(host);
    }
    gethostname::gethostname()
        .into_string()
        .map_err(|raw| LazysyncError::HostUnknown(format!("non-UTF-8 host name {raw:?}")))
}
