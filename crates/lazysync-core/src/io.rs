use crate::error::{LazysyncError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Expand a leading `~` or `~/` against the user's home directory.
///
/// Other forms (`~user/...`) are returned unchanged.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return home::home_dir().ok_or(LazysyncError::HomeNotFound);
    }
    if let Some(rest) = path.strip_prefix("~/") {
        let home = home::home_dir().ok_or(LazysyncError::HomeNotFound)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(path))
}
