//! The mail indexer as seen by the replication core.
//!
//! Only two capabilities are needed: asking whether notmuch already mirrors
//! flag-style tags into maildir file names, and applying a batch of tag
//! changes in one go (`notmuch tag --input=FILE`).

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tempfile::NamedTempFile;

use crate::error::{LazysyncError, Result};

pub trait MailTool {
    /// Whether `maildir.synchronize_flags` is active.
    fn flag_mirroring(&self) -> Result<bool>;

    /// Apply `lines` (each the argument part of one `notmuch tag` call) as a
    /// single invocation. `Ok(false)` means the tool ran and reported failure.
    fn apply_tag_batch(&self, lines: &[String]) -> Result<bool>;
}

/// The real `notmuch` binary, looked up on `PATH` at call time.
#[derive(Debug, Clone)]
pub struct Notmuch {
    program: String,
}

impl Notmuch {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn resolve(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|_| LazysyncError::ToolNotFound(self.program.clone()))
    }
}

impl Default for Notmuch {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_NOTMUCH)
    }
}

impl MailTool for Notmuch {
    fn flag_mirroring(&self) -> Result<bool> {
        let output = Command::new(self.resolve()?)
            .args(["config", "get", "maildir.synchronize_flags"])
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()?;

        if !output.status.success() {
            return Err(LazysyncError::ToolFailed(format!(
                "notmuch config get maildir.synchronize_flags exited with {}",
                output.status
            )));
        }
        // notmuch defaults to synchronizing, so anything but an explicit
        // `false` counts as mirroring.
        let value = String::from_utf8_lossy(&output.stdout);
        Ok(value.trim() != "false")
    }

    fn apply_tag_batch(&self, lines: &[String]) -> Result<bool> {
        let program = self.resolve()?;

        let mut batch = NamedTempFile::new()?;
        for line in lines {
            writeln!(batch, "{line}")?;
        }
        batch.flush()?;

        let mut input = std::ffi::OsString::from("--input=");
        input.push(batch.path());

        tracing::debug!(lines = lines.len(), file = %batch.path().display(), "running notmuch tag batch");
        let status = Command::new(program)
            .arg("tag")
            .arg(input)
            .stdin(Stdio::null())
            .status()?;
        Ok(status.success())
    }
}
