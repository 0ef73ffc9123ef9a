use crate::error::{LazysyncError, Result};
use crate::io;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_CONFIG_PATH: &str = "~/.notmuch-lazysync.yaml";
pub const DEFAULT_DB_FILE: &str = "~/.notmuch-lazysync.db";
pub const DEFAULT_NOTMUCH: &str = "notmuch";

/// Written on first run when no config file exists.
pub const DEFAULT_CONFIG: &str = "\
lazysync:
  # Location of database file (needs to be synchronized by external tools)
  db_file: ~/.notmuch-lazysync.db
  # Total number of hosts to be synchronized (optional, only for database cleanup)
  num_hosts:
  # notmuch executable (optional, defaults to `notmuch` on PATH)
  notmuch:
";

// ---------------------------------------------------------------------------
// On-disk representation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    lazysync: Option<Section>,
}

/// The `lazysync:` section exactly as written by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub db_file: Option<String>,
    #[serde(default)]
    pub num_hosts: Option<u32>,
    #[serde(default)]
    pub notmuch: Option<String>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_file: PathBuf,
    /// Distinct-host threshold for garbage collection. `None` disables it.
    pub num_hosts: Option<u32>,
    pub notmuch: String,
}

impl Config {
    /// Load the config at `path`, writing [`DEFAULT_CONFIG`] there first if
    /// the file does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file found, creating default config");
            io::atomic_write(path, DEFAULT_CONFIG.as_bytes())?;
        }
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data, path)
    }

    /// Parse and validate config text. `origin` is only used in error messages.
    pub fn parse(data: &str, origin: &Path) -> Result<Self> {
        let missing_section = || LazysyncError::ConfigMissingSection(origin.display().to_string());
        if data.trim().is_empty() {
            return Err(missing_section());
        }
        let file: ConfigFile = serde_yaml::from_str(data)?;
        let section = file.lazysync.ok_or_else(missing_section)?;
        Self::from_section(section)
    }

    pub fn from_section(section: Section) -> Result<Self> {
        let db_file = section
            .db_file
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(LazysyncError::MissingDbFile)?;

        if let Some(0) = section.num_hosts {
            return Err(LazysyncError::InvalidNumHosts(0));
        }

        let notmuch = match section.notmuch.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => io::expand_tilde(s)?.to_string_lossy().into_owned(),
            _ => DEFAULT_NOTMUCH.to_string(),
        };

        Ok(Self {
            db_file: io::expand_tilde(db_file)?,
            num_hosts: section.num_hosts,
            notmuch,
        })
    }
}
