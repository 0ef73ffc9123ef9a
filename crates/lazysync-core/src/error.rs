use thiserror::Error;

#[derive(Debug, Error)]
pub enum LazysyncError {
    #[error("no 'lazysync' section in configuration file {0}")]
    ConfigMissingSection(String),

    #[error("no database file specified in configuration")]
    MissingDbFile,

    #[error("num_hosts must be at least 1, got {0}")]
    InvalidNumHosts(u32),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error("could not determine host name: {0}")]
    HostUnknown(String),

    #[error("invalid timestamp in command log: {0}")]
    InvalidTimestamp(String),

    #[error("executable not found: {0}")]
    ToolNotFound(String),

    #[error("external tool failed: {0}")]
    ToolFailed(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LazysyncError>;
