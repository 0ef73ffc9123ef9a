use crate::config::Config;
use crate::db::Store;
use crate::error::Result;
use crate::host;
use crate::mail::{MailTool, Notmuch};
use crate::shell::{Shell, SystemShell};

/// Everything one invocation needs, built once and handed to the recorder,
/// replayer, collector and inspector.
pub struct Context {
    pub store: Store,
    /// Identifier this machine acknowledges commands under.
    pub host: String,
    /// Distinct-host threshold for garbage collection, if known.
    pub num_hosts: Option<u32>,
    pub mail: Box<dyn MailTool>,
    pub shell: Box<dyn Shell>,
}

impl Context {
    pub fn new(
        store: Store,
        host: impl Into<String>,
        num_hosts: Option<u32>,
        mail: Box<dyn MailTool>,
        shell: Box<dyn Shell>,
    ) -> Self {
        Self {
            store,
            host: host.into(),
            num_hosts,
            mail,
            shell,
        }
    }

    /// Open the configured database and wire up the real collaborators.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_file)?;
        let host = host::current_host()?;
        tracing::debug!(host = %host, db = %config.db_file.display(), "context ready");
        Ok(Self::new(
            store,
            host,
            config.num_hosts,
            Box::new(Notmuch::new(config.notmuch.clone())),
            Box::new(SystemShell),
        ))
    }
}
