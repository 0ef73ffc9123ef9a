//! SQLite handle shared by the command log and the seen ledger.
//!
//! # Schema
//!
//! ```text
//! commands(id INTEGER PRIMARY KEY, cmd TEXT, time TEXT)
//! seen(id INTEGER PRIMARY KEY, host TEXT,
//!      cmdid INTEGER REFERENCES commands(id) ON DELETE CASCADE)
//! ```
//!
//! The layout is kept compatible with databases created by earlier
//! notmuch-lazysync versions, which may already be synced between hosts.
//! SQLite only honours `ON DELETE CASCADE` when `foreign_keys` is switched on
//! for the connection, so every open does that first.

use std::path::Path;

use rusqlite::{Connection, Transaction};

use crate::error::Result;
use crate::io;

const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS commands (
  id INTEGER PRIMARY KEY,
  cmd TEXT,
  time TEXT
);

CREATE TABLE IF NOT EXISTS seen (
  id INTEGER PRIMARY KEY,
  host TEXT,
  cmdid INTEGER REFERENCES commands(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_seen_cmdid_host ON seen(cmdid, host);
"#;

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        io::ensure_parent(path)?;
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened command database");
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction. Dropping it without `commit()` rolls back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }
}
