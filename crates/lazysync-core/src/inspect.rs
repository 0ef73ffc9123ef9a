use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::error::Result;
use crate::{ledger, log};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandView {
    pub id: i64,
    pub text: String,
    pub issued_at: DateTime<Utc>,
    pub seen_by: Vec<String>,
}

/// Snapshot of the log and the ledger, for `show`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub commands: Vec<CommandView>,
    pub total: usize,
}

pub fn inspect(conn: &Connection) -> Result<Inspection> {
    let commands = log::list(conn)?
        .into_iter()
        .map(|c| -> Result<CommandView> {
            Ok(CommandView {
                seen_by: ledger::ackers(conn, c.id)?,
                id: c.id,
                text: c.text,
                issued_at: c.issued_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Inspection {
        total: commands.len(),
        commands,
    })
}
