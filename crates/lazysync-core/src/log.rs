//! The command log: every operation issued on any host, until collected.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::{LazysyncError, Result};

/// `DATETIME('now')` layout plus milliseconds. Lexicographic order of the
/// stored text equals chronological order, which the SQL comparisons rely on.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const PARSE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

pub fn format_time(t: DateTime<Utc>) -> String {
    t.format(TIME_FORMAT).to_string()
}

pub fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    PARSE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| LazysyncError::InvalidTimestamp(s.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    pub id: i64,
    pub text: String,
    pub issued_at: DateTime<Utc>,
}

/// Append `text` to the log and return its id.
pub fn append(conn: &Connection, text: &str, issued_at: DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO commands (cmd, time) VALUES (?1, ?2)",
        params![text, format_time(issued_at)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Commands `host` has not acknowledged, oldest first. Ties on the timestamp
/// are broken by id so every host sees the same order.
pub fn backlog_for(conn: &Connection, host: &str) -> Result<Vec<Command>> {
    query_commands(
        conn,
        r#"
        SELECT c.id, c.cmd, c.time
        FROM commands c
        WHERE NOT EXISTS
          (SELECT 1 FROM seen s WHERE s.cmdid = c.id AND s.host = ?1)
        ORDER BY c.time ASC, c.id ASC
        "#,
        params![host],
    )
}

/// Every command in id order.
pub fn list(conn: &Connection) -> Result<Vec<Command>> {
    query_commands(
        conn,
        "SELECT id, cmd, time FROM commands ORDER BY id ASC",
        params![],
    )
}

pub fn len(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM commands", [], |r| r.get(0))?;
    Ok(n as usize)
}

/// Delete every command acknowledged by at least `threshold` distinct hosts.
/// Their acknowledgments go with them through the foreign-key cascade.
pub fn delete_eligible(conn: &Connection, threshold: u32) -> Result<usize> {
    let removed = conn.execute(
        r#"
        DELETE FROM commands
        WHERE (SELECT COUNT(DISTINCT s.host) FROM seen s WHERE s.cmdid = commands.id) >= ?1
        "#,
        params![threshold],
    )?;
    Ok(removed)
}

fn query_commands(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Command>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |r| {
            Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, text, time)| -> Result<Command> {
            Ok(Command {
                id,
                text,
                issued_at: parse_time(&time)?,
            })
        })
        .collect()
}
