//! The seen ledger: which host has applied which logged command.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::log::format_time;
use crate::tags::TAG_PREFIX;

/// Record that `host` has applied `command_id`. A no-op when that pair is
/// already present; returns whether a row was written.
pub fn ack(conn: &Connection, host: &str, command_id: i64) -> Result<bool> {
    let inserted = conn.execute(
        r#"
        INSERT INTO seen (host, cmdid)
        SELECT ?1, ?2
        WHERE NOT EXISTS
          (SELECT 1 FROM seen s WHERE s.cmdid = ?2 AND s.host = ?1)
        "#,
        params![host, command_id],
    )?;
    Ok(inserted > 0)
}

pub fn acked(conn: &Connection, host: &str, command_id: i64) -> Result<bool> {
    let found: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM seen WHERE cmdid = ?1 AND host = ?2)",
        params![command_id, host],
        |r| r.get(0),
    )?;
    Ok(found)
}

pub fn distinct_acker_count(conn: &Connection, command_id: i64) -> Result<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(DISTINCT host) FROM seen WHERE cmdid = ?1",
        params![command_id],
        |r| r.get(0),
    )?;
    Ok(n as usize)
}

/// Hosts that acknowledged `command_id`, in acknowledgment order.
pub fn ackers(conn: &Connection, command_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT host FROM seen WHERE cmdid = ?1 ORDER BY id ASC")?;
    let hosts = stmt
        .query_map(params![command_id], |r| r.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(hosts)
}

/// Acknowledge for `host` every tag command issued at or before `cutoff`
/// that it has not acknowledged yet.
///
/// This deliberately re-scans the log instead of acking a captured id list:
/// tag commands the same host recorded while a replay was running are
/// covered as long as they predate the cutoff.
pub fn ack_tag_commands_until(
    conn: &Connection,
    host: &str,
    cutoff: DateTime<Utc>,
) -> Result<usize> {
    let inserted = conn.execute(
        r#"
        INSERT INTO seen (host, cmdid)
        SELECT ?1, c.id FROM commands c
        WHERE c.time <= ?2
          AND substr(c.cmd, 1, ?3) = ?4
          AND NOT EXISTS
            (SELECT 1 FROM seen s WHERE s.cmdid = c.id AND s.host = ?1)
        "#,
        params![
            host,
            format_time(cutoff),
            TAG_PREFIX.len() as i64,
            TAG_PREFIX
        ],
    )?;
    Ok(inserted)
}
