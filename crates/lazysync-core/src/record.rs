use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;
use crate::{ledger, log, tags};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// Appended to the log and acknowledged for the issuing host.
    Logged { id: i64 },
    /// Only touches flag-mirrored tags, which travel with the maildir files.
    Suppressed,
}

/// Record `text` as issued now on the context's host.
pub fn record(ctx: &mut Context, text: &str) -> Result<RecordOutcome> {
    record_at(ctx, text, Utc::now())
}

pub fn record_at(ctx: &mut Context, text: &str, issued_at: DateTime<Utc>) -> Result<RecordOutcome> {
    tracing::debug!(command = %text, "recording");

    if tags::is_tag_command(text) && ctx.mail.flag_mirroring()? && tags::covered_by_flag_mirroring(text) {
        tracing::debug!(command = %text, "ignoring maildir-only tag command");
        return Ok(RecordOutcome::Suppressed);
    }

    let tx = ctx.store.transaction()?;
    let id = log::append(&tx, text, issued_at)?;
    ledger::ack(&tx, &ctx.host, id)?;
    tx.commit()?;

    tracing::debug!(id, host = %ctx.host, "recorded");
    Ok(RecordOutcome::Logged { id })
}
