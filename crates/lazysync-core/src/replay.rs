//! Bring the local host up to date with the shared command log.
//!
//! Non-tag commands run one by one through the shell and are acknowledged
//! individually. Tag commands are collected into a single
//! `notmuch tag --input` batch, which is acknowledged all-or-nothing.

use chrono::Utc;
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;
use crate::{gc, ledger, log, tags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Run garbage collection afterwards (only if `num_hosts` is configured).
    pub gc: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self { gc: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub host: String,
    /// Non-tag commands that ran successfully and were acknowledged.
    pub executed: Vec<i64>,
    /// Non-tag commands that failed; they stay in the backlog.
    pub failed: Vec<i64>,
    /// Lines submitted in the tag batch.
    pub tag_batch: usize,
    /// Tag commands acknowledged after the batch succeeded.
    pub tags_acked: usize,
    pub batch_failed: bool,
    /// Commands removed by garbage collection, if it ran.
    pub collected: Option<usize>,
}

pub fn replay(ctx: &mut Context, opts: ReplayOptions) -> Result<ReplayReport> {
    let cutoff = Utc::now();
    let backlog = log::backlog_for(ctx.store.conn(), &ctx.host)?;
    tracing::debug!(host = %ctx.host, pending = backlog.len(), "replaying backlog");

    let mut report = ReplayReport {
        host: ctx.host.clone(),
        ..Default::default()
    };
    let mut batch = Vec::new();

    for cmd in &backlog {
        if let Some(line) = tags::batch_line(&cmd.text) {
            tracing::debug!(id = cmd.id, line, "queueing tag command for batch execution");
            batch.push(line.to_string());
            continue;
        }

        tracing::debug!(id = cmd.id, command = %cmd.text, "executing");
        match ctx.shell.run(&cmd.text) {
            Ok(true) => {
                ledger::ack(ctx.store.conn(), &ctx.host, cmd.id)?;
                report.executed.push(cmd.id);
            }
            Ok(false) => {
                tracing::warn!(id = cmd.id, "command failed: {}", cmd.text);
                report.failed.push(cmd.id);
            }
            Err(e) => {
                tracing::warn!(id = cmd.id, error = %e, "could not run command: {}", cmd.text);
                report.failed.push(cmd.id);
            }
        }
    }

    if !batch.is_empty() {
        report.tag_batch = batch.len();
        match ctx.mail.apply_tag_batch(&batch) {
            Ok(true) => {
                report.tags_acked = ledger::ack_tag_commands_until(ctx.store.conn(), &ctx.host, cutoff)?;
            }
            Ok(false) => {
                tracing::warn!(lines = batch.len(), "failed to execute tag operations");
                report.batch_failed = true;
            }
            Err(e) => {
                tracing::warn!(lines = batch.len(), error = %e, "failed to execute tag operations");
                report.batch_failed = true;
            }
        }
    }

    if opts.gc {
        match ctx.num_hosts {
            Some(n) => report.collected = Some(gc::collect(&mut ctx.store, n)?),
            None => tracing::debug!("num_hosts not configured, skipping garbage collection"),
        }
    }

    Ok(report)
}
