use crate::output::print_json;
use anyhow::Context as _;
use lazysync_core::replay::{self, ReplayOptions};
use lazysync_core::Context;

pub fn run(ctx: &mut Context, no_gc: bool, json: bool) -> anyhow::Result<()> {
    let report = replay::replay(ctx, ReplayOptions { gc: !no_gc }).context("replay failed")?;

    if json {
        print_json(&report)?;
        return Ok(());
    }

    tracing::debug!(
        host = %report.host,
        executed = report.executed.len(),
        failed = report.failed.len(),
        tag_batch = report.tag_batch,
        tags_acked = report.tags_acked,
        "replay finished"
    );
    if let Some(removed) = report.collected {
        tracing::debug!("garbage collection: removed {removed} entries");
    }
    Ok(())
}
