use crate::output::print_json;
use anyhow::Context as _;
use lazysync_core::record::{self, RecordOutcome};
use lazysync_core::Context;

pub fn run(ctx: &mut Context, words: &[String], json: bool) -> anyhow::Result<()> {
    let text = words.join(" ");
    let outcome = record::record(ctx, &text).with_context(|| format!("failed to record '{text}'"))?;

    if json {
        print_json(&outcome)?;
    } else if let RecordOutcome::Logged { id } = outcome {
        tracing::debug!(id, "recorded command");
    }
    Ok(())
}
