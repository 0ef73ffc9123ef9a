use crate::output::{print_json, print_table};
use anyhow::Context as _;
use lazysync_core::inspect::inspect;
use lazysync_core::log::TIME_FORMAT;
use lazysync_core::Context;

pub fn run(ctx: &Context, json: bool) -> anyhow::Result<()> {
    let view = inspect(ctx.store.conn()).context("failed to read database")?;

    if json {
        return print_json(&view);
    }

    if !view.commands.is_empty() {
        let rows = view
            .commands
            .iter()
            .map(|c| {
                vec![
                    c.id.to_string(),
                    c.issued_at.format(TIME_FORMAT).to_string(),
                    c.text.clone(),
                    c.seen_by.join(", "),
                ]
            })
            .collect();
        print_table(&["ID", "TIME", "COMMAND", "SEEN BY"], rows);
    }
    println!("{} commands in total.", view.total);
    Ok(())
}
