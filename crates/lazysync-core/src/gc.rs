use crate::db::Store;
use crate::error::Result;
use crate::log;

/// Forget every command acknowledged by at least `num_hosts` distinct hosts.
/// Returns how many commands were removed.
pub fn collect(store: &mut Store, num_hosts: u32) -> Result<usize> {
    let tx = store.transaction()?;
    let removed = log::delete_eligible(&tx, num_hosts)?;
    tx.commit()?;
    tracing::debug!(removed, num_hosts, "garbage collection");
    Ok(removed)
}
