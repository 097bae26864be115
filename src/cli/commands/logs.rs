//! Diagnostic log command.

use std::path::Path;

use crate::cli::helpers::open_store;

/// Show recent diagnostic entries, newest first.
pub fn cmd_logs(data_dir: &Path, limit: usize) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let events = store.recent_events(limit)?;
    if events.is_empty() {
        println!("Log is empty.");
        return Ok(());
    }
    for entry in events {
        println!(
            "{}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.message
        );
    }
    Ok(())
}
