//! Shared plumbing for CLI commands.

use std::path::Path;
use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Settings;
use crate::progress::{ProgressEvent, ProgressSender};
use crate::repository::CrawlStore;
use crate::services::Crawler;

/// Open the store under the data directory, creating it on first use.
pub fn open_store(data_dir: &Path) -> anyhow::Result<Arc<CrawlStore>> {
    let store = CrawlStore::new(&Settings::db_path(data_dir))?;
    Ok(Arc::new(store))
}

/// Build an orchestrator wired to a terminal progress printer.
///
/// The returned handle drains the event channel; await it after the
/// operation so trailing events are flushed before the process exits.
pub fn build_crawler(data_dir: &Path) -> anyhow::Result<(Crawler, JoinHandle<()>)> {
    let store = open_store(data_dir)?;
    let settings = Settings::load(data_dir);
    let (progress, rx) = ProgressSender::channel();
    let printer = spawn_printer(rx);
    let crawler = Crawler::new(store, settings, progress)?;
    Ok((crawler, printer))
}

fn spawn_printer(mut rx: mpsc::UnboundedReceiver<ProgressEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::Status(message) => {
                    println!("  {}", style(message).dim());
                }
                ProgressEvent::ItemFailed { id, reason } => {
                    println!("  {} item {}: {}", style("✗").red(), id, reason);
                }
                ProgressEvent::Completed {
                    operation,
                    processed,
                    failed,
                } => {
                    let mark = if failed == 0 {
                        style("✓").green()
                    } else {
                        style("!").yellow()
                    };
                    println!("{mark} {operation}: {processed} processed, {failed} failed");
                }
            }
        }
    })
}

/// Shorten a string for table display.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
