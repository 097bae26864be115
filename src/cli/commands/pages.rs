//! Search page history commands.

use std::path::Path;

use console::style;

use crate::cli::helpers::{open_store, truncate};

/// List stored search pages.
pub fn cmd_history(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let pages = store.list_history()?;
    if pages.is_empty() {
        println!("No searches stored yet. Start with: tese search <term>");
        return Ok(());
    }

    println!(
        "{:>6}  {:<24}  {:<6}  {:>4}  {:>9}  {}",
        "ID", "TERM", "YEAR", "PAGE", "HTML", "FETCHED"
    );
    for page in pages {
        let size = if page.has_content() {
            format!("{} KiB", page.html.len() / 1024)
        } else {
            "cleared".to_string()
        };
        println!(
            "{:>6}  {:<24}  {:<6}  {:>4}  {:>9}  {}",
            page.id,
            truncate(&page.term, 24),
            page.year,
            page.page_number,
            size,
            page.fetched_at.format("%Y-%m-%d %H:%M"),
        );
    }
    Ok(())
}

/// Discard a page's stored HTML, keeping the history row.
pub fn cmd_clear(data_dir: &Path, page_id: i64) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    if store.clear_page_html(page_id)? {
        store.log_event(&format!("Page {page_id} HTML cleared"));
        println!("{} Page {} HTML cleared", style("✓").green(), page_id);
    } else {
        println!("Page {page_id} not found.");
    }
    Ok(())
}

/// Delete a page's history row; its extracted records stay.
pub fn cmd_delete_page(data_dir: &Path, page_id: i64) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    if store.delete_search_page(page_id)? {
        store.log_event(&format!("Page {page_id} deleted"));
        println!("{} Page {} deleted", style("✓").green(), page_id);
    } else {
        println!("Page {page_id} not found.");
    }
    Ok(())
}
