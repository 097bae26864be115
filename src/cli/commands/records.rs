//! Record inspection commands.

use std::path::Path;

use console::style;

use crate::cli::helpers::{open_store, truncate};
use crate::models::{RecordFilter, RecordStage};

fn stage_label(stage: RecordStage) -> &'static str {
    match stage {
        RecordStage::Discovered => "discovered",
        RecordStage::BuscadorFetched => "buscador",
        RecordStage::RepositoryFetched => "repository",
        RecordStage::Parsed => "parsed",
    }
}

/// List extracted records.
pub fn cmd_ls(
    data_dir: &Path,
    parsed: bool,
    unparsed: bool,
    fetched: bool,
    unfetched: bool,
    limit: usize,
    format: &str,
) -> anyhow::Result<()> {
    if parsed && unparsed {
        anyhow::bail!("--parsed and --unparsed are mutually exclusive");
    }
    if fetched && unfetched {
        anyhow::bail!("--fetched and --unfetched are mutually exclusive");
    }

    let store = open_store(data_dir)?;
    let filter = RecordFilter {
        has_program: match (parsed, unparsed) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        },
        has_buscador_html: match (fetched, unfetched) {
            (true, false) => Some(true),
            (false, true) => Some(false),
            _ => None,
        },
        ..Default::default()
    };

    let records = store.list_records(&filter)?;
    let shown = if limit == 0 { records.len() } else { limit };

    match format {
        "json" => {
            let page: Vec<_> = records.iter().take(shown).collect();
            println!("{}", serde_json::to_string_pretty(&page)?);
            return Ok(());
        }
        "ids" => {
            for rec in records.iter().take(shown) {
                println!("{}", rec.id);
            }
            return Ok(());
        }
        "table" => {}
        other => anyhow::bail!("unknown format '{other}' (table, json, ids)"),
    }

    if records.is_empty() {
        println!("No records match.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<11}  {:<8}  {:<34}  {}",
        "ID", "STAGE", "ACRONYM", "PROGRAM", "TITLE"
    );
    for rec in records.iter().take(shown) {
        println!(
            "{:>6}  {:<11}  {:<8}  {:<34}  {}",
            rec.id,
            stage_label(rec.stage()),
            truncate(&rec.acronym, 8),
            truncate(&rec.program, 34),
            truncate(&rec.title, 48),
        );
    }
    if records.len() > shown {
        println!("  ... and {} more (raise --limit)", records.len() - shown);
    }
    Ok(())
}

/// Show one record in full.
pub fn cmd_info(data_dir: &Path, record_id: i64, json: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    let rec = store
        .get_record(record_id)?
        .ok_or_else(|| anyhow::anyhow!("record {record_id} not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rec)?);
        return Ok(());
    }

    println!("{} {}", style("Record").bold(), rec.id);
    println!("  title:       {}", rec.title);
    println!("  author:      {}", rec.author);
    println!("  stage:       {}", stage_label(rec.stage()));
    println!("  term/year:   {} / {}", rec.term, rec.year);
    println!("  buscador:    {}", rec.buscador_link);
    println!(
        "  repository:  {}",
        rec.repository_link.as_deref().unwrap_or("-")
    );
    println!(
        "  html stored: buscador={} repository={}",
        rec.buscador_html.as_deref().map_or(0, str::len),
        rec.repository_html.as_deref().map_or(0, str::len),
    );
    println!("  acronym:     {}", rec.acronym);
    println!("  institution: {}", rec.institution);
    println!("  program:     {}", rec.program);
    println!("  pdf:         {}", rec.pdf_link);
    Ok(())
}

/// Delete an extracted record.
pub fn cmd_delete(data_dir: &Path, record_id: i64) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    if store.delete_record(record_id)? {
        store.log_event(&format!("Record {record_id} deleted"));
        println!("{} Record {} deleted", style("✓").green(), record_id);
    } else {
        println!("Record {record_id} not found.");
    }
    Ok(())
}
