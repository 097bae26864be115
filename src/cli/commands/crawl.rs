//! Pipeline commands: search, paginate, listings, fetch, parse.

use std::path::Path;

use console::style;

use crate::cli::helpers::build_crawler;
use crate::error::CrawlError;
use crate::models::DetailTarget;

/// Fetch and store page 1 of a search.
pub async fn cmd_search(data_dir: &Path, term: &str, year: &str) -> anyhow::Result<()> {
    let (crawler, printer) = build_crawler(data_dir)?;

    let page_id = crawler.search(term, year).await?;
    drop(crawler);
    let _ = printer.await;

    println!(
        "{} Stored page 1 of '{}' as page {}",
        style("✓").green(),
        term,
        page_id
    );
    println!("  Next: tese paginate {page_id}, then tese listings {page_id}");
    Ok(())
}

/// Expand pagination for one page or every stored page.
pub async fn cmd_paginate(data_dir: &Path, page_id: Option<i64>, all: bool) -> anyhow::Result<()> {
    let (crawler, printer) = build_crawler(data_dir)?;

    match (page_id, all) {
        (Some(id), false) => match crawler.expand_pagination(id).await {
            Ok(stored) => {
                println!("{} {} additional page(s) stored", style("✓").green(), stored);
            }
            Err(CrawlError::NoPaginationFound) => {
                println!("  Page {id} is a single-page result set, nothing to expand");
            }
            Err(e) => return Err(e.into()),
        },
        (None, true) => {
            let ids: Vec<i64> = crawler
                .store()
                .list_history()?
                .iter()
                .filter(|p| p.page_number == 1 && p.has_content())
                .map(|p| p.id)
                .collect();
            crawler.expand_pagination_batch(&ids).await;
        }
        _ => anyhow::bail!("pass a page ID or --all (not both)"),
    }

    drop(crawler);
    let _ = printer.await;
    Ok(())
}

/// Extract listing records from one page or every stored page.
pub async fn cmd_listings(data_dir: &Path, page_id: Option<i64>, all: bool) -> anyhow::Result<()> {
    let (crawler, printer) = build_crawler(data_dir)?;

    match (page_id, all) {
        (Some(id), false) => {
            let inserted = crawler.extract_listings(id)?;
            println!("{} {} new record(s)", style("✓").green(), inserted);
        }
        (None, true) => {
            let ids: Vec<i64> = crawler
                .store()
                .list_history()?
                .iter()
                .filter(|p| p.has_content())
                .map(|p| p.id)
                .collect();
            crawler.extract_listings_batch(&ids);
        }
        _ => anyhow::bail!("pass a page ID or --all (not both)"),
    }

    drop(crawler);
    let _ = printer.await;
    Ok(())
}

/// Fetch detail HTML for one record or every record missing it.
pub async fn cmd_fetch(
    data_dir: &Path,
    record_id: Option<i64>,
    target: DetailTarget,
    all: bool,
    force: bool,
) -> anyhow::Result<()> {
    let (crawler, printer) = build_crawler(data_dir)?;

    match (record_id, all) {
        (Some(id), false) => {
            let fetched = crawler.fetch_detail(id, target, force).await?;
            if fetched {
                println!("{} Stored {} HTML for record {}", style("✓").green(), target.as_str(), id);
            } else {
                println!("  Record {id} already has {} HTML (use --force)", target.as_str());
            }
        }
        (None, true) => {
            let ids = if force {
                crawler.store().record_ids()?
            } else {
                crawler.store().ids_missing_html(target)?
            };
            crawler.fetch_detail_batch(&ids, target, force).await;
        }
        _ => anyhow::bail!("pass a record ID or --all (not both)"),
    }

    drop(crawler);
    let _ = printer.await;
    Ok(())
}

/// Run metadata extraction for one record or every fetched record.
pub async fn cmd_parse(data_dir: &Path, record_id: Option<i64>, all: bool) -> anyhow::Result<()> {
    let (crawler, printer) = build_crawler(data_dir)?;

    match (record_id, all) {
        (Some(id), false) => {
            let data = crawler.parse_metadata(id)?;
            println!("{} Record {}", style("✓").green(), id);
            println!("  acronym:     {}", data.acronym);
            println!("  institution: {}", data.institution);
            println!("  program:     {}", data.program);
            println!("  pdf:         {}", data.pdf_link);
        }
        (None, true) => {
            let ids = crawler.store().ids_with_stored_html()?;
            crawler.parse_metadata_batch(&ids);
        }
        _ => anyhow::bail!("pass a record ID or --all (not both)"),
    }

    drop(crawler);
    let _ = printer.await;
    Ok(())
}
