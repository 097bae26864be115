//! CLI parser and command dispatch.

mod commands;
mod helpers;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::models::DetailTarget;

/// Which detail page a fetch command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetchTarget {
    /// The aggregator's detail page for the record.
    Buscador,
    /// The institutional repository page.
    Repository,
}

impl From<FetchTarget> for DetailTarget {
    fn from(target: FetchTarget) -> Self {
        match target {
            FetchTarget::Buscador => DetailTarget::Buscador,
            FetchTarget::Repository => DetailTarget::Repository,
        }
    }
}

#[derive(Parser)]
#[command(name = "tese")]
#[command(about = "Thesis and dissertation metadata acquisition from BDTD and institutional repositories")]
#[command(version)]
pub struct Cli {
    /// Data directory holding the database and config.toml
    /// (defaults to $TESEACQUIRE_DATA or ./data)
    #[arg(long, short = 't', global = true)]
    data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Fetch and store page 1 of a search
    Search {
        /// Search term
        term: String,
        /// Publication year filter (empty = all years)
        #[arg(short, long, default_value = "")]
        year: String,
    },

    /// List stored search pages, most recent first
    History,

    /// Discover and fetch the remaining pages of a result set
    Paginate {
        /// Page ID to expand (omit with --all)
        page_id: Option<i64>,
        /// Expand every stored page
        #[arg(short, long)]
        all: bool,
    },

    /// Extract result-listing records from stored pages
    Listings {
        /// Page ID to extract from (omit with --all)
        page_id: Option<i64>,
        /// Extract from every stored page
        #[arg(short, long)]
        all: bool,
    },

    /// Fetch a record's detail page and store its HTML
    Fetch {
        /// Record ID (omit with --all)
        record_id: Option<i64>,
        /// Which detail page to fetch
        #[arg(short = 'T', long, value_enum, default_value = "buscador")]
        target: FetchTarget,
        /// Fetch every record still missing this target's HTML
        #[arg(short, long)]
        all: bool,
        /// Re-fetch even when HTML is already stored
        #[arg(short, long)]
        force: bool,
    },

    /// Run metadata extraction over stored detail HTML
    Parse {
        /// Record ID (omit with --all)
        record_id: Option<i64>,
        /// Parse every record with stored detail HTML
        #[arg(short, long)]
        all: bool,
    },

    /// List extracted records
    Ls {
        /// Only records with at least one resolved field
        #[arg(long)]
        parsed: bool,
        /// Only records with no resolved fields
        #[arg(long)]
        unparsed: bool,
        /// Only records with buscador detail HTML stored
        #[arg(long)]
        fetched: bool,
        /// Only records without buscador detail HTML
        #[arg(long)]
        unfetched: bool,
        /// Limit number of rows (0 = unlimited)
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Output format (table, json, ids)
        #[arg(short = 'F', long, default_value = "table")]
        format: String,
    },

    /// Show a record's full metadata and lifecycle stage
    Info {
        /// Record ID
        record_id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an extracted record
    Delete {
        /// Record ID
        record_id: i64,
    },

    /// Discard a stored page's HTML, keeping its history row
    Clear {
        /// Page ID
        page_id: i64,
    },

    /// Delete a stored search page from history (records survive)
    DeletePage {
        /// Page ID
        page_id: i64,
    },

    /// Manage per-repository domain toggles
    Domains {
        #[command(subcommand)]
        command: DomainCommands,
    },

    /// Show recent diagnostic log entries
    Logs {
        /// Number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(Subcommand)]
enum DomainCommands {
    /// List observed repository hosts and their toggles
    List,
    /// Allow batch operations to touch a host
    Enable { domain: String },
    /// Exclude a host from batch operations
    Disable { domain: String },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let data_dir = crate::config::Settings::resolve_data_dir(cli.data_dir);

    match cli.command {
        Commands::Init => commands::init::cmd_init(&data_dir),
        Commands::Search { term, year } => commands::crawl::cmd_search(&data_dir, &term, &year).await,
        Commands::History => commands::pages::cmd_history(&data_dir),
        Commands::Paginate { page_id, all } => {
            commands::crawl::cmd_paginate(&data_dir, page_id, all).await
        }
        Commands::Listings { page_id, all } => {
            commands::crawl::cmd_listings(&data_dir, page_id, all).await
        }
        Commands::Fetch {
            record_id,
            target,
            all,
            force,
        } => commands::crawl::cmd_fetch(&data_dir, record_id, target.into(), all, force).await,
        Commands::Parse { record_id, all } => {
            commands::crawl::cmd_parse(&data_dir, record_id, all).await
        }
        Commands::Ls {
            parsed,
            unparsed,
            fetched,
            unfetched,
            limit,
            format,
        } => commands::records::cmd_ls(&data_dir, parsed, unparsed, fetched, unfetched, limit, &format),
        Commands::Info { record_id, json } => commands::records::cmd_info(&data_dir, record_id, json),
        Commands::Delete { record_id } => commands::records::cmd_delete(&data_dir, record_id),
        Commands::Clear { page_id } => commands::pages::cmd_clear(&data_dir, page_id),
        Commands::DeletePage { page_id } => commands::pages::cmd_delete_page(&data_dir, page_id),
        Commands::Domains { command } => match command {
            DomainCommands::List => commands::domains::cmd_domains_list(&data_dir),
            DomainCommands::Enable { domain } => {
                commands::domains::cmd_domains_set(&data_dir, &domain, true)
            }
            DomainCommands::Disable { domain } => {
                commands::domains::cmd_domains_set(&data_dir, &domain, false)
            }
        },
        Commands::Logs { limit } => commands::logs::cmd_logs(&data_dir, limit),
    }
}
