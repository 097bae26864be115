//! Domain toggle commands.

use std::path::Path;

use console::style;

use crate::cli::helpers::open_store;

/// List observed repository hosts and their toggles.
pub fn cmd_domains_list(data_dir: &Path) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;

    // Fold in hosts seen on records but never explicitly toggled.
    for host in store.distinct_repository_hosts()? {
        store.observe_domain(&host)?;
    }

    let domains = store.list_domains()?;
    if domains.is_empty() {
        println!("No repository hosts observed yet.");
        return Ok(());
    }
    for filter in domains {
        let mark = if filter.enabled {
            style("enabled ").green()
        } else {
            style("disabled").red()
        };
        println!("  {mark}  {}", filter.domain);
    }
    Ok(())
}

/// Enable or disable a host for batch operations.
pub fn cmd_domains_set(data_dir: &Path, domain: &str, enabled: bool) -> anyhow::Result<()> {
    let store = open_store(data_dir)?;
    store.set_domain_enabled(domain, enabled)?;
    let verb = if enabled { "enabled" } else { "disabled" };
    store.log_event(&format!("Domain {} {verb}", domain.to_lowercase()));
    println!("{} {} {}", style("✓").green(), domain.to_lowercase(), verb);
    Ok(())
}
