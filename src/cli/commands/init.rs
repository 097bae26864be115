//! Initialize command.

use std::path::Path;

use console::style;

use crate::cli::helpers::open_store;
use crate::config::Settings;

/// Initialize the data directory, database, and a default config file.
pub fn cmd_init(data_dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)?;

    // Opening the store creates the schema.
    let _store = open_store(data_dir)?;

    let config_path = data_dir.join("config.toml");
    if !config_path.exists() {
        let defaults = toml::to_string_pretty(&Settings::default())?;
        std::fs::write(&config_path, defaults)?;
        println!(
            "  {} Wrote default config: {}",
            style("✓").green(),
            config_path.display()
        );
    }

    println!(
        "{} Initialized in {}",
        style("✓").green(),
        data_dir.display()
    );
    Ok(())
}
