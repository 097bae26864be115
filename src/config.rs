//! Settings loaded from `config.toml` under the data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scrapers::USER_AGENT;

fn default_engine() -> String {
    "bdtd".to_string()
}

fn default_search_base() -> String {
    "https://bdtd.ibict.br/vufind/Search/Results".to_string()
}

fn default_user_agent() -> String {
    USER_AGENT.to_string()
}

fn default_request_delay_ms() -> u64 {
    750
}

fn default_fetch_timeout_secs() -> u64 {
    15
}

fn default_render_dwell_secs() -> u64 {
    6
}

fn default_headless() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Search engine identifier stored with every page.
    #[serde(default = "default_engine")]
    pub engine: String,

    /// Base URL of the buscador's search endpoint.
    #[serde(default = "default_search_base")]
    pub search_base: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Politeness delay between successive network calls in batch loops.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Connect/read timeout of the direct fetch path.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Dwell after navigation so client-side rendering settles.
    #[serde(default = "default_render_dwell_secs")]
    pub render_dwell_secs: u64,

    #[serde(default = "default_headless")]
    pub headless: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            search_base: default_search_base(),
            user_agent: default_user_agent(),
            request_delay_ms: default_request_delay_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            render_dwell_secs: default_render_dwell_secs(),
            headless: default_headless(),
        }
    }
}

impl Settings {
    /// Load settings from `<data_dir>/config.toml`, falling back to
    /// defaults when the file is absent or unreadable.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("config.toml");
        match std::fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("invalid config at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Default data directory: `$TESEACQUIRE_DATA` or `./data`.
    pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| std::env::var_os("TESEACQUIRE_DATA").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    /// Path of the SQLite database inside the data directory.
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join("teseacquire.db")
    }

    /// Build the buscador search URL for a term/year/page triple.
    pub fn search_url(&self, term: &str, year: &str, page: u32) -> String {
        let mut url = format!(
            "{}?lookfor={}&type=AllFields",
            self.search_base,
            urlencoding::encode(term)
        );
        if !year.trim().is_empty() {
            url.push_str(&format!(
                "&filter%5B%5D=publishDate%3A%22{}%22",
                urlencoding::encode(year.trim())
            ));
        }
        if page > 1 {
            url.push_str(&format!("&page={page}"));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_carries_term_year_and_page() {
        let settings = Settings::default();
        let url = settings.search_url("jurimetria aplicada", "2020", 3);
        assert!(url.starts_with("https://bdtd.ibict.br/vufind/Search/Results?lookfor=jurimetria%20aplicada"));
        assert!(url.contains("publishDate"));
        assert!(url.contains("%222020%22"));
        assert!(url.ends_with("&page=3"));

        let first = settings.search_url("jurimetria", "", 1);
        assert!(!first.contains("page="));
        assert!(!first.contains("publishDate"));
    }
}
