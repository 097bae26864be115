//! Search page model for raw buscador result pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fetched page of search results from a search engine.
///
/// Pages are keyed by `(engine, term, year, page_number)` with upsert
/// semantics: re-fetching the same logical page replaces the stored HTML
/// wholesale and never creates a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Database row ID.
    pub id: i64,
    /// Search engine identifier (currently always `bdtd`).
    pub engine: String,
    /// Search term as submitted.
    pub term: String,
    /// Publication year filter as submitted.
    pub year: String,
    /// 1-based page number within the result set.
    pub page_number: u32,
    /// Raw HTML of the page. Cleared (not deleted) when the operator
    /// discards a page's content.
    pub html: String,
    /// URL this page was fetched from.
    pub source_url: String,
    /// When the page was last fetched.
    pub fetched_at: DateTime<Utc>,
}

impl SearchPage {
    /// Whether the page still holds fetched content.
    pub fn has_content(&self) -> bool {
        !self.html.trim().is_empty()
    }
}
