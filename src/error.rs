//! Error taxonomy for the crawl pipeline.
//!
//! Everything here is non-fatal to batch processing: batch loops log the
//! failure for the offending record or page and continue with the rest.

use thiserror::Error;

/// Errors raised by fetch, discovery, extraction, and store operations.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Direct HTTP attempt was served a bot challenge instead of content.
    #[error("blocked by bot challenge: {0}")]
    FetchBlocked(String),

    /// Both the direct and the rendered fetch path failed.
    #[error("fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// No pagination widget or page parameter was found in the page.
    #[error("no pagination found")]
    NoPaginationFound,

    /// A search page contained no recognizable result cards.
    #[error("no results found on page {0}")]
    NoResultsFound(i64),

    /// One or more metadata fields could not be resolved past the sentinel.
    #[error("partial extraction for record {id}: {missing} field(s) unresolved")]
    PartialExtraction { id: i64, missing: usize },

    /// A single-record operation was given an id that does not exist.
    #[error("record {0} not found")]
    RecordNotFound(i64),

    /// A page-level operation was given an id that does not exist.
    #[error("search page {0} not found")]
    PageNotFound(i64),

    /// A record has no stored detail HTML to parse yet.
    #[error("record {0} has no stored detail HTML")]
    NothingToParse(i64),

    /// Malformed input to a single operation (empty URL, blank term).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
