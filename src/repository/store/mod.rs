//! SQLite-backed store for crawl state.

mod domains;
mod pages;
mod records;

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::models::EventLogEntry;

/// Durable store for search pages, extracted records, domain toggles, and
/// the diagnostic event log.
///
/// The store exclusively owns all persisted rows; the orchestrator and the
/// extraction strategies only read and write through these accessors.
pub struct CrawlStore {
    db_path: PathBuf,
}

impl CrawlStore {
    /// Open (creating if needed) the store at the given path.
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub(crate) fn connect(&self) -> Result<Connection> {
        super::connect(&self.db_path)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        // The event log is created first so later failures can be recorded.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS event_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            -- Raw search pages, one row per logical page
            CREATE TABLE IF NOT EXISTS search_pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                engine TEXT NOT NULL,
                term TEXT NOT NULL,
                year TEXT NOT NULL,
                page_number INTEGER NOT NULL,
                html TEXT NOT NULL DEFAULT '',
                source_url TEXT NOT NULL DEFAULT '',
                fetched_at TEXT NOT NULL,
                UNIQUE (engine, term, year, page_number)
            );

            -- One row per result-listing card
            CREATE TABLE IF NOT EXISTS extracted_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL DEFAULT '',
                buscador_link TEXT NOT NULL,
                buscador_html TEXT,
                repository_link TEXT,
                repository_html TEXT,
                acronym TEXT NOT NULL DEFAULT 'unknown',
                institution TEXT NOT NULL DEFAULT 'unknown',
                program TEXT NOT NULL DEFAULT 'unknown',
                pdf_link TEXT NOT NULL DEFAULT 'unknown',
                parent_page_id INTEGER NOT NULL,
                term TEXT NOT NULL DEFAULT '',
                year TEXT NOT NULL DEFAULT '',
                UNIQUE (parent_page_id, buscador_link)
            );

            -- Per-host processing toggles, enabled on first sighting
            CREATE TABLE IF NOT EXISTS domain_filters (
                domain TEXT PRIMARY KEY,
                enabled INTEGER NOT NULL DEFAULT 1
            );
            "#,
        )?;
        Ok(())
    }

    /// Append a diagnostic message to the event log.
    ///
    /// Failures here are swallowed: logging must never break the operation
    /// being logged.
    pub fn log_event(&self, message: &str) {
        let result = self.connect().and_then(|conn| {
            conn.execute(
                "INSERT INTO event_log (message, created_at) VALUES (?1, ?2)",
                params![message, Utc::now()],
            )
            .map_err(Into::into)
        });
        if let Err(e) = result {
            tracing::warn!("event log write failed: {e}");
        }
    }

    /// Most recent diagnostic entries, newest first.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<EventLogEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT created_at, message FROM event_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(EventLogEntry {
                timestamp: row.get(0)?,
                message: row.get(1)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// The latest log message, for status displays.
    pub fn last_event(&self) -> Result<Option<String>> {
        let conn = self.connect()?;
        conn.query_row(
            "SELECT message FROM event_log ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(Into::into)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_store() -> (tempfile::TempDir, CrawlStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = CrawlStore::new(&dir.path().join("state.db")).expect("open store");
        (dir, store)
    }

    #[test]
    fn event_log_round_trip() {
        let (_dir, store) = temp_store();
        store.log_event("first");
        store.log_event("second");

        assert_eq!(store.last_event().unwrap().as_deref(), Some("second"));
        let events = store.recent_events(10).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "second");
    }
}
