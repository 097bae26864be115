//! Search page accessors.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::CrawlStore;
use crate::error::Result;
use crate::models::SearchPage;

fn map_page(row: &Row<'_>) -> rusqlite::Result<SearchPage> {
    Ok(SearchPage {
        id: row.get(0)?,
        engine: row.get(1)?,
        term: row.get(2)?,
        year: row.get(3)?,
        page_number: row.get(4)?,
        html: row.get(5)?,
        source_url: row.get(6)?,
        fetched_at: row.get(7)?,
    })
}

const PAGE_COLUMNS: &str =
    "id, engine, term, year, page_number, html, source_url, fetched_at";

impl CrawlStore {
    /// Insert or replace the content of a logical search page.
    ///
    /// Keyed on `(engine, term, year, page_number)`: re-fetching the same
    /// page replaces the HTML wholesale and returns the existing row id.
    pub fn upsert_search_page(
        &self,
        engine: &str,
        term: &str,
        year: &str,
        page_number: u32,
        html: &str,
        source_url: &str,
    ) -> Result<i64> {
        let conn = self.connect()?;
        let id = conn.query_row(
            r#"
            INSERT INTO search_pages (engine, term, year, page_number, html, source_url, fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT (engine, term, year, page_number) DO UPDATE SET
                html = excluded.html,
                source_url = excluded.source_url,
                fetched_at = excluded.fetched_at
            RETURNING id
            "#,
            params![engine, term, year, page_number, html, source_url, Utc::now()],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn get_search_page(&self, id: i64) -> Result<Option<SearchPage>> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {PAGE_COLUMNS} FROM search_pages WHERE id = ?1"),
            params![id],
            map_page,
        )
        .optional()
        .map_err(Into::into)
    }

    /// All stored pages, most recently fetched first.
    pub fn list_history(&self) -> Result<Vec<SearchPage>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PAGE_COLUMNS} FROM search_pages ORDER BY fetched_at DESC, page_number ASC"
        ))?;
        let rows = stmt.query_map([], map_page)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Discard a page's stored HTML while keeping the history row.
    pub fn clear_page_html(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE search_pages SET html = '' WHERE id = ?1",
            params![id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a page's history row outright.
    ///
    /// Extracted records carry their own term/year and are left in place.
    pub fn delete_search_page(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM search_pages WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
