//! Extracted record accessors.

use rusqlite::{params, OptionalExtension, Row};

use super::CrawlStore;
use crate::error::Result;
use crate::models::{DetailTarget, ExtractedRecord, NewRecord, RecordFilter, UNKNOWN};

fn map_record(row: &Row<'_>) -> rusqlite::Result<ExtractedRecord> {
    Ok(ExtractedRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        buscador_link: row.get(3)?,
        buscador_html: row.get(4)?,
        repository_link: row.get(5)?,
        repository_html: row.get(6)?,
        acronym: row.get(7)?,
        institution: row.get(8)?,
        program: row.get(9)?,
        pdf_link: row.get(10)?,
        parent_page_id: row.get(11)?,
        term: row.get(12)?,
        year: row.get(13)?,
    })
}

const RECORD_COLUMNS: &str = "id, title, author, buscador_link, buscador_html, \
     repository_link, repository_html, acronym, institution, program, pdf_link, \
     parent_page_id, term, year";

/// Append a field-presence predicate to a WHERE clause.
///
/// "Present" means non-null, non-empty, and not the `"unknown"` sentinel.
fn push_presence(sql: &mut String, column: &str, wanted: Option<bool>) {
    match wanted {
        Some(true) => {
            sql.push_str(&format!(
                " AND {column} IS NOT NULL AND {column} != '' AND {column} != '{UNKNOWN}'"
            ));
        }
        Some(false) => {
            sql.push_str(&format!(
                " AND ({column} IS NULL OR {column} = '' OR {column} = '{UNKNOWN}')"
            ));
        }
        None => {}
    }
}

impl CrawlStore {
    /// Insert one record per result card.
    ///
    /// A card already listed for the same parent page is skipped, so
    /// re-running listing extraction never duplicates records.
    pub fn insert_records(&self, records: &[NewRecord]) -> Result<usize> {
        let conn = self.connect()?;
        let mut inserted = 0;
        let mut stmt = conn.prepare(
            r#"
            INSERT OR IGNORE INTO extracted_records
                (title, author, buscador_link, repository_link, parent_page_id, term, year)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )?;
        for rec in records {
            inserted += stmt.execute(params![
                rec.title,
                rec.author,
                rec.buscador_link,
                rec.repository_link,
                rec.parent_page_id,
                rec.term,
                rec.year,
            ])?;
        }
        Ok(inserted)
    }

    pub fn get_record(&self, id: i64) -> Result<Option<ExtractedRecord>> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM extracted_records WHERE id = ?1"),
            params![id],
            map_record,
        )
        .optional()
        .map_err(Into::into)
    }

    /// Records matching the field-presence filter, newest first.
    pub fn list_records(&self, filter: &RecordFilter) -> Result<Vec<ExtractedRecord>> {
        let mut sql = format!("SELECT {RECORD_COLUMNS} FROM extracted_records WHERE 1=1");
        push_presence(&mut sql, "buscador_html", filter.has_buscador_html);
        push_presence(&mut sql, "repository_html", filter.has_repository_html);
        push_presence(&mut sql, "acronym", filter.has_acronym);
        push_presence(&mut sql, "institution", filter.has_institution);
        push_presence(&mut sql, "program", filter.has_program);
        sql.push_str(" ORDER BY id DESC");

        let conn = self.connect()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_record)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// All record ids, newest first.
    pub fn record_ids(&self) -> Result<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id FROM extracted_records ORDER BY id DESC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Store fetched detail HTML for the given target.
    pub fn set_detail_html(&self, id: i64, target: DetailTarget, html: &str) -> Result<()> {
        let column = match target {
            DetailTarget::Buscador => "buscador_html",
            DetailTarget::Repository => "repository_html",
        };
        let conn = self.connect()?;
        conn.execute(
            &format!("UPDATE extracted_records SET {column} = ?1 WHERE id = ?2"),
            params![html, id],
        )?;
        Ok(())
    }

    /// Record the repository link discovered while parsing buscador HTML.
    pub fn set_repository_link(&self, id: i64, link: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "UPDATE extracted_records SET repository_link = ?1 WHERE id = ?2",
            params![link, id],
        )?;
        Ok(())
    }

    /// Overwrite the four structured fields with a parser's output.
    pub fn update_metadata(
        &self,
        id: i64,
        acronym: &str,
        institution: &str,
        program: &str,
        pdf_link: &str,
    ) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            UPDATE extracted_records
            SET acronym = ?1, institution = ?2, program = ?3, pdf_link = ?4
            WHERE id = ?5
            "#,
            params![acronym, institution, program, pdf_link, id],
        )?;
        Ok(())
    }

    /// Ids of records that have at least one detail HTML stored, the
    /// candidates for metadata extraction.
    pub fn ids_with_stored_html(&self) -> Result<Vec<i64>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id FROM extracted_records
            WHERE (repository_html IS NOT NULL AND repository_html != '')
               OR (buscador_html IS NOT NULL AND buscador_html != '')
            ORDER BY id DESC
            "#,
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Ids of records still missing the given target's HTML.
    pub fn ids_missing_html(&self, target: DetailTarget) -> Result<Vec<i64>> {
        let column = match target {
            DetailTarget::Buscador => "buscador_html",
            DetailTarget::Repository => "repository_html",
        };
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id FROM extracted_records WHERE {column} IS NULL OR {column} = '' ORDER BY id DESC"
        ))?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    pub fn delete_record(&self, id: i64) -> Result<bool> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM extracted_records WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    /// Distinct repository hosts observed across all records.
    pub fn distinct_repository_hosts(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT repository_link FROM extracted_records
            WHERE repository_link IS NOT NULL AND repository_link != ''
            "#,
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut hosts: Vec<String> = rows
            .filter_map(|link| link.ok())
            .filter_map(|link| {
                url::Url::parse(&link)
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            })
            .collect();
        hosts.sort();
        hosts.dedup();
        Ok(hosts)
    }
}
