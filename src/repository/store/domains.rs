//! Domain filter accessors.

use rusqlite::{params, OptionalExtension};

use super::CrawlStore;
use crate::error::Result;
use crate::models::DomainFilter;

impl CrawlStore {
    /// Register a host on first sighting, enabled by default.
    ///
    /// Existing toggles are left untouched.
    pub fn observe_domain(&self, domain: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR IGNORE INTO domain_filters (domain, enabled) VALUES (?1, 1)",
            params![domain.to_lowercase()],
        )?;
        Ok(())
    }

    /// Set the operator's toggle for a host.
    pub fn set_domain_enabled(&self, domain: &str, enabled: bool) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO domain_filters (domain, enabled) VALUES (?1, ?2)
            ON CONFLICT (domain) DO UPDATE SET enabled = excluded.enabled
            "#,
            params![domain.to_lowercase(), enabled as i64],
        )?;
        Ok(())
    }

    /// Whether batch operations may touch a host. Unseen hosts are enabled.
    pub fn domain_enabled(&self, domain: &str) -> Result<bool> {
        let conn = self.connect()?;
        let enabled: Option<i64> = conn
            .query_row(
                "SELECT enabled FROM domain_filters WHERE domain = ?1",
                params![domain.to_lowercase()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(enabled.map(|v| v != 0).unwrap_or(true))
    }

    /// All saved toggles, alphabetical.
    pub fn list_domains(&self) -> Result<Vec<DomainFilter>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT domain, enabled FROM domain_filters ORDER BY domain ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(DomainFilter {
                domain: row.get(0)?,
                enabled: row.get::<_, i64>(1)? != 0,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::temp_store;

    #[test]
    fn first_sighting_defaults_to_enabled() {
        let (_dir, store) = temp_store();
        store.observe_domain("BDTD.UDF.edu.br").unwrap();

        assert!(store.domain_enabled("bdtd.udf.edu.br").unwrap());
        // Re-observing must not reset an explicit toggle.
        store.set_domain_enabled("bdtd.udf.edu.br", false).unwrap();
        store.observe_domain("bdtd.udf.edu.br").unwrap();
        assert!(!store.domain_enabled("bdtd.udf.edu.br").unwrap());
    }

    #[test]
    fn unseen_hosts_are_enabled() {
        let (_dir, store) = temp_store();
        assert!(store.domain_enabled("repositorio.unb.br").unwrap());
        assert!(store.list_domains().unwrap().is_empty());
    }
}
