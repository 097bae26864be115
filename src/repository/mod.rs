//! Repository layer for database persistence.
//!
//! All durable crawl state lives in a single SQLite file owned by
//! [`CrawlStore`]. Every accessor opens a short-lived connection against the
//! same path; SQLite's locking plus the WAL journal serialize writes, which
//! is the store's single-writer discipline.

mod store;

pub use store::CrawlStore;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::error::Result;

/// Open a connection with the pragmas every accessor relies on.
fn connect(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(Duration::from_secs(10))?;
    Ok(conn)
}
