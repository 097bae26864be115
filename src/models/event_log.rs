//! Append-only diagnostic trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single diagnostic message. Not read by any pipeline algorithm,
/// purely observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}
