//! Per-host processing toggle.

use serde::{Deserialize, Serialize};

/// Operator-controlled switch governing whether batch operations touch a
/// repository host. One row per distinct host ever observed; enabled by
/// default on first sighting and never deleted automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainFilter {
    pub domain: String,
    pub enabled: bool,
}
