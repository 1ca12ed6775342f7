//! Team data structure.

use serde::{Deserialize, Serialize};

/// A team entered in the Swiss stage. Defined once at setup and never mutated.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Unique name; matches reference teams by this.
    pub name: String,
    /// Region used for same-region pairing avoidance.
    pub region: String,
    /// Bookkeeping zone. Falls back to `region` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl Team {
    /// Create a team whose zone is the same as its region.
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            zone: None,
        }
    }

    /// Create a team with a zone distinct from its region.
    pub fn with_zone(
        name: impl Into<String>,
        region: impl Into<String>,
        zone: impl Into<String>,
    ) -> Self {
        Self {
            zone: Some(zone.into()),
            ..Self::new(name, region)
        }
    }

    /// Zone for simulation bookkeeping; the region unless set explicitly.
    pub fn zone(&self) -> &str {
        self.zone.as_deref().unwrap_or(&self.region)
    }
}
