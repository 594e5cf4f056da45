//! Read-only view of the deception record written by an external detector.
use serde::{Deserialize, Serialize};

use crate::room::Cluster;

/// Last deception the external detector flagged, with the clusters it saw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeceptionLog {
    #[serde(default)]
    pub last_deception_detected: String,
    #[serde(default)]
    pub recent_clusters: Vec<String>,
}

impl DeceptionLog {
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a deception record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn has_detection(&self) -> bool {
        !self.last_deception_detected.trim().is_empty()
    }

    /// Recorded clusters that name a known cluster; unknown labels are skipped.
    #[must_use]
    pub fn clusters(&self) -> Vec<Cluster> {
        self.recent_clusters
            .iter()
            .filter_map(|label| Cluster::from_key(label))
            .collect()
    }
}
