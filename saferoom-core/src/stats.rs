//! Long-horizon room frequency statistics and their normalization.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{DEFAULT_ROOM_STAT, STATS_TOTAL_CAP};
use crate::numbers::round_even_non_negative;
use crate::room::RoomId;

/// Observed entries per room over the last hundred rounds.
///
/// Counts may be fractional when supplied from outside; normalization always
/// produces whole numbers. Absent rooms read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentStats {
    counts: BTreeMap<RoomId, f64>,
}

impl RecentStats {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn from_counts(counts: BTreeMap<RoomId, f64>) -> Self {
        Self { counts }
    }

    #[must_use]
    pub fn get(&self, room: RoomId) -> f64 {
        self.counts.get(&room).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, room: RoomId, count: f64) {
        self.counts.insert(room, count.max(0.0));
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.counts.values().sum()
    }

    /// Count one more entry for `room`, then renormalize.
    pub fn record(&mut self, room: RoomId) {
        *self.counts.entry(room).or_insert(0.0) += 1.0;
        normalize_stats(self);
    }

    #[must_use]
    pub fn normalized(mut self) -> Self {
        normalize_stats(&mut self);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoomId, f64)> + '_ {
        self.counts.iter().map(|(room, count)| (*room, *count))
    }
}

impl Default for RecentStats {
    /// Every room starts at the flat prior of twelve entries.
    fn default() -> Self {
        Self {
            counts: RoomId::ALL
                .into_iter()
                .map(|room| (room, DEFAULT_ROOM_STAT))
                .collect(),
        }
    }
}

/// Rescale counts so they sum to at most 100, rounding each to the nearest
/// whole number. Totals already within the cap are left untouched.
pub fn normalize_stats(stats: &mut RecentStats) {
    let total = stats.total();
    if total <= STATS_TOTAL_CAP {
        return;
    }
    let ratio = STATS_TOTAL_CAP / total;
    for count in stats.counts.values_mut() {
        *count = round_even_non_negative(*count * ratio);
    }
}
