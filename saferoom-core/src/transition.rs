//! First-order room-to-room transition counts.
use serde::{Deserialize, Serialize};

use crate::constants::ROOM_COUNT;
use crate::numbers::u32_to_f64;
use crate::room::RoomId;

/// Session-lifetime table of how often the adversary moved from one room to
/// the next. Every 8×8 cell exists up front, so unseen pairs read as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionTable {
    counts: [[u32; ROOM_COUNT]; ROOM_COUNT],
}

impl TransitionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn count(&self, from: RoomId, to: RoomId) -> u32 {
        self.counts[from.index()][to.index()]
    }

    pub fn record(&mut self, from: RoomId, to: RoomId) {
        let cell = &mut self.counts[from.index()][to.index()];
        *cell = cell.saturating_add(1);
    }

    /// Fold the newest step of `recent` into the table, if it has one.
    pub fn observe(&mut self, recent: &[RoomId]) {
        if let [.., prev, last] = recent {
            self.record(*prev, *last);
        }
    }

    #[must_use]
    pub fn outgoing_total(&self, from: RoomId) -> u32 {
        self.counts[from.index()]
            .iter()
            .fold(0_u32, |acc, c| acc.saturating_add(*c))
    }

    /// Empirical next-room distribution from `from`, all zero when the room
    /// has never been left.
    #[must_use]
    pub fn distribution(&self, from: RoomId) -> [f64; ROOM_COUNT] {
        let total = match self.outgoing_total(from) {
            0 => 1.0,
            n => u32_to_f64(n),
        };
        self.counts[from.index()].map(|count| u32_to_f64(count) / total)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().flatten().all(|c| *c == 0)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Distribution for the newest room in `recent`, or zeros for an empty window.
#[must_use]
pub fn transition_scores(table: &TransitionTable, recent: &[RoomId]) -> [f64; ROOM_COUNT] {
    recent
        .last()
        .map_or([0.0; ROOM_COUNT], |last| table.distribution(*last))
}
