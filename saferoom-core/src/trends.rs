//! Pattern detectors over the recent-room window.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    DECEPTION_LOOKBACK, DECEPTION_MIN_HISTORY, FLOOR_IMBALANCE_THRESHOLD, GIM_WINDOW,
    PREFERENCE_WINDOW, REPEAT_LIMIT, REPEAT_WINDOW, SPAM_THRESHOLD,
};
use crate::room::{Cluster, Floor, RoomId};

/// Rooms that dominate the window. Ten entries hold at most two such rooms.
pub type SpamRooms = SmallVec<[RoomId; 2]>;

fn tail<T>(items: &[T], window: usize) -> &[T] {
    &items[items.len().saturating_sub(window)..]
}

/// Most frequent cluster over the last five entries; ties keep the earlier
/// cluster in `Cluster::ALL` order.
#[must_use]
pub fn cluster_preference(recent: &[RoomId]) -> Cluster {
    let window = tail(recent, PREFERENCE_WINDOW);
    let mut best = Cluster::ALL[0];
    let mut best_count = 0;
    for cluster in Cluster::ALL {
        let count = window.iter().filter(|r| r.cluster() == cluster).count();
        if count > best_count {
            best = cluster;
            best_count = count;
        }
    }
    best
}

/// Most frequent floor over the last five entries; ties keep `Floor1`.
#[must_use]
pub fn floor_preference(recent: &[RoomId]) -> Floor {
    let window = tail(recent, PREFERENCE_WINDOW);
    let mut best = Floor::ALL[0];
    let mut best_count = 0;
    for floor in Floor::ALL {
        let count = window.iter().filter(|r| r.floor() == floor).count();
        if count > best_count {
            best = floor;
            best_count = count;
        }
    }
    best
}

/// Rooms appearing at least four times anywhere in the window, in id order.
#[must_use]
pub fn spam_rooms(recent: &[RoomId]) -> SpamRooms {
    RoomId::ALL
        .into_iter()
        .filter(|room| recent.iter().filter(|r| *r == room).count() >= SPAM_THRESHOLD)
        .collect()
}

/// Occurrences per floor across the whole window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FloorCounts {
    pub floor1: usize,
    pub floor2: usize,
}

impl FloorCounts {
    #[must_use]
    pub const fn get(self, floor: Floor) -> usize {
        match floor {
            Floor::Floor1 => self.floor1,
            Floor::Floor2 => self.floor2,
        }
    }
}

#[must_use]
pub fn floor_counts(recent: &[RoomId]) -> FloorCounts {
    recent
        .iter()
        .fold(FloorCounts::default(), |mut counts, room| {
            match room.floor() {
                Floor::Floor1 => counts.floor1 += 1,
                Floor::Floor2 => counts.floor2 += 1,
            }
            counts
        })
}

/// Floor granted the imbalance bonus: the opposite of a floor holding six
/// or more entries. `Floor1` is checked first.
#[must_use]
pub fn floor_imbalance(recent: &[RoomId]) -> Option<Floor> {
    let counts = floor_counts(recent);
    Floor::ALL
        .into_iter()
        .find(|floor| counts.get(*floor) >= FLOOR_IMBALANCE_THRESHOLD)
        .map(Floor::opposite)
}

/// True when the newest room's cluster is absent from the five entries before it.
#[must_use]
pub fn deception_detected(recent: &[RoomId]) -> bool {
    if recent.len() < DECEPTION_MIN_HISTORY {
        return false;
    }
    let Some((newest, earlier)) = recent.split_last() else {
        return false;
    };
    let cluster = newest.cluster();
    !tail(earlier, DECEPTION_LOOKBACK)
        .iter()
        .any(|room| room.cluster() == cluster)
}

/// True when `room` occurs at least `limit` times among the last `window` entries.
#[must_use]
pub fn too_repeated(room: RoomId, history: &[RoomId], limit: usize, window: usize) -> bool {
    tail(history, window).iter().filter(|r| **r == room).count() >= limit
}

/// `too_repeated` with the default limit of three over a window of five.
#[must_use]
pub fn too_repeated_default(room: RoomId, history: &[RoomId]) -> bool {
    too_repeated(room, history, REPEAT_LIMIT, REPEAT_WINDOW)
}

/// Severity of the adversary camping on one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GimLevel {
    #[default]
    None,
    Double,
    Triple,
}

impl GimLevel {
    /// Numeric severity: 0, 2 or 3.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Double => 2,
            Self::Triple => 3,
        }
    }
}

/// Compare `current` against the three newest entries of `recent`.
///
/// The caller decides whether `recent` already contains `current`; the
/// session always passes the window as it stood before the append.
#[must_use]
pub fn gim_trend(recent: &[RoomId], current: RoomId) -> GimLevel {
    if recent.len() < GIM_WINDOW {
        return GimLevel::None;
    }
    let last3 = tail(recent, GIM_WINDOW);
    if last3.iter().all(|r| *r == current) {
        GimLevel::Triple
    } else if last3[1..].iter().all(|r| *r == current) {
        GimLevel::Double
    } else {
        GimLevel::None
    }
}
