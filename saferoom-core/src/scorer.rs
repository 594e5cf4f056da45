//! Danger scoring: blends recency, transitions and trend heuristics into one
//! number per room and picks the safest.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::constants::{
    CLUSTER_PREFERENCE_BONUS, DECAY_BASE, DECAY_MAX_EXPONENT, DECEPTION_PENALTY,
    FLOOR_IMBALANCE_BONUS, FLOOR_PREFERENCE_BONUS, PERCENT_MAX, RECENCY_WEIGHT, ROOM_COUNT,
    SPAM_PENALTY, STAT_LOW_PENALTY, STAT_LOW_THRESHOLD, STAT_VERY_LOW_PENALTY,
    STAT_VERY_LOW_THRESHOLD, TRANSITION_WEIGHT,
};
use crate::room::{RoomCatalog, RoomId};
use crate::stats::RecentStats;
use crate::transition::{TransitionTable, transition_scores};
use crate::trends::{
    cluster_preference, deception_detected, floor_imbalance, floor_preference, spam_rooms,
};

/// Additive heuristic applied on top of the blended base score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Spam,
    Deception,
    ClusterPreference,
    FloorPreference,
    FloorImbalance,
    LowStat,
    VeryLowStat,
}

impl Adjustment {
    #[must_use]
    pub const fn delta(self) -> f64 {
        match self {
            Self::Spam => -SPAM_PENALTY,
            Self::Deception => -DECEPTION_PENALTY,
            Self::ClusterPreference => CLUSTER_PREFERENCE_BONUS,
            Self::FloorPreference => FLOOR_PREFERENCE_BONUS,
            Self::FloorImbalance => FLOOR_IMBALANCE_BONUS,
            Self::LowStat => -STAT_LOW_PENALTY,
            Self::VeryLowStat => -STAT_VERY_LOW_PENALTY,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Spam => "spam",
            Self::Deception => "deception",
            Self::ClusterPreference => "cluster-preference",
            Self::FloorPreference => "floor-preference",
            Self::FloorImbalance => "floor-imbalance",
            Self::LowStat => "low-stat",
            Self::VeryLowStat => "very-low-stat",
        }
    }
}

pub type AdjustmentSet = SmallVec<[Adjustment; 4]>;

/// How one room's danger was assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomScore {
    pub room: RoomId,
    pub recency: f64,
    pub transition: f64,
    pub adjustments: AdjustmentSet,
    pub raw: f64,
    /// `raw * 100` capped at 100; may be negative.
    pub danger: f64,
}

/// Result of one scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub safest: RoomId,
    /// `100 - danger` of the safest room.
    pub safety: f64,
    pub danger: BTreeMap<RoomId, f64>,
    pub deception: bool,
    pub breakdown: Vec<RoomScore>,
}

impl Analysis {
    /// Rooms in ascending danger; equal danger keeps ascending id order.
    #[must_use]
    pub fn ranked(&self) -> Vec<(RoomId, f64)> {
        let mut ranked: Vec<(RoomId, f64)> = self.danger.iter().map(|(r, d)| (*r, *d)).collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }

    #[must_use]
    pub fn danger_of(&self, room: RoomId) -> f64 {
        self.danger.get(&room).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn safety_of(&self, room: RoomId) -> f64 {
        PERCENT_MAX - self.danger_of(room)
    }
}

/// Normalized decay weights for a window of `len` entries, oldest first.
/// The newest entry weighs `2^9`, halving per step back.
#[must_use]
pub fn recency_weights(len: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..len)
        .map(|position| {
            let age = len - 1 - position;
            let exponent = DECAY_MAX_EXPONENT - i32::try_from(age).unwrap_or(i32::MAX);
            DECAY_BASE.powi(exponent)
        })
        .collect();
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return raw;
    }
    raw.into_iter().map(|w| w / total).collect()
}

/// Decay-weighted share of the window held by each room.
#[must_use]
pub fn recency_distribution(recent: &[RoomId]) -> [f64; ROOM_COUNT] {
    let mut dist = [0.0; ROOM_COUNT];
    for (room, weight) in recent.iter().zip(recency_weights(recent.len())) {
        dist[room.index()] += weight;
    }
    dist
}

/// Score every catalog room and pick the safest.
///
/// Folds the newest step of `recent` into `table` before reading it, so each
/// call must correspond to one new observation.
pub fn analyze(
    catalog: &RoomCatalog,
    recent: &[RoomId],
    stats: &RecentStats,
    table: &mut TransitionTable,
) -> Analysis {
    let recency = recency_distribution(recent);
    table.observe(recent);

    let deception = deception_detected(recent);
    let transitions = transition_scores(table, recent);
    let cluster_pref = cluster_preference(recent);
    let floor_pref = floor_preference(recent);
    let spam = spam_rooms(recent);
    let imbalance = floor_imbalance(recent);
    let newest_cluster = recent.last().map(|room| room.cluster());

    let mut breakdown = Vec::with_capacity(ROOM_COUNT);
    for room in catalog.ids() {
        let mut adjustments = AdjustmentSet::new();
        if spam.contains(&room) {
            adjustments.push(Adjustment::Spam);
        }
        if deception && newest_cluster == Some(room.cluster()) {
            adjustments.push(Adjustment::Deception);
        }
        if room.cluster() == cluster_pref {
            adjustments.push(Adjustment::ClusterPreference);
        }
        if room.floor() == floor_pref {
            adjustments.push(Adjustment::FloorPreference);
        }
        if imbalance == Some(room.floor()) {
            adjustments.push(Adjustment::FloorImbalance);
        }
        let stat = stats.get(room);
        if stat < STAT_LOW_THRESHOLD {
            adjustments.push(Adjustment::LowStat);
        }
        if stat < STAT_VERY_LOW_THRESHOLD {
            adjustments.push(Adjustment::VeryLowStat);
        }

        let recency_share = recency[room.index()];
        let transition_share = transitions[room.index()];
        let base = RECENCY_WEIGHT * recency_share + TRANSITION_WEIGHT * transition_share;
        let raw = adjustments.iter().fold(base, |acc, adj| acc + adj.delta());
        let danger = (raw * PERCENT_MAX).min(PERCENT_MAX);
        log::trace!(
            "score room {room}: recency {recency_share:.4} transition {transition_share:.4} raw {raw:.4} adjustments {:?}",
            adjustments.iter().map(|a| a.key()).collect::<Vec<_>>()
        );
        breakdown.push(RoomScore {
            room,
            recency: recency_share,
            transition: transition_share,
            adjustments,
            raw,
            danger,
        });
    }

    let safest = breakdown
        .iter()
        .fold(None::<&RoomScore>, |best, score| match best {
            Some(current) if current.danger <= score.danger => Some(current),
            _ => Some(score),
        })
        .map_or((RoomId::ALL[0], 0.0), |score| (score.room, score.danger));

    log::debug!(
        "analysis over {} rooms: safest {} danger {:.2}{}",
        breakdown.len(),
        safest.0,
        safest.1,
        if deception { " (deception)" } else { "" }
    );

    Analysis {
        safest: safest.0,
        safety: PERCENT_MAX - safest.1,
        danger: breakdown.iter().map(|s| (s.room, s.danger)).collect(),
        deception,
        breakdown,
    }
}
