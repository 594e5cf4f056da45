//! Centralized scoring and wager tuning constants for the advisor.
//!
//! The heuristic blend is fixed: these values can only be adjusted through
//! code changes reviewed in version control, never through external data.

// Windows ------------------------------------------------------------------
pub const ROOM_COUNT: usize = 8;
pub const RECENT_WINDOW: usize = 10;
pub const SUGGESTION_WINDOW: usize = 10;
pub const BUILD_HISTORY_CAP: usize = 100;
pub const PREFERENCE_WINDOW: usize = 5;
pub const DECEPTION_LOOKBACK: usize = 5;
pub const DECEPTION_MIN_HISTORY: usize = DECEPTION_LOOKBACK + 1;
pub const GIM_WINDOW: usize = 3;

// Stats --------------------------------------------------------------------
pub const STATS_TOTAL_CAP: f64 = 100.0;
pub const DEFAULT_ROOM_STAT: f64 = 12.0;
pub(crate) const STAT_LOW_THRESHOLD: f64 = 10.0;
pub(crate) const STAT_VERY_LOW_THRESHOLD: f64 = 5.0;

// Scoring ------------------------------------------------------------------
pub(crate) const DECAY_MAX_EXPONENT: i32 = 9;
pub(crate) const DECAY_BASE: f64 = 2.0;
pub(crate) const RECENCY_WEIGHT: f64 = 0.8;
pub(crate) const TRANSITION_WEIGHT: f64 = 0.2;
pub(crate) const SPAM_THRESHOLD: usize = 4;
pub(crate) const FLOOR_IMBALANCE_THRESHOLD: usize = 6;
pub(crate) const SPAM_PENALTY: f64 = 0.20;
pub(crate) const DECEPTION_PENALTY: f64 = 0.10;
pub(crate) const CLUSTER_PREFERENCE_BONUS: f64 = 0.05;
pub(crate) const FLOOR_PREFERENCE_BONUS: f64 = 0.05;
pub(crate) const FLOOR_IMBALANCE_BONUS: f64 = 0.08;
pub(crate) const STAT_LOW_PENALTY: f64 = 0.15;
pub(crate) const STAT_VERY_LOW_PENALTY: f64 = 0.10;
pub const PERCENT_MAX: f64 = 100.0;

// Suggestion ---------------------------------------------------------------
pub const REPEAT_LIMIT: usize = 3;
pub const REPEAT_WINDOW: usize = 5;

// Wager --------------------------------------------------------------------
pub const BUILD_MIN: i64 = 100;
pub const BUILD_MAX: i64 = 1_000;
pub(crate) const BUILD_STEP: i64 = 100;
pub(crate) const BUILD_SAFETY_DIVISOR: f64 = 10.0;
pub(crate) const BUILD_BOOST_ROUNDS: u32 = 2;
pub(crate) const BUILD_BOOST_AMOUNT: i64 = 200;
pub(crate) const BUILD_GIM_DOUBLE_CAP: i64 = 300;
pub(crate) const BUILD_GIM_TRIPLE_FIXED: i64 = 100;
pub(crate) const BUILD_HIGH_THRESHOLD: i64 = 700;
pub(crate) const BUILD_RESTRAINT_WINDOW: usize = 5;
pub(crate) const BUILD_RUNAWAY_FALLBACK: i64 = 300;

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
