//! Saferoom Advisor Engine
//!
//! Platform-agnostic scoring core for the safe-room guessing game. Given the
//! recent rooms a hidden killer entered and longer-horizon room statistics,
//! it scores each room's danger, suggests the safest one and sizes a wager.
//! Presentation layers call in with plain data and render the numbers.

pub mod constants;
pub mod deception_log;
pub mod input;
pub mod numbers;
pub mod room;
pub mod scorer;
pub mod session;
pub mod stats;
pub mod transition;
pub mod trends;
pub mod wager;
pub mod window;

// Re-export commonly used types
pub use deception_log::DeceptionLog;
pub use input::{InputError, parse_recent_rooms, parse_room, parse_room_list, parse_stats_json};
pub use room::{
    CatalogError, Cluster, Floor, InvalidRoomId, RoomCatalog, RoomEntry, RoomId, cluster, floor,
};
pub use scorer::{Adjustment, Analysis, RoomScore, analyze, recency_weights};
pub use session::{AdvisorSession, RoundAdvice, SessionState};
pub use stats::{RecentStats, normalize_stats};
pub use transition::TransitionTable;
pub use trends::{
    FloorCounts, GimLevel, SpamRooms, cluster_preference, deception_detected, floor_counts,
    floor_imbalance, floor_preference, gim_trend, spam_rooms, too_repeated, too_repeated_default,
};
pub use wager::{BuildDecision, WagerState, base_build};
pub use window::{RecentRooms, RollingWindow, SuggestionHistory};
