//! Boundary validation for shell-supplied rounds and statistics.
//!
//! The scoring core assumes well-formed input; these parsers are where
//! malformed submissions get rejected.
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::RECENT_WINDOW;
use crate::room::{InvalidRoomId, RoomId};
use crate::stats::RecentStats;

/// Reasons a submission is rejected before it reaches the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("expected exactly {expected} recent rooms, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },
    #[error("invalid room id `{0}`: expected an integer from 1 to 8")]
    InvalidRoomId(String),
    #[error("malformed stats: {0}")]
    MalformedStats(String),
}

impl From<InvalidRoomId> for InputError {
    fn from(err: InvalidRoomId) -> Self {
        Self::InvalidRoomId(err.0.to_string())
    }
}

/// Parse a single room token such as `"7"`.
///
/// # Errors
///
/// Returns `InvalidRoomId` when the token is not an integer in 1–8.
pub fn parse_room(token: &str) -> Result<RoomId, InputError> {
    let trimmed = token.trim();
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InputError::InvalidRoomId(trimmed.to_string()))?;
    u8::try_from(value)
        .ok()
        .and_then(RoomId::new)
        .ok_or_else(|| InvalidRoomId(value).into())
}

/// Parse whitespace- or comma-separated room ids without enforcing a length.
///
/// # Errors
///
/// Returns `InvalidRoomId` for the first token outside 1–8.
pub fn parse_room_list(input: &str) -> Result<Vec<RoomId>, InputError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(parse_room)
        .collect()
}

/// Parse the ten most recent rooms, oldest first.
///
/// # Errors
///
/// Returns `InvalidInputLength` unless exactly ten ids are supplied, or
/// `InvalidRoomId` for an id outside 1–8.
pub fn parse_recent_rooms(input: &str) -> Result<Vec<RoomId>, InputError> {
    let rooms = parse_room_list(input)?;
    if rooms.len() != RECENT_WINDOW {
        return Err(InputError::InvalidInputLength {
            expected: RECENT_WINDOW,
            actual: rooms.len(),
        });
    }
    Ok(rooms)
}

/// Parse a stats object such as `{"1": 12, "2": 9.5, ...}` covering all eight
/// rooms. The result is normalized.
///
/// # Errors
///
/// Returns `MalformedStats` for non-object JSON, non-numeric or negative
/// counts, or missing rooms; `InvalidRoomId` for keys outside 1–8.
pub fn parse_stats_json(json: &str) -> Result<RecentStats, InputError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| InputError::MalformedStats(err.to_string()))?;
    let Value::Object(entries) = value else {
        return Err(InputError::MalformedStats(
            "expected an object keyed by room id".to_string(),
        ));
    };

    let mut counts = BTreeMap::new();
    for (key, raw) in entries {
        let room = parse_room(&key)?;
        let count = raw.as_f64().ok_or_else(|| {
            InputError::MalformedStats(format!("room {room} count is not a number: {raw}"))
        })?;
        if count < 0.0 {
            return Err(InputError::MalformedStats(format!(
                "room {room} count is negative: {count}"
            )));
        }
        counts.insert(room, count);
    }

    if let Some(missing) = RoomId::ALL.into_iter().find(|r| !counts.contains_key(r)) {
        return Err(InputError::MalformedStats(format!(
            "room {missing} has no count"
        )));
    }
    Ok(RecentStats::from_counts(counts).normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_rooms_require_exactly_ten() {
        let rooms = parse_recent_rooms("1 2 3 4 5 6 7 8 1 2").unwrap();
        assert_eq!(rooms.len(), 10);
        assert_eq!(rooms[9].get(), 2);

        let err = parse_recent_rooms("1 2 3").unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidInputLength {
                expected: 10,
                actual: 3
            }
        );
    }

    #[test]
    fn out_of_range_ids_are_rejected() {
        let err = parse_recent_rooms("1 2 3 4 5 6 7 9 1 2").unwrap_err();
        assert_eq!(err, InputError::InvalidRoomId("9".to_string()));
        assert!(err.to_string().contains("`9`"));
        assert!(matches!(parse_room("zero"), Err(InputError::InvalidRoomId(_))));
        assert_eq!(
            parse_room("-3"),
            Err(InputError::InvalidRoomId("-3".to_string()))
        );
    }

    #[test]
    fn room_lists_accept_commas() {
        let rooms = parse_room_list("1,2, 3\t4").unwrap();
        assert_eq!(rooms.iter().map(|r| r.get()).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn stats_parse_and_normalize() {
        let stats = parse_stats_json(
            r#"{"1": 30, "2": 30, "3": 30, "4": 30, "5": 30, "6": 30, "7": 30, "8": 30}"#,
        )
        .unwrap();
        assert!(stats.iter().all(|(_, c)| (c - 12.0).abs() < 1e-9));

        let fractional = parse_stats_json(
            r#"{"1": 9.5, "2": 12, "3": 12, "4": 12, "5": 12, "6": 12, "7": 12, "8": 12}"#,
        )
        .unwrap();
        assert!((fractional.get(RoomId::ALL[0]) - 9.5).abs() < 1e-9);
    }

    #[test]
    fn stats_reject_malformed_entries() {
        assert!(matches!(
            parse_stats_json("[1, 2]"),
            Err(InputError::MalformedStats(_))
        ));
        assert!(matches!(
            parse_stats_json(r#"{"1": "ten"}"#),
            Err(InputError::MalformedStats(_))
        ));
        assert!(matches!(
            parse_stats_json(r#"{"1": 5}"#),
            Err(InputError::MalformedStats(msg)) if msg.contains("room 2")
        ));
        assert!(matches!(
            parse_stats_json(r#"{"9": 5}"#),
            Err(InputError::InvalidRoomId(_))
        ));
        assert!(matches!(
            parse_stats_json(r#"{"1": -1}"#),
            Err(InputError::MalformedStats(_))
        ));
    }
}
