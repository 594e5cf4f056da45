//! Room identifiers, spatial geometry and the display-name catalog.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

use crate::constants::ROOM_COUNT;

const DEFAULT_ROOM_DATA: &str = include_str!("../assets/rooms.json");

/// One of the eight fixed rooms, numbered 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RoomId(u8);

impl RoomId {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    /// Every room in ascending id order. Iteration order doubles as the
    /// canonical tie-break wherever rooms compare equal.
    pub const ALL: [Self; ROOM_COUNT] = [
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
    ];

    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN && value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Zero-based slot for dense per-room arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    #[must_use]
    pub const fn cluster(self) -> Cluster {
        match self.0 {
            2 | 5 | 6 => Cluster::Left,
            1 | 4 | 8 => Cluster::Right,
            _ => Cluster::Center,
        }
    }

    #[must_use]
    pub const fn floor(self) -> Floor {
        if self.0 <= 4 { Floor::Floor1 } else { Floor::Floor2 }
    }
}

impl TryFrom<u8> for RoomId {
    type Error = InvalidRoomId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidRoomId(i64::from(value)))
    }
}

impl From<RoomId> for u8 {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a value falls outside the 1–8 room range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("room id {0} is outside 1-8")]
pub struct InvalidRoomId(pub i64);

/// Spatial grouping of rooms. Declaration order is the preference tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cluster {
    Left,
    Right,
    Center,
}

impl Cluster {
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Center];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Center => "center",
        }
    }

    /// Parse a cluster label as written by external tooling.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cluster| cluster.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Vertical grouping of rooms. Declaration order is the preference tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Floor {
    Floor1,
    Floor2,
}

impl Floor {
    pub const ALL: [Self; 2] = [Self::Floor1, Self::Floor2];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Floor1 => "floor1",
            Self::Floor2 => "floor2",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Floor1 => Self::Floor2,
            Self::Floor2 => Self::Floor1,
        }
    }
}

impl fmt::Display for Floor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[must_use]
pub const fn cluster(room: RoomId) -> Cluster {
    room.cluster()
}

#[must_use]
pub const fn floor(room: RoomId) -> Floor {
    room.floor()
}

/// A room and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEntry {
    pub id: RoomId,
    pub name: String,
}

/// Errors raised when a room catalog does not describe exactly the eight rooms.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("room catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("room {0} is listed more than once")]
    Duplicate(RoomId),
    #[error("room {0} is missing from the catalog")]
    Missing(RoomId),
    #[error("room {0} has an empty name")]
    EmptyName(RoomId),
}

/// Injected mapping from room id to display name, always covering all eight rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomCatalog {
    rooms: Vec<RoomEntry>,
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    rooms: Vec<RoomEntry>,
}

impl RoomCatalog {
    /// Build a catalog from entries, validating coverage of every room.
    ///
    /// # Errors
    ///
    /// Returns an error if a room is duplicated, missing, or unnamed.
    pub fn from_entries(entries: Vec<RoomEntry>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(CatalogError::Duplicate(entry.id));
            }
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(entry.id));
            }
        }
        if let Some(missing) = RoomId::ALL.into_iter().find(|id| !seen.contains(id)) {
            return Err(CatalogError::Missing(missing));
        }
        let mut rooms = entries;
        rooms.sort_by_key(|entry| entry.id);
        Ok(Self { rooms })
    }

    /// Load a catalog from a JSON document shaped like `{"rooms": [{"id": 1, "name": "..."}]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Self::from_entries(raw.rooms)
    }

    /// Catalog with generic `Room N` names.
    #[must_use]
    pub fn numbered() -> Self {
        Self {
            rooms: RoomId::ALL
                .into_iter()
                .map(|id| RoomEntry {
                    id,
                    name: format!("Room {id}"),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_ROOM_DATA).unwrap_or_else(|err| {
            log::warn!("bundled room catalog rejected ({err}); using numbered rooms");
            Self::numbered()
        })
    }

    #[must_use]
    pub fn default_catalog() -> &'static Self {
        static CATALOG: OnceLock<RoomCatalog> = OnceLock::new();
        CATALOG.get_or_init(Self::load_from_static)
    }

    /// Room ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.iter().map(|entry| entry.id)
    }

    #[must_use]
    pub fn name(&self, id: RoomId) -> &str {
        self.rooms
            .get(id.index())
            .map_or("", |entry| entry.name.as_str())
    }

    #[must_use]
    pub fn entries(&self) -> &[RoomEntry] {
        &self.rooms
    }
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::default_catalog().clone()
    }
}
