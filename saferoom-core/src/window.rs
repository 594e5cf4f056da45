//! Fixed-capacity FIFO windows for room and suggestion history.
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{RECENT_WINDOW, SUGGESTION_WINDOW};
use crate::room::RoomId;

/// Ordered most-recent-last buffer that evicts its oldest entry past `CAP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RollingWindow<T, const CAP: usize> {
    items: Vec<T>,
}

/// The last ten rooms the adversary entered.
pub type RecentRooms = RollingWindow<RoomId, RECENT_WINDOW>;

/// The last ten candidate rooms proposed by the scorer.
pub type SuggestionHistory = RollingWindow<RoomId, SUGGESTION_WINDOW>;

impl<T, const CAP: usize> RollingWindow<T, CAP> {
    pub const CAPACITY: usize = CAP;

    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append the newest entry, returning the evicted oldest one if the window overflowed.
    pub fn push(&mut self, item: T) -> Option<T> {
        self.items.push(item);
        if self.items.len() > CAP {
            Some(self.items.remove(0))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T, const CAP: usize> Default for RollingWindow<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const CAP: usize> FromIterator<T> for RollingWindow<T, CAP> {
    /// Keeps only the newest `CAP` items of the iterator.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut window = Self::new();
        for item in iter {
            window.push(item);
        }
        window
    }
}

impl<'de, T, const CAP: usize> Deserialize<'de> for RollingWindow<T, CAP>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(items.into_iter().collect())
    }
}

impl<'a, T, const CAP: usize> IntoIterator for &'a RollingWindow<T, CAP> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_evicts_oldest_past_capacity() {
        let mut window: RollingWindow<u8, 3> = RollingWindow::new();
        assert_eq!(window.push(1), None);
        assert_eq!(window.push(2), None);
        assert_eq!(window.push(3), None);
        assert_eq!(window.push(4), Some(1));
        assert_eq!(window.as_slice(), &[2, 3, 4]);
        assert_eq!(window.last(), Some(&4));
    }

    #[test]
    fn collecting_keeps_the_newest_entries() {
        let window: RecentRooms = (1..=8)
            .chain(1..=5)
            .filter_map(RoomId::new)
            .collect();
        assert_eq!(window.len(), RecentRooms::CAPACITY);
        let ids: Vec<u8> = window.iter().map(|r| r.get()).collect();
        assert_eq!(ids, vec![4, 5, 6, 7, 8, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn deserializing_trims_oversized_windows() {
        let window: RollingWindow<u8, 2> = serde_json::from_str("[1,2,3]").unwrap();
        assert_eq!(window.as_slice(), &[2, 3]);
        assert_eq!(serde_json::to_string(&window).unwrap(), "[2,3]");
    }
}
