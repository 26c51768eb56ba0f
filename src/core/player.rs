//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier. A table seats at most [`MAX_PLAYERS`] players,
//! which keeps per-slot token membership in a single bitmask.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access. The board keeps scores
//! in one and the final `GameOutcome` reports them the same way.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest number of seats a table supports.
pub const MAX_PLAYERS: usize = 16;

/// Seat identifier. Seats are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Bit used for this player in a token mask.
    #[must_use]
    pub const fn bit(self) -> u16 {
        1 << self.0
    }

    /// Iterate over all player IDs of a table with `player_count` seats.
    ///
    /// ```
    /// use set_table::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use set_table::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<u32> = PlayerMap::with_value(4, 0);
/// scores[PlayerId::new(2)] += 1;
/// assert_eq!(scores.max(), Some(&1));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    ///
    /// Panics outside `1..=MAX_PLAYERS`; `GameConfig::validate` rejects such
    /// tables before any map is built.
    pub fn new(player_count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= MAX_PLAYERS, "Too many players for one table");

        let data = PlayerId::all(player_count).map(factory).collect();
        Self { data }
    }

    /// Create a map with every entry set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.data.len())
    }

    /// Largest value across all seats.
    #[must_use]
    pub fn max(&self) -> Option<&T>
    where
        T: Ord,
    {
        self.data.iter().max()
    }

    /// Every seat holding the maximum value. Ties are all returned.
    #[must_use]
    pub fn argmax(&self) -> Vec<PlayerId>
    where
        T: Ord,
    {
        match self.max() {
            Some(best) => self
                .iter()
                .filter(|(_, v)| *v == best)
                .map(|(p, _)| p)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p3 = PlayerId::new(3);

        assert_eq!(p0.index(), 0);
        assert_eq!(p3.bit(), 0b1000);
        assert_eq!(format!("{}", p3), "Player 3");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<u32> = PlayerMap::new(3, |p| p.index() as u32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(2)], 20);
        assert_eq!(map.player_count(), 3);
    }

    #[test]
    fn test_player_map_mutation() {
        let mut map: PlayerMap<u32> = PlayerMap::with_value(2, 0);
        map[PlayerId::new(1)] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &0), (PlayerId::new(1), &7)]);
    }

    #[test]
    fn test_argmax_returns_ties() {
        let mut map: PlayerMap<u32> = PlayerMap::with_value(4, 1);
        map[PlayerId::new(1)] = 3;
        map[PlayerId::new(3)] = 3;

        assert_eq!(map.argmax(), vec![PlayerId::new(1), PlayerId::new(3)]);
    }

    #[test]
    fn test_argmax_all_zero() {
        let map: PlayerMap<u32> = PlayerMap::with_value(3, 0);
        assert_eq!(map.argmax().len(), 3);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u32> = PlayerMap::new(2, |p| p.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<u32> = PlayerMap::with_value(0, 0);
    }
}
