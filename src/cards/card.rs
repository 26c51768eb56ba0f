//! Card identifiers and feature decoding.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Feature vector of one card. Four features fit inline.
pub type Features = SmallVec<[u8; 8]>;

/// Opaque, immutable card identifier in `0..deck_size`.
///
/// A card's features are the digits of its id in base `values`, least
/// significant first, so the classic 81-card deck is ids `0..81` with four
/// ternary features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card(pub u32);

impl Card {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Decode `count` features, each taking one of `values` values.
    ///
    /// ```
    /// use set_table::cards::Card;
    ///
    /// // 2*1 + 1*3 + 0*9 + 1*27
    /// let card = Card::new(32);
    /// assert_eq!(card.features(4, 3).as_slice(), &[2, 1, 0, 1]);
    /// ```
    #[must_use]
    pub fn features(self, count: usize, values: usize) -> Features {
        let values = values.max(1) as u32;
        let mut rest = self.0;
        (0..count)
            .map(|_| {
                let digit = rest % values;
                rest /= values;
                digit as u8
            })
            .collect()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_zero() {
        assert_eq!(Card::new(0).features(4, 3).as_slice(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_features_last_card() {
        assert_eq!(Card::new(80).features(4, 3).as_slice(), &[2, 2, 2, 2]);
    }

    #[test]
    fn test_features_distinct() {
        let mut seen: Vec<Features> = (0..81).map(|id| Card::new(id).features(4, 3)).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 81);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Card::new(12)), "Card(12)");
    }
}
