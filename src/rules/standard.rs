//! The classic rule: on every feature the cards are all alike or all different.

use crate::cards::Card;
use crate::core::GameConfig;

use super::engine::RulesEngine;

/// Classic set rule over `feature_count` features of `values` values each.
///
/// A claim holds `values` cards, so "all different" means every value of
/// the feature appears exactly once.
///
/// ```
/// use set_table::cards::Card;
/// use set_table::rules::{RulesEngine, StandardSet};
///
/// let rule = StandardSet::new(4, 3);
/// // features [0,0,0,0], [1,0,0,0], [2,0,0,0]
/// assert!(rule.is_set(&[Card::new(0), Card::new(1), Card::new(2)]));
/// // features [0,0,0,0], [1,0,0,0], [0,1,0,0]
/// assert!(!rule.is_set(&[Card::new(0), Card::new(1), Card::new(3)]));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StandardSet {
    feature_count: usize,
    values: usize,
}

impl StandardSet {
    #[must_use]
    pub const fn new(feature_count: usize, values: usize) -> Self {
        Self {
            feature_count,
            values,
        }
    }

    /// Rule matching a table configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.feature_count, config.feature_size)
    }
}

impl Default for StandardSet {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl RulesEngine for StandardSet {
    fn claim_size(&self) -> usize {
        self.values
    }

    fn is_set(&self, cards: &[Card]) -> bool {
        if cards.is_empty() || cards.len() != self.values {
            return false;
        }
        if cards
            .iter()
            .enumerate()
            .any(|(i, card)| cards[i + 1..].contains(card))
        {
            return false;
        }
        let features: Vec<_> = cards
            .iter()
            .map(|card| card.features(self.feature_count, self.values))
            .collect();

        (0..self.feature_count).all(|f| {
            let first = features[0][f];
            let all_same = features.iter().all(|v| v[f] == first);
            let mut seen = 0u64;
            let all_different = features.iter().all(|v| {
                let bit = 1u64 << (v[f] % 64);
                let fresh = seen & bit == 0;
                seen |= bit;
                fresh
            });
            all_same || all_different
        })
    }
}
