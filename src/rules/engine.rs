//! The rule deciding whether selected cards form a set.
//!
//! The dealer only ever calls `is_set` and `find_sets`; how a set is defined
//! is up to the implementation. Implementations must be pure: they are
//! shared behind an `Arc` and may be called from any thread.

use smallvec::SmallVec;

use crate::cards::Card;

/// Cards of one claim or one legal set.
pub type CardSet = SmallVec<[Card; 4]>;

/// Set rule trait.
///
/// ## Implementation Notes
///
/// - `is_set` receives exactly `claim_size()` cards
/// - `find_sets` has a default brute-force implementation; override it if
///   the rule allows something faster
pub trait RulesEngine: Send + Sync {
    /// Number of cards in a claim.
    fn claim_size(&self) -> usize;

    /// Whether `cards` form a legal set.
    fn is_set(&self, cards: &[Card]) -> bool;

    /// Up to `limit` legal sets among `cards`.
    fn find_sets(&self, cards: &[Card], limit: usize) -> Vec<CardSet> {
        let k = self.claim_size();
        let mut found = Vec::new();
        if k == 0 || cards.len() < k || limit == 0 {
            return found;
        }

        // Lexicographic walk over k-combinations of indices.
        let mut idx: Vec<usize> = (0..k).collect();
        loop {
            let candidate: CardSet = idx.iter().map(|&i| cards[i]).collect();
            if self.is_set(&candidate) {
                found.push(candidate);
                if found.len() >= limit {
                    return found;
                }
            }

            let mut pos = k;
            while pos > 0 && idx[pos - 1] == cards.len() - k + pos - 1 {
                pos -= 1;
            }
            if pos == 0 {
                return found;
            }
            idx[pos - 1] += 1;
            for j in pos..k {
                idx[j] = idx[j - 1] + 1;
            }
        }
    }

    /// Whether at least one legal set exists among `cards`.
    fn has_set(&self, cards: &[Card]) -> bool {
        !self.find_sets(cards, 1).is_empty()
    }
}
