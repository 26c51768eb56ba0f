//! Error types.
//!
//! Only configuration mistakes are fatal. Board preconditions surface as
//! `BoardError` so callers can log them; contention outcomes (a token
//! rejected while the board is frozen, a voided claim) are not errors at all.
//! `StartError` covers everything that can stop a game from starting.

use thiserror::Error;

use super::config::MAX_TABLE_SIZE;
use super::player::MAX_PLAYERS;
use crate::board::Slot;
use crate::cards::Card;

/// Invalid table configuration, reported by `GameConfig::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("table must have at least one slot")]
    EmptyTable,

    #[error("table of {0} slots exceeds the limit of {max}", max = MAX_TABLE_SIZE)]
    TableTooLarge(usize),

    #[error("feature size {0} is too small, a claim needs at least 2 cards")]
    FeatureSizeTooSmall(usize),

    #[error("feature size {feature_size} does not fit on a table of {table_size} slots")]
    FeatureSizeExceedsTable {
        feature_size: usize,
        table_size: usize,
    },

    #[error("cards need at least one feature")]
    NoFeatures,

    #[error("deck of {deck_size} cards exceeds the {distinct} distinct cards the features allow")]
    DeckTooLarge { deck_size: usize, distinct: usize },

    #[error("deck of {0} cards cannot hold a single claim")]
    DeckTooSmall(usize),

    #[error("table needs between 1 and {max} players, got {0}", max = MAX_PLAYERS)]
    PlayerCount(usize),

    #[error("turn timeout must not be negative, got {0} ms")]
    NegativeTimeout(i64),

    #[error("{0} must be greater than zero")]
    ZeroTick(&'static str),

    #[error("rules claim {rules} cards but the feature size is {feature_size}")]
    ClaimSizeMismatch { rules: usize, feature_size: usize },
}

/// Failure to get a game running.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to spawn thread {name}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Violated precondition of a board mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("{0} is outside the table")]
    SlotOutOfRange(Slot),

    #[error("{0} is outside the deck")]
    CardOutOfRange(Card),

    #[error("{slot} already holds {card}")]
    SlotOccupied { slot: Slot, card: Card },

    #[error("{card} is already placed at {slot}")]
    CardOnBoard { card: Card, slot: Slot },
}
