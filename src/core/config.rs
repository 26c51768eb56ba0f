//! Table configuration.
//!
//! A game is configured once at startup by a `GameConfig`:
//! - board geometry (`table_size`) and claim size (`feature_size`)
//! - deck shape (`feature_count`, `deck_size`)
//! - timing (turn timeout, warning threshold, freeze durations, ticks)
//! - seats (`SeatConfig`, human or computer)
//!
//! Durations are kept in milliseconds so a config serializes to plain
//! numbers; accessors return `Duration`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;
use super::player::{PlayerId, MAX_PLAYERS};

/// Largest table: slots are numbered with `u16`.
pub const MAX_TABLE_SIZE: usize = u16::MAX as usize + 1;

/// How the turn timer behaves, derived from `turn_timeout_millis`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    /// Count down to a forced reshuffle.
    Countdown(Duration),
    /// No forced reshuffle; show time since the last reset instead.
    Elapsed,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    /// Display name.
    pub name: String,

    /// Human seats take key presses from `GameHandle::key_pressed`;
    /// computer seats generate their own.
    pub human: bool,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            human: true,
        }
    }

    pub fn computer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            human: false,
        }
    }
}

/// Complete table configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of board slots.
    pub table_size: usize,

    /// Cards per claim, also the number of values each feature takes.
    pub feature_size: usize,

    /// Number of features printed on each card.
    pub feature_count: usize,

    /// Cards in the deck; at most `feature_size ^ feature_count`.
    pub deck_size: usize,

    /// `> 0` countdown to reshuffle, `0` elapsed display, `< 0` invalid.
    pub turn_timeout_millis: i64,

    /// Remaining time below which the countdown turns red.
    pub turn_timeout_warning_millis: u64,

    /// Suspension after a correct claim.
    pub point_freeze_millis: u64,

    /// Suspension after a wrong or voided claim.
    pub penalty_freeze_millis: u64,

    /// Simulated latency of each card placement/removal.
    pub table_delay_millis: u64,

    /// Display refresh and suspension countdown granularity.
    pub tick_millis: u64,

    /// Dealer polling granularity once the countdown is in warning.
    pub warning_tick_millis: u64,

    /// How long the dealer waits for players to acknowledge a stop.
    pub stop_ack_millis: u64,

    /// Log every legal set after each deal.
    pub hints: bool,

    /// Seed for shuffles and computer players.
    pub seed: u64,

    pub seats: Vec<SeatConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            table_size: 12,
            feature_size: 3,
            feature_count: 4,
            deck_size: 81,
            turn_timeout_millis: 60_000,
            turn_timeout_warning_millis: 5_000,
            point_freeze_millis: 1_000,
            penalty_freeze_millis: 3_000,
            table_delay_millis: 0,
            tick_millis: 1_000,
            warning_tick_millis: 10,
            stop_ack_millis: 1_000,
            hints: false,
            seed: 0,
            seats: vec![SeatConfig::human("Player 1"), SeatConfig::human("Player 2")],
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all seats.
    #[must_use]
    pub fn with_seats(mut self, seats: Vec<SeatConfig>) -> Self {
        self.seats = seats;
        self
    }

    /// Replace all seats with `count` computer players.
    #[must_use]
    pub fn with_computers(mut self, count: usize) -> Self {
        self.seats = (1..=count)
            .map(|i| SeatConfig::computer(format!("Computer {i}")))
            .collect();
        self
    }

    #[must_use]
    pub fn with_turn_timeout_millis(mut self, millis: i64) -> Self {
        self.turn_timeout_millis = millis;
        self
    }

    #[must_use]
    pub fn with_warning_millis(mut self, millis: u64) -> Self {
        self.turn_timeout_warning_millis = millis;
        self
    }

    /// Set point and penalty suspensions.
    #[must_use]
    pub fn with_freezes(mut self, point_millis: u64, penalty_millis: u64) -> Self {
        self.point_freeze_millis = point_millis;
        self.penalty_freeze_millis = penalty_millis;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, tick_millis: u64, warning_tick_millis: u64) -> Self {
        self.tick_millis = tick_millis;
        self.warning_tick_millis = warning_tick_millis;
        self
    }

    #[must_use]
    pub fn with_table_delay_millis(mut self, millis: u64) -> Self {
        self.table_delay_millis = millis;
        self
    }

    #[must_use]
    pub fn with_deck_size(mut self, deck_size: usize) -> Self {
        self.deck_size = deck_size;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_hints(mut self) -> Self {
        self.hints = true;
        self
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn seat(&self, player: PlayerId) -> Option<&SeatConfig> {
        self.seats.get(player.index())
    }

    /// Distinct cards the feature encoding can express.
    #[must_use]
    pub fn distinct_cards(&self) -> usize {
        u32::try_from(self.feature_count)
            .ok()
            .and_then(|count| self.feature_size.checked_pow(count))
            .unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn timer_mode(&self) -> TimerMode {
        match u64::try_from(self.turn_timeout_millis) {
            Ok(0) | Err(_) => TimerMode::Elapsed,
            Ok(millis) => TimerMode::Countdown(Duration::from_millis(millis)),
        }
    }

    #[must_use]
    pub fn warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_millis)
    }

    #[must_use]
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }

    #[must_use]
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }

    #[must_use]
    pub fn table_delay(&self) -> Duration {
        Duration::from_millis(self.table_delay_millis)
    }

    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    #[must_use]
    pub fn warning_tick(&self) -> Duration {
        Duration::from_millis(self.warning_tick_millis)
    }

    #[must_use]
    pub fn stop_ack(&self) -> Duration {
        Duration::from_millis(self.stop_ack_millis)
    }

    /// Check every invariant the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_size == 0 {
            return Err(ConfigError::EmptyTable);
        }
        if self.table_size > MAX_TABLE_SIZE {
            return Err(ConfigError::TableTooLarge(self.table_size));
        }
        if self.feature_size < 2 {
            return Err(ConfigError::FeatureSizeTooSmall(self.feature_size));
        }
        if self.feature_size > self.table_size {
            return Err(ConfigError::FeatureSizeExceedsTable {
                feature_size: self.feature_size,
                table_size: self.table_size,
            });
        }
        if self.feature_count == 0 {
            return Err(ConfigError::NoFeatures);
        }
        if self.deck_size > self.distinct_cards() {
            return Err(ConfigError::DeckTooLarge {
                deck_size: self.deck_size,
                distinct: self.distinct_cards(),
            });
        }
        if self.deck_size < self.feature_size {
            return Err(ConfigError::DeckTooSmall(self.deck_size));
        }
        if self.seats.is_empty() || self.seats.len() > MAX_PLAYERS {
            return Err(ConfigError::PlayerCount(self.seats.len()));
        }
        if self.turn_timeout_millis < 0 {
            return Err(ConfigError::NegativeTimeout(self.turn_timeout_millis));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::ZeroTick("tick_millis"));
        }
        if self.warning_tick_millis == 0 {
            return Err(ConfigError::ZeroTick("warning_tick_millis"));
        }
        Ok(())
    }
}
