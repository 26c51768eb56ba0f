//! # set-table
//!
//! A concurrent engine for the card game Set: one dealer thread and one
//! thread per player sharing a single board.
//!
//! ## Design Principles
//!
//! 1. **One Lock, One Board**: Slots, cards, tokens, scores and the freeze
//!    flag live behind one mutex. Actors never share anything else.
//!
//! 2. **Single Coordinator**: Only the dealer places or removes cards. It
//!    consumes claims in FIFO order and re-reads the board when resolving.
//!
//! 3. **Interruptible Everywhere**: Every wait is either a condition
//!    variable loop that re-checks its predicate or a channel `select!`
//!    next to the stop signal.
//!
//! ## Architecture
//!
//! - **Player actors** toggle tokens, submit a claim when the selection is
//!   full and block on a verdict channel. Computer seats add a generator
//!   thread that presses random slots.
//!
//! - **Dealer** deals, waits for claims or the turn timeout, resolves,
//!   reshuffles and finally stops every actor and announces the winners.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, errors, stop signal
//! - `cards`: Cards and the deck
//! - `rules`: `RulesEngine` trait and the classic rule
//! - `board`: The shared board
//! - `claims`: Claim queue between players and the dealer
//! - `player`: Player actors and computer generators
//! - `timer`: Turn countdown / elapsed clock
//! - `dealer`: The coordinator
//! - `presenter`: Presentation callbacks
//! - `game`: Starting, driving and joining a game
//!
//! ```no_run
//! use std::sync::Arc;
//! use set_table::{Game, GameConfig, LogPresenter, StandardSet};
//!
//! let config = GameConfig::new().with_computers(2);
//! let rules = Arc::new(StandardSet::from_config(&config));
//! let game = Game::start(config, rules, Arc::new(LogPresenter)).unwrap();
//! let outcome = game.join().unwrap();
//! println!("winners: {:?}", outcome.winners);
//! ```

pub mod core;
pub mod cards;
pub mod rules;
pub mod board;
pub mod claims;
pub mod player;
pub mod timer;
pub mod dealer;
pub mod presenter;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, MAX_PLAYERS,
    GameRng, Shutdown,
    GameConfig, SeatConfig, TimerMode,
    BoardError, ConfigError, StartError,
};

pub use crate::cards::{Card, Deck, Features};

pub use crate::rules::{CardSet, RulesEngine, StandardSet};

pub use crate::board::{Board, BoardSnapshot, Slot, Slots, TokenToggle};

pub use crate::claims::{Claim, ClaimId, ClaimQueue};

pub use crate::player::{ComputerPlayer, PlayerActor, PlayerHandle, PlayerPhase, Verdict};

pub use crate::timer::{ClockReading, TurnClock};

pub use crate::dealer::{Dealer, DealerPhase};

pub use crate::presenter::{LogPresenter, NullPresenter, Presenter, RecordingPresenter, TableEvent};

pub use crate::game::{Game, GameHandle, GameOutcome, Table};
