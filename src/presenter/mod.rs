//! Presentation callbacks.
//!
//! The board, the dealer and the player actors report every visible change
//! through a `Presenter`. Calls are fire-and-forget: nothing the presenter
//! does feeds back into the game, and an implementation must return quickly
//! because some callbacks run while the board lock is held.
//!
//! ## Implementations
//!
//! - [`NullPresenter`]: ignores everything
//! - [`LogPresenter`]: renders each callback through `log`
//! - [`RecordingPresenter`]: keeps a `TableEvent` list for inspection

mod logging;
mod recorder;

pub use logging::LogPresenter;
pub use recorder::RecordingPresenter;

use serde::{Deserialize, Serialize};

use crate::board::Slot;
use crate::cards::Card;
use crate::core::PlayerId;

/// Presentation collaborator. Every method defaults to a no-op.
///
/// The card and token callbacks run while the board lock is held, and the
/// lock is not reentrant. An implementation must not call back into the
/// [`Board`](crate::board::Board) or the [`ClaimQueue`](crate::claims::ClaimQueue)
/// from any callback; doing so deadlocks the game. Hand the event to another
/// thread if it needs to read the table.
pub trait Presenter: Send + Sync {
    fn on_card_placed(&self, _card: Card, _slot: Slot) {}

    fn on_card_removed(&self, _slot: Slot) {}

    fn on_token_placed(&self, _player: PlayerId, _slot: Slot) {}

    fn on_token_removed(&self, _player: PlayerId, _slot: Slot) {}

    fn on_score_changed(&self, _player: PlayerId, _score: u32) {}

    /// Remaining suspension of a player, `0` once it can select again.
    fn on_freeze_time_changed(&self, _player: PlayerId, _millis_remaining: u64) {}

    fn on_countdown_changed(&self, _millis_remaining: u64, _warning: bool) {}

    fn on_elapsed_changed(&self, _millis_elapsed: u64) {}

    fn on_game_over(&self, _winners: &[PlayerId]) {}
}

/// One presentation callback, as data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableEvent {
    CardPlaced(Card, Slot),
    CardRemoved(Slot),
    TokenPlaced(PlayerId, Slot),
    TokenRemoved(PlayerId, Slot),
    ScoreChanged(PlayerId, u32),
    FreezeTimeChanged(PlayerId, u64),
    CountdownChanged { millis: u64, warning: bool },
    ElapsedChanged(u64),
    GameOver(Vec<PlayerId>),
}

/// Presenter that discards every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
