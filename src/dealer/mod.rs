//! The dealer: the one coordinator of a game.
//!
//! ## Loop
//!
//! 1. Deal: fill every empty slot from the deck, under freeze.
//! 2. Wait: block until a claim arrives or the next clock refresh is due.
//! 3. Resolve: pop claims in submission order, re-read the claimed cards,
//!    award or penalize, refill.
//! 4. Reshuffle: on turn timeout, or once the board holds no set, return
//!    the board to the deck.
//!
//! The game ends when deck and board together hold no set, or on an
//! external stop. Every player is then stopped and the players tied at the
//! top score win.

#[allow(clippy::module_inception)]
mod dealer;

pub use dealer::Dealer;

/// Dealer state, for logging and inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DealerPhase {
    Dealing,
    Waiting,
    Resolving,
    Reshuffling,
    Terminated,
}
