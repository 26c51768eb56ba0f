//! The board: slots, cards on them, player tokens and the freeze flag.
//!
//! ## Invariant
//!
//! `slot_to_card[s] == Some(c)` iff `card_to_slot[c] == Some(s)`. Both
//! mappings only change together, under the board lock.
//!
//! ## Freeze
//!
//! While the dealer mutates the board it sets the freeze flag; players can
//! neither place nor remove tokens until it is cleared. Clearing wakes every
//! thread blocked in [`Board::wait_unfrozen`].

mod slot;
mod table;

pub use slot::Slot;
pub use table::{Board, BoardSnapshot, Slots, TokenToggle};
