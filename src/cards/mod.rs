//! Cards and the deck.
//!
//! ## Key Types
//!
//! - `Card`: Opaque card id with base-`values` feature decoding
//! - `Deck`: Cards not on the board, shuffled with a `GameRng`
//!
//! Cards are created once, when the deck is built, and only ever move
//! between the deck and a board slot.

pub mod card;
pub mod deck;

pub use card::{Card, Features};
pub use deck::Deck;
