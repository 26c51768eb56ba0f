//! Set rules.
//!
//! The dealer validates claims through a `RulesEngine`:
//! - `is_set`: whether the claimed cards form a set
//! - `find_sets`: legal sets among some cards (board hints, exhaustion)
//!
//! `StandardSet` is the classic "all alike or all different" rule.

mod engine;
mod standard;

pub use engine::{CardSet, RulesEngine};
pub use standard::StandardSet;
