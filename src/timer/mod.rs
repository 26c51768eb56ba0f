//! Turn timer.
//!
//! A positive turn timeout counts down to a forced reshuffle and switches to
//! a warning display (and finer polling) near the end. A zero timeout shows
//! the time since the last reset instead and never forces a reshuffle.

mod clock;

pub use clock::{ClockReading, TurnClock};
