//! Core engine types: players, RNG, configuration, errors, stop signal.
//!
//! These are shared by every actor at the table and carry no game rules.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod shutdown;

pub use config::{GameConfig, SeatConfig, TimerMode, MAX_TABLE_SIZE};
pub use error::{BoardError, ConfigError, StartError};
pub use player::{PlayerId, PlayerMap, MAX_PLAYERS};
pub use rng::GameRng;
pub use shutdown::Shutdown;
