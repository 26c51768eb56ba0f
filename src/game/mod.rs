//! Wiring a game onto threads.
//!
//! [`Game::start`] validates the configuration, starts one actor per seat,
//! waits until every actor is running and then starts the dealer. The
//! returned [`GameHandle`] forwards human key presses, can stop the game
//! early and joins the dealer for the final [`GameOutcome`].

mod table;

pub use table::Table;

use crossbeam_channel::unbounded;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::board::{Board, Slot};
use crate::core::{ConfigError, GameConfig, PlayerId, PlayerMap, StartError};
use crate::dealer::Dealer;
use crate::player::{PlayerActor, PlayerHandle};
use crate::presenter::Presenter;
use crate::rules::RulesEngine;

/// Final result of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// Every player tied at the top score.
    pub winners: Vec<PlayerId>,
    pub scores: PlayerMap<u32>,
    /// Players whose threads did not acknowledge the stop in time.
    pub unresponsive: Vec<PlayerId>,
}

/// Entry point for running a game.
pub struct Game;

impl Game {
    /// Start a game on background threads.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, a rule whose claim size differs
    /// from `feature_size`, or when a thread cannot be spawned. Nothing is
    /// left running on failure.
    pub fn start(
        config: GameConfig,
        rules: Arc<dyn RulesEngine>,
        presenter: Arc<dyn Presenter>,
    ) -> Result<GameHandle, StartError> {
        config.validate()?;
        if rules.claim_size() != config.feature_size {
            return Err(ConfigError::ClaimSizeMismatch {
                rules: rules.claim_size(),
                feature_size: config.feature_size,
            }
            .into());
        }

        let table = Table::new(&config, presenter);
        let (ready_tx, ready_rx) = unbounded();
        let (done_tx, done_rx) = unbounded();

        let mut players = Vec::with_capacity(config.player_count());
        let mut threads = Vec::with_capacity(config.player_count());
        for player in PlayerId::all(config.player_count()) {
            let (actor, handle) = PlayerActor::new(player, &config, &table);
            let thread = actor
                .spawn(ready_tx.clone(), done_tx.clone())
                .map_err(|source| {
                    table.stop();
                    StartError::Spawn {
                        name: format!("player-{}", player.index()),
                        source,
                    }
                })?;
            players.push(handle);
            threads.push((player, thread));
        }
        drop(ready_tx);
        drop(done_tx);

        // Deal only once every seat is listening.
        for _ in 0..threads.len() {
            if ready_rx.recv().is_err() {
                break;
            }
        }

        let humans = config
            .seats
            .iter()
            .zip(&players)
            .map(|(seat, handle)| seat.human.then(|| handle.clone()))
            .collect();

        let mut dealer = Dealer::new(config, rules, table.clone(), players);
        dealer.attach(threads, done_rx);
        let dealer = dealer.spawn().map_err(|source| {
            table.stop();
            StartError::Spawn {
                name: "dealer".into(),
                source,
            }
        })?;

        info!("game started");
        Ok(GameHandle {
            table,
            humans,
            dealer,
        })
    }
}

/// Control over a running game.
pub struct GameHandle {
    table: Table,
    humans: Vec<Option<PlayerHandle>>,
    dealer: JoinHandle<GameOutcome>,
}

impl GameHandle {
    /// Forward a key press from a human seat.
    ///
    /// Presses for computer seats, unknown players, or beyond the key
    /// buffer are ignored. Returns whether the press was queued.
    pub fn key_pressed(&self, player: PlayerId, slot: Slot) -> bool {
        self.humans
            .get(player.index())
            .and_then(Option::as_ref)
            .is_some_and(|handle| handle.press(slot))
    }

    #[must_use]
    pub fn board(&self) -> &Arc<Board> {
        &self.table.board
    }

    /// Ask the dealer to end the game now.
    pub fn terminate(&self) {
        if self.table.stop() {
            info!("game stop requested");
        }
    }

    /// Whether the dealer has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.dealer.is_finished()
    }

    /// Wait for the game to end.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the dealer thread panicked.
    pub fn join(self) -> std::thread::Result<GameOutcome> {
        self.dealer.join()
    }
}

impl std::fmt::Debug for GameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameHandle")
            .field("table", &self.table)
            .field("finished", &self.dealer.is_finished())
            .finish_non_exhaustive()
    }
}
