//! Key press generator for computer seats.

use crossbeam_channel::{select, Sender};
use log::debug;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::board::{Board, Slot};
use crate::core::{GameRng, PlayerId, Shutdown};

/// Presses uniformly random occupied slots on behalf of one player.
///
/// Idles while the board is frozen. The key channel is bounded, so the
/// generator also blocks whenever its player is not reading presses
/// (waiting for a verdict or suspended).
pub struct ComputerPlayer {
    player: PlayerId,
    board: Arc<Board>,
    keys: Sender<Slot>,
    shutdown: Shutdown,
    rng: GameRng,
    tick: Duration,
}

impl ComputerPlayer {
    pub fn new(
        player: PlayerId,
        board: Arc<Board>,
        keys: Sender<Slot>,
        shutdown: Shutdown,
        rng: GameRng,
        tick: Duration,
    ) -> Self {
        Self {
            player,
            board,
            keys,
            shutdown,
            rng,
            tick,
        }
    }

    /// Run the generator on a thread named `computer-<id>`.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("computer-{}", self.player.index()))
            .spawn(move || self.run())
    }

    fn run(mut self) {
        debug!("{}: generator started", self.player);
        while self.board.wait_unfrozen(&self.shutdown, self.tick) {
            let occupied = self.board.occupied_slots();
            let Some(&slot) = self.rng.choose(&occupied) else {
                if !self.shutdown.sleep(self.tick) {
                    break;
                }
                continue;
            };

            select! {
                send(self.keys, slot) -> sent => {
                    if sent.is_err() {
                        break;
                    }
                }
                recv(self.shutdown.signal()) -> _ => break,
            }
        }
        debug!("{}: generator stopped", self.player);
    }
}
