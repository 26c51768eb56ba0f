//! The player actor loop.

use crossbeam_channel::{bounded, select, Receiver, Sender};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::bot::ComputerPlayer;
use super::handle::PlayerHandle;
use super::{PlayerPhase, Verdict};
use crate::board::{Board, Slot, TokenToggle};
use crate::claims::ClaimQueue;
use crate::core::{GameConfig, GameRng, PlayerId, Shutdown};
use crate::game::Table;
use crate::presenter::Presenter;

/// One seat at the table, run on its own thread.
pub struct PlayerActor {
    player: PlayerId,
    name: String,
    claim_size: usize,
    point_freeze: Duration,
    penalty_freeze: Duration,
    tick: Duration,
    board: Arc<Board>,
    claims: Arc<ClaimQueue>,
    presenter: Arc<dyn Presenter>,
    shutdown: Shutdown,
    keys: Receiver<Slot>,
    verdicts: Receiver<Verdict>,
    generator: Option<ComputerPlayer>,
    phase: PlayerPhase,
}

impl PlayerActor {
    /// Build the actor for `player` and the handle used to talk to it.
    ///
    /// Computer seats get a generator seeded from the game seed and the
    /// player's id; it starts together with the actor.
    pub fn new(player: PlayerId, config: &GameConfig, table: &Table) -> (Self, PlayerHandle) {
        let (name, human) = config
            .seat(player)
            .map_or_else(|| (player.to_string(), true), |seat| (seat.name.clone(), seat.human));

        let (key_tx, key_rx) = bounded(config.feature_size);
        let (verdict_tx, verdict_rx) = bounded(1);

        let generator = (!human).then(|| {
            let context = format!("computer-{}", player.index());
            ComputerPlayer::new(
                player,
                Arc::clone(&table.board),
                key_tx.clone(),
                table.shutdown.clone(),
                GameRng::new(config.seed).for_context(&context),
                config.tick(),
            )
        });

        let actor = Self {
            player,
            name,
            claim_size: config.feature_size,
            point_freeze: config.point_freeze(),
            penalty_freeze: config.penalty_freeze(),
            tick: config.tick(),
            board: Arc::clone(&table.board),
            claims: Arc::clone(&table.claims),
            presenter: Arc::clone(&table.presenter),
            shutdown: table.shutdown.clone(),
            keys: key_rx,
            verdicts: verdict_rx,
            generator,
            phase: PlayerPhase::Selecting,
        };
        (actor, PlayerHandle::new(player, key_tx, verdict_tx))
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    /// Run the actor on a thread named `player-<id>`.
    ///
    /// The actor sends its id on `ready` once it (and its generator, if
    /// any) is running, and on `done` as the last thing before exiting.
    pub fn spawn(
        self,
        ready: Sender<PlayerId>,
        done: Sender<PlayerId>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("player-{}", self.player.index()))
            .spawn(move || self.run(ready, done))
    }

    fn run(mut self, ready: Sender<PlayerId>, done: Sender<PlayerId>) {
        let generator = self.generator.take().and_then(|generator| {
            generator
                .spawn()
                .map_err(|err| warn!("{}: generator failed to start: {err}", self.player))
                .ok()
        });

        info!("{} ({}) is ready", self.player, self.name);
        let _ = ready.send(self.player);

        while self.phase != PlayerPhase::Stopped {
            let next = self.step();
            if next != self.phase {
                debug!("{}: {:?} -> {:?}", self.player, self.phase, next);
            }
            self.phase = next;
        }

        if let Some(generator) = generator {
            if generator.join().is_err() {
                warn!("{}: generator panicked", self.player);
            }
        }
        info!("{} ({}) left the table", self.player, self.name);
        let _ = done.send(self.player);
    }

    fn step(&mut self) -> PlayerPhase {
        if self.shutdown.is_triggered() {
            return PlayerPhase::Stopped;
        }
        match self.phase {
            PlayerPhase::Selecting => self.select(),
            PlayerPhase::AwaitingValidation => self.await_verdict(),
            PlayerPhase::Scored => self.suspend(self.point_freeze),
            PlayerPhase::Penalized => self.suspend(self.penalty_freeze),
            PlayerPhase::Stopped => PlayerPhase::Stopped,
        }
    }

    fn select(&self) -> PlayerPhase {
        select! {
            recv(self.keys) -> key => match key {
                Ok(slot) => self.press(slot),
                // Nothing can press keys any more; wait out the game.
                Err(_) => {
                    let _ = self.shutdown.signal().recv();
                    PlayerPhase::Stopped
                }
            },
            recv(self.shutdown.signal()) -> _ => PlayerPhase::Stopped,
        }
    }

    /// Toggle a token on `slot` and claim once the selection is full.
    ///
    /// The claim is queued while the board lock is still held, so claims
    /// queue in the order selections were completed.
    fn press(&self, slot: Slot) -> PlayerPhase {
        let (toggle, claim) =
            self.board
                .toggle_token_then(self.player, slot, self.claim_size, |slots| {
                    let id = self.claims.submit(self.player, slots.clone());
                    (id, slots)
                });
        match (toggle, claim) {
            (_, Some((id, slots))) => {
                debug!("{}: submitted {id} on {:?}", self.player, slots.as_slice());
                PlayerPhase::AwaitingValidation
            }
            (TokenToggle::Rejected, None) => {
                trace!("{}: press on {slot} rejected", self.player);
                PlayerPhase::Selecting
            }
            (TokenToggle::Placed { .. } | TokenToggle::Removed { .. }, None) => {
                PlayerPhase::Selecting
            }
        }
    }

    fn await_verdict(&self) -> PlayerPhase {
        select! {
            recv(self.verdicts) -> verdict => match verdict {
                Ok(verdict) => {
                    debug!("{}: verdict {verdict:?}", self.player);
                    PlayerPhase::after(verdict)
                }
                Err(_) => PlayerPhase::Stopped,
            },
            recv(self.shutdown.signal()) -> _ => PlayerPhase::Stopped,
        }
    }

    /// Sit out `duration`, reporting the time left every tick.
    fn suspend(&self, duration: Duration) -> PlayerPhase {
        let until = Instant::now() + duration;
        let mut left = duration;
        while !left.is_zero() {
            self.presenter
                .on_freeze_time_changed(self.player, left.as_millis() as u64);
            if !self.shutdown.sleep(left.min(self.tick)) {
                return PlayerPhase::Stopped;
            }
            left = until.saturating_duration_since(Instant::now());
        }
        self.presenter.on_freeze_time_changed(self.player, 0);

        let stale = self.keys.try_iter().count();
        if stale > 0 {
            trace!("{}: dropped {stale} presses made while suspended", self.player);
        }
        PlayerPhase::Selecting
    }
}
