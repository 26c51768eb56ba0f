//! The dealer loop.

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::DealerPhase;
use crate::board::Slot;
use crate::cards::{Card, Deck};
use crate::claims::Claim;
use crate::core::{GameConfig, GameRng, PlayerId};
use crate::game::{GameOutcome, Table};
use crate::player::{PlayerHandle, Verdict};
use crate::rules::{CardSet, RulesEngine};
use crate::timer::TurnClock;

/// The single coordinator of a game.
///
/// Owns the deck and the turn clock, is the only consumer of the claim
/// queue and the only thread that places or removes cards. Each phase is a
/// public method so a game can also be driven step by step.
pub struct Dealer {
    config: GameConfig,
    rules: Arc<dyn RulesEngine>,
    table: Table,
    players: Vec<PlayerHandle>,
    deck: Deck,
    claimed: Vec<Card>,
    rng: GameRng,
    clock: TurnClock,
    phase: DealerPhase,
    threads: FxHashMap<PlayerId, JoinHandle<()>>,
    done: Option<Receiver<PlayerId>>,
}

impl Dealer {
    /// Dealer with a full, shuffled deck.
    pub fn new(
        config: GameConfig,
        rules: Arc<dyn RulesEngine>,
        table: Table,
        players: Vec<PlayerHandle>,
    ) -> Self {
        let mut rng = GameRng::new(config.seed).for_context("deck");
        let mut deck = Deck::full(config.deck_size);
        deck.shuffle(&mut rng);
        let clock = TurnClock::new(&config);

        Self {
            config,
            rules,
            table,
            players,
            deck,
            claimed: Vec::new(),
            rng,
            clock,
            phase: DealerPhase::Dealing,
            threads: FxHashMap::default(),
            done: None,
        }
    }

    /// Replace the deck. Cards come out in the given order until the next
    /// reshuffle.
    #[must_use]
    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = deck;
        self
    }

    /// Hand over the player threads. On termination the dealer waits for
    /// each player's id on `done` before joining its thread.
    pub fn attach(&mut self, threads: Vec<(PlayerId, JoinHandle<()>)>, done: Receiver<PlayerId>) {
        self.threads.extend(threads);
        self.done = Some(done);
    }

    /// Run the dealer on a thread named `dealer`.
    pub fn spawn(self) -> std::io::Result<JoinHandle<GameOutcome>> {
        thread::Builder::new()
            .name("dealer".into())
            .spawn(move || self.run())
    }

    #[must_use]
    pub fn phase(&self) -> DealerPhase {
        self.phase
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards taken off the board by successful claims.
    #[must_use]
    pub fn claimed(&self) -> &[Card] {
        &self.claimed
    }

    #[must_use]
    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    fn enter(&mut self, phase: DealerPhase) {
        if self.phase != phase {
            debug!("dealer: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn stopped(&self) -> bool {
        self.table.shutdown.is_triggered()
    }

    /// Play until the cards run out of sets or the game is stopped.
    pub fn run(mut self) -> GameOutcome {
        info!(
            "dealer: {} players, {} cards",
            self.players.len(),
            self.deck.len()
        );

        while !self.should_finish() {
            self.deal();
            self.restart_clock();
            if self.board_has_set() {
                self.timer_loop();
            }
            if self.stopped() {
                break;
            }
            self.publish_clock();
            self.reshuffle();
        }
        self.terminate()
    }

    /// Whether the game is over: stopped, or no set left in deck and board.
    #[must_use]
    pub fn should_finish(&self) -> bool {
        if self.stopped() {
            return true;
        }
        let mut cards = self.table.board.cards();
        cards.extend_from_slice(self.deck.cards());
        !self.rules.has_set(&cards)
    }

    #[must_use]
    pub fn board_has_set(&self) -> bool {
        self.rules.has_set(&self.table.board.cards())
    }

    /// Fill empty slots from the deck, in random slot order.
    ///
    /// Returns the number of cards placed.
    pub fn deal(&mut self) -> usize {
        let mut empty = self.table.board.empty_slots();
        if empty.is_empty() || self.deck.is_empty() {
            return 0;
        }

        self.enter(DealerPhase::Dealing);
        self.rng.shuffle(&mut empty);
        self.table.board.set_freeze(true);
        let mut placed = 0;
        for slot in empty {
            let Some(card) = self.deck.draw() else {
                break;
            };
            match self.table.board.place_card(card, slot) {
                Ok(()) => placed += 1,
                Err(err) => {
                    warn!("dealer: could not deal {card}: {err}");
                    self.deck.put_back(card);
                }
            }
        }
        self.table.board.set_freeze(false);

        debug!("dealer: dealt {placed} cards, {} left in the deck", self.deck.len());
        if placed > 0 && self.config.hints {
            self.log_hints();
        }
        placed
    }

    fn log_hints(&self) {
        let board = &self.table.board;
        let hints = board.hints(self.rules.as_ref());
        if hints.is_empty() {
            info!("hint: no set on the board");
        }
        for slots in hints {
            let features: Vec<_> = board
                .cards_at(&slots)
                .unwrap_or_default()
                .iter()
                .map(|card| card.features(self.config.feature_count, self.config.feature_size))
                .collect();
            info!("hint: slots {:?} features {:?}", slots.as_slice(), features);
        }
    }

    /// Wait for claims until the turn times out, the board runs out of
    /// sets, or the game is stopped.
    pub fn timer_loop(&mut self) {
        loop {
            self.enter(DealerPhase::Waiting);
            if self.stopped() {
                return;
            }
            let now = Instant::now();
            if self.clock.expired_at(now) {
                debug!("dealer: turn timed out");
                return;
            }
            self.clock.publish_at(now, self.table.presenter.as_ref());

            let poll = self.clock.poll_interval_at(now);
            if self.table.claims.wait_for_claim(poll, &self.table.shutdown) {
                self.resolve_claims();
                self.deal();
            }
            if !self.board_has_set() {
                debug!("dealer: no set on the board");
                return;
            }
        }
    }

    /// Resolve every pending claim, oldest first.
    pub fn resolve_claims(&mut self) -> Vec<Verdict> {
        let mut verdicts = Vec::new();
        while let Some(claim) = self.table.claims.pop() {
            verdicts.push(self.resolve(claim));
        }
        verdicts
    }

    /// Validate one claim against the board as it is now, apply the
    /// outcome and deliver the verdict to the claimant.
    pub fn resolve(&mut self, claim: Claim) -> Verdict {
        self.enter(DealerPhase::Resolving);
        let board = Arc::clone(&self.table.board);
        board.set_freeze(true);

        let verdict = match self.claimed_cards(&claim) {
            None => Verdict::Voided,
            Some(cards) if self.rules.is_set(&cards) => Verdict::Set,
            Some(_) => Verdict::NotSet,
        };

        if verdict == Verdict::Set {
            let score = board.award_point(claim.player);
            self.table.presenter.on_score_changed(claim.player, score);
            for slot in &claim.slots {
                if let Some(card) = board.remove_card(*slot) {
                    self.claimed.push(card);
                }
            }
            self.clock.reset();
        }
        board.discard_tokens(claim.player);
        board.set_freeze(false);

        debug!("dealer: {} by {} on {:?}: {verdict:?}", claim.id, claim.player, claim.slots.as_slice());
        let delivered = self
            .players
            .iter()
            .find(|handle| handle.player() == claim.player)
            .is_some_and(|handle| handle.deliver(verdict));
        if !delivered {
            warn!("dealer: could not deliver {verdict:?} to {}", claim.player);
        }
        verdict
    }

    /// Cards under a claim, if every claimed slot still holds a card and
    /// the claimant's token.
    fn claimed_cards(&self, claim: &Claim) -> Option<CardSet> {
        if claim.slots.len() != self.rules.claim_size() {
            return None;
        }
        let board = &self.table.board;
        let held = claim
            .slots
            .iter()
            .all(|slot| board.has_token(claim.player, *slot));
        if !held {
            return None;
        }
        board.cards_at(&claim.slots)
    }

    /// Settle pending claims, then return every card on the board to the
    /// deck and shuffle it.
    pub fn reshuffle(&mut self) {
        self.resolve_claims();
        self.enter(DealerPhase::Reshuffling);

        let board = Arc::clone(&self.table.board);
        board.set_freeze(true);
        let occupied: Vec<Slot> = board.occupied_slots();
        for slot in occupied {
            if let Some(card) = board.remove_card(slot) {
                self.deck.put_back(card);
            }
        }
        self.deck.shuffle(&mut self.rng);
        board.set_freeze(false);

        debug!("dealer: reshuffled, {} cards in the deck", self.deck.len());
        self.restart_clock();
    }

    fn restart_clock(&mut self) {
        self.clock.reset();
        self.publish_clock();
    }

    fn publish_clock(&self) {
        self.clock
            .publish_at(Instant::now(), self.table.presenter.as_ref());
    }

    /// Stop every player, wait for their acknowledgements and announce the
    /// winners.
    pub fn terminate(&mut self) -> GameOutcome {
        self.enter(DealerPhase::Terminated);
        self.table.stop();

        let dropped = self.table.claims.drain();
        if !dropped.is_empty() {
            debug!("dealer: dropping {} unresolved claims", dropped.len());
        }
        let unresponsive = self.await_players();

        let scores = self.table.board.scores();
        let winners = scores.argmax();
        info!("dealer: game over, winners {winners:?}");
        self.table.presenter.on_game_over(&winners);
        GameOutcome {
            winners,
            scores,
            unresponsive,
        }
    }

    /// Join every player that acknowledges the stop before the deadline.
    /// Returns the rest, sorted; their threads are detached.
    fn await_players(&mut self) -> Vec<PlayerId> {
        let Some(done) = self.done.take() else {
            return Vec::new();
        };

        let deadline = Instant::now() + self.config.stop_ack();
        while !self.threads.is_empty() {
            let Ok(player) = done.recv_deadline(deadline) else {
                break;
            };
            if let Some(thread) = self.threads.remove(&player) {
                if thread.join().is_err() {
                    warn!("dealer: {player} panicked");
                }
            }
        }

        let mut unresponsive: Vec<PlayerId> =
            self.threads.drain().map(|(player, _)| player).collect();
        unresponsive.sort_unstable();
        for player in &unresponsive {
            warn!("dealer: {player} did not acknowledge the stop");
        }
        unresponsive
    }
}

impl std::fmt::Debug for Dealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dealer")
            .field("phase", &self.phase)
            .field("deck", &self.deck.len())
            .field("claimed", &self.claimed.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
