//! The shared board.
//!
//! `Board` is the only state touched by more than one actor. Everything
//! lives behind a single mutex:
//! - the slot -> card and card -> slot mappings (always mutual inverses)
//! - per-slot token membership, one bit per player
//! - the freeze flag, with a condition variable signalled on unfreeze
//! - player scores
//!
//! Card placement and removal are atomic end to end, including the
//! configured table delay, so no two mutations interleave.

use smallvec::SmallVec;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::slot::Slot;
use crate::cards::Card;
use crate::core::{BoardError, GameConfig, PlayerId, PlayerMap, Shutdown};
use crate::presenter::Presenter;
use crate::rules::RulesEngine;

/// Slots held by one player, in slot order.
pub type Slots = SmallVec<[Slot; 4]>;

/// Result of a player pressing the key for a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenToggle {
    /// Token placed; the player now holds `held` tokens.
    Placed { held: usize },
    /// The player already had a token there and it was taken back.
    Removed { held: usize },
    /// Board frozen, slot empty or out of range, or selection full.
    Rejected,
}

#[derive(Debug)]
struct TableState {
    slot_to_card: Vec<Option<Card>>,
    card_to_slot: Vec<Option<Slot>>,
    tokens: Vec<u16>,
    frozen: bool,
    scores: PlayerMap<u32>,
}

impl TableState {
    fn slot_in_range(&self, slot: Slot) -> bool {
        slot.index() < self.slot_to_card.len()
    }

    fn held_by(&self, player: PlayerId) -> Slots {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, mask)| *mask & player.bit() != 0)
            .map(|(i, _)| Slot::new(i as u16))
            .collect()
    }
}

/// Board state shared by the dealer and all player actors.
pub struct Board {
    state: Mutex<TableState>,
    unfrozen: Condvar,
    delay: Duration,
    presenter: Arc<dyn Presenter>,
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("state", &self.state)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl Board {
    /// Empty, unfrozen board.
    pub fn new(
        table_size: usize,
        deck_size: usize,
        player_count: usize,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            state: Mutex::new(TableState {
                slot_to_card: vec![None; table_size],
                card_to_slot: vec![None; deck_size],
                tokens: vec![0; table_size],
                frozen: false,
                scores: PlayerMap::with_value(player_count, 0),
            }),
            unfrozen: Condvar::new(),
            delay: Duration::ZERO,
            presenter,
        }
    }

    /// Board sized and delayed as the configuration says.
    pub fn from_config(config: &GameConfig, presenter: Arc<dyn Presenter>) -> Self {
        Self::new(
            config.table_size,
            config.deck_size,
            config.player_count(),
            presenter,
        )
        .with_delay(config.table_delay())
    }

    /// Simulated latency of each card placement and removal.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // Every critical section leaves the state consistent, so a poisoned
    // lock is still safe to use.
    fn state(&self) -> MutexGuard<'_, TableState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn simulate_delay(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }

    #[must_use]
    pub fn table_size(&self) -> usize {
        self.state().slot_to_card.len()
    }

    // === Cards ===

    /// Put `card` on the empty `slot`.
    pub fn place_card(&self, card: Card, slot: Slot) -> Result<(), BoardError> {
        let mut state = self.state();
        if !state.slot_in_range(slot) {
            return Err(BoardError::SlotOutOfRange(slot));
        }
        if card.index() >= state.card_to_slot.len() {
            return Err(BoardError::CardOutOfRange(card));
        }
        if let Some(existing) = state.slot_to_card[slot.index()] {
            return Err(BoardError::SlotOccupied {
                slot,
                card: existing,
            });
        }
        if let Some(at) = state.card_to_slot[card.index()] {
            return Err(BoardError::CardOnBoard { card, slot: at });
        }

        self.simulate_delay();
        state.card_to_slot[card.index()] = Some(slot);
        state.slot_to_card[slot.index()] = Some(card);
        self.presenter.on_card_placed(card, slot);
        Ok(())
    }

    /// Take the card off `slot`, clearing every token on it.
    ///
    /// Removing from an empty slot is a no-op and returns `None`.
    pub fn remove_card(&self, slot: Slot) -> Option<Card> {
        let mut state = self.state();
        if !state.slot_in_range(slot) {
            return None;
        }
        let card = state.slot_to_card[slot.index()]?;

        self.simulate_delay();
        let mask = std::mem::take(&mut state.tokens[slot.index()]);
        for player in state.scores.player_ids() {
            if mask & player.bit() != 0 {
                self.presenter.on_token_removed(player, slot);
            }
        }
        state.card_to_slot[card.index()] = None;
        state.slot_to_card[slot.index()] = None;
        self.presenter.on_card_removed(slot);
        Some(card)
    }

    #[must_use]
    pub fn card_at(&self, slot: Slot) -> Option<Card> {
        self.state().slot_to_card.get(slot.index()).copied().flatten()
    }

    #[must_use]
    pub fn slot_of(&self, card: Card) -> Option<Slot> {
        self.state().card_to_slot.get(card.index()).copied().flatten()
    }

    /// Cards on `slots`, read under one lock. `None` if any slot is empty.
    #[must_use]
    pub fn cards_at(&self, slots: &[Slot]) -> Option<SmallVec<[Card; 4]>> {
        let state = self.state();
        slots
            .iter()
            .map(|slot| state.slot_to_card.get(slot.index()).copied().flatten())
            .collect()
    }

    /// Cards currently on the board, in slot order.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.state().slot_to_card.iter().flatten().copied().collect()
    }

    #[must_use]
    pub fn count_cards(&self) -> usize {
        self.state().slot_to_card.iter().flatten().count()
    }

    #[must_use]
    pub fn occupied_slots(&self) -> Vec<Slot> {
        self.state()
            .slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_some())
            .map(|(i, _)| Slot::new(i as u16))
            .collect()
    }

    #[must_use]
    pub fn empty_slots(&self) -> Vec<Slot> {
        self.state()
            .slot_to_card
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_none())
            .map(|(i, _)| Slot::new(i as u16))
            .collect()
    }

    /// Every legal set on the board, as sorted slot lists.
    #[must_use]
    pub fn hints(&self, rules: &dyn RulesEngine) -> Vec<Slots> {
        let state = self.state();
        let cards: Vec<Card> = state.slot_to_card.iter().flatten().copied().collect();
        rules
            .find_sets(&cards, usize::MAX)
            .into_iter()
            .map(|set| {
                let mut slots: Slots = set
                    .iter()
                    .filter_map(|card| state.card_to_slot[card.index()])
                    .collect();
                slots.sort_unstable();
                slots
            })
            .collect()
    }

    // === Tokens ===

    /// Place a token. Fails while frozen, on an empty slot, or if the
    /// player already has a token there.
    pub fn place_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut state = self.state();
        if state.frozen || !state.slot_in_range(slot) {
            return false;
        }
        if state.slot_to_card[slot.index()].is_none() {
            return false;
        }
        if state.tokens[slot.index()] & player.bit() != 0 {
            return false;
        }
        state.tokens[slot.index()] |= player.bit();
        self.presenter.on_token_placed(player, slot);
        true
    }

    /// Remove a token. Fails while frozen or if there is no such token.
    pub fn remove_token(&self, player: PlayerId, slot: Slot) -> bool {
        let mut state = self.state();
        if state.frozen || !state.slot_in_range(slot) {
            return false;
        }
        if state.tokens[slot.index()] & player.bit() == 0 {
            return false;
        }
        state.tokens[slot.index()] &= !player.bit();
        self.presenter.on_token_removed(player, slot);
        true
    }

    /// Toggle the player's token on `slot`, holding at most `limit` tokens.
    ///
    /// The whole check-and-update runs under one lock so the returned count
    /// is exact at the moment of the change.
    pub fn toggle_token(&self, player: PlayerId, slot: Slot, limit: usize) -> TokenToggle {
        self.toggle_token_then(player, slot, limit, |_| ()).0
    }

    /// Like [`toggle_token`](Self::toggle_token), but when the toggle fills
    /// the selection `on_full` runs with the selected slots before the lock
    /// is released. No other board change can come between the two.
    pub fn toggle_token_then<R>(
        &self,
        player: PlayerId,
        slot: Slot,
        limit: usize,
        on_full: impl FnOnce(Slots) -> R,
    ) -> (TokenToggle, Option<R>) {
        let mut state = self.state();
        if state.frozen || !state.slot_in_range(slot) {
            return (TokenToggle::Rejected, None);
        }
        if state.slot_to_card[slot.index()].is_none() {
            return (TokenToggle::Rejected, None);
        }

        let held = state.held_by(player).len();
        if state.tokens[slot.index()] & player.bit() != 0 {
            state.tokens[slot.index()] &= !player.bit();
            self.presenter.on_token_removed(player, slot);
            (TokenToggle::Removed { held: held - 1 }, None)
        } else if held < limit {
            state.tokens[slot.index()] |= player.bit();
            self.presenter.on_token_placed(player, slot);
            let full = (held + 1 == limit).then(|| on_full(state.held_by(player)));
            (TokenToggle::Placed { held: held + 1 }, full)
        } else {
            (TokenToggle::Rejected, None)
        }
    }

    /// Remove all of a player's tokens regardless of the freeze flag.
    ///
    /// Reserved for the dealer, which calls it while it holds the freeze.
    pub fn discard_tokens(&self, player: PlayerId) -> Slots {
        let mut state = self.state();
        let held = state.held_by(player);
        for slot in &held {
            state.tokens[slot.index()] &= !player.bit();
            self.presenter.on_token_removed(player, *slot);
        }
        held
    }

    #[must_use]
    pub fn has_token(&self, player: PlayerId, slot: Slot) -> bool {
        self.state()
            .tokens
            .get(slot.index())
            .is_some_and(|mask| mask & player.bit() != 0)
    }

    /// Slots where `player` has a token.
    #[must_use]
    pub fn tokens_of(&self, player: PlayerId) -> Slots {
        self.state().held_by(player)
    }

    // === Freeze ===

    /// Set or clear the freeze flag. Clearing wakes every waiter.
    pub fn set_freeze(&self, frozen: bool) {
        let mut state = self.state();
        state.frozen = frozen;
        if !frozen {
            self.unfrozen.notify_all();
        }
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.state().frozen
    }

    /// Block until the board is unfrozen or `shutdown` fires.
    ///
    /// The flag is re-checked after every wakeup; `tick` bounds each wait so
    /// a stop request is noticed even without a notification. Returns
    /// `false` if stopped.
    pub fn wait_unfrozen(&self, shutdown: &Shutdown, tick: Duration) -> bool {
        let mut state = self.state();
        while state.frozen {
            if shutdown.is_triggered() {
                return false;
            }
            state = self
                .unfrozen
                .wait_timeout(state, tick)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        !shutdown.is_triggered()
    }

    /// Wake every thread waiting for an unfreeze so it re-checks its stop signal.
    pub fn wake_all(&self) {
        let _state = self.state();
        self.unfrozen.notify_all();
    }

    // === Scores ===

    /// Add one point. Returns the new score.
    pub fn award_point(&self, player: PlayerId) -> u32 {
        let mut state = self.state();
        state.scores[player] += 1;
        state.scores[player]
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.state().scores[player]
    }

    #[must_use]
    pub fn scores(&self) -> PlayerMap<u32> {
        self.state().scores.clone()
    }

    // === Inspection ===

    /// Consistent copy of the whole board.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        let state = self.state();
        BoardSnapshot {
            slot_to_card: state.slot_to_card.clone(),
            card_to_slot: state.card_to_slot.clone(),
            tokens: state
                .tokens
                .iter()
                .map(|mask| {
                    state
                        .scores
                        .player_ids()
                        .filter(|p| mask & p.bit() != 0)
                        .collect()
                })
                .collect(),
            frozen: state.frozen,
        }
    }
}

/// Point-in-time copy of the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub slot_to_card: Vec<Option<Card>>,
    pub card_to_slot: Vec<Option<Slot>>,
    /// Players holding a token, per slot.
    pub tokens: Vec<Vec<PlayerId>>,
    pub frozen: bool,
}

impl BoardSnapshot {
    /// Whether the two mappings are mutual inverses and no empty slot
    /// carries a token.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward = self.slot_to_card.iter().enumerate().all(|(s, card)| {
            card.map_or(true, |c| {
                self.card_to_slot.get(c.index()).copied().flatten() == Some(Slot::new(s as u16))
            })
        });
        let backward = self.card_to_slot.iter().enumerate().all(|(c, slot)| {
            slot.map_or(true, |s| {
                self.slot_to_card.get(s.index()).copied().flatten() == Some(Card::new(c as u32))
            })
        });
        let tokens = self
            .tokens
            .iter()
            .zip(&self.slot_to_card)
            .all(|(holders, card)| card.is_some() || holders.is_empty());
        forward && backward && tokens
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.slot_to_card.iter().flatten().count()
    }
}
