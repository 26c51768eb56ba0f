use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Presenter, TableEvent};
use crate::board::Slot;
use crate::cards::Card;
use crate::core::PlayerId;

/// Presenter that records every callback in order.
///
/// Mostly useful in tests:
///
/// ```
/// use set_table::board::Slot;
/// use set_table::cards::Card;
/// use set_table::presenter::{Presenter, RecordingPresenter, TableEvent};
///
/// let recorder = RecordingPresenter::new();
/// recorder.on_card_placed(Card::new(3), Slot::new(0));
/// assert_eq!(recorder.events(), vec![TableEvent::CardPlaced(Card::new(3), Slot::new(0))]);
/// ```
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<TableEvent>>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<TableEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, event: TableEvent) {
        self.log().push(event);
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<TableEvent> {
        self.log().clone()
    }

    /// Recorded events matching a predicate.
    #[must_use]
    pub fn filter(&self, pred: impl Fn(&TableEvent) -> bool) -> Vec<TableEvent> {
        self.log().iter().filter(|e| pred(e)).cloned().collect()
    }

    /// Last reported score of a player, if any.
    #[must_use]
    pub fn last_score(&self, player: PlayerId) -> Option<u32> {
        self.log().iter().rev().find_map(|event| match event {
            TableEvent::ScoreChanged(p, score) if *p == player => Some(*score),
            _ => None,
        })
    }

    /// Winners reported at game over.
    #[must_use]
    pub fn winners(&self) -> Option<Vec<PlayerId>> {
        self.log().iter().rev().find_map(|event| match event {
            TableEvent::GameOver(winners) => Some(winners.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.log().clear();
    }
}

impl Presenter for RecordingPresenter {
    fn on_card_placed(&self, card: Card, slot: Slot) {
        self.push(TableEvent::CardPlaced(card, slot));
    }

    fn on_card_removed(&self, slot: Slot) {
        self.push(TableEvent::CardRemoved(slot));
    }

    fn on_token_placed(&self, player: PlayerId, slot: Slot) {
        self.push(TableEvent::TokenPlaced(player, slot));
    }

    fn on_token_removed(&self, player: PlayerId, slot: Slot) {
        self.push(TableEvent::TokenRemoved(player, slot));
    }

    fn on_score_changed(&self, player: PlayerId, score: u32) {
        self.push(TableEvent::ScoreChanged(player, score));
    }

    fn on_freeze_time_changed(&self, player: PlayerId, millis_remaining: u64) {
        self.push(TableEvent::FreezeTimeChanged(player, millis_remaining));
    }

    fn on_countdown_changed(&self, millis_remaining: u64, warning: bool) {
        self.push(TableEvent::CountdownChanged {
            millis: millis_remaining,
            warning,
        });
    }

    fn on_elapsed_changed(&self, millis_elapsed: u64) {
        self.push(TableEvent::ElapsedChanged(millis_elapsed));
    }

    fn on_game_over(&self, winners: &[PlayerId]) {
        self.push(TableEvent::GameOver(winners.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let recorder = RecordingPresenter::new();
        recorder.on_score_changed(PlayerId::new(0), 1);
        recorder.on_score_changed(PlayerId::new(0), 2);
        recorder.on_game_over(&[PlayerId::new(0)]);

        assert_eq!(recorder.events().len(), 3);
        assert_eq!(recorder.last_score(PlayerId::new(0)), Some(2));
        assert_eq!(recorder.last_score(PlayerId::new(1)), None);
        assert_eq!(recorder.winners(), Some(vec![PlayerId::new(0)]));
    }

    #[test]
    fn test_filter_and_clear() {
        let recorder = RecordingPresenter::new();
        recorder.on_countdown_changed(500, true);
        recorder.on_elapsed_changed(10);

        let countdowns = recorder.filter(|e| matches!(e, TableEvent::CountdownChanged { .. }));
        assert_eq!(countdowns, vec![TableEvent::CountdownChanged { millis: 500, warning: true }]);

        recorder.clear();
        assert!(recorder.events().is_empty());
    }
}
