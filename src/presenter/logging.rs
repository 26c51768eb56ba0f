use log::{debug, info, trace};

use super::Presenter;
use crate::board::Slot;
use crate::cards::Card;
use crate::core::PlayerId;

/// Presenter writing every callback to the `log` facade.
///
/// Board traffic goes to `trace`, timers to `debug`, scores and the final
/// result to `info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn on_card_placed(&self, card: Card, slot: Slot) {
        trace!("{card} placed at {slot}");
    }

    fn on_card_removed(&self, slot: Slot) {
        trace!("card removed from {slot}");
    }

    fn on_token_placed(&self, player: PlayerId, slot: Slot) {
        trace!("{player} token on {slot}");
    }

    fn on_token_removed(&self, player: PlayerId, slot: Slot) {
        trace!("{player} token off {slot}");
    }

    fn on_score_changed(&self, player: PlayerId, score: u32) {
        info!("{player} score {score}");
    }

    fn on_freeze_time_changed(&self, player: PlayerId, millis_remaining: u64) {
        debug!("{player} frozen for {millis_remaining} ms");
    }

    fn on_countdown_changed(&self, millis_remaining: u64, warning: bool) {
        if warning {
            debug!("reshuffle in {millis_remaining} ms (warning)");
        } else {
            debug!("reshuffle in {millis_remaining} ms");
        }
    }

    fn on_elapsed_changed(&self, millis_elapsed: u64) {
        debug!("{millis_elapsed} ms since last reset");
    }

    fn on_game_over(&self, winners: &[PlayerId]) {
        let names: Vec<String> = winners.iter().map(ToString::to_string).collect();
        info!("game over, winners: {}", names.join(", "));
    }
}
