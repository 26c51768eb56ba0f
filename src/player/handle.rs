//! Outside view of a player actor.

use crossbeam_channel::{Sender, TrySendError};
use log::trace;

use super::Verdict;
use crate::board::Slot;
use crate::core::PlayerId;

/// Senders into one player actor: key presses in, verdicts in.
///
/// Cloned freely. The game handle keeps one per human seat to forward key
/// presses; the dealer keeps one per seat to deliver verdicts.
#[derive(Clone, Debug)]
pub struct PlayerHandle {
    player: PlayerId,
    keys: Sender<Slot>,
    verdicts: Sender<Verdict>,
}

impl PlayerHandle {
    pub(crate) fn new(player: PlayerId, keys: Sender<Slot>, verdicts: Sender<Verdict>) -> Self {
        Self {
            player,
            keys,
            verdicts,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Forward a key press without blocking.
    ///
    /// Presses beyond the key buffer are dropped, as are presses after the
    /// actor has stopped. Returns whether the press was queued.
    pub fn press(&self, slot: Slot) -> bool {
        match self.keys.try_send(slot) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                trace!("{}: key buffer full, dropped {slot}", self.player);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Hand a verdict to the actor. Returns `false` if it could not take it.
    pub fn deliver(&self, verdict: Verdict) -> bool {
        self.verdicts.try_send(verdict).is_ok()
    }
}
