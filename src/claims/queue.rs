//! FIFO queue of claims awaiting the dealer.
//!
//! Player actors are the producers, the dealer is the only consumer. Claims
//! come out in the order they went in, which is the order in which each
//! player's selection reached full size.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::board::{Slot, Slots};
use crate::core::{PlayerId, Shutdown};

/// Sequence number of a claim, unique per queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Claim({})", self.0)
    }
}

/// A player's full selection, submitted for validation.
///
/// Only slots are recorded. The cards are read when the dealer resolves
/// the claim, since the board may have changed in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub player: PlayerId,
    pub slots: Slots,
}

impl Claim {
    #[must_use]
    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }
}

#[derive(Debug, Default)]
struct QueueState {
    claims: VecDeque<Claim>,
    next_id: u64,
}

/// Claims in submission order.
///
/// Players submit while holding the board lock; the queue never takes the
/// board lock itself.
#[derive(Debug, Default)]
pub struct ClaimQueue {
    state: Mutex<QueueState>,
    available: Condvar,
}

impl ClaimQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a claim and wake the dealer.
    pub fn submit(&self, player: PlayerId, slots: Slots) -> ClaimId {
        let mut state = self.state();
        let id = ClaimId(state.next_id);
        state.next_id += 1;
        state.claims.push_back(Claim { id, player, slots });
        self.available.notify_all();
        id
    }

    /// Oldest pending claim.
    pub fn pop(&self) -> Option<Claim> {
        self.state().claims.pop_front()
    }

    /// Remove every pending claim, oldest first.
    pub fn drain(&self) -> Vec<Claim> {
        self.state().claims.drain(..).collect()
    }

    /// Block until a claim is pending, `timeout` passes, or `shutdown` fires.
    ///
    /// Returns `true` if a claim is pending.
    pub fn wait_for_claim(&self, timeout: Duration, shutdown: &Shutdown) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state();
        loop {
            if !state.claims.is_empty() {
                return true;
            }
            if shutdown.is_triggered() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .available
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Wake a waiting dealer so it re-checks its stop signal.
    pub fn wake(&self) {
        let _state = self.state();
        self.available.notify_all();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state().claims.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().claims.is_empty()
    }

    /// Number of pending claims from `player`.
    #[must_use]
    pub fn pending_for(&self, player: PlayerId) -> usize {
        self.state()
            .claims
            .iter()
            .filter(|claim| claim.player == player)
            .count()
    }

    /// Copy of the pending claims, oldest first.
    #[must_use]
    pub fn pending(&self) -> Vec<Claim> {
        self.state().claims.iter().cloned().collect()
    }
}
