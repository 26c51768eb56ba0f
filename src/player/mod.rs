//! Player actors.
//!
//! One thread per seat. A player collects slot presses into a selection of
//! tokens on the board, submits a claim when the selection is full, waits
//! for the dealer's verdict and then sits out a suspension before selecting
//! again.
//!
//! ## Lifecycle
//!
//! ```text
//! Selecting -> AwaitingValidation -> Scored | Penalized -> Selecting
//!     \______________ any state on stop ______________/-> Stopped
//! ```
//!
//! Computer seats run the same actor. A second thread, the generator,
//! feeds it random slot presses while the board is unfrozen.

mod actor;
mod bot;
mod handle;

pub use actor::PlayerActor;
pub use bot::ComputerPlayer;
pub use handle::PlayerHandle;

use serde::{Deserialize, Serialize};

/// Dealer's ruling on a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The cards form a set; the claimant scored.
    Set,
    /// All slots still held, but the cards are not a set.
    NotSet,
    /// A claimed slot was emptied, or the claimant's token on it cleared,
    /// before the claim reached the dealer.
    Voided,
}

impl Verdict {
    #[must_use]
    pub const fn is_point(self) -> bool {
        matches!(self, Verdict::Set)
    }

    #[must_use]
    pub const fn is_penalty(self) -> bool {
        !self.is_point()
    }
}

/// Where a player actor is in its cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerPhase {
    Selecting,
    AwaitingValidation,
    Scored,
    Penalized,
    Stopped,
}

impl PlayerPhase {
    #[must_use]
    pub const fn after(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Set => PlayerPhase::Scored,
            Verdict::NotSet | Verdict::Voided => PlayerPhase::Penalized,
        }
    }
}
