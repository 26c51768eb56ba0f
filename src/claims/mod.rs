//! Claim queue between player actors and the dealer.
//!
//! A player submits exactly one claim when its selection reaches the claim
//! size, then waits for a verdict; the player's own state machine keeps it
//! to one outstanding claim. The dealer pops claims in FIFO order.

mod queue;

pub use queue::{Claim, ClaimId, ClaimQueue};
