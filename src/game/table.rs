//! Shared state handed to every actor at the table.

use std::sync::Arc;

use crate::board::Board;
use crate::claims::ClaimQueue;
use crate::core::{GameConfig, Shutdown};
use crate::presenter::Presenter;

/// Board, claim queue, presenter and stop signal of one game.
///
/// Cloning shares the same game.
#[derive(Clone)]
pub struct Table {
    pub board: Arc<Board>,
    pub claims: Arc<ClaimQueue>,
    pub presenter: Arc<dyn Presenter>,
    pub shutdown: Shutdown,
}

impl Table {
    /// Empty board and queue sized for `config`.
    pub fn new(config: &GameConfig, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            board: Arc::new(Board::from_config(config, Arc::clone(&presenter))),
            claims: Arc::new(ClaimQueue::new()),
            presenter,
            shutdown: Shutdown::new(),
        }
    }

    /// Fire the stop signal and wake everything blocked on the board or
    /// the claim queue. Returns `true` for the first call only.
    pub fn stop(&self) -> bool {
        let first = self.shutdown.trigger();
        self.board.wake_all();
        self.claims.wake();
        first
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("board", &self.board)
            .field("claims", &self.claims)
            .field("stopped", &self.shutdown.is_triggered())
            .finish_non_exhaustive()
    }
}
