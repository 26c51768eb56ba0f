//! Cooperative stop signal shared by the dealer and every player actor.
//!
//! The signal is a channel that never carries a message: triggering drops
//! the only sender, so every clone of the receiver becomes ready at once.
//! Actors put `signal()` in their `select!` next to whatever they are
//! waiting for, which makes each suspension point interruptible.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Shutdown {
    triggered: Arc<AtomicBool>,
    sender: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            triggered: Arc::new(AtomicBool::new(false)),
            sender: Arc::new(Mutex::new(Some(tx))),
            signal: rx,
        }
    }

    /// Request every holder to stop. Returns `true` for the first call only.
    pub fn trigger(&self) -> bool {
        let first = !self.triggered.swap(true, Ordering::SeqCst);
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        first
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Receiver that disconnects when the signal fires. Use inside `select!`.
    #[must_use]
    pub fn signal(&self) -> &Receiver<()> {
        &self.signal
    }

    /// Sleep for `duration` unless stopped first.
    ///
    /// Returns `false` if the sleep was cut short by the signal.
    pub fn sleep(&self, duration: Duration) -> bool {
        if self.is_triggered() {
            return false;
        }
        matches!(
            self.signal.recv_timeout(duration),
            Err(RecvTimeoutError::Timeout)
        )
    }
}
