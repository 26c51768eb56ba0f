//! Turn clock driving forced reshuffles and the timer display.

use std::time::{Duration, Instant};

use crate::core::{GameConfig, TimerMode};
use crate::presenter::Presenter;

/// What the timer display should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockReading {
    Countdown { millis: u64, warning: bool },
    Elapsed { millis: u64 },
}

/// Countdown to the next reshuffle, or time since the last reset.
///
/// Every method has an `_at` form taking the current instant, which the
/// dealer uses so one loop iteration sees a single "now".
#[derive(Clone, Debug)]
pub struct TurnClock {
    mode: TimerMode,
    warning: Duration,
    tick: Duration,
    warning_tick: Duration,
    reset_at: Instant,
}

impl TurnClock {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            mode: config.timer_mode(),
            warning: config.warning(),
            tick: config.tick(),
            warning_tick: config.warning_tick(),
            reset_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Restart the countdown (or elapsed count) from now.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        self.reset_at = now;
    }

    #[must_use]
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.reset_at)
    }

    /// Time left before a forced reshuffle; `None` without a countdown.
    #[must_use]
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        match self.mode {
            TimerMode::Countdown(timeout) => Some(timeout.saturating_sub(self.elapsed_at(now))),
            TimerMode::Elapsed => None,
        }
    }

    #[must_use]
    pub fn expired(&self) -> bool {
        self.expired_at(Instant::now())
    }

    #[must_use]
    pub fn expired_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_some_and(|left| left.is_zero())
    }

    #[must_use]
    pub fn in_warning_at(&self, now: Instant) -> bool {
        self.remaining_at(now).is_some_and(|left| left <= self.warning)
    }

    /// How long the dealer may block before it must refresh the display
    /// or reshuffle.
    ///
    /// A full tick normally, never past the start of the warning window, and
    /// the finer warning tick once inside it.
    #[must_use]
    pub fn poll_interval_at(&self, now: Instant) -> Duration {
        match self.remaining_at(now) {
            None => self.tick,
            Some(left) if left <= self.warning => self.warning_tick.min(left),
            Some(left) => {
                let until_warning = (left - self.warning).max(self.warning_tick);
                self.tick.min(until_warning).min(left)
            }
        }
    }

    #[must_use]
    pub fn reading_at(&self, now: Instant) -> ClockReading {
        match self.remaining_at(now) {
            Some(left) => ClockReading::Countdown {
                millis: left.as_millis() as u64,
                warning: left <= self.warning,
            },
            None => ClockReading::Elapsed {
                millis: self.elapsed_at(now).as_millis() as u64,
            },
        }
    }

    /// Push the current reading to the presenter.
    pub fn publish_at(&self, now: Instant, presenter: &dyn Presenter) {
        match self.reading_at(now) {
            ClockReading::Countdown { millis, warning } => {
                presenter.on_countdown_changed(millis, warning);
            }
            ClockReading::Elapsed { millis } => presenter.on_elapsed_changed(millis),
        }
    }
}
