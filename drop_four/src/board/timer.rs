//! Debounced one-shot scheduling for turn timeouts and post-move pauses.
//!
//! Timers are never hard-cancelled. A turn timeout captures the sequence id
//! current at scheduling time; when it fires it compares that id against
//! the live one and does nothing if they differ. Starting another timeout or
//! calling [`TurnTimer::cancel_current_timeout`] bumps the id, which turns
//! every pending timeout into a no-op at its original fire time.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::time::{Duration, sleep};

/// Default time a player has to make a move.
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Default pause between a finished game and the board reset.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(3000);

/// Default time the drop lock stays held after a non-terminal move.
pub const DEFAULT_DROP_COOLDOWN: Duration = Duration::from_millis(650);

/// Delays used by a [`TurnTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerDurations {
    pub turn_timeout: Duration,
    pub reset_delay: Duration,
    pub drop_cooldown: Duration,
}

impl Default for TimerDurations {
    fn default() -> Self {
        Self {
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            reset_delay: DEFAULT_RESET_DELAY,
            drop_cooldown: DEFAULT_DROP_COOLDOWN,
        }
    }
}

/// Per-board scheduler. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TurnTimer {
    sequence: Arc<AtomicU64>,
    durations: TimerDurations,
}

impl TurnTimer {
    pub fn new(durations: TimerDurations) -> Self {
        Self {
            sequence: Arc::new(AtomicU64::new(0)),
            durations,
        }
    }

    pub fn durations(&self) -> TimerDurations {
        self.durations
    }

    /// Current sequence id.
    pub fn sequence_id(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Whether a timeout scheduled with `id` is still the live one.
    pub fn is_current(&self, id: u64) -> bool {
        self.sequence_id() == id
    }

    /// Schedules `on_timeout` after the turn duration and returns its id.
    ///
    /// The callback receives the id it was scheduled with and only runs if no
    /// newer timeout was started and no cancel happened in between.
    pub fn start_turn_timeout<F>(&self, on_timeout: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let sequence = Arc::clone(&self.sequence);
        let delay = self.durations.turn_timeout;

        tokio::spawn(async move {
            sleep(delay).await;
            if sequence.load(Ordering::SeqCst) == id {
                on_timeout(id);
            } else {
                log::debug!("Turn timeout {} superseded, skipping", id);
            }
        });

        id
    }

    /// Invalidates any pending turn timeout.
    pub fn cancel_current_timeout(&self) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
    }

    /// Runs `callback` after the reset delay. Not debounced.
    pub fn schedule_reset<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        Self::schedule_after(self.durations.reset_delay, callback);
    }

    /// Runs `callback` after the drop cooldown. Not debounced.
    pub fn schedule_drop_cooldown<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        Self::schedule_after(self.durations.drop_cooldown, callback);
    }

    fn schedule_after<F>(delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        tokio::spawn(async move {
            sleep(delay).await;
            callback();
        });
    }
}
