//! Board configuration models.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use super::timer::TimerDurations;
use crate::game::{DEFAULT_ROWS, DEFAULT_WIN_LENGTH};

/// Settings shared by every board the registry spawns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Grid height (default: 5)
    pub rows: usize,

    /// Tokens in a line needed to win (default: 4)
    pub win_length: usize,

    /// Seconds a player has to drop a token
    pub turn_timeout_secs: u64,

    /// Pause after a win, draw or timeout before the board clears
    pub reset_delay_ms: u64,

    /// Drop lock hold time after a non-terminal move
    pub drop_cooldown_ms: u64,

    /// Interval of the distance check
    pub distance_check_ms: u64,

    /// Distance from the board origin past which a queued player is evicted
    pub max_distance: f32,

    /// Wins credited per victory
    pub win_increment: u32,

    /// Vertical spacing of stacked tokens
    pub row_height: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            win_length: DEFAULT_WIN_LENGTH,
            turn_timeout_secs: 30,
            reset_delay_ms: 3000,
            drop_cooldown_ms: 650,
            distance_check_ms: 500,
            max_distance: 20.0,
            win_increment: 1,
            row_height: 1.0,
        }
    }
}

impl BoardConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.win_length < 2 {
            return Err("Win length must be at least 2".to_string());
        }

        if self.rows == 0 {
            return Err("Rows must be greater than 0".to_string());
        }

        if self.turn_timeout_secs == 0 {
            return Err("Turn timeout must be greater than 0".to_string());
        }

        if self.distance_check_ms == 0 {
            return Err("Distance check interval must be greater than 0".to_string());
        }

        if !(self.max_distance.is_finite() && self.max_distance > 0.0) {
            return Err("Max distance must be a positive number".to_string());
        }

        Ok(())
    }

    /// Timer delays derived from this configuration
    pub fn timer_durations(&self) -> TimerDurations {
        TimerDurations {
            turn_timeout: Duration::from_secs(self.turn_timeout_secs),
            reset_delay: Duration::from_millis(self.reset_delay_ms),
            drop_cooldown: Duration::from_millis(self.drop_cooldown_ms),
        }
    }

    pub fn distance_check_interval(&self) -> Duration {
        Duration::from_millis(self.distance_check_ms)
    }
}
