//! Win statistics: the only state a board hands outside itself.
//!
//! Boards call [`WinRecorder::record_player_win`] on a detached task and
//! never wait for it. Failures are logged by the caller and ignored.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::{db::timeouts::TimeoutError, game::PlayerId};

pub use memory::MemoryWinLedger;
pub use postgres::PgWinLedger;

/// Win-statistics errors
#[derive(Debug, Error)]
pub enum StatsError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Query did not finish in time
    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    /// Backend refused the write
    #[error("Stats backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for win-statistics operations
pub type StatsResult<T> = Result<T, StatsError>;

/// Best-effort persistence of win counts.
#[async_trait]
pub trait WinRecorder: Send + Sync {
    /// Add `increment` wins to the player's total.
    async fn record_player_win(&self, player_id: PlayerId, increment: u32) -> StatsResult<()>;

    /// Total wins for a player, zero if never recorded.
    async fn wins(&self, player_id: PlayerId) -> StatsResult<u64>;

    /// Up to `limit` players with the most wins, highest first. Ties go to
    /// the lower player id.
    async fn standings(&self, limit: usize) -> StatsResult<Vec<(PlayerId, u64)>>;
}
