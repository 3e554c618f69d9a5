//! Postgres-backed win ledger.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::{StatsResult, WinRecorder};
use crate::{db::timeouts::with_default_timeout, game::PlayerId};

/// Upserts win totals into `player_wins(player_id BIGINT PRIMARY KEY, wins BIGINT)`.
pub struct PgWinLedger {
    pool: Arc<PgPool>,
}

impl PgWinLedger {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> StatsResult<()> {
        with_default_timeout(
            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS player_wins (
                    player_id BIGINT PRIMARY KEY,
                    wins BIGINT NOT NULL DEFAULT 0,
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
            )
            .execute(self.pool.as_ref()),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl WinRecorder for PgWinLedger {
    async fn record_player_win(&self, player_id: PlayerId, increment: u32) -> StatsResult<()> {
        with_default_timeout(
            sqlx::query(
                r#"
                INSERT INTO player_wins (player_id, wins)
                VALUES ($1, $2)
                ON CONFLICT (player_id)
                DO UPDATE SET wins = player_wins.wins + EXCLUDED.wins, updated_at = NOW()
                "#,
            )
            .bind(player_id)
            .bind(i64::from(increment))
            .execute(self.pool.as_ref()),
        )
        .await?;

        log::debug!("Recorded {} win(s) for player {}", increment, player_id);
        Ok(())
    }

    async fn wins(&self, player_id: PlayerId) -> StatsResult<u64> {
        let wins: Option<i64> = with_default_timeout(
            sqlx::query_scalar("SELECT wins FROM player_wins WHERE player_id = $1")
                .bind(player_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;
        Ok(wins.map_or(0, to_count))
    }

    async fn standings(&self, limit: usize) -> StatsResult<Vec<(PlayerId, u64)>> {
        let rows: Vec<(i64, i64)> = with_default_timeout(
            sqlx::query_as(
                r#"
                SELECT player_id, wins FROM player_wins
                ORDER BY wins DESC, player_id ASC
                LIMIT $1
                "#,
            )
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(self.pool.as_ref()),
        )
        .await?;
        Ok(rows
            .into_iter()
            .map(|(player_id, wins)| (player_id, to_count(wins)))
            .collect())
    }
}

fn to_count(wins: i64) -> u64 {
    u64::try_from(wins).unwrap_or(0)
}
