//! In-process win ledger, used when no database is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StatsResult, WinRecorder};
use crate::game::PlayerId;

#[derive(Debug, Default)]
pub struct MemoryWinLedger {
    wins: RwLock<HashMap<PlayerId, u64>>,
}

impl MemoryWinLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WinRecorder for MemoryWinLedger {
    async fn record_player_win(&self, player_id: PlayerId, increment: u32) -> StatsResult<()> {
        let mut wins = self.wins.write().await;
        *wins.entry(player_id).or_insert(0) += u64::from(increment);
        Ok(())
    }

    async fn wins(&self, player_id: PlayerId) -> StatsResult<u64> {
        Ok(self.wins.read().await.get(&player_id).copied().unwrap_or(0))
    }

    async fn standings(&self, limit: usize) -> StatsResult<Vec<(PlayerId, u64)>> {
        let mut standings: Vec<_> = self
            .wins
            .read()
            .await
            .iter()
            .map(|(&id, &wins)| (id, wins))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        standings.truncate(limit);
        Ok(standings)
    }
}
