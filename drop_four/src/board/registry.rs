//! Board registry: spawns one actor per board definition and routes
//! commands and server-wide signals to them.

use std::collections::HashMap;

use super::{
    actor::{BoardActor, BoardError, BoardHandle},
    config::BoardConfig,
    definition::{BoardDefinition, DefinitionError},
    messages::{BoardSnapshot, DepartureReason, DropOutcome, JoinOutcome, LeaveOutcome},
};
use crate::{
    collab::Collaborators,
    game::{BoardId, Player, PlayerId},
};

/// Owns the handles of every running board, indexed by board id.
///
/// Built once at startup. Boards share nothing with each other apart from
/// the injected collaborators.
pub struct BoardRegistry {
    boards: HashMap<BoardId, BoardHandle>,
    /// Definition order, for stable listings
    order: Vec<BoardId>,
    rejected: Vec<DefinitionError>,
}

impl BoardRegistry {
    /// Validate definitions and spawn an actor for each usable one
    ///
    /// # Arguments
    ///
    /// * `definitions` - Board definitions discovered in the world
    /// * `config` - Settings applied to every board
    /// * `collaborators` - Shared presentation, presence and stats services
    ///
    /// # Returns
    ///
    /// * `Result<BoardRegistry, String>` - Registry, or error if `config` is invalid
    pub fn spawn(
        definitions: Vec<BoardDefinition>,
        config: BoardConfig,
        collaborators: Collaborators,
    ) -> Result<Self, String> {
        config.validate()?;

        let mut registry = Self {
            boards: HashMap::new(),
            order: Vec::new(),
            rejected: Vec::new(),
        };

        for definition in definitions {
            let layout = match definition.validate(config.win_length) {
                Ok(layout) => layout,
                Err(e) => {
                    log::error!("Skipping board: {}", e);
                    registry.rejected.push(e);
                    continue;
                }
            };

            if registry.boards.contains_key(&layout.id) {
                let e = DefinitionError::DuplicateId(layout.id);
                log::error!("Skipping board: {}", e);
                registry.rejected.push(e);
                continue;
            }

            let board_id = layout.id.clone();
            let (actor, handle) = BoardActor::new(layout, config.clone(), collaborators.clone());

            tokio::spawn(async move {
                actor.run().await;
            });

            log::info!("Spawned board {}", board_id);
            registry.order.push(board_id.clone());
            registry.boards.insert(board_id, handle);
        }

        Ok(registry)
    }

    pub fn get(&self, board_id: &str) -> Option<&BoardHandle> {
        self.boards.get(board_id)
    }

    fn board(&self, board_id: &str) -> Result<&BoardHandle, BoardError> {
        self.get(board_id)
            .ok_or_else(|| BoardError::UnknownBoard(board_id.to_string()))
    }

    pub fn board_ids(&self) -> &[BoardId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Definitions that were skipped at startup
    pub fn rejected(&self) -> &[DefinitionError] {
        &self.rejected
    }

    pub async fn join(&self, board_id: &str, player: Player) -> Result<JoinOutcome, BoardError> {
        self.board(board_id)?.join(player).await
    }

    pub async fn leave(
        &self,
        board_id: &str,
        player_id: PlayerId,
    ) -> Result<LeaveOutcome, BoardError> {
        self.board(board_id)?.leave(player_id).await
    }

    pub async fn drop_token(
        &self,
        board_id: &str,
        player_id: PlayerId,
        column: usize,
    ) -> Result<DropOutcome, BoardError> {
        self.board(board_id)?.drop_token(player_id, column).await
    }

    pub async fn state(&self, board_id: &str) -> Result<BoardSnapshot, BoardError> {
        self.board(board_id)?.state().await
    }

    /// Snapshots of every board, in definition order
    pub async fn list_boards(&self) -> Vec<BoardSnapshot> {
        let mut snapshots = Vec::with_capacity(self.order.len());
        for board_id in &self.order {
            match self.boards[board_id].state().await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => log::warn!("Failed to query board {}: {}", board_id, e),
            }
        }
        snapshots
    }

    /// Tell every board a player entered the server
    pub async fn player_added(&self, player: &Player) {
        for handle in self.boards.values() {
            if let Err(e) = handle.player_arrived(player.clone()).await {
                log::warn!("{}", e);
            }
        }
    }

    /// Tell every board a player is gone
    pub async fn player_removed(&self, player_id: PlayerId, reason: DepartureReason) {
        for handle in self.boards.values() {
            if let Err(e) = handle.player_departed(player_id, reason).await {
                log::warn!("{}", e);
            }
        }
    }

    /// Close every board and wait for each to acknowledge
    pub async fn shutdown(&self) {
        for board_id in &self.order {
            if let Err(e) = self.boards[board_id].close().await {
                log::warn!("{}", e);
            }
        }
        log::info!("Closed {} board(s)", self.order.len());
    }
}
