//! Line-delimited JSON actions read from stdin.
//!
//! Each line is one [`ActionEvent`] tagged by `"type"`, for example
//! `{"type":"drop","board":"north","player_id":1,"column":4}`.

use drop_four::{
    BoardRegistry, DepartureReason,
    board::{BoardError, BoardSnapshot},
    collab::PresenceMap,
    game::{BoardId, Player, PlayerId, Position},
    stats::{StatsError, WinRecorder},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::logging;

/// Players listed in a status report
pub const STANDINGS_LIMIT: usize = 10;

/// One input action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEvent {
    /// Join prompt triggered on a board
    Join {
        board: BoardId,
        player_id: PlayerId,
        name: String,
    },
    /// Exit button pressed on a board
    Leave { board: BoardId, player_id: PlayerId },
    /// Column trigger activated
    Drop {
        board: BoardId,
        player_id: PlayerId,
        column: usize,
    },
    PlayerAdded { player_id: PlayerId, name: String },
    PlayerRemoved { player_id: PlayerId },
    PlayerDefeated { player_id: PlayerId },
    /// Character moved
    Position {
        player_id: PlayerId,
        x: f32,
        y: f32,
        z: f32,
    },
    /// Print a player's win total to stdout
    Wins { player_id: PlayerId },
    /// Print every board's state and the win standings to stdout
    Status,
}

impl ActionEvent {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Action handling failures. The line is skipped; the server keeps going.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[derive(Debug, Serialize)]
struct Standing {
    player_id: PlayerId,
    wins: u64,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    boards: Vec<BoardSnapshot>,
    standings: Vec<Standing>,
}

/// Everything an action can touch
pub struct Services {
    pub registry: BoardRegistry,
    pub presence: Arc<PresenceMap>,
    pub stats: Arc<dyn WinRecorder>,
}

impl Services {
    /// Applies one action. Returns a JSON line to print, if the action has one.
    pub async fn apply(&self, event: ActionEvent) -> Result<Option<String>, ActionError> {
        match event {
            ActionEvent::Join {
                board,
                player_id,
                name,
            } => {
                let outcome = self
                    .registry
                    .join(&board, Player::new(player_id, &name))
                    .await?;
                log::info!("join {} by {}: {:?}", board, player_id, outcome);
            }
            ActionEvent::Leave { board, player_id } => {
                let outcome = self.registry.leave(&board, player_id).await?;
                log::info!("leave {} by {}: {:?}", board, player_id, outcome);
            }
            ActionEvent::Drop {
                board,
                player_id,
                column,
            } => {
                let outcome = self.registry.drop_token(&board, player_id, column).await?;
                logging::log_drop_outcome(&board, player_id, &outcome);
            }
            ActionEvent::PlayerAdded { player_id, name } => {
                self.registry
                    .player_added(&Player::new(player_id, &name))
                    .await;
            }
            ActionEvent::PlayerRemoved { player_id } => {
                self.depart(player_id, DepartureReason::Removed).await;
            }
            ActionEvent::PlayerDefeated { player_id } => {
                self.depart(player_id, DepartureReason::Defeated).await;
            }
            ActionEvent::Position { player_id, x, y, z } => {
                self.presence.update(player_id, Position::new(x, y, z));
            }
            ActionEvent::Wins { player_id } => {
                let standing = Standing {
                    player_id,
                    wins: self.stats.wins(player_id).await?,
                };
                return Ok(serde_json::to_string(&standing).ok());
            }
            ActionEvent::Status => {
                let standings = self
                    .stats
                    .standings(STANDINGS_LIMIT)
                    .await?
                    .into_iter()
                    .map(|(player_id, wins)| Standing { player_id, wins })
                    .collect();
                let report = StatusReport {
                    boards: self.registry.list_boards().await,
                    standings,
                };
                return Ok(serde_json::to_string(&report).ok());
            }
        }
        Ok(None)
    }

    async fn depart(&self, player_id: PlayerId, reason: DepartureReason) {
        self.presence.remove(player_id);
        logging::log_departure(player_id, reason);
        self.registry.player_removed(player_id, reason).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drop_four::{
        BoardConfig,
        collab::{Collaborators, PlayerPresence},
        stats::MemoryWinLedger,
        testing::{Recorder, sample_definition},
    };

    fn services() -> (Services, Arc<MemoryWinLedger>) {
        let recorder = Recorder::new();
        let presence = Arc::new(PresenceMap::new());
        let ledger = Arc::new(MemoryWinLedger::new());
        let collaborators = Collaborators {
            presence: presence.clone(),
            stats: ledger.clone(),
            ..recorder.collaborators()
        };
        let registry = BoardRegistry::spawn(
            vec![sample_definition("north", 8)],
            BoardConfig::default(),
            collaborators,
        )
        .unwrap();

        let services = Services {
            registry,
            presence,
            stats: ledger.clone(),
        };
        (services, ledger)
    }

    #[test]
    fn test_parse_actions() {
        assert_eq!(
            ActionEvent::parse(r#"{"type":"drop","board":"north","player_id":1,"column":4}"#)
                .unwrap(),
            ActionEvent::Drop {
                board: "north".to_string(),
                player_id: 1,
                column: 4
            }
        );
        assert_eq!(
            ActionEvent::parse(r#"{"type":"player_defeated","player_id":9}"#).unwrap(),
            ActionEvent::PlayerDefeated { player_id: 9 }
        );
        assert_eq!(
            ActionEvent::parse(r#"{"type":"wins","player_id":3}"#).unwrap(),
            ActionEvent::Wins { player_id: 3 }
        );
        assert_eq!(
            ActionEvent::parse(r#"{"type":"status"}"#).unwrap(),
            ActionEvent::Status
        );
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert!(ActionEvent::parse("{not json").is_err());
        assert!(ActionEvent::parse(r#"{"type":"fly","player_id":1}"#).is_err());
        assert!(ActionEvent::parse(r#"{"type":"drop","board":"north"}"#).is_err());
    }

    #[tokio::test]
    async fn test_position_updates_presence() {
        let (services, _ledger) = services();

        let event = ActionEvent::Position {
            player_id: 4,
            x: 1.0,
            y: 2.0,
            z: 3.0,
        };
        assert_eq!(services.apply(event).await.unwrap(), None);
        assert_eq!(
            services.presence.position(4),
            Some(Position::new(1.0, 2.0, 3.0))
        );

        let removed = ActionEvent::PlayerRemoved { player_id: 4 };
        assert_eq!(services.apply(removed).await.unwrap(), None);
        assert_eq!(services.presence.position(4), None);
    }

    #[tokio::test]
    async fn test_join_and_status() {
        let (services, ledger) = services();
        services.presence.update(1, Position::new(0.0, 0.0, 0.0));
        ledger.record_player_win(7, 2).await.unwrap();

        let join = ActionEvent::Join {
            board: "north".to_string(),
            player_id: 1,
            name: "alice".to_string(),
        };
        assert_eq!(services.apply(join).await.unwrap(), None);

        let status = services.apply(ActionEvent::Status).await.unwrap().unwrap();
        assert!(status.contains("\"board_id\":\"north\""));
        assert!(status.contains("alice"));
        assert!(status.contains(r#""standings":[{"player_id":7,"wins":2}]"#));
    }

    #[tokio::test]
    async fn test_wins_reports_ledger_total() {
        let (services, ledger) = services();
        ledger.record_player_win(3, 1).await.unwrap();
        ledger.record_player_win(3, 1).await.unwrap();

        let output = services
            .apply(ActionEvent::Wins { player_id: 3 })
            .await
            .unwrap();
        assert_eq!(output.as_deref(), Some(r#"{"player_id":3,"wins":2}"#));

        let output = services
            .apply(ActionEvent::Wins { player_id: 4 })
            .await
            .unwrap();
        assert_eq!(output.as_deref(), Some(r#"{"player_id":4,"wins":0}"#));
    }

    #[tokio::test]
    async fn test_unknown_board_is_an_error() {
        let (services, _ledger) = services();

        let event = ActionEvent::Leave {
            board: "south".to_string(),
            player_id: 1,
        };
        assert!(matches!(
            services.apply(event).await,
            Err(ActionError::Board(BoardError::UnknownBoard(id))) if id == "south"
        ));
    }
}
