//! Interfaces to everything a board talks to but does not own.
//!
//! Presentation (notifications, cameras, token visuals), presence and win
//! statistics are injected as trait objects. Calls are fire-and-forget: a
//! board logs a failing call and carries on with its state transition.

pub mod logging;
pub mod presence;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    game::{Player, Position, Team},
    stats::WinRecorder,
};

pub use logging::{LogCameraDirector, LogNotifier, LogTokenVisuals};
pub use presence::{PlayerPresence, PresenceMap};

/// Failure reported by a collaborator. Never fatal to a board.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("visual container '{0}' not found")]
    ContainerMissing(String),

    #[error("collaborator failed: {0}")]
    Failed(String),
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Opaque handle for a rendered token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Camera pose a player's view is pointed at while seated at a board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Position,
    pub look_at: Position,
}

/// Everything the visual collaborator needs to animate a token drop.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TokenPlacement {
    pub column: usize,
    pub row: usize,
    pub team: Team,
    /// Column trigger the token falls from.
    pub drop_from: Position,
    /// Resting position in the stack.
    pub landing: Position,
}

/// Text and UI delivered to players.
pub trait Notifier: Send + Sync {
    fn send_to_player(
        &self,
        player: &Player,
        message: &str,
        timeout_secs: Option<u64>,
        show_exit_button: bool,
    ) -> CollaboratorResult<()>;

    fn send_to_players(&self, players: &[Player], message: &str) -> CollaboratorResult<()>;

    fn clear_ui(&self, player: &Player) -> CollaboratorResult<()>;
}

/// Player camera control.
pub trait CameraDirector: Send + Sync {
    fn update_player_camera(
        &self,
        player: &Player,
        is_their_turn: bool,
        pose: &CameraPose,
    ) -> CollaboratorResult<()>;

    fn reset_all_cameras(&self, players: &[Player]) -> CollaboratorResult<()>;
}

/// Token rendering. Handles are never read back into grid state.
pub trait TokenVisuals: Send + Sync {
    fn create_token(
        &self,
        container: &str,
        placement: &TokenPlacement,
    ) -> CollaboratorResult<VisualHandle>;

    fn apply_victory_effects(&self, handle: VisualHandle) -> CollaboratorResult<()>;

    /// Removes every token instance from the container.
    fn clear_tokens(&self, container: &str) -> CollaboratorResult<()>;
}

/// The set of collaborators shared by all boards.
#[derive(Clone)]
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub camera: Arc<dyn CameraDirector>,
    pub visuals: Arc<dyn TokenVisuals>,
    pub stats: Arc<dyn WinRecorder>,
    pub presence: Arc<dyn PlayerPresence>,
}

/// Logs a collaborator failure and swallows it.
pub(crate) fn log_failure<T>(board: &str, call: &str, result: CollaboratorResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Board {}: {} failed: {}", board, call, e);
            None
        }
    }
}
