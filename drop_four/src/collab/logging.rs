//! Collaborators that only write to the log.
//!
//! Used by the server when no presentation layer is attached, so a headless
//! deployment still shows what each board would have displayed.

use std::sync::atomic::{AtomicU64, Ordering};

use super::{
    CameraDirector, CameraPose, CollaboratorError, CollaboratorResult, Notifier, TokenPlacement,
    TokenVisuals, VisualHandle,
};
use crate::game::Player;

#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_to_player(
        &self,
        player: &Player,
        message: &str,
        timeout_secs: Option<u64>,
        show_exit_button: bool,
    ) -> CollaboratorResult<()> {
        log::info!(
            "[to {} #{}] {} (timeout: {:?}, exit button: {})",
            player.name,
            player.id,
            message,
            timeout_secs,
            show_exit_button
        );
        Ok(())
    }

    fn send_to_players(&self, players: &[Player], message: &str) -> CollaboratorResult<()> {
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        log::info!("[to {}] {}", names.join(", "), message);
        Ok(())
    }

    fn clear_ui(&self, player: &Player) -> CollaboratorResult<()> {
        log::debug!("Clearing UI for {}", player.name);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogCameraDirector;

impl CameraDirector for LogCameraDirector {
    fn update_player_camera(
        &self,
        player: &Player,
        is_their_turn: bool,
        pose: &CameraPose,
    ) -> CollaboratorResult<()> {
        if is_their_turn {
            log::debug!("Focusing camera of {} on {:?}", player.name, pose.look_at);
        } else {
            log::debug!("Releasing camera of {}", player.name);
        }
        Ok(())
    }

    fn reset_all_cameras(&self, players: &[Player]) -> CollaboratorResult<()> {
        log::debug!("Resetting {} camera(s)", players.len());
        Ok(())
    }
}

/// Hands out increasing handles and logs placements.
#[derive(Debug, Default)]
pub struct LogTokenVisuals {
    next_handle: AtomicU64,
}

fn require_container(container: &str) -> CollaboratorResult<()> {
    if container.trim().is_empty() {
        return Err(CollaboratorError::ContainerMissing(container.to_string()));
    }
    Ok(())
}

impl TokenVisuals for LogTokenVisuals {
    fn create_token(
        &self,
        container: &str,
        placement: &TokenPlacement,
    ) -> CollaboratorResult<VisualHandle> {
        require_container(container)?;
        let handle = VisualHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        log::debug!(
            "Token {:?} for {:?} in {} at column {}, row {}",
            handle,
            placement.team,
            container,
            placement.column,
            placement.row
        );
        Ok(handle)
    }

    fn apply_victory_effects(&self, handle: VisualHandle) -> CollaboratorResult<()> {
        log::debug!("Victory effects on token {:?}", handle);
        Ok(())
    }

    fn clear_tokens(&self, container: &str) -> CollaboratorResult<()> {
        require_container(container)?;
        log::debug!("Clearing tokens in {}", container);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Team};

    #[test]
    fn test_handles_are_unique() {
        let visuals = LogTokenVisuals::default();
        let placement = TokenPlacement {
            column: 1,
            row: 1,
            team: Team::Zero,
            drop_from: Position::default(),
            landing: Position::default(),
        };
        let a = visuals.create_token("tokens", &placement).unwrap();
        let b = visuals.create_token("tokens", &placement).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_blank_container_is_reported() {
        let visuals = LogTokenVisuals::default();
        let placement = TokenPlacement {
            column: 2,
            row: 1,
            team: Team::One,
            drop_from: Position::default(),
            landing: Position::default(),
        };

        assert!(matches!(
            visuals.create_token(" ", &placement),
            Err(CollaboratorError::ContainerMissing(_))
        ));
        assert!(matches!(
            visuals.clear_tokens(""),
            Err(CollaboratorError::ContainerMissing(_))
        ));
        assert!(visuals.clear_tokens("north-tokens").is_ok());
    }
}
