//! Where players are, as far as the boards are concerned.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::game::{PlayerId, Position};

/// Read access to player positions for distance-based eviction.
pub trait PlayerPresence: Send + Sync {
    /// Current position, `None` when the player has no character in the world.
    fn position(&self, player_id: PlayerId) -> Option<Position>;
}

/// Shared position map written by the action source.
#[derive(Debug, Default)]
pub struct PresenceMap {
    positions: RwLock<HashMap<PlayerId, Position>>,
}

impl PresenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, player_id: PlayerId, position: Position) {
        match self.positions.write() {
            Ok(mut positions) => {
                positions.insert(player_id, position);
            }
            Err(e) => log::error!("Presence map poisoned: {}", e),
        }
    }

    pub fn remove(&self, player_id: PlayerId) {
        match self.positions.write() {
            Ok(mut positions) => {
                positions.remove(&player_id);
            }
            Err(e) => log::error!("Presence map poisoned: {}", e),
        }
    }
}

impl PlayerPresence for PresenceMap {
    fn position(&self, player_id: PlayerId) -> Option<Position> {
        self.positions.read().ok()?.get(&player_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_remove() {
        let presence = PresenceMap::new();
        assert!(presence.position(7).is_none());

        presence.update(7, Position::new(1.0, 2.0, 3.0));
        assert_eq!(presence.position(7), Some(Position::new(1.0, 2.0, 3.0)));

        presence.remove(7);
        assert!(presence.position(7).is_none());
    }
}
