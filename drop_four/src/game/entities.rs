//! Plain data types shared by the grid, the win scanner and the board actors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable player identifier handed out by the host.
pub type PlayerId = i64;

/// Board identifier taken from the board definition.
pub type BoardId = String;

/// A player as seen by a board: identity plus a display name for messages.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Which queue slot owns a token.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Team {
    Zero,
    One,
}

impl Team {
    /// Team for a queue slot. Only slots 0 and 1 exist.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Self {
        if slot == 0 { Self::Zero } else { Self::One }
    }

    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::One => 1,
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
        }
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Cell {
    #[default]
    Empty,
    Team0,
    Team1,
}

impl Cell {
    #[must_use]
    pub const fn owned_by(team: Team) -> Self {
        match team {
            Team::Zero => Self::Team0,
            Team::One => Self::Team1,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub const fn team(self) -> Option<Team> {
        match self {
            Self::Empty => None,
            Self::Team0 => Some(Team::Zero),
            Self::Team1 => Some(Team::One),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Empty => '.',
            Self::Team0 => 'X',
            Self::Team1 => 'O',
        };
        write!(f, "{repr}")
    }
}

/// World-space position, used for column triggers, cameras and distance checks.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// One-based `(column, row)` coordinate. Row 1 is the bottom row.
pub type Coord = (usize, usize);
