//! Four-in-a-row rules: grid storage and win detection.
//!
//! This module is pure data and pure functions. It knows nothing about
//! players, timers or presentation; the board actors in [`crate::board`]
//! drive it.

pub mod entities;
pub mod grid;
pub mod win;

pub use entities::{BoardId, Cell, Coord, Player, PlayerId, Position, Team};
pub use grid::{DEFAULT_COLUMNS, DEFAULT_ROWS, Grid};
pub use win::{DEFAULT_WIN_LENGTH, WinResult, check_win, check_win_with_length};
