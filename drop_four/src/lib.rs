//! # Drop Four
//!
//! A multi-board four-in-a-row engine. Any number of boards run side by side,
//! each with its own grid, two-player queue, turn timer and drop lock.
//!
//! ## Architecture
//!
//! Each board moves through three phases:
//!
//! - **Idle**: zero or one player queued
//! - **Active**: two players alternating drops under a turn timeout
//! - **Resolving**: win, draw or timeout detected, reset pending
//!
//! Every board runs as a tokio actor that serialises player commands,
//! its own timer callbacks and a throttled distance check. Stale timers are
//! neutralised with sequence ids rather than cancelled.
//!
//! ## Core Modules
//!
//! - [`game`]: grid storage and win scanning
//! - [`board`]: board controller, turn timer, actors and the registry
//! - [`collab`]: presentation and presence interfaces with log-only implementations
//! - [`stats`]: win persistence (in-memory or Postgres)
//!
//! ## Example
//!
//! ```
//! use drop_four::game::{Grid, Team, check_win};
//!
//! let mut grid = Grid::default();
//! for column in 1..=4 {
//!     let row = grid.find_lowest_available_row(column).unwrap();
//!     grid.place_token(column, row, Team::Zero);
//! }
//! assert!(check_win(&grid, 4, 1, Team::Zero).has_won);
//! ```

/// Board actors, controllers, timers and the registry.
pub mod board;

/// Presentation and presence collaborators.
pub mod collab;

/// Postgres connection pooling.
pub mod db;

/// Grid and win rules.
pub mod game;

/// Win statistics backends.
pub mod stats;

/// Recording collaborator doubles.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use board::{
    BoardConfig, BoardController, BoardDefinition, BoardError, BoardHandle, BoardRegistry,
    DepartureReason, DropOutcome, JoinOutcome, TurnTimer,
};
pub use game::{Cell, Grid, Player, PlayerId, Position, Team, WinResult, check_win};
