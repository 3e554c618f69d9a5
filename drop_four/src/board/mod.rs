//! Board module: one actor per physical board plus the registry that owns them.
//!
//! This module implements:
//! - BoardController: queueing, turn switching, win/draw resolution, eviction
//! - TurnTimer: sequence-id debounced turn timeouts and fixed delays
//! - BoardActor: tokio task serialising commands, timer callbacks and
//!   distance checks for a single board
//! - BoardRegistry: spawns boards from definitions and fans out
//!   server-wide player signals
//!
//! ## Example
//!
//! ```no_run
//! use drop_four::board::{BoardConfig, BoardRegistry, parse_definitions};
//! use drop_four::collab::{
//!     Collaborators, LogCameraDirector, LogNotifier, LogTokenVisuals, PresenceMap,
//! };
//! use drop_four::game::Player;
//! use drop_four::stats::MemoryWinLedger;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let json = std::fs::read_to_string("boards.json").unwrap();
//!     let collaborators = Collaborators {
//!         notifier: Arc::new(LogNotifier),
//!         camera: Arc::new(LogCameraDirector),
//!         visuals: Arc::new(LogTokenVisuals::default()),
//!         stats: Arc::new(MemoryWinLedger::new()),
//!         presence: Arc::new(PresenceMap::new()),
//!     };
//!     let registry = BoardRegistry::spawn(
//!         parse_definitions(&json).unwrap(),
//!         BoardConfig::default(),
//!         collaborators,
//!     )
//!     .unwrap();
//!
//!     registry.join("lobby", Player::new(1, "alice")).await.unwrap();
//! }
//! ```

pub mod actor;
pub mod config;
pub mod controller;
pub mod definition;
pub mod messages;
pub mod registry;
pub mod timer;

pub use actor::{BoardActor, BoardError, BoardHandle};
pub use config::BoardConfig;
pub use controller::{BoardController, MAX_QUEUED_PLAYERS, Session};
pub use definition::{BoardDefinition, BoardLayout, DefinitionError, parse_definitions};
pub use messages::{
    BoardMessage, BoardPhase, BoardSnapshot, DepartureReason, DropOutcome, DropRejection,
    JoinOutcome, JoinRejection, LeaveOutcome, Notice, Resolution, ScheduledEvent,
};
pub use registry::BoardRegistry;
pub use timer::{TimerDurations, TurnTimer};
