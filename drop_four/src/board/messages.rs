//! Board actor message types.

use serde::Serialize;
use std::fmt;
use tokio::sync::oneshot;

use crate::game::{BoardId, Player, PlayerId, WinResult};

/// Messages that can be sent to a board actor
#[derive(Debug)]
pub enum BoardMessage {
    /// Join trigger used. Joining again while queued leaves the queue.
    Join {
        player: Player,
        response: oneshot::Sender<JoinOutcome>,
    },

    /// Exit button used
    Leave {
        player_id: PlayerId,
        response: oneshot::Sender<LeaveOutcome>,
    },

    /// Drop a token into a one-based column
    Drop {
        player_id: PlayerId,
        column: usize,
        response: oneshot::Sender<DropOutcome>,
    },

    /// A player entered the server
    PlayerArrived { player: Player },

    /// A player left the server or lost their character
    PlayerDeparted {
        player_id: PlayerId,
        reason: DepartureReason,
    },

    /// Get current board state
    GetState {
        response: oneshot::Sender<BoardSnapshot>,
    },

    /// Stop the actor
    Close { response: oneshot::Sender<()> },
}

/// Callbacks posted back to a board by its own timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledEvent {
    /// Turn timer expired; carries the sequence id it was started with
    TurnTimedOut { sequence_id: u64 },

    /// Delayed reset after a win, draw or timeout
    ResetDue { epoch: u64 },

    /// Drop animation finished
    DropCooldownElapsed { epoch: u64 },
}

/// Why a player stopped playing at a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DepartureReason {
    /// Used the exit button
    Left,
    /// Disconnected from the server
    Removed,
    /// Character was defeated
    Defeated,
    /// Walked too far from the board
    TooFar,
}

impl fmt::Display for DepartureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartureReason::Left => write!(f, "left"),
            DepartureReason::Removed => write!(f, "removed"),
            DepartureReason::Defeated => write!(f, "defeated"),
            DepartureReason::TooFar => write!(f, "too far"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Waiting for an opponent
    Queued { position: usize },
    /// Second player joined, game on
    GameStarted,
    /// Player was already queued and has been removed
    LeftQueue,
    Rejected(JoinRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRejection {
    QueueFull,
    /// Join trigger is disabled while a game runs or resolves
    JoinDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    NotQueued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Placed {
        column: usize,
        row: usize,
        resolution: Resolution,
    },
    /// Nothing changed and nobody was notified
    Ignored(DropRejection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    NextTurn,
    Win(WinResult),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRejection {
    Inactive,
    DropInProgress,
    NotYourTurn,
    /// Column is full or does not exist
    ColumnFull,
}

/// Coarse lifecycle phase of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoardPhase {
    /// Fewer than two players queued
    Idle,
    /// Two players alternating turns
    Active,
    /// Game over, reset pending
    Resolving,
}

/// Board state response
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot {
    pub board_id: BoardId,
    pub phase: BoardPhase,
    pub players: Vec<Player>,
    pub active_player: Option<PlayerId>,
    pub is_drop_in_progress: bool,
    pub join_enabled: bool,
    /// Grid rows, top row first
    pub grid: Vec<String>,
}

/// Player-facing messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Queued,
    LeftQueue,
    YourTurn,
    Waiting { opponent: String },
    Won { winner: String },
    Lost { winner: String },
    Draw,
    TurnTimedOut { player: String },
    OpponentLeft,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Queued => write!(f, "Waiting for an opponent..."),
            Notice::LeftQueue => write!(f, "You left the queue."),
            Notice::YourTurn => write!(f, "Your turn! Pick a column."),
            Notice::Waiting { opponent } => write!(f, "Waiting for {opponent} to move..."),
            Notice::Won { winner } => write!(f, "{winner} wins!"),
            Notice::Lost { winner } => write!(f, "You lost. {winner} connected four."),
            Notice::Draw => write!(f, "The board is full. It's a draw!"),
            Notice::TurnTimedOut { player } => write!(f, "{player} ran out of time."),
            Notice::OpponentLeft => write!(f, "Your opponent stopped playing."),
        }
    }
}
