//! Board actor: one tokio task per board, serialising commands, timer
//! callbacks and the throttled distance check.

use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    time::{MissedTickBehavior, interval},
};

use super::{
    config::BoardConfig,
    controller::BoardController,
    definition::BoardLayout,
    messages::{
        BoardMessage, BoardSnapshot, DepartureReason, DropOutcome, JoinOutcome, LeaveOutcome,
        ScheduledEvent,
    },
};
use crate::{
    collab::Collaborators,
    game::{BoardId, Player, PlayerId},
};

/// Inbox capacity per board.
const INBOX_CAPACITY: usize = 100;

/// Errors from talking to a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board '{0}' not found")]
    UnknownBoard(BoardId),

    #[error("board '{0}' is closed")]
    Closed(BoardId),

    #[error("board '{0}' dropped the request")]
    NoResponse(BoardId),
}

/// Board actor handle for sending messages
#[derive(Clone, Debug)]
pub struct BoardHandle {
    sender: mpsc::Sender<BoardMessage>,
    board_id: BoardId,
}

impl BoardHandle {
    pub fn new(sender: mpsc::Sender<BoardMessage>, board_id: BoardId) -> Self {
        Self { sender, board_id }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    /// Send a message to the board
    pub async fn send(&self, message: BoardMessage) -> Result<(), BoardError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| BoardError::Closed(self.board_id.clone()))
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> BoardMessage,
    ) -> Result<T, BoardError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await
            .map_err(|_| BoardError::NoResponse(self.board_id.clone()))
    }

    pub async fn join(&self, player: Player) -> Result<JoinOutcome, BoardError> {
        self.request(|response| BoardMessage::Join { player, response })
            .await
    }

    pub async fn leave(&self, player_id: PlayerId) -> Result<LeaveOutcome, BoardError> {
        self.request(|response| BoardMessage::Leave {
            player_id,
            response,
        })
        .await
    }

    pub async fn drop_token(
        &self,
        player_id: PlayerId,
        column: usize,
    ) -> Result<DropOutcome, BoardError> {
        self.request(|response| BoardMessage::Drop {
            player_id,
            column,
            response,
        })
        .await
    }

    pub async fn state(&self) -> Result<BoardSnapshot, BoardError> {
        self.request(|response| BoardMessage::GetState { response })
            .await
    }

    /// Fan-out signal: player entered the server.
    pub async fn player_arrived(&self, player: Player) -> Result<(), BoardError> {
        self.send(BoardMessage::PlayerArrived { player }).await
    }

    /// Fan-out signal: player left the server or lost their character.
    pub async fn player_departed(
        &self,
        player_id: PlayerId,
        reason: DepartureReason,
    ) -> Result<(), BoardError> {
        self.send(BoardMessage::PlayerDeparted { player_id, reason })
            .await
    }

    pub async fn close(&self) -> Result<(), BoardError> {
        self.request(|response| BoardMessage::Close { response })
            .await
    }
}

/// Board actor owning a single [`BoardController`]
pub struct BoardActor {
    controller: BoardController,
    inbox: mpsc::Receiver<BoardMessage>,
    scheduled: mpsc::UnboundedReceiver<ScheduledEvent>,
    config: BoardConfig,
    is_closed: bool,
}

impl BoardActor {
    /// Create a new board actor and the handle used to reach it
    pub fn new(
        layout: BoardLayout,
        config: BoardConfig,
        collaborators: Collaborators,
    ) -> (Self, BoardHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let (scheduled_tx, scheduled) = mpsc::unbounded_channel();
        let board_id = layout.id.clone();

        let controller = BoardController::new(layout, config.clone(), collaborators, scheduled_tx);

        let actor = Self {
            controller,
            inbox,
            scheduled,
            config,
            is_closed: false,
        };

        (actor, BoardHandle::new(sender, board_id))
    }

    /// Run the board event loop
    pub async fn run(mut self) {
        log::info!("Board {} starting", self.controller.id());

        let mut distance_check = interval(self.config.distance_check_interval());
        distance_check.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                message = self.inbox.recv() => {
                    match message {
                        Some(message) => self.handle_message(message),
                        // Every handle dropped.
                        None => break,
                    }

                    if self.is_closed {
                        break;
                    }
                }

                Some(event) = self.scheduled.recv() => {
                    self.controller.on_scheduled(event);
                }

                _ = distance_check.tick() => {
                    self.controller.check_distances();
                }
            }
        }

        log::info!("Board {} closed", self.controller.id());
    }

    fn handle_message(&mut self, message: BoardMessage) {
        match message {
            BoardMessage::Join { player, response } => {
                let _ = response.send(self.controller.join(player));
            }

            BoardMessage::Leave {
                player_id,
                response,
            } => {
                let _ = response.send(self.controller.leave(player_id));
            }

            BoardMessage::Drop {
                player_id,
                column,
                response,
            } => {
                let _ = response.send(self.controller.drop_token(player_id, column));
            }

            BoardMessage::PlayerArrived { player } => {
                self.controller.player_arrived(&player);
            }

            BoardMessage::PlayerDeparted { player_id, reason } => {
                self.controller.player_departed(player_id, reason);
            }

            BoardMessage::GetState { response } => {
                let _ = response.send(self.controller.snapshot());
            }

            BoardMessage::Close { response } => {
                self.controller.reset();
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }
}
