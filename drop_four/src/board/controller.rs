//! Per-board state machine: queueing, turns, resolution and eviction.
//!
//! A controller is owned by exactly one board actor and is only ever touched
//! from that actor's task, so plain fields are enough for the session state.
//! Timers post [`ScheduledEvent`]s back through an unbounded channel; the
//! actor feeds them to [`BoardController::on_scheduled`].

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{
    config::BoardConfig,
    definition::BoardLayout,
    messages::{
        BoardPhase, BoardSnapshot, DepartureReason, DropOutcome, DropRejection, JoinOutcome,
        JoinRejection, LeaveOutcome, Notice, Resolution, ScheduledEvent,
    },
    timer::TurnTimer,
};
use crate::{
    collab::{Collaborators, VisualHandle, log_failure},
    game::{Coord, Grid, Player, PlayerId, Team, WinResult, check_win_with_length},
};

/// Players a board seats.
pub const MAX_QUEUED_PLAYERS: usize = 2;

/// Mutable per-board session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Queued or playing, in join order. Slot index is the team.
    pub players: Vec<Player>,
    pub active_player_index: usize,
    /// True only while two players alternate turns
    pub is_active: bool,
    /// Coarse lock held from a drop until its cooldown or reset
    pub is_drop_in_progress: bool,
    pub join_enabled: bool,
    /// A delayed reset is scheduled
    pub reset_pending: bool,
    /// Bumped on every reset so delayed callbacks from older games are ignored
    pub epoch: u64,
}

impl Session {
    fn idle() -> Self {
        Self {
            join_enabled: true,
            ..Default::default()
        }
    }

    pub fn is_queued(&self, player_id: PlayerId) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn active_player(&self) -> Option<&Player> {
        if self.is_active {
            self.players.get(self.active_player_index)
        } else {
            None
        }
    }
}

pub struct BoardController {
    layout: BoardLayout,
    config: BoardConfig,
    grid: Grid,
    session: Session,
    timer: TurnTimer,
    /// Rendered tokens by cell, for victory effects
    tokens: HashMap<Coord, VisualHandle>,
    collaborators: Collaborators,
    scheduled: mpsc::UnboundedSender<ScheduledEvent>,
}

impl BoardController {
    pub fn new(
        layout: BoardLayout,
        config: BoardConfig,
        collaborators: Collaborators,
        scheduled: mpsc::UnboundedSender<ScheduledEvent>,
    ) -> Self {
        let grid = Grid::new(layout.columns.len(), config.rows);
        let timer = TurnTimer::new(config.timer_durations());
        Self {
            layout,
            config,
            grid,
            session: Session::idle(),
            timer,
            tokens: HashMap::new(),
            collaborators,
            scheduled,
        }
    }

    pub fn id(&self) -> &str {
        &self.layout.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn phase(&self) -> BoardPhase {
        if self.session.is_active {
            BoardPhase::Active
        } else if self.session.reset_pending {
            BoardPhase::Resolving
        } else {
            BoardPhase::Idle
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board_id: self.layout.id.clone(),
            phase: self.phase(),
            players: self.session.players.clone(),
            active_player: self.session.active_player().map(|p| p.id),
            is_drop_in_progress: self.session.is_drop_in_progress,
            join_enabled: self.session.join_enabled,
            grid: self.grid.render_rows(),
        }
    }

    /// Join trigger used by `player`.
    pub fn join(&mut self, player: Player) -> JoinOutcome {
        if !self.session.join_enabled {
            return JoinOutcome::Rejected(JoinRejection::JoinDisabled);
        }

        if let Some(idx) = self.session.players.iter().position(|p| *p == player) {
            let player = self.session.players.remove(idx);
            log::info!("Board {}: {} left the queue", self.layout.id, player.name);
            self.notify(&player, &Notice::LeftQueue, None, false);
            self.clear_ui(&player);
            return JoinOutcome::LeftQueue;
        }

        if self.session.players.len() >= MAX_QUEUED_PLAYERS {
            return JoinOutcome::Rejected(JoinRejection::QueueFull);
        }

        log::info!("Board {}: {} queued", self.layout.id, player.name);
        self.notify(&player, &Notice::Queued, None, true);
        self.session.players.push(player);

        if self.session.players.len() == MAX_QUEUED_PLAYERS {
            self.start_game();
            JoinOutcome::GameStarted
        } else {
            JoinOutcome::Queued {
                position: self.session.players.len(),
            }
        }
    }

    /// Exit button used by `player_id`.
    pub fn leave(&mut self, player_id: PlayerId) -> LeaveOutcome {
        if self.player_departed(player_id, DepartureReason::Left) {
            LeaveOutcome::Left
        } else {
            LeaveOutcome::NotQueued
        }
    }

    fn start_game(&mut self) {
        self.session.active_player_index = 0;
        self.session.is_active = true;
        self.session.join_enabled = false;

        log::info!(
            "Board {}: game started between {} and {}",
            self.layout.id,
            self.session.players[0].name,
            self.session.players[1].name
        );

        self.send_turn_notices();
        self.start_turn_timer();
    }

    /// Drops a token for `player_id` into one-based `column`.
    pub fn drop_token(&mut self, player_id: PlayerId, column: usize) -> DropOutcome {
        if let Err(rejection) = self.validate_drop(player_id) {
            log::debug!(
                "Board {}: ignored drop by {} ({:?})",
                self.layout.id,
                player_id,
                rejection
            );
            return DropOutcome::Ignored(rejection);
        }
        let Some(row) = self.grid.find_lowest_available_row(column) else {
            return DropOutcome::Ignored(DropRejection::ColumnFull);
        };

        let team = Team::from_slot(self.session.active_player_index);
        self.session.is_drop_in_progress = true;
        // Authoritative state first; presentation below may fail freely.
        self.grid.place_token(column, row, team);
        self.timer.cancel_current_timeout();

        let placement = self
            .layout
            .placement(column, row, team, self.config.row_height);
        if let Some(handle) = log_failure(
            &self.layout.id,
            "create_token",
            self.collaborators
                .visuals
                .create_token(&self.layout.token_container, &placement),
        ) {
            self.tokens.insert((column, row), handle);
        }

        let result = check_win_with_length(&self.grid, column, row, team, self.config.win_length);
        let resolution = if result.has_won {
            self.resolve_win(&result);
            Resolution::Win(result)
        } else if self.grid.is_full() {
            self.resolve_draw();
            Resolution::Draw
        } else {
            self.advance_turn();
            Resolution::NextTurn
        };

        DropOutcome::Placed {
            column,
            row,
            resolution,
        }
    }

    fn validate_drop(&self, player_id: PlayerId) -> Result<(), DropRejection> {
        if !self.session.is_active {
            return Err(DropRejection::Inactive);
        }
        if self.session.is_drop_in_progress {
            return Err(DropRejection::DropInProgress);
        }
        match self.session.active_player() {
            Some(active) if active.id == player_id => Ok(()),
            _ => Err(DropRejection::NotYourTurn),
        }
    }

    fn resolve_win(&mut self, result: &WinResult) {
        for cell in &result.winning_cells {
            if let Some(&handle) = self.tokens.get(cell) {
                log_failure(
                    &self.layout.id,
                    "apply_victory_effects",
                    self.collaborators.visuals.apply_victory_effects(handle),
                );
            }
        }

        self.session.is_active = false;
        let winner = self.session.players[self.session.active_player_index].clone();
        log::info!("Board {}: {} won", self.layout.id, winner.name);

        let players = self.session.players.clone();
        self.notify_all(
            &players,
            &Notice::Won {
                winner: winner.name.clone(),
            },
        );
        for loser in players.iter().filter(|p| **p != winner) {
            self.notify(
                loser,
                &Notice::Lost {
                    winner: winner.name.clone(),
                },
                None,
                false,
            );
        }

        self.record_win(winner.id);
        self.schedule_delayed_reset();
    }

    fn resolve_draw(&mut self) {
        self.session.is_active = false;
        log::info!("Board {}: draw", self.layout.id);

        let players = self.session.players.clone();
        self.notify_all(&players, &Notice::Draw);
        self.schedule_delayed_reset();
    }

    fn advance_turn(&mut self) {
        self.session.active_player_index = 1 - self.session.active_player_index;
        self.send_turn_notices();
        self.start_turn_timer();

        let epoch = self.session.epoch;
        let scheduled = self.scheduled.clone();
        self.timer.schedule_drop_cooldown(move || {
            let _ = scheduled.send(ScheduledEvent::DropCooldownElapsed { epoch });
        });
    }

    fn send_turn_notices(&self) {
        let timeout = self.timer.durations().turn_timeout.as_secs();
        let players = &self.session.players;
        for (idx, player) in players.iter().enumerate() {
            let is_their_turn = idx == self.session.active_player_index;
            if is_their_turn {
                self.notify(player, &Notice::YourTurn, Some(timeout), true);
            } else {
                let opponent = players[self.session.active_player_index].name.clone();
                self.notify(player, &Notice::Waiting { opponent }, None, true);
            }
            log_failure(
                &self.layout.id,
                "update_player_camera",
                self.collaborators.camera.update_player_camera(
                    player,
                    is_their_turn,
                    &self.layout.camera_pose,
                ),
            );
        }
    }

    fn start_turn_timer(&self) {
        let scheduled = self.scheduled.clone();
        self.timer.start_turn_timeout(move |sequence_id| {
            let _ = scheduled.send(ScheduledEvent::TurnTimedOut { sequence_id });
        });
    }

    fn schedule_delayed_reset(&mut self) {
        self.session.reset_pending = true;
        let epoch = self.session.epoch;
        let scheduled = self.scheduled.clone();
        self.timer.schedule_reset(move || {
            let _ = scheduled.send(ScheduledEvent::ResetDue { epoch });
        });
    }

    fn record_win(&self, player_id: PlayerId) {
        let stats = Arc::clone(&self.collaborators.stats);
        let increment = self.config.win_increment;
        let board = self.layout.id.clone();
        tokio::spawn(async move {
            if let Err(e) = stats.record_player_win(player_id, increment).await {
                log::warn!(
                    "Board {}: failed to record win for player {}: {}",
                    board,
                    player_id,
                    e
                );
            }
        });
    }

    /// Handles a callback posted by this board's timers.
    pub fn on_scheduled(&mut self, event: ScheduledEvent) {
        match event {
            ScheduledEvent::TurnTimedOut { sequence_id } => {
                if !self.timer.is_current(sequence_id) || !self.session.is_active {
                    log::debug!(
                        "Board {}: stale turn timeout {} ignored",
                        self.layout.id,
                        sequence_id
                    );
                    return;
                }
                self.handle_turn_timeout();
            }
            ScheduledEvent::ResetDue { epoch } => {
                if epoch == self.session.epoch {
                    self.reset();
                }
            }
            ScheduledEvent::DropCooldownElapsed { epoch } => {
                if epoch == self.session.epoch {
                    self.session.is_drop_in_progress = false;
                }
            }
        }
    }

    fn handle_turn_timeout(&mut self) {
        let player = self.session.players[self.session.active_player_index].name.clone();
        log::info!("Board {}: {} timed out", self.layout.id, player);

        self.session.is_active = false;
        let players = self.session.players.clone();
        self.notify_all(&players, &Notice::TurnTimedOut { player });
        self.schedule_delayed_reset();
    }

    /// Removes `player_id` from this board if seated or queued, resetting it
    /// immediately. Returns whether the player was here.
    pub fn player_departed(&mut self, player_id: PlayerId, reason: DepartureReason) -> bool {
        if !self.session.is_queued(player_id) {
            return false;
        }

        log::info!(
            "Board {}: player {} departed ({})",
            self.layout.id,
            player_id,
            reason
        );

        let remaining: Vec<Player> = self
            .session
            .players
            .iter()
            .filter(|p| p.id != player_id)
            .cloned()
            .collect();
        for player in &remaining {
            self.notify(player, &Notice::OpponentLeft, None, false);
        }

        self.reset();
        true
    }

    /// A player (re)entered the server. A seat left over from an earlier
    /// connection is dropped.
    pub fn player_arrived(&mut self, player: &Player) {
        if self.session.is_queued(player.id) {
            self.player_departed(player.id, DepartureReason::Removed);
        }
    }

    /// Evicts the first queued player without a character or beyond the
    /// configured distance from the board.
    pub fn check_distances(&mut self) {
        let origin = self.layout.origin;
        let evicted = self.session.players.iter().find_map(|player| {
            match self.collaborators.presence.position(player.id) {
                None => Some((player.id, DepartureReason::Removed)),
                Some(position) if position.distance_to(&origin) > self.config.max_distance => {
                    Some((player.id, DepartureReason::TooFar))
                }
                Some(_) => None,
            }
        });

        if let Some((player_id, reason)) = evicted {
            self.player_departed(player_id, reason);
        }
    }

    /// Clears the board back to idle. Shared by every terminal path.
    pub fn reset(&mut self) {
        let previous = std::mem::take(&mut self.session.players);

        self.grid.reset();
        self.timer.cancel_current_timeout();

        log_failure(
            &self.layout.id,
            "reset_all_cameras",
            self.collaborators.camera.reset_all_cameras(&previous),
        );
        for player in &previous {
            self.clear_ui(player);
        }
        log_failure(
            &self.layout.id,
            "clear_tokens",
            self.collaborators
                .visuals
                .clear_tokens(&self.layout.token_container),
        );
        self.tokens.clear();

        let epoch = self.session.epoch + 1;
        self.session = Session {
            epoch,
            ..Session::idle()
        };
        log::debug!("Board {}: reset (epoch {})", self.layout.id, epoch);
    }

    fn notify(&self, player: &Player, notice: &Notice, timeout_secs: Option<u64>, exit: bool) {
        log_failure(
            &self.layout.id,
            "send_to_player",
            self.collaborators
                .notifier
                .send_to_player(player, &notice.to_string(), timeout_secs, exit),
        );
    }

    fn notify_all(&self, players: &[Player], notice: &Notice) {
        log_failure(
            &self.layout.id,
            "send_to_players",
            self.collaborators
                .notifier
                .send_to_players(players, &notice.to_string()),
        );
    }

    fn clear_ui(&self, player: &Player) {
        log_failure(
            &self.layout.id,
            "clear_ui",
            self.collaborators.notifier.clear_ui(player),
        );
    }
}
