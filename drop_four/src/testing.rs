//! Collaborator doubles that record every call, for tests and local tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use crate::{
    board::definition::{BoardDefinition, ColumnTrigger, InteractionHolder},
    collab::{
        CameraDirector, CameraPose, CollaboratorError, CollaboratorResult, Collaborators,
        Notifier, PlayerPresence, TokenPlacement, TokenVisuals, VisualHandle,
    },
    game::{Player, PlayerId, Position, Team},
    stats::{StatsError, StatsResult, WinRecorder},
};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendToPlayer {
        player: PlayerId,
        message: String,
        timeout_secs: Option<u64>,
        show_exit_button: bool,
    },
    SendToPlayers {
        players: Vec<PlayerId>,
        message: String,
    },
    ClearUi(PlayerId),
    UpdateCamera {
        player: PlayerId,
        is_their_turn: bool,
    },
    ResetCameras(Vec<PlayerId>),
    CreateToken {
        column: usize,
        row: usize,
        team: Team,
    },
    VictoryEffects(VisualHandle),
    ClearTokens(String),
    RecordWin {
        player: PlayerId,
        increment: u32,
    },
}

/// Implements every collaborator trait, appending to a shared call log.
///
/// With [`Recorder::set_failing`] every call still gets recorded but returns
/// an error, to check that failures never disturb board state.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    positions: Mutex<HashMap<PlayerId, Position>>,
    failing: AtomicBool,
    next_handle: AtomicU64,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Collaborator bundle backed entirely by this recorder.
    pub fn collaborators(self: &Arc<Self>) -> Collaborators {
        Collaborators {
            notifier: self.clone(),
            camera: self.clone(),
            visuals: self.clone(),
            stats: self.clone(),
            presence: self.clone(),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_position(&self, player_id: PlayerId, position: Position) {
        lock(&self.positions).insert(player_id, position);
    }

    pub fn remove_position(&self, player_id: PlayerId) {
        lock(&self.positions).remove(&player_id);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Returns and forgets the calls recorded so far.
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Messages sent to one player, in order.
    pub fn messages_for(&self, player_id: PlayerId) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                Call::SendToPlayer {
                    player, message, ..
                } if *player == player_id => Some(message.clone()),
                Call::SendToPlayers { players, message } if players.contains(&player_id) => {
                    Some(message.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Win totals summed from the recorded `RecordWin` calls.
    fn win_totals(&self) -> HashMap<PlayerId, u64> {
        let mut totals = HashMap::new();
        for call in lock(&self.calls).iter() {
            if let Call::RecordWin { player, increment } = call {
                *totals.entry(*player).or_insert(0) += u64::from(*increment);
            }
        }
        totals
    }

    fn record<T>(&self, call: Call, value: T) -> CollaboratorResult<T> {
        lock(&self.calls).push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(CollaboratorError::Failed("recorder set to fail".to_string()))
        } else {
            Ok(value)
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn ids(players: &[Player]) -> Vec<PlayerId> {
    players.iter().map(|p| p.id).collect()
}

impl Notifier for Recorder {
    fn send_to_player(
        &self,
        player: &Player,
        message: &str,
        timeout_secs: Option<u64>,
        show_exit_button: bool,
    ) -> CollaboratorResult<()> {
        self.record(
            Call::SendToPlayer {
                player: player.id,
                message: message.to_string(),
                timeout_secs,
                show_exit_button,
            },
            (),
        )
    }

    fn send_to_players(&self, players: &[Player], message: &str) -> CollaboratorResult<()> {
        self.record(
            Call::SendToPlayers {
                players: ids(players),
                message: message.to_string(),
            },
            (),
        )
    }

    fn clear_ui(&self, player: &Player) -> CollaboratorResult<()> {
        self.record(Call::ClearUi(player.id), ())
    }
}

impl CameraDirector for Recorder {
    fn update_player_camera(
        &self,
        player: &Player,
        is_their_turn: bool,
        _pose: &CameraPose,
    ) -> CollaboratorResult<()> {
        self.record(
            Call::UpdateCamera {
                player: player.id,
                is_their_turn,
            },
            (),
        )
    }

    fn reset_all_cameras(&self, players: &[Player]) -> CollaboratorResult<()> {
        self.record(Call::ResetCameras(ids(players)), ())
    }
}

impl TokenVisuals for Recorder {
    fn create_token(
        &self,
        _container: &str,
        placement: &TokenPlacement,
    ) -> CollaboratorResult<VisualHandle> {
        let handle = VisualHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.record(
            Call::CreateToken {
                column: placement.column,
                row: placement.row,
                team: placement.team,
            },
            handle,
        )
    }

    fn apply_victory_effects(&self, handle: VisualHandle) -> CollaboratorResult<()> {
        self.record(Call::VictoryEffects(handle), ())
    }

    fn clear_tokens(&self, container: &str) -> CollaboratorResult<()> {
        self.record(Call::ClearTokens(container.to_string()), ())
    }
}

#[async_trait]
impl WinRecorder for Recorder {
    async fn record_player_win(&self, player_id: PlayerId, increment: u32) -> StatsResult<()> {
        self.record(
            Call::RecordWin {
                player: player_id,
                increment,
            },
            (),
        )
        .map_err(|e| StatsError::Unavailable(e.to_string()))
    }

    async fn wins(&self, player_id: PlayerId) -> StatsResult<u64> {
        Ok(self.win_totals().get(&player_id).copied().unwrap_or(0))
    }

    async fn standings(&self, limit: usize) -> StatsResult<Vec<(PlayerId, u64)>> {
        let mut standings: Vec<_> = self.win_totals().into_iter().collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        standings.truncate(limit);
        Ok(standings)
    }
}

impl PlayerPresence for Recorder {
    fn position(&self, player_id: PlayerId) -> Option<Position> {
        lock(&self.positions).get(&player_id).copied()
    }
}

/// A complete definition with `columns` column triggers, origin at the world
/// origin and column triggers one unit apart.
pub fn sample_definition(id: &str, columns: usize) -> BoardDefinition {
    BoardDefinition {
        id: id.to_string(),
        origin: Position::default(),
        token_container: Some(format!("{id}-tokens")),
        base_height: Some(0.0),
        interaction: Some(InteractionHolder {
            join_trigger: format!("{id}-prompt"),
        }),
        columns: (0..columns)
            .map(|i| ColumnTrigger {
                position: Position::new(i as f32, 6.0, 0.0),
            })
            .collect(),
        camera_pose: Some(CameraPose {
            position: Position::new(0.0, 3.0, -8.0),
            look_at: Position::new(0.0, 3.0, 0.0),
        }),
    }
}
