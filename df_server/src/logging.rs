//! Structured logging configuration.
//!
//! The library logs through the `log` facade; the subscriber installed here
//! picks those records up alongside the server's own `tracing` events.

use drop_four::{
    board::{BoardSnapshot, DefinitionError, DepartureReason, DropOutcome, Resolution},
    game::PlayerId,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use df_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a board definition that was skipped at startup
pub fn log_rejected_definition(error: &DefinitionError) {
    tracing::error!(reason = %error, "BOARD: definition rejected");
}

/// Log a board that is up and accepting players
pub fn log_board_ready(snapshot: &BoardSnapshot) {
    tracing::info!(
        board_id = %snapshot.board_id,
        columns = snapshot.grid.first().map_or(0, String::len),
        rows = snapshot.grid.len(),
        "BOARD: ready"
    );
}

/// Log the result of a drop with structured data
///
/// Wins and draws are logged at info, everything else at debug.
pub fn log_drop_outcome(board_id: &str, player_id: PlayerId, outcome: &DropOutcome) {
    match outcome {
        DropOutcome::Placed {
            column,
            row,
            resolution: Resolution::Win(result),
        } => tracing::info!(
            board_id = board_id,
            player_id = player_id,
            column = column,
            row = row,
            winning_cells = ?result.winning_cells,
            "GAME: won"
        ),
        DropOutcome::Placed {
            resolution: Resolution::Draw,
            ..
        } => tracing::info!(board_id = board_id, player_id = player_id, "GAME: draw"),
        DropOutcome::Placed { column, row, .. } => tracing::debug!(
            board_id = board_id,
            player_id = player_id,
            column = column,
            row = row,
            "GAME: token placed"
        ),
        DropOutcome::Ignored(rejection) => tracing::debug!(
            board_id = board_id,
            player_id = player_id,
            rejection = ?rejection,
            "GAME: drop ignored"
        ),
    }
}

/// Log a player being taken off every board
pub fn log_departure(player_id: PlayerId, reason: DepartureReason) {
    tracing::info!(player_id = player_id, reason = %reason, "EVICTION: player departed");
}

/// Log an action line that could not be handled
///
/// # Arguments
///
/// * `line` - Raw input line
/// * `reason` - Why it was skipped
pub fn log_skipped_action(line: &str, reason: &str) {
    tracing::warn!(line = line, reason = reason, "ACTION: skipped");
}
