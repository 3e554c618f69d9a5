//! Multi-board four-in-a-row server using the async actor model.
//!
//! Spawns one actor per board definition through `BoardRegistry` and feeds
//! them actions read as JSON lines from stdin.

mod actions;
mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Error};
use drop_four::{
    BoardRegistry,
    board::parse_definitions,
    collab::{Collaborators, LogCameraDirector, LogNotifier, LogTokenVisuals, PresenceMap},
    db::Database,
    stats::{MemoryWinLedger, PgWinLedger, WinRecorder},
};
use log::info;
use pico_args::Arguments;
use tokio::io::{AsyncBufReadExt, BufReader};

use actions::{ActionEvent, Services};
use config::ServerConfig;

const HELP: &str = "\
Run a multi-board four-in-a-row server

USAGE:
  df_server [OPTIONS]

OPTIONS:
  --boards     PATH        Board definitions file     [default: env BOARDS_FILE or boards.json]
  --db-url     URL         Database connection string [default: env DATABASE_URL, else in-memory stats]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  BOARD_ROWS               Rows per board (default 5)
  TURN_TIMEOUT_SECS        Seconds per turn (default 30)
  RESET_DELAY_MS           Delay before a finished board resets (default 3000)
  DROP_COOLDOWN_MS         Delay before the next turn (default 650)
  DISTANCE_CHECK_MS        Distance check period (default 500)
  MAX_PLAYER_DISTANCE      Eviction distance (default 20)
  WIN_INCREMENT            Wins added per victory (default 1)

INPUT:
  One JSON action per line on stdin, e.g.
  {\"type\":\"join\",\"board\":\"north\",\"player_id\":1,\"name\":\"alice\"}
  Types: join, leave, drop, player_added, player_removed, player_defeated,
  position, wins, status
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let boards_override: Option<PathBuf> = pargs.opt_value_from_str("--boards")?;
    let database_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    logging::init();

    let config = ServerConfig::from_env(boards_override, database_url_override);
    config.validate()?;

    let (stats, database) = open_stats(&config).await?;
    let presence = Arc::new(PresenceMap::new());
    let collaborators = Collaborators {
        notifier: Arc::new(LogNotifier),
        camera: Arc::new(LogCameraDirector),
        visuals: Arc::new(LogTokenVisuals::default()),
        stats: stats.clone(),
        presence: presence.clone(),
    };

    let json = tokio::fs::read_to_string(&config.boards_file)
        .await
        .with_context(|| format!("Failed to read {}", config.boards_file.display()))?;
    let definitions = parse_definitions(&json)?;

    info!(
        "Spawning {} board(s) from {}",
        definitions.len(),
        config.boards_file.display()
    );
    let registry = BoardRegistry::spawn(definitions, config.board.clone(), collaborators)
        .map_err(|e| anyhow::anyhow!("Invalid board settings: {}", e))?;

    for error in registry.rejected() {
        logging::log_rejected_definition(error);
    }
    if registry.is_empty() {
        anyhow::bail!("No valid board definitions");
    }
    for snapshot in registry.list_boards().await {
        logging::log_board_ready(&snapshot);
    }

    let services = Services {
        registry,
        presence,
        stats,
    };

    info!("Server ready. Reading actions from stdin, press Ctrl+C to stop.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                handle_line(&services, line.trim()).await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C");
                break;
            }
        }
    }

    info!("Shutting down server...");
    services.registry.shutdown().await;
    if let Some(database) = database {
        database.close().await;
    }

    Ok(())
}

/// Picks the win ledger. The database, when configured, stays open until
/// shutdown.
async fn open_stats(
    config: &ServerConfig,
) -> Result<(Arc<dyn WinRecorder>, Option<Database>), Error> {
    let Some(db_config) = &config.database else {
        info!("DATABASE_URL not set, keeping win statistics in memory");
        let ledger: Arc<dyn WinRecorder> = Arc::new(MemoryWinLedger::new());
        return Ok((ledger, None));
    };

    info!("Connecting to database");
    let database = Database::connect(db_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    info!("Database connected successfully");

    let ledger = PgWinLedger::new(database.shared_pool());
    ledger.ensure_schema().await?;
    let ledger: Arc<dyn WinRecorder> = Arc::new(ledger);
    Ok((ledger, Some(database)))
}

async fn handle_line(services: &Services, line: &str) {
    if line.is_empty() {
        return;
    }

    let event = match ActionEvent::parse(line) {
        Ok(event) => event,
        Err(e) => {
            logging::log_skipped_action(line, &e.to_string());
            return;
        }
    };

    match services.apply(event).await {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(e) => logging::log_skipped_action(line, &e.to_string()),
    }
}
