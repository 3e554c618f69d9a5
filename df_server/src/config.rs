//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use drop_four::{BoardConfig, db::DatabaseConfig};
use std::path::PathBuf;

const DEFAULT_BOARDS_FILE: &str = "boards.json";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// JSON file with the board definitions
    pub boards_file: PathBuf,
    /// Database configuration, `None` keeps win statistics in memory
    pub database: Option<DatabaseConfig>,
    /// Settings shared by every board
    pub board: BoardConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `boards_override` - Optional definitions file (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    pub fn from_env(
        boards_override: Option<PathBuf>,
        database_url_override: Option<String>,
    ) -> Self {
        let boards_file = boards_override
            .or_else(|| std::env::var("BOARDS_FILE").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BOARDS_FILE));

        let database = match database_url_override {
            Some(url) => Some(DatabaseConfig::with_url(url)),
            None => DatabaseConfig::from_env(),
        };

        let defaults = BoardConfig::default();
        let board = BoardConfig {
            rows: parse_env_or("BOARD_ROWS", defaults.rows),
            turn_timeout_secs: parse_env_or("TURN_TIMEOUT_SECS", defaults.turn_timeout_secs),
            reset_delay_ms: parse_env_or("RESET_DELAY_MS", defaults.reset_delay_ms),
            drop_cooldown_ms: parse_env_or("DROP_COOLDOWN_MS", defaults.drop_cooldown_ms),
            distance_check_ms: parse_env_or("DISTANCE_CHECK_MS", defaults.distance_check_ms),
            max_distance: parse_env_or("MAX_PLAYER_DISTANCE", defaults.max_distance),
            win_increment: parse_env_or("WIN_INCREMENT", defaults.win_increment),
            ..defaults
        };

        ServerConfig {
            boards_file,
            database,
            board,
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boards_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "BOARDS_FILE".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        if let Some(database) = &self.database
            && database.min_connections > database.max_connections
        {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    database.max_connections
                ),
            });
        }

        if self.board.win_increment == 0 {
            return Err(ConfigError::Invalid {
                var: "WIN_INCREMENT".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        self.board.validate().map_err(ConfigError::Board)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid board settings: {0}")]
    Board(String),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
