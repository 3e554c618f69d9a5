//! PostgreSQL pool behind the win-statistics backend.
//!
//! The pool is optional for the whole server: without `DATABASE_URL` no
//! [`Database`] is ever opened and wins stay in memory.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;

pub mod config;
pub mod timeouts;

pub use config::DatabaseConfig;
use timeouts::{TimeoutResult, with_default_timeout};

/// Open pool, shared with every ledger that needs it
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Open the pool and make sure the server answers before boards start
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use drop_four::db::{Database, DatabaseConfig};
    /// use drop_four::stats::PgWinLedger;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let db = Database::connect(&DatabaseConfig::development()).await.unwrap();
    ///     let ledger = PgWinLedger::new(db.shared_pool());
    ///     ledger.ensure_schema().await.unwrap();
    ///     db.close().await;
    /// }
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> TimeoutResult<Self> {
        let pool = pool_options(config).connect(&config.database_url).await?;
        let db = Self {
            pool: Arc::new(pool),
        };
        db.ping().await?;
        Ok(db)
    }

    /// Pool handle for ledgers
    pub fn shared_pool(&self) -> Arc<PgPool> {
        Arc::clone(&self.pool)
    }

    /// Round trip to the server under the default query timeout
    pub async fn ping(&self) -> TimeoutResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(self.pool.as_ref())).await?;
        Ok(())
    }

    /// Wait for checked-out connections to return, then close them all.
    /// Clones of the pool handed out earlier are closed too.
    pub async fn close(self) {
        self.pool.close().await;
        log::info!("Database pool closed");
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
}
