use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::domain::repositories::StatsRepository;
use crate::infrastructure::database::repositories::SqliteStatsRepository;

/// Default pause between entering a number and seeing the result
pub const DEFAULT_TURN_DELAY_MS: u64 = 400;
/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:hand_cricket.db";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime configuration, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    /// Cosmetic pause before a turn is resolved
    pub turn_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            turn_delay: Duration::from_millis(DEFAULT_TURN_DELAY_MS),
        }
    }
}

impl AppConfig {
    /// Read `DATABASE_URL` (or `DB_PATH`) and `TURN_DELAY_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key-value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_PATH"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        // Ensure path has sqlite: prefix
        let database_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        let turn_delay = match lookup("TURN_DELAY_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TURN_DELAY_MS",
                    value: raw.clone(),
                })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_TURN_DELAY_MS),
        };

        Ok(Self {
            database_url,
            turn_delay,
        })
    }
}

/// Shared services for the front-end
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,

    /// Database connection pool
    pub db: SqlitePool,

    /// Stats repository
    pub stats_repo: Arc<SqliteStatsRepository>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // Every in-memory connection is its own database, so keep exactly one
        let max_connections = if config.database_url.contains(":memory:") { 1 } else { 4 };

        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let stats_repo = Arc::new(SqliteStatsRepository::new(db.clone()));
        stats_repo.init().await?;

        Ok(Self {
            config,
            db,
            stats_repo,
        })
    }
}
