use async_trait::async_trait;

use crate::domain::entities::{LeaderboardEntry, MatchRecord, PlayerStats};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Stats and match log storage
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Create storage if it does not exist yet
    async fn init(&self) -> Result<(), RepositoryError>;

    /// Stats for a player, zeroed if they have never finished a match
    async fn get_stats(&self, name: &str) -> Result<PlayerStats, RepositoryError>;

    /// Save stats (create or update)
    async fn save_stats(&self, stats: &PlayerStats) -> Result<(), RepositoryError>;

    /// Best players, highest score first
    async fn get_leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepositoryError>;

    /// Append a finished match to the log
    async fn save_match(&self, record: &MatchRecord) -> Result<(), RepositoryError>;

    /// Save updated stats and append the match that produced them, all or nothing
    async fn record_match(
        &self,
        stats: &PlayerStats,
        record: &MatchRecord,
    ) -> Result<(), RepositoryError>;

    /// A player's latest matches, newest first
    async fn recent_matches(
        &self,
        name: &str,
        limit: u32,
    ) -> Result<Vec<MatchRecord>, RepositoryError>;
}
