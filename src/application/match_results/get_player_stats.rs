use std::sync::Arc;

use crate::domain::entities::{MatchRecord, PlayerStats};
use crate::domain::repositories::{RepositoryError, StatsRepository};

/// Number of past matches shown with a player's stats
pub const RECENT_MATCH_LIMIT: u32 = 5;

/// Get player stats output
pub struct GetPlayerStatsOutput {
    pub stats: PlayerStats,
    pub recent_matches: Vec<MatchRecord>,
}

/// Get player stats use case
pub struct GetPlayerStats<S: StatsRepository> {
    stats_repo: Arc<S>,
}

impl<S: StatsRepository> GetPlayerStats<S> {
    pub fn new(stats_repo: Arc<S>) -> Self {
        Self { stats_repo }
    }

    pub async fn execute(&self, name: &str) -> Result<GetPlayerStatsOutput, RepositoryError> {
        let name = name.trim();
        let stats = self.stats_repo.get_stats(name).await?;
        let recent_matches = self
            .stats_repo
            .recent_matches(name, RECENT_MATCH_LIMIT)
            .await?;

        Ok(GetPlayerStatsOutput {
            stats,
            recent_matches,
        })
    }
}
