use std::sync::Arc;

use crate::domain::entities::LeaderboardEntry;
use crate::domain::repositories::{RepositoryError, StatsRepository};

/// Rows shown on the local leaderboard
pub const DEFAULT_LEADERBOARD_SIZE: u32 = 10;

/// Get leaderboard use case
pub struct GetLeaderboard<S: StatsRepository> {
    stats_repo: Arc<S>,
}

impl<S: StatsRepository> GetLeaderboard<S> {
    pub fn new(stats_repo: Arc<S>) -> Self {
        Self { stats_repo }
    }

    pub async fn execute(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, RepositoryError> {
        let limit = if limit == 0 { DEFAULT_LEADERBOARD_SIZE } else { limit };
        self.stats_repo.get_leaderboard(limit).await
    }
}
