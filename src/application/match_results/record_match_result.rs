use std::sync::Arc;

use crate::domain::entities::{MatchRecord, PlayerStats};
use crate::domain::errors::MatchError;
use crate::domain::repositories::{RepositoryError, StatsRepository};
use crate::domain::services::{MatchOutcome, MatchSummary};
use crate::domain::value_objects::MatchState;

/// Record match result output
pub struct RecordMatchResultOutput {
    pub outcome: MatchOutcome,
    pub stats: PlayerStats,
    pub match_id: String,
}

/// Record match result use case
///
/// Folds the outcome of a finished match into the player's stats and
/// appends the match to the log in one write.
pub struct RecordMatchResult<S: StatsRepository> {
    stats_repo: Arc<S>,
}

impl<S: StatsRepository> RecordMatchResult<S> {
    pub fn new(stats_repo: Arc<S>) -> Self {
        Self { stats_repo }
    }

    pub async fn execute(
        &self,
        final_state: &MatchState,
    ) -> Result<RecordMatchResultOutput, RecordMatchResultError> {
        let summary = MatchSummary::from_state(final_state)?;

        let mut stats = self.stats_repo.get_stats(&summary.player_name).await?;
        stats.record_match(summary.final_score, &summary.outcome);

        let record = MatchRecord::new(&summary, final_state);
        self.stats_repo.record_match(&stats, &record).await?;

        tracing::info!(
            player = %summary.player_name,
            winner = summary.outcome.winner.as_str(),
            score = summary.final_score,
            match_id = %record.id,
            "Match recorded"
        );

        Ok(RecordMatchResultOutput {
            outcome: summary.outcome,
            stats,
            match_id: record.id,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordMatchResultError {
    #[error("Match is not finished: {0}")]
    NotFinished(#[from] MatchError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
