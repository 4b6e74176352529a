use serde::{Deserialize, Serialize};

use crate::domain::services::{MatchSummary, Winner};
use crate::domain::value_objects::{Difficulty, MatchState, TurnRecord};

/// Stored log of one finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub player_name: String,
    pub difficulty: Difficulty,
    pub user_score: u32,
    pub computer_score: u32,
    pub target: u32,
    pub winner: Winner,
    pub history: Vec<TurnRecord>,
    pub played_at: i64,
}

impl MatchRecord {
    /// Create a new record stamped with a fresh id and the current time
    pub fn new(summary: &MatchSummary, state: &MatchState) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            player_name: summary.player_name.clone(),
            difficulty: summary.difficulty,
            user_score: summary.final_score,
            computer_score: summary.computer_score,
            target: summary.target,
            winner: summary.outcome.winner,
            history: state.history.clone(),
            played_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Number of turns bowled across both innings
    pub fn turns(&self) -> usize {
        self.history.len()
    }
}
