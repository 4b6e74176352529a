use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{MatchOutcome, Winner};

/// Aggregate record of every match a player has finished
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub total_runs: u32,
    pub high_score: u32,
}

impl PlayerStats {
    /// Zeroed stats for a player who has not finished a match yet
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fold one finished match into the totals
    ///
    /// `score` is the player's batting total for that match.
    pub fn record_match(&mut self, score: u32, outcome: &MatchOutcome) {
        self.matches_played += 1;
        match outcome.winner {
            Winner::User => self.wins += 1,
            Winner::Computer => self.losses += 1,
            Winner::Tie => self.ties += 1,
        }
        self.total_runs += score;
        self.high_score = self.high_score.max(score);
    }

    pub fn win_rate(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            self.wins as f64 / self.matches_played as f64
        }
    }

    pub fn average_score(&self) -> f64 {
        if self.matches_played == 0 {
            0.0
        } else {
            self.total_runs as f64 / self.matches_played as f64
        }
    }
}

/// Row of the local leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub high_score: u32,
    pub wins: u32,
}

impl From<&PlayerStats> for LeaderboardEntry {
    fn from(stats: &PlayerStats) -> Self {
        Self {
            name: stats.name.clone(),
            high_score: stats.high_score,
            wins: stats.wins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(winner: Winner) -> MatchOutcome {
        MatchOutcome {
            winner,
            margin: String::new(),
        }
    }

    #[test]
    fn test_record_match_updates_totals() {
        let mut stats = PlayerStats::new("Asha");
        stats.record_match(14, &outcome(Winner::User));
        stats.record_match(30, &outcome(Winner::Computer));
        stats.record_match(9, &outcome(Winner::Tie));

        assert_eq!(stats.matches_played, 3);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.ties, 1);
        assert_eq!(stats.total_runs, 53);
        assert_eq!(stats.high_score, 30);
    }

    #[test]
    fn test_rates_handle_no_matches() {
        let stats = PlayerStats::new("Asha");
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.average_score(), 0.0);
    }
}
