//! Match outcome - deciding the winner once a match is over

use serde::{Deserialize, Serialize};

use crate::domain::errors::MatchError;
use crate::domain::value_objects::{Difficulty, MatchPhase, MatchState};
pub use crate::domain::value_objects::{MatchOutcome, Winner};

/// Decide the winner of a finished match
///
/// The chasing side wins on reaching the target, the defending side wins
/// if the chase falls short, and equal totals are a tie.
pub fn determine_outcome(state: &MatchState) -> Result<MatchOutcome, MatchError> {
    if state.phase != MatchPhase::GameOver {
        return Err(MatchError::phase("decide the outcome", state.phase));
    }
    let target = state
        .target
        .ok_or_else(|| MatchError::phase("decide the outcome", state.phase))?;

    // Roles are not swapped back at the end, so the batting side is the chaser
    let chaser = state.batting_side();
    let chased = state.runs_for(chaser);
    let defended = target.saturating_sub(1);

    let outcome = if chased >= target {
        MatchOutcome {
            winner: chaser.into(),
            margin: format!("by 1 wicket, chasing {} with {}", target, chased),
        }
    } else if chased == defended {
        MatchOutcome {
            winner: Winner::Tie,
            margin: format!("scores level on {}", defended),
        }
    } else {
        let runs = defended - chased;
        MatchOutcome {
            winner: chaser.other().into(),
            margin: format!("by {} run{}", runs, if runs == 1 { "" } else { "s" }),
        }
    };

    Ok(outcome)
}

/// Finalized match, handed to persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub player_name: String,
    pub difficulty: Difficulty,
    /// User's batting total
    pub final_score: u32,
    pub computer_score: u32,
    pub target: u32,
    pub outcome: MatchOutcome,
}

impl MatchSummary {
    /// Summarize a finished match from the outcome decided when it ended
    pub fn from_state(state: &MatchState) -> Result<Self, MatchError> {
        if state.phase != MatchPhase::GameOver {
            return Err(MatchError::phase("summarize the match", state.phase));
        }
        let outcome = state
            .outcome
            .clone()
            .ok_or_else(|| MatchError::phase("summarize the match", state.phase))?;
        Ok(Self {
            player_name: state.player_name.clone(),
            difficulty: state.difficulty,
            final_score: state.score,
            computer_score: state.computer_score,
            target: state.target.unwrap_or_default(),
            outcome,
        })
    }
}
