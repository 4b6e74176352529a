//! MatchOutcome - Who won a finished match and by how much
//!
//! Callers decide wins and losses from this, never from the narration
//! text in `MatchState::message`.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Side;

/// Winner of a finished match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    User,
    Computer,
    Tie,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::User => "user",
            Winner::Computer => "computer",
            Winner::Tie => "tie",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Winner::User),
            "computer" => Some(Winner::Computer),
            "tie" => Some(Winner::Tie),
            _ => None,
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::User => Winner::User,
            Side::Computer => Winner::Computer,
        }
    }
}

/// Result of a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub winner: Winner,
    /// e.g. "by 7 runs"
    pub margin: String,
}

impl MatchOutcome {
    /// One-line narration for the end of the match
    pub fn headline(&self) -> String {
        match self.winner {
            Winner::User => format!("You won {}!", self.margin),
            Winner::Computer => format!("Computer won {}.", self.margin),
            Winner::Tie => format!("Match tied, {}.", self.margin),
        }
    }
}
