//! MatchState - Snapshot of a hand cricket match
//!
//! Owned by the match engine and cloned out to callers on every transition.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::MatchOutcome;

/// Lowest number a hand can show
pub const MIN_CHOICE: u8 = 1;
/// Highest number a hand can show
pub const MAX_CHOICE: u8 = 6;

/// Opponent difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(Difficulty::Easy),
            "medium" | "m" => Some(Difficulty::Medium),
            "hard" | "h" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Call made by the player before the coin is flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TossChoice {
    Heads,
    Tails,
}

impl TossChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            TossChoice::Heads => "heads",
            TossChoice::Tails => "tails",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "heads" | "h" => Some(TossChoice::Heads),
            "tails" | "t" => Some(TossChoice::Tails),
            _ => None,
        }
    }
}

/// Role of the player for an innings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerRole {
    Batting,
    Bowling,
}

impl PlayerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerRole::Batting => "batting",
            PlayerRole::Bowling => "bowling",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "batting" | "bat" | "b" => Some(PlayerRole::Batting),
            "bowling" | "bowl" | "w" => Some(PlayerRole::Bowling),
            _ => None,
        }
    }

    /// The role the other side holds at the same time
    pub fn opposite(&self) -> Self {
        match self {
            PlayerRole::Batting => PlayerRole::Bowling,
            PlayerRole::Bowling => PlayerRole::Batting,
        }
    }
}

/// One of the two competitors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    User,
    Computer,
}

impl Side {
    pub fn other(&self) -> Self {
        match self {
            Side::User => Side::Computer,
            Side::Computer => Side::User,
        }
    }
}

/// Match phase, strictly forward-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchPhase {
    Toss,
    TossResult,
    Innings1,
    MidInnings,
    Innings2,
    GameOver,
}

impl MatchPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::Toss => "toss",
            MatchPhase::TossResult => "tossResult",
            MatchPhase::Innings1 => "innings1",
            MatchPhase::MidInnings => "midInnings",
            MatchPhase::Innings2 => "innings2",
            MatchPhase::GameOver => "gameOver",
        }
    }

    /// Whether turns can be played in this phase
    pub fn is_innings(&self) -> bool {
        matches!(self, MatchPhase::Innings1 | MatchPhase::Innings2)
    }
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single played turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub user: u8,
    pub ai: u8,
    /// User's role when the turn was played
    pub role: PlayerRole,
}

impl TurnRecord {
    pub fn is_dismissal(&self) -> bool {
        self.user == self.ai
    }
}

/// Full match snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub player_name: String,
    pub difficulty: Difficulty,
    pub phase: MatchPhase,

    /// Winner of the toss, once it has been flipped
    pub toss_winner: Option<Side>,

    /// User's role in the current innings
    pub user_role: PlayerRole,
    pub current_innings: u8,

    /// Runs the user has scored with the bat
    pub score: u32,
    /// Runs the computer has scored with the bat
    pub computer_score: u32,

    /// Wickets fallen in the current innings (0 or 1)
    pub wickets: u8,

    /// Set when innings 1 ends; the chasing side needs this many runs
    pub target: Option<u32>,

    pub user_last_choice: Option<u8>,
    pub ai_last_choice: Option<u8>,

    /// Every turn of the match, both innings, in play order
    pub history: Vec<TurnRecord>,

    pub is_out: bool,
    pub message: String,

    /// Decided once, when the match reaches `GameOver`
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    /// Create a fresh match waiting for the toss
    pub fn new(player_name: impl Into<String>, difficulty: Difficulty) -> Self {
        MatchState {
            player_name: player_name.into(),
            difficulty,
            phase: MatchPhase::Toss,
            toss_winner: None,
            user_role: PlayerRole::Batting,
            current_innings: 1,
            score: 0,
            computer_score: 0,
            wickets: 0,
            target: None,
            user_last_choice: None,
            ai_last_choice: None,
            history: Vec::new(),
            is_out: false,
            message: "Call the toss: heads or tails?".to_string(),
            outcome: None,
        }
    }

    /// Side currently holding the bat
    pub fn batting_side(&self) -> Side {
        match self.user_role {
            PlayerRole::Batting => Side::User,
            PlayerRole::Bowling => Side::Computer,
        }
    }

    /// Total runs scored by a side
    pub fn runs_for(&self, side: Side) -> u32 {
        match side {
            Side::User => self.score,
            Side::Computer => self.computer_score,
        }
    }

    /// Side that batted first, once roles are fixed
    pub fn first_batting_side(&self) -> Option<Side> {
        match self.phase {
            MatchPhase::Toss | MatchPhase::TossResult => None,
            MatchPhase::Innings1 | MatchPhase::MidInnings => Some(self.batting_side()),
            MatchPhase::Innings2 | MatchPhase::GameOver => Some(self.batting_side().other()),
        }
    }

    /// Runs the chasing side still needs, during innings 2
    pub fn runs_needed(&self) -> Option<u32> {
        if self.phase != MatchPhase::Innings2 {
            return None;
        }
        let target = self.target?;
        Some(target.saturating_sub(self.runs_for(self.batting_side())))
    }

    /// Turns played in the current innings
    pub fn innings_turns(&self) -> usize {
        let role = self.user_role;
        self.history
            .iter()
            .rev()
            .take_while(|turn| turn.role == role)
            .count()
    }
}
