//! Match engine - Core rules of hand cricket
//!
//! Owns the authoritative `MatchState` and is the only place it changes.
//! Every operation validates phase and input first, so a rejected call
//! leaves the match exactly as it was.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::domain::errors::MatchError;
use crate::domain::services::outcome::determine_outcome;
use crate::domain::value_objects::{
    Difficulty, MatchPhase, MatchState, PlayerRole, Side, TossChoice, TurnRecord, MAX_CHOICE,
    MIN_CHOICE,
};
use crate::infrastructure::bot::strategies::{strategy_for, BotStrategy};

/// Role the computer takes whenever it wins the toss
pub const COMPUTER_TOSS_ELECTION: PlayerRole = PlayerRole::Batting;

/// Single-player match against the computer
pub struct MatchEngine<R: RngCore = ChaCha8Rng> {
    state: MatchState,
    rng: R,
    strategy: Box<dyn BotStrategy>,
}

impl MatchEngine<ChaCha8Rng> {
    /// Start a match with an entropy-seeded random source
    pub fn new(player_name: &str, difficulty: Difficulty) -> Result<Self, MatchError> {
        Self::with_rng(player_name, difficulty, ChaCha8Rng::from_entropy())
    }

    /// Start a reproducible match
    pub fn with_seed(player_name: &str, difficulty: Difficulty, seed: u64) -> Result<Self, MatchError> {
        Self::with_rng(player_name, difficulty, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: RngCore> MatchEngine<R> {
    /// Start a match drawing randomness from `rng`
    pub fn with_rng(player_name: &str, difficulty: Difficulty, rng: R) -> Result<Self, MatchError> {
        Self::with_parts(player_name, difficulty, rng, strategy_for(difficulty))
    }

    /// Start a match with both the random source and the opponent injected
    pub fn with_parts(
        player_name: &str,
        difficulty: Difficulty,
        rng: R,
        strategy: Box<dyn BotStrategy>,
    ) -> Result<Self, MatchError> {
        let name = validate_player_name(player_name)?;
        info!(player = %name, difficulty = difficulty.as_str(), "New match");

        Ok(Self {
            state: MatchState::new(name, difficulty),
            rng,
            strategy,
        })
    }

    /// Current snapshot
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn into_state(self) -> MatchState {
        self.state
    }

    /// Flip the coin against the player's call
    ///
    /// The coin is fair and independent of the call. If the computer wins it
    /// elects to bat straight away and innings 1 begins.
    pub fn perform_toss(&mut self, choice: TossChoice) -> Result<MatchState, MatchError> {
        self.require_phase("perform the toss", &[MatchPhase::Toss])?;

        let coin = if self.rng.gen_bool(0.5) {
            TossChoice::Heads
        } else {
            TossChoice::Tails
        };
        let winner = if coin == choice { Side::User } else { Side::Computer };
        self.state.toss_winner = Some(winner);

        info!(call = choice.as_str(), coin = coin.as_str(), ?winner, "Toss resolved");

        match winner {
            Side::User => {
                self.state.phase = MatchPhase::TossResult;
                self.state.message = format!(
                    "It's {}! You won the toss. Bat or bowl?",
                    coin.as_str()
                );
            }
            Side::Computer => {
                self.begin_first_innings(COMPUTER_TOSS_ELECTION.opposite());
                self.state.message = format!(
                    "It's {}. Computer won the toss and elected to bat. You're bowling.",
                    coin.as_str()
                );
            }
        }

        Ok(self.state.clone())
    }

    /// Pick batting or bowling after winning the toss
    pub fn set_role(&mut self, role: PlayerRole) -> Result<MatchState, MatchError> {
        self.require_phase("choose a role", &[MatchPhase::TossResult])?;
        if self.state.toss_winner != Some(Side::User) {
            return Err(MatchError::phase("choose a role", self.state.phase));
        }

        self.begin_first_innings(role);
        self.state.message = match role {
            PlayerRole::Batting => "You chose to bat. Innings 1 underway.".to_string(),
            PlayerRole::Bowling => "You chose to bowl. Innings 1 underway.".to_string(),
        };
        info!(role = role.as_str(), "Role chosen");

        Ok(self.state.clone())
    }

    /// Resolve one turn: the user's number against the computer's
    pub fn play_turn(&mut self, user_number: u8) -> Result<MatchState, MatchError> {
        self.require_phase("play a turn", &[MatchPhase::Innings1, MatchPhase::Innings2])?;
        if self.state.is_out {
            return Err(MatchError::phase("play a turn", self.state.phase));
        }
        validate_choice(user_number)?;

        let ai_number = self.ai_choice();
        let role = self.state.user_role;
        let batting = self.state.batting_side();

        self.state.history.push(TurnRecord {
            user: user_number,
            ai: ai_number,
            role,
        });
        self.state.user_last_choice = Some(user_number);
        self.state.ai_last_choice = Some(ai_number);

        debug!(user = user_number, ai = ai_number, role = role.as_str(), "Turn played");

        if user_number == ai_number {
            self.state.wickets = 1;
            self.state.is_out = true;
            self.end_innings(batting);
            return Ok(self.state.clone());
        }

        let runs = u32::from(match batting {
            Side::User => user_number,
            Side::Computer => ai_number,
        });
        match batting {
            Side::User => {
                self.state.score += runs;
                self.state.message = format!("You scored {}.", runs);
            }
            Side::Computer => {
                self.state.computer_score += runs;
                self.state.message = format!("Computer scored {}.", runs);
            }
        }

        if self.state.phase == MatchPhase::Innings2 {
            if let Some(target) = self.state.target {
                if self.state.runs_for(batting) >= target {
                    info!(?batting, target, "Target reached");
                    self.finish_match();
                }
            }
        }

        Ok(self.state.clone())
    }

    /// Swap roles and begin the chase
    pub fn start_second_innings(&mut self) -> Result<MatchState, MatchError> {
        self.require_phase("start the second innings", &[MatchPhase::MidInnings])?;

        self.state.phase = MatchPhase::Innings2;
        self.state.current_innings = 2;
        self.state.user_role = self.state.user_role.opposite();
        self.state.wickets = 0;
        self.state.is_out = false;
        self.state.user_last_choice = None;
        self.state.ai_last_choice = None;

        let target = self.state.target.unwrap_or_default();
        self.state.message = match self.state.batting_side() {
            Side::User => format!("Innings 2: you need {} to win.", target),
            Side::Computer => format!(
                "Innings 2: defend {}. Computer needs {} to win.",
                target.saturating_sub(1),
                target
            ),
        };
        info!(target, "Second innings started");

        Ok(self.state.clone())
    }

    fn require_phase(&self, operation: &'static str, allowed: &[MatchPhase]) -> Result<(), MatchError> {
        if allowed.contains(&self.state.phase) {
            Ok(())
        } else {
            Err(MatchError::phase(operation, self.state.phase))
        }
    }

    fn begin_first_innings(&mut self, user_role: PlayerRole) {
        self.state.user_role = user_role;
        self.state.phase = MatchPhase::Innings1;
        self.state.current_innings = 1;
        self.state.score = 0;
        self.state.computer_score = 0;
        self.state.wickets = 0;
        self.state.is_out = false;
    }

    fn ai_choice(&mut self) -> u8 {
        let pick = self
            .strategy
            .choose(&self.state.history, self.state.user_role, &mut self.rng);
        if (MIN_CHOICE..=MAX_CHOICE).contains(&pick) {
            pick
        } else {
            warn!(pick, "Strategy returned an out-of-range number, clamping");
            pick.clamp(MIN_CHOICE, MAX_CHOICE)
        }
    }

    fn end_innings(&mut self, batting: Side) {
        let total = self.state.runs_for(batting);

        if self.state.phase == MatchPhase::Innings1 {
            let target = total + 1;
            self.state.target = Some(target);
            self.state.phase = MatchPhase::MidInnings;
            self.state.message = match batting {
                Side::User => format!("OUT! You made {}. Computer needs {} to win.", total, target),
                Side::Computer => {
                    format!("OUT! Computer made {}. You need {} to win.", total, target)
                }
            };
            info!(?batting, total, target, "First innings over");
        } else {
            info!(?batting, total, "Chasing side dismissed");
            self.finish_match();
        }
    }

    fn finish_match(&mut self) {
        self.state.phase = MatchPhase::GameOver;
        match determine_outcome(&self.state) {
            Ok(outcome) => {
                info!(winner = ?outcome.winner, "Match over");
                self.state.message = outcome.headline();
                self.state.outcome = Some(outcome);
            }
            Err(e) => {
                warn!("Match ended without an outcome: {}", e);
                self.state.message = "Match over.".to_string();
            }
        }
    }
}

/// Check a hand number is within 1-6
pub fn validate_choice(number: u8) -> Result<u8, MatchError> {
    if (MIN_CHOICE..=MAX_CHOICE).contains(&number) {
        Ok(number)
    } else {
        Err(MatchError::InvalidInput(format!(
            "{} is not a number from {} to {}",
            number, MIN_CHOICE, MAX_CHOICE
        )))
    }
}

/// Trim a player name and reject empty ones
pub fn validate_player_name(name: &str) -> Result<String, MatchError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MatchError::InvalidInput("Player name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Parse a raw hand number typed by the player
pub fn parse_choice(raw: &str) -> Result<u8, MatchError> {
    let number: u8 = raw
        .trim()
        .parse()
        .map_err(|_| MatchError::InvalidInput(format!("'{}' is not a number from 1 to 6", raw.trim())))?;
    validate_choice(number)
}

pub fn parse_toss_choice(raw: &str) -> Result<TossChoice, MatchError> {
    TossChoice::from_str(raw)
        .ok_or_else(|| MatchError::InvalidInput(format!("'{}' is not heads or tails", raw.trim())))
}

pub fn parse_role(raw: &str) -> Result<PlayerRole, MatchError> {
    PlayerRole::from_str(raw)
        .ok_or_else(|| MatchError::InvalidInput(format!("'{}' is not bat or bowl", raw.trim())))
}

pub fn parse_difficulty(raw: &str) -> Result<Difficulty, MatchError> {
    Difficulty::from_str(raw).ok_or_else(|| {
        MatchError::InvalidInput(format!("'{}' is not easy, medium or hard", raw.trim()))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::RngCore;

    use crate::domain::value_objects::{PlayerRole, TurnRecord};
    use crate::infrastructure::bot::strategies::BotStrategy;

    /// Plays a fixed sequence of numbers, one per turn of the match
    pub struct ScriptedStrategy(pub Vec<u8>);

    impl BotStrategy for ScriptedStrategy {
        fn choose(&self, history: &[TurnRecord], _user_role: PlayerRole, _rng: &mut dyn RngCore) -> u8 {
            self.0[history.len() % self.0.len()]
        }
    }
}
