//! Easy bot strategy
//!
//! Picks uniformly at random and ignores the match history.

use rand::{Rng, RngCore};

use super::BotStrategy;
use crate::domain::value_objects::{PlayerRole, TurnRecord, MAX_CHOICE, MIN_CHOICE};

/// Easy difficulty bot strategy
pub struct EasyBotStrategy;

impl EasyBotStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EasyBotStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for EasyBotStrategy {
    fn choose(&self, _history: &[TurnRecord], _user_role: PlayerRole, rng: &mut dyn RngCore) -> u8 {
        rng.gen_range(MIN_CHOICE..=MAX_CHOICE)
    }
}
