//! Medium bot strategy
//!
//! Weighted random picks that shy away from numbers the user has been
//! repeating, which cuts down on accidental dismissals.

use rand::RngCore;

use super::{pick_counts, sample_weighted, BotStrategy};
use crate::domain::value_objects::{PlayerRole, TurnRecord, MAX_CHOICE};

/// How many of the user's latest picks the medium bot looks at
const RECENT_WINDOW: usize = 5;
/// Starting weight of every number
const BASE_WEIGHT: u32 = 4;

/// Medium difficulty bot strategy
pub struct MediumBotStrategy;

impl MediumBotStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Per-number weights, indexed by number - 1
    pub fn weights(history: &[TurnRecord]) -> [u32; MAX_CHOICE as usize] {
        let recent = pick_counts(history.iter().rev().take(RECENT_WINDOW).map(|t| t.user));
        recent.map(|count| BASE_WEIGHT.saturating_sub(count).max(1))
    }
}

impl Default for MediumBotStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for MediumBotStrategy {
    fn choose(&self, history: &[TurnRecord], _user_role: PlayerRole, rng: &mut dyn RngCore) -> u8 {
        sample_weighted(&Self::weights(history), rng)
    }
}
