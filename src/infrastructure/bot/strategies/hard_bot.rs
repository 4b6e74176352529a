//! Hard bot strategy
//!
//! Adaptive frequency matcher. Tracks which numbers the user favours in
//! their current role and leans on that habit: mirroring it when the user
//! bats (a match is a dismissal), steering clear of it when the computer bats.

use rand::RngCore;

use super::{pick_counts, sample_weighted, BotStrategy};
use crate::domain::value_objects::{PlayerRole, TurnRecord, MAX_CHOICE};

/// How many of the user's latest same-role picks the hard bot studies
const RECENT_WINDOW: usize = 10;
/// Extra weight per sighting when hunting a dismissal
const MIRROR_FACTOR: u32 = 3;

/// Hard difficulty bot strategy
pub struct HardBotStrategy;

impl HardBotStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Per-number weights, indexed by number - 1
    pub fn weights(history: &[TurnRecord], user_role: PlayerRole) -> [u32; MAX_CHOICE as usize] {
        let counts = pick_counts(
            history
                .iter()
                .rev()
                .filter(|turn| turn.role == user_role)
                .take(RECENT_WINDOW)
                .map(|turn| turn.user),
        );

        match user_role {
            // Computer bowls: show what the user shows
            PlayerRole::Batting => counts.map(|count| 1 + MIRROR_FACTOR * count),
            // Computer bats: avoid what the user is likely to bowl
            PlayerRole::Bowling => {
                let most = counts.iter().copied().max().unwrap_or(0);
                counts.map(|count| 1 + (most - count))
            }
        }
    }
}

impl Default for HardBotStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl BotStrategy for HardBotStrategy {
    fn choose(&self, history: &[TurnRecord], user_role: PlayerRole, rng: &mut dyn RngCore) -> u8 {
        sample_weighted(&Self::weights(history, user_role), rng)
    }
}
