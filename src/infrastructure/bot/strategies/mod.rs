//! Bot strategies module
//!
//! Contains the computer opponent's number-picking strategies, one per difficulty.

mod easy_bot;
mod hard_bot;
mod medium_bot;

pub use easy_bot::*;
pub use hard_bot::*;
pub use medium_bot::*;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::domain::value_objects::{Difficulty, PlayerRole, TurnRecord, MAX_CHOICE, MIN_CHOICE};

/// Bot strategy trait
///
/// A strategy sees only the match history, the user's current role and a
/// random source. It keeps no state of its own between calls.
pub trait BotStrategy: Send + Sync {
    /// Pick the computer's number (1-6) for the upcoming turn
    fn choose(&self, history: &[TurnRecord], user_role: PlayerRole, rng: &mut dyn RngCore) -> u8;
}

/// Build the strategy for a difficulty tier
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn BotStrategy> {
    match difficulty {
        Difficulty::Easy => Box::new(EasyBotStrategy::new()),
        Difficulty::Medium => Box::new(MediumBotStrategy::new()),
        Difficulty::Hard => Box::new(HardBotStrategy::new()),
    }
}

/// Pick the computer's number for a difficulty without keeping a strategy around
pub fn choose(
    difficulty: Difficulty,
    history: &[TurnRecord],
    user_role: PlayerRole,
    rng: &mut dyn RngCore,
) -> u8 {
    strategy_for(difficulty).choose(history, user_role, rng)
}

/// How often each number appears among the given picks, indexed by number - 1
pub(crate) fn pick_counts<I>(picks: I) -> [u32; MAX_CHOICE as usize]
where
    I: IntoIterator<Item = u8>,
{
    let mut counts = [0u32; MAX_CHOICE as usize];
    for pick in picks {
        if (MIN_CHOICE..=MAX_CHOICE).contains(&pick) {
            counts[(pick - 1) as usize] += 1;
        }
    }
    counts
}

/// Sample a number from per-number weights, indexed by number - 1
///
/// Weights are floored at 1 so no number is ever excluded.
pub(crate) fn sample_weighted(weights: &[u32; MAX_CHOICE as usize], rng: &mut dyn RngCore) -> u8 {
    let floored = weights.map(|w| w.max(1));
    match WeightedIndex::new(floored) {
        Ok(dist) => dist.sample(rng) as u8 + MIN_CHOICE,
        // Unreachable with floored weights, fall back to uniform
        Err(_) => rng.gen_range(MIN_CHOICE..=MAX_CHOICE),
    }
}


#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::test_support::{histogram, repeated};
    use super::*;

    #[test]
    fn test_every_tier_reaches_every_number() {
        let histories = [
            Vec::new(),
            repeated(4, 12, PlayerRole::Batting),
            repeated(2, 12, PlayerRole::Bowling),
        ];

        for difficulty in Difficulty::ALL {
            let strategy = strategy_for(difficulty);
            for history in &histories {
                for role in [PlayerRole::Batting, PlayerRole::Bowling] {
                    let counts = histogram(strategy.as_ref(), history, role, 3000);
                    assert!(
                        counts.iter().all(|&c| c > 0),
                        "{:?} excluded a number: {:?}",
                        difficulty,
                        counts
                    );
                }
            }
        }
    }

    #[test]
    fn test_choose_is_reproducible_from_inputs() {
        let history = repeated(3, 6, PlayerRole::Batting);

        for difficulty in Difficulty::ALL {
            let mut rng_a = ChaCha8Rng::seed_from_u64(99);
            let mut rng_b = ChaCha8Rng::seed_from_u64(99);
            let picks_a: Vec<u8> = (0..20)
                .map(|_| choose(difficulty, &history, PlayerRole::Batting, &mut rng_a))
                .collect();
            let picks_b: Vec<u8> = (0..20)
                .map(|_| choose(difficulty, &history, PlayerRole::Batting, &mut rng_b))
                .collect();
            assert_eq!(picks_a, picks_b);
        }
    }

    #[test]
    fn test_pick_counts_ignores_out_of_range() {
        let counts = pick_counts([1, 1, 6, 0, 7]);
        assert_eq!(counts, [2, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_sample_weighted_floors_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let weights = [0, 0, 0, 0, 0, 100];
        let mut saw_other = false;
        for _ in 0..5000 {
            if sample_weighted(&weights, &mut rng) != 6 {
                saw_other = true;
            }
        }
        assert!(saw_other);
    }
}
