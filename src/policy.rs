use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::deck::Card;
use crate::mastery::MIN_SCORE;

/// Chance that a card with `score` is admitted in a single sweep: `1 / max(score, 1)`.
pub fn admission_probability(score: u32) -> f64 {
    1.0 / f64::from(score.max(MIN_SCORE))
}

/// Indices of `cards` in review order: ascending score, ties in deck order.
pub fn review_order(cards: &[Card]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..cards.len()).collect();
    // stable: equal scores stay in deck order
    order.sort_by_key(|&i| cards[i].score);
    order
}

/// Probabilistic admission test behind each sweep.
///
/// Higher boxes are admitted less often, so mastered cards come up rarely without any
/// due dates. The random source is injected so sessions can be replayed from a seed.
#[derive(Debug, Clone)]
pub struct ReviewPolicy<R = StdRng> {
    rng: R,
}

impl ReviewPolicy<StdRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> ReviewPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Draws `u` in `[0, 1)` and admits the card iff `u < 1 / max(score, 1)`.
    pub fn should_review(&mut self, score: u32) -> bool {
        let draw: f64 = self.rng.random();
        let admitted = draw < admission_probability(score);
        debug!("score {score}: draw {draw:.3}, admitted {admitted}");
        admitted
    }
}
