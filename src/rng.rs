use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random decision in the game: encounter rolls, enemy move
/// picks, capture checks and loot drops. Tests script the exact rolls; the
/// game uses a seedable generator.
#[derive(Debug, Clone)]
pub struct GameRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<f64>, index: usize },
    Generated(StdRng),
}

impl GameRng {
    /// Replays `outcomes` in order. Each value must lie in [0, 1).
    pub fn new_for_test(outcomes: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Generated(StdRng::from_os_rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Generated(StdRng::seed_from_u64(seed)),
        }
    }

    /// Uniform roll in [0, 1).
    pub fn next_roll(&mut self, reason: &str) -> f64 {
        let roll = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "GameRng exhausted! Tried to get a value for: '{}'. Need more scripted values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
            RngSource::Generated(rng) => rng.random::<f64>(),
        };
        trace!("[RNG] Consumed {:.3} for: {}", roll, reason);
        roll
    }

    /// True with the given probability.
    pub fn chance(&mut self, probability: f64, reason: &str) -> bool {
        self.next_roll(reason) < probability
    }

    /// Uniform index into a collection of `len` elements (`len > 0`).
    pub fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        let roll = self.next_roll(reason);
        ((roll * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform pick from a slice; None for an empty slice, which consumes
    /// no roll.
    pub fn pick<'a, T>(&mut self, items: &'a [T], reason: &str) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.pick_index(items.len(), reason);
        items.get(index)
    }
}
