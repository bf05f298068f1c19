//! Sources of d20 rolls.

use mockall::automock;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Number of faces of the rolled dice.
pub const D20_FACES: u32 = 20;

/// Source of d20 rolls.
///
/// This trait abstracts the randomness so rolls can be scripted in tests.
#[automock]
pub trait Dice {
    /// Rolls one uniform d20, in `1..=20`.
    fn roll_d20(&mut self) -> u32;
}

/// Dice backed by an OS-seeded [`StdRng`].
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Creates dice seeded from the operating system.
    pub fn new() -> Self {
        RandomDice {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll_d20(&mut self) -> u32 {
        self.rng.gen_range(1..=D20_FACES)
    }
}
