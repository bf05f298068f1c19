//! Dice rolling for the `roll` command.
//!
//! - [`Dice`]: source of d20 rolls ([`RandomDice`] in production, `MockDice` in tests)
//! - [`RollOutcome`]: success counting and [`Verdict`] for a pool of rolls

mod outcome;
mod roller;

pub use crate::dice::{
    outcome::{RollOutcome, Verdict},
    roller::{D20_FACES, Dice, RandomDice},
};

#[cfg(test)]
pub use crate::dice::roller::MockDice;
