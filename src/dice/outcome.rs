//! Success counting and verdicts for a d20 pool.

/// Classification of a roll against a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Enough successes with at least one critical die
    Critical,
    /// Enough successes
    Success,
    /// A critical die was rolled but successes fell short
    CritFailure,
    /// Not enough successes
    Failure,
}

/// Evaluated pool of d20 rolls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    /// Individual dice, in roll order
    pub rolls: Vec<u32>,
    /// Target number; rolls at or below it are successes
    pub threshold: Option<u32>,
    /// Number of successes needed
    pub difficulty: Option<u32>,
    /// Sum of all dice
    pub total: u32,
    /// Number of successes, a 1 counting twice
    pub successes: u32,
    /// Whether a 1 was rolled while a threshold was set
    pub critical: bool,
}

impl RollOutcome {
    /// Counts successes for `rolls`.
    ///
    /// Without a threshold there are no successes at all. With one, a roll of
    /// exactly 1 is worth two successes and flags the pool as critical, any
    /// other roll at or below the threshold is worth one.
    pub fn evaluate(rolls: Vec<u32>, threshold: Option<u32>, difficulty: Option<u32>) -> Self {
        let total = rolls.iter().sum();
        let mut successes = 0;
        let mut critical = false;

        if let Some(threshold) = threshold {
            for &roll in &rolls {
                if roll == 1 {
                    successes += 2;
                    critical = true;
                } else if roll <= threshold {
                    successes += 1;
                }
            }
        }

        RollOutcome {
            rolls,
            threshold,
            difficulty,
            total,
            successes,
            critical,
        }
    }

    /// Whether `roll` counts as a success and should be highlighted.
    pub fn is_success(&self, roll: u32) -> bool {
        self.threshold.is_some_and(|threshold| roll <= threshold)
    }

    /// Verdict against the difficulty, `None` when no difficulty was given.
    pub fn verdict(&self) -> Option<Verdict> {
        let difficulty = self.difficulty?;

        let verdict = match (self.successes >= difficulty, self.critical) {
            (true, true) => Verdict::Critical,
            (true, false) => Verdict::Success,
            (false, true) => Verdict::CritFailure,
            (false, false) => Verdict::Failure,
        };
        Some(verdict)
    }
}
