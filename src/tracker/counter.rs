//! Counter keys tracked by the bot.

use std::{fmt, str::FromStr};

/// Highest momentum value a `set` can store.
pub const MAX_MOMENTUM: i64 = 6;

/// Cap applied to the result of an `add`/`use` adjustment, before `set` clamps.
pub const MAX_ADJUSTED: i64 = 5;

/// A shared group counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Positive resource of the player group
    Momentum,
    /// Pressure of the opposition
    Threat,
}

impl Counter {
    /// Counters reported by `show` when no key is given, in display order.
    pub const ALL: [Counter; 2] = [Counter::Momentum, Counter::Threat];

    /// Store key of the counter.
    pub fn key(&self) -> &'static str {
        match self {
            Counter::Momentum => "momentum",
            Counter::Threat => "threat",
        }
    }

    /// Clamps a value to the range `set` accepts for this counter.
    ///
    /// Both counters are floored at 0; only momentum has an upper bound.
    pub fn clamp(&self, value: i64) -> i64 {
        let value = value.max(0);
        match self {
            Counter::Momentum => value.min(MAX_MOMENTUM),
            Counter::Threat => value,
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Counter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "momentum" => Ok(Counter::Momentum),
            "threat" => Ok(Counter::Threat),
            _ => Err(format!("unknown key: {}", s)),
        }
    }
}
