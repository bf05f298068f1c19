//! Command parsing.
//!
//! This module converts a message body into a structured [`Command`] enum.
//! Counter keys and numbers are validated here so action handlers only see
//! well-formed commands.

use std::{ops::RangeInclusive, str::FromStr};

use log::debug;

use crate::{commands::CommandParseError, tracker::Counter};

/// Largest pool a single `roll` may ask for.
pub const MAX_DICE: u32 = 100;

/// Accepted threshold values; anything else is ignored.
const THRESHOLD_RANGE: RangeInclusive<i64> = 1..=20;

/// Accepted difficulty values; anything else is ignored.
const DIFFICULTY_RANGE: RangeInclusive<i64> = 0..=5;

/// Arguments of a `roll` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollRequest {
    /// Number of d20 to roll
    pub count: u32,
    /// Target number for successes, in `1..=20`
    pub threshold: Option<u32>,
    /// Successes needed, in `0..=5`
    pub difficulty: Option<u32>,
}

/// Direction of a counter adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// `add`: increase the counter
    Add,
    /// `use`: decrease the counter
    Use,
}

impl Adjustment {
    /// Signed delta for an adjustment of `amount`.
    pub fn delta(&self, amount: i64) -> i64 {
        match self {
            Adjustment::Add => amount,
            Adjustment::Use => -amount,
        }
    }
}

/// Represents a parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Display help information
    Help,
    /// Roll a pool of d20
    Roll(RollRequest),
    /// Show the scene and counters
    ///
    /// The key is kept raw: an unknown key is skipped at execution time while
    /// the scene is still shown.
    Show(Option<String>),
    /// Add to or use a counter
    ///
    /// # Fields
    ///
    /// * `Adjustment` - Add or use
    /// * `Counter` - Adjusted counter
    /// * `i64` - Amount, at least 1
    Adjust(Adjustment, Counter, i64),
    /// Set a counter
    Set(Counter, i64),
    /// Start a scene with the given name
    SceneStart(String),
    /// End the active scene
    SceneEnd,
}

impl Command {
    /// Parses a message body into a Command.
    ///
    /// # Arguments
    ///
    /// * `trigger` - Word the message must start with
    /// * `body` - The message text to parse
    ///
    /// # Errors
    ///
    /// - Message does not start with `trigger` - [`CommandParseError::NotForBot`]
    /// - Unknown command, sub-command or key - [`CommandParseError::Ignored`]
    /// - Non-positive add/use amount, oversized pool - [`CommandParseError::Rejected`]
    /// - Missing or non-numeric required argument - [`CommandParseError::Malformed`]
    pub fn parse(trigger: &str, body: &str) -> Result<Self, CommandParseError> {
        let mut words = body.split_whitespace();

        if words.next() != Some(trigger) {
            return Err(CommandParseError::NotForBot);
        }

        debug!("parsing command: {}", body);

        // The trigger word alone asks for help
        let Some(name) = words.next() else {
            return Ok(Command::Help);
        };
        let args: Vec<&str> = words.collect();

        match name {
            "help" => Ok(Command::Help),
            "roll" => Ok(Command::Roll(Self::parse_roll(&args)?)),
            "show" => Ok(Command::Show(args.first().map(|key| key.to_string()))),
            "add" => Self::parse_adjust(Adjustment::Add, &args),
            "use" => Self::parse_adjust(Adjustment::Use, &args),
            "set" => Self::parse_set(&args),
            "scene" => Self::parse_scene(&args),
            _ => Err(CommandParseError::Ignored(format!(
                "unknown command: {}",
                name
            ))),
        }
    }

    fn parse_roll(args: &[&str]) -> Result<RollRequest, CommandParseError> {
        let count: u32 = parse_number(args.first().copied(), "dice count")?;
        if count > MAX_DICE {
            return Err(CommandParseError::Rejected(format!(
                "cannot roll {} dice, at most {}",
                count, MAX_DICE
            )));
        }

        let threshold = parse_bounded(args.get(1).copied(), "threshold", THRESHOLD_RANGE)?;
        let difficulty = parse_bounded(args.get(2).copied(), "difficulty", DIFFICULTY_RANGE)?;

        debug!(
            "parsed roll command - count: {}, threshold: {:?}, difficulty: {:?}",
            count, threshold, difficulty
        );

        Ok(RollRequest {
            count,
            threshold,
            difficulty,
        })
    }

    fn parse_adjust(adjustment: Adjustment, args: &[&str]) -> Result<Command, CommandParseError> {
        let counter = parse_counter(args.first().copied())?;

        let amount: i64 = match args.get(1).copied() {
            Some(word) => parse_number(Some(word), "amount")?,
            None => 1,
        };
        if amount < 1 {
            return Err(CommandParseError::Rejected(format!(
                "amount must be positive, got {}",
                amount
            )));
        }

        debug!(
            "parsed adjust command - {:?} {} by {}",
            adjustment, counter, amount
        );

        Ok(Command::Adjust(adjustment, counter, amount))
    }

    fn parse_set(args: &[&str]) -> Result<Command, CommandParseError> {
        let counter = parse_counter(args.first().copied())?;
        let value: i64 = parse_number(args.get(1).copied(), "value")?;

        debug!("parsed set command - {} to {}", counter, value);

        Ok(Command::Set(counter, value))
    }

    fn parse_scene(args: &[&str]) -> Result<Command, CommandParseError> {
        match args.first() {
            Some(&"start") => {
                let name = args[1..].join(" ");
                if name.is_empty() {
                    return Err(CommandParseError::Malformed(
                        "missing scene name".to_owned(),
                    ));
                }
                Ok(Command::SceneStart(name))
            }
            Some(&"end") => Ok(Command::SceneEnd),
            Some(other) => Err(CommandParseError::Ignored(format!(
                "unknown scene command: {}",
                other
            ))),
            None => Err(CommandParseError::Malformed(
                "missing scene command".to_owned(),
            )),
        }
    }
}

/// Parses a required number.
fn parse_number<T: FromStr>(word: Option<&str>, what: &str) -> Result<T, CommandParseError> {
    let Some(word) = word else {
        return Err(CommandParseError::Malformed(format!("missing {}", what)));
    };

    word.parse::<T>()
        .map_err(|_| CommandParseError::Malformed(format!("invalid {}: {}", what, word)))
}

/// Parses an optional number, dropping values outside `range`.
fn parse_bounded(
    word: Option<&str>,
    what: &str,
    range: RangeInclusive<i64>,
) -> Result<Option<u32>, CommandParseError> {
    let Some(word) = word else {
        return Ok(None);
    };

    let value: i64 = parse_number(Some(word), what)?;
    if !range.contains(&value) {
        debug!("ignoring {} {} outside {:?}", what, value, range);
        return Ok(None);
    }

    // The range is within u32
    Ok(Some(value as u32))
}

/// Parses a required counter key.
fn parse_counter(word: Option<&str>) -> Result<Counter, CommandParseError> {
    let Some(word) = word else {
        return Err(CommandParseError::Malformed("missing key".to_owned()));
    };

    word.parse::<Counter>().map_err(CommandParseError::Ignored)
}
