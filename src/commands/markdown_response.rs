//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Markdown format
//! for display in the Matrix room.

use crate::{
    dice::{RollOutcome, Verdict},
    tracker::{Counter, CounterChange},
};

/// Formats the help message showing available bot commands.
///
/// # Arguments
///
/// * `trigger` - Word commands start with
pub fn format_help(trigger: &str) -> String {
    format!(
        "Available commands:\n\
        - `{t} help`: show this message\n\
        - `{t} roll <n> [threshold] [difficulty]`: roll n d20, threshold and difficulty are optional\n\
        - `{t} show [momentum|threat]`: show current group values\n\
        - `{t} add|use <momentum|threat> [n]`: increase/decrease momentum or threat by n, default is 1\n\
        - `{t} set <momentum|threat> <n>`: set momentum or threat to n\n\
        - `{t} scene start <name>`: start a new scene\n\
        - `{t} scene end`: end the scene, lose one momentum",
        t = trigger
    )
}

/// Formats the announcement sent once the bot is connected.
pub fn format_ready(trigger: &str) -> String {
    format!(
        "Dune RPG Helper is ready to help! type '{} help' to see available commands",
        trigger
    )
}

/// Formats the list of dice of a roll, with successes in bold.
///
/// ```text
/// Paul rolled 3d20: [**1**, 15, **5**] Total: 21
/// ```
pub fn format_roll(outcome: &RollOutcome, sender_name: &str) -> String {
    let rolls = outcome
        .rolls
        .iter()
        .map(|&roll| match outcome.is_success(roll) {
            true => format!("**{}**", roll),
            false => roll.to_string(),
        })
        .collect::<Vec<String>>()
        .join(", ");

    format!(
        "{} rolled {}d20: [{}] Total: {}",
        sender_name,
        outcome.rolls.len(),
        rolls,
        outcome.total
    )
}

/// Formats the verdict of a roll, `None` when the roll had no difficulty.
pub fn format_verdict(outcome: &RollOutcome) -> Option<String> {
    let verdict = outcome.verdict()?;
    let difficulty = outcome.difficulty?;
    let successes = outcome.successes;

    let message = match verdict {
        Verdict::Critical => format!(
            "💥 **CRITICAL** ({} successes >= difficulty {})",
            successes, difficulty
        ),
        Verdict::Success => format!(
            "✅ **SUCCESS** ({} successes >= difficulty {})",
            successes, difficulty
        ),
        Verdict::CritFailure => format!(
            "🤔 **CRIT?** ({} successes < difficulty {})",
            successes, difficulty
        ),
        Verdict::Failure => format!(
            "❌ **FAILURE** ({} successes < difficulty {})",
            successes, difficulty
        ),
    };
    Some(message)
}

/// Formats the active scene line of the status.
pub fn format_current_scene(name: &str) -> String {
    format!("Current scene is: **{}**", name)
}

/// Formats the value of a counter.
pub fn format_counter(counter: Counter, value: i64) -> String {
    format!("{} is {}", counter, value)
}

/// Formats a counter update with its previous value.
pub fn format_counter_change(change: &CounterChange) -> String {
    format!(
        "{} is now {} (was {})",
        change.counter, change.current, change.previous
    )
}

/// Formats the start of a scene.
pub fn format_scene_started(name: &str) -> String {
    format!("Starting scene: **{}**", name)
}

/// Formats the end of a scene.
pub fn format_scene_ended(name: &str) -> String {
    format!("Ending scene: **{}**", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_help() {
        let help = format_help("dune");
        assert!(help.starts_with("Available commands:"));
        for command in [
            "dune help",
            "dune roll",
            "dune show",
            "dune add|use",
            "dune set",
            "dune scene start",
            "dune scene end",
        ] {
            assert!(help.contains(command), "missing {}", command);
        }
    }

    #[test]
    fn test_format_ready() {
        assert_eq!(
            format_ready("dune"),
            "Dune RPG Helper is ready to help! type 'dune help' to see available commands"
        );
    }

    #[test]
    fn test_format_roll_bolds_successes() {
        let outcome = RollOutcome::evaluate(vec![1, 15, 5], Some(10), Some(2));
        assert_eq!(
            format_roll(&outcome, "Chani"),
            "Chani rolled 3d20: [**1**, 15, **5**] Total: 21"
        );
    }

    #[test]
    fn test_format_roll_without_threshold() {
        let outcome = RollOutcome::evaluate(vec![1, 20], None, None);
        assert_eq!(
            format_roll(&outcome, "Stilgar"),
            "Stilgar rolled 2d20: [1, 20] Total: 21"
        );
    }

    #[test]
    fn test_format_roll_empty_pool() {
        let outcome = RollOutcome::evaluate(vec![], None, None);
        assert_eq!(
            format_roll(&outcome, "Stilgar"),
            "Stilgar rolled 0d20: [] Total: 0"
        );
    }

    #[test]
    fn test_format_verdicts() {
        let critical = RollOutcome::evaluate(vec![1, 15, 5], Some(10), Some(2));
        assert_eq!(
            format_verdict(&critical).unwrap(),
            "💥 **CRITICAL** (3 successes >= difficulty 2)"
        );

        let success = RollOutcome::evaluate(vec![4], Some(10), Some(1));
        assert_eq!(
            format_verdict(&success).unwrap(),
            "✅ **SUCCESS** (1 successes >= difficulty 1)"
        );

        let crit_failure = RollOutcome::evaluate(vec![1], Some(10), Some(3));
        assert_eq!(
            format_verdict(&crit_failure).unwrap(),
            "🤔 **CRIT?** (2 successes < difficulty 3)"
        );

        let failure = RollOutcome::evaluate(vec![18], Some(10), Some(1));
        assert_eq!(
            format_verdict(&failure).unwrap(),
            "❌ **FAILURE** (0 successes < difficulty 1)"
        );
    }

    #[test]
    fn test_format_verdict_without_difficulty() {
        let outcome = RollOutcome::evaluate(vec![1], Some(10), None);
        assert!(format_verdict(&outcome).is_none());
    }

    #[test]
    fn test_format_status_lines() {
        assert_eq!(
            format_current_scene("Sietch Council"),
            "Current scene is: **Sietch Council**"
        );
        assert_eq!(format_counter(Counter::Threat, 4), "threat is 4");
    }

    #[test]
    fn test_format_counter_change() {
        let change = CounterChange {
            counter: Counter::Momentum,
            previous: 2,
            current: 6,
        };
        assert_eq!(format_counter_change(&change), "momentum is now 6 (was 2)");
    }

    #[test]
    fn test_format_scene_lines() {
        assert_eq!(format_scene_started("A"), "Starting scene: **A**");
        assert_eq!(format_scene_ended("A"), "Ending scene: **A**");
    }
}
