//! Roll command handler.

use log::{debug, info};

use crate::{
    commands::{
        CommandResult, RollRequest,
        markdown_response::{format_roll, format_verdict},
    },
    dice::{Dice, RollOutcome},
};

/// Rolls the requested pool and reports it.
///
/// The first response lists the dice, a second one carries the verdict when
/// the request had a difficulty. The tracker is not touched.
pub fn handle_roll(
    dice: &mut (dyn Dice + Send),
    sender_name: &str,
    request: &RollRequest,
) -> CommandResult {
    debug!("handling roll command {:?}", request);

    let rolls: Vec<u32> = (0..request.count).map(|_| dice.roll_d20()).collect();
    let outcome = RollOutcome::evaluate(rolls, request.threshold, request.difficulty);
    info!(
        "{} rolled {:?}, {} successes",
        sender_name, outcome.rolls, outcome.successes
    );

    let mut responses = vec![format_roll(&outcome, sender_name)];
    responses.extend(format_verdict(&outcome));

    CommandResult::with_responses(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::MockDice;

    fn scripted_dice(rolls: Vec<u32>) -> MockDice {
        let mut dice = MockDice::new();
        let mut rolls = rolls.into_iter();
        dice.expect_roll_d20()
            .returning(move || rolls.next().expect("no more scripted rolls"));
        dice
    }

    #[test]
    fn test_roll_with_verdict() {
        let mut dice = scripted_dice(vec![1, 15, 5]);
        let request = RollRequest {
            count: 3,
            threshold: Some(10),
            difficulty: Some(2),
        };

        let result = handle_roll(&mut dice, "Jessica", &request);

        assert_eq!(
            result.responses,
            vec![
                "Jessica rolled 3d20: [**1**, 15, **5**] Total: 21".to_string(),
                "💥 **CRITICAL** (3 successes >= difficulty 2)".to_string(),
            ]
        );
        assert!(!result.reset_reminder);
    }

    #[test]
    fn test_roll_without_difficulty_has_no_verdict() {
        let mut dice = scripted_dice(vec![7, 12]);
        let request = RollRequest {
            count: 2,
            threshold: Some(10),
            difficulty: None,
        };

        let result = handle_roll(&mut dice, "Gurney", &request);

        assert_eq!(
            result.responses,
            vec!["Gurney rolled 2d20: [**7**, 12] Total: 19".to_string()]
        );
    }

    #[test]
    fn test_roll_zero_dice() {
        let mut dice = MockDice::new();
        dice.expect_roll_d20().never();
        let request = RollRequest {
            count: 0,
            threshold: None,
            difficulty: None,
        };

        let result = handle_roll(&mut dice, "Gurney", &request);

        assert_eq!(
            result.responses,
            vec!["Gurney rolled 0d20: [] Total: 0".to_string()]
        );
    }
}
