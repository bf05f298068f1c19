//! Add and use command handler.

use log::debug;

use crate::{
    commands::{Adjustment, CommandResult, markdown_response::format_counter_change},
    tracker::{Counter, Tracker},
};

/// Adds `amount` to, or uses `amount` of, a counter.
///
/// # Errors
///
/// Returns an error if the store could not be persisted.
pub async fn handle_adjust(
    tracker: &mut Tracker,
    adjustment: Adjustment,
    counter: Counter,
    amount: i64,
) -> Result<CommandResult, anyhow::Error> {
    debug!("handling {:?} {} {}", adjustment, counter, amount);

    let change = tracker
        .adjust_counter(counter, adjustment.delta(amount))
        .await?;

    Ok(CommandResult::with_responses(vec![format_counter_change(
        &change,
    )]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::create_test_tracker;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_momentum() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;

        let result = handle_adjust(&mut tracker, Adjustment::Add, Counter::Momentum, 2)
            .await
            .unwrap();

        assert_eq!(result.responses, vec!["momentum is now 2 (was 0)".to_string()]);
        assert_eq!(tracker.counter(Counter::Momentum), 2);
    }

    #[tokio::test]
    async fn test_add_caps_at_five() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;
        tracker.set_counter(Counter::Threat, 4).await.unwrap();

        let result = handle_adjust(&mut tracker, Adjustment::Add, Counter::Threat, 3)
            .await
            .unwrap();

        assert_eq!(result.responses, vec!["threat is now 5 (was 4)".to_string()]);
    }

    #[tokio::test]
    async fn test_use_floors_at_zero() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;
        tracker.set_counter(Counter::Threat, 1).await.unwrap();

        let result = handle_adjust(&mut tracker, Adjustment::Use, Counter::Threat, 4)
            .await
            .unwrap();

        assert_eq!(result.responses, vec!["threat is now 0 (was 1)".to_string()]);
        assert!(!result.reset_reminder);
    }
}
