//! Set command handler.

use log::debug;

use crate::{
    commands::{CommandResult, markdown_response::format_counter_change},
    tracker::{Counter, Tracker},
};

/// Sets a counter, clamped to its range.
///
/// # Errors
///
/// Returns an error if the store could not be persisted.
pub async fn handle_set(
    tracker: &mut Tracker,
    counter: Counter,
    value: i64,
) -> Result<CommandResult, anyhow::Error> {
    debug!("handling set {} {}", counter, value);

    let change = tracker.set_counter(counter, value).await?;

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
    async fn test_set_momentum_clamped() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;
        tracker.set_counter(Counter::Momentum, 2).await.unwrap();

        let result = handle_set(&mut tracker, Counter::Momentum, 9).await.unwrap();

        assert_eq!(result.responses, vec!["momentum is now 6 (was 2)".to_string()]);
    }

    #[tokio::test]
    async fn test_set_threat_above_six() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;

        let result = handle_set(&mut tracker, Counter::Threat, 12).await.unwrap();

        assert_eq!(result.responses, vec!["threat is now 12 (was 0)".to_string()]);
        assert_eq!(tracker.counter(Counter::Threat), 12);
    }
}
