//! Show command handler.
//!
//! Reports the active scene and the requested counters. Running it counts
//! as an acknowledgement for the reminder, so the result asks for a reset.

use log::{debug, warn};

use crate::{
    commands::{
        CommandResult,
        markdown_response::{format_counter, format_current_scene},
    },
    tracker::{Counter, Tracker},
};

/// Builds the status lines for `key`, or for every counter when `None`.
///
/// An unknown key is skipped; the scene line is still reported.
pub fn handle_show(tracker: &Tracker, key: Option<&str>) -> CommandResult {
    debug!("handling show command for {:?}", key);

    let mut responses = Vec::new();

    if let Some(scene) = tracker.scene() {
        responses.push(format_current_scene(scene));
    }

    let counters = match key {
        None => Counter::ALL.to_vec(),
        Some(key) => match key.parse::<Counter>() {
            Ok(counter) => vec![counter],
            Err(e) => {
                warn!("show skipped: {}", e);
                Vec::new()
            }
        },
    };

    for counter in counters {
        responses.push(format_counter(counter, tracker.counter(counter)));
    }

    CommandResult {
        responses,
        reset_reminder: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::create_test_tracker;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_show_all_without_scene() {
        let dir = TempDir::new().unwrap();
        let tracker = create_test_tracker(&dir).await;

        let result = handle_show(&tracker, None);

        assert_eq!(
            result.responses,
            vec!["momentum is 0".to_string(), "threat is 0".to_string()]
        );
        assert!(result.reset_reminder);
    }

    #[tokio::test]
    async fn test_show_single_key_with_scene() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;
        tracker.start_scene("Arrakeen").await.unwrap();
        tracker.set_counter(Counter::Threat, 3).await.unwrap();

        let result = handle_show(&tracker, Some("threat"));

        assert_eq!(
            result.responses,
            vec![
                "Current scene is: **Arrakeen**".to_string(),
                "threat is 3".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_show_unknown_key_only_reports_scene() {
        let dir = TempDir::new().unwrap();
        let mut tracker = create_test_tracker(&dir).await;
        tracker.start_scene("Arrakeen").await.unwrap();

        let result = handle_show(&tracker, Some("spice"));

        assert_eq!(
            result.responses,
            vec!["Current scene is: **Arrakeen**".to_string()]
        );
        assert!(result.reset_reminder);
    }

    #[tokio::test]
    async fn test_show_unknown_key_without_scene_is_empty() {
        let dir = TempDir::new().unwrap();
        let tracker = create_test_tracker(&dir).await;

        let result = handle_show(&tracker, Some("spice"));

        assert!(result.responses.is_empty());
        assert!(result.reset_reminder);
    }
}
