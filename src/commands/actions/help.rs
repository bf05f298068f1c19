//! Help command handler.
//!
//! This is a stateless command that always returns the same help message.

use log::debug;

use crate::commands::{CommandResult, markdown_response::format_help};

/// Returns formatted help information about available commands.
pub fn handle_help(trigger: &str) -> CommandResult {
    debug!("handling help command");

    CommandResult::with_responses(vec![format_help(trigger)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_help() {
        let result = handle_help("dune");

        assert_eq!(result.responses.len(), 1);
        assert!(result.responses[0].contains("dune roll"));
        assert!(!result.reset_reminder);
    }
}
