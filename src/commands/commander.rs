//! Command orchestration and execution.
//!
//! This module provides the [`Commander`] struct, which serves as the main entry point
//! for processing bot commands. It coordinates command parsing and execution, routing
//! commands to their appropriate handlers.
//!
//! # Flow
//!
//! ```text
//! Matrix Message → parse() → Command → execute() → CommandResult
//! ```

use crate::{
    commands::{
        CommandContext, CommandParseError, CommandResult,
        actions::{
            handle_adjust, handle_help, handle_roll, handle_scene_end, handle_scene_start,
            handle_set, handle_show,
        },
        command::Command,
        markdown_response::format_ready,
    },
    tracker::Tracker,
};

/// Command orchestrator for parsing and executing bot commands.
///
/// # Trigger Word
///
/// All commands must start with the trigger word. Messages without it
/// are silently ignored (returning [`CommandParseError::NotForBot`]).
pub struct Commander {
    /// Word every command starts with
    trigger: String,
}

impl Commander {
    /// Creates a new Commander answering to `trigger`.
    pub fn new(trigger: &str) -> Self {
        Commander {
            trigger: trigger.to_owned(),
        }
    }

    /// Parses a Matrix message body into a structured command.
    ///
    /// See [`Command::parse`] for the error cases.
    pub fn parse(&self, body: &str) -> Result<Command, CommandParseError> {
        Command::parse(&self.trigger, body)
    }

    /// Executes a parsed command and returns the result.
    ///
    /// # Command Handlers
    ///
    /// - [`Command::Help`] → [`handle_help`]
    /// - [`Command::Roll`] → [`handle_roll`]
    /// - [`Command::Show`] → [`handle_show`]
    /// - [`Command::Adjust`] → [`handle_adjust`]
    /// - [`Command::Set`] → [`handle_set`]
    /// - [`Command::SceneStart`] → [`handle_scene_start`]
    /// - [`Command::SceneEnd`] → [`handle_scene_end`]
    ///
    /// # Errors
    ///
    /// Returns an error if a tracker update could not be persisted.
    pub async fn execute(
        &self,
        command: &Command,
        context: CommandContext<'_>,
    ) -> Result<CommandResult, anyhow::Error> {
        let CommandContext {
            tracker,
            dice,
            sender_name,
        } = context;

        let result = match command {
            Command::Help => handle_help(&self.trigger),
            Command::Roll(request) => handle_roll(dice, sender_name, request),
            Command::Show(key) => handle_show(tracker, key.as_deref()),
            Command::Adjust(adjustment, counter, amount) => {
                handle_adjust(tracker, *adjustment, *counter, *amount).await?
            }
            Command::Set(counter, value) => handle_set(tracker, *counter, *value).await?,
            Command::SceneStart(name) => handle_scene_start(tracker, name).await?,
            Command::SceneEnd => handle_scene_end(tracker).await?,
        };

        Ok(result)
    }

    /// Status messages sent by the periodic reminder.
    ///
    /// Same content as a `show` without key.
    pub fn get_status_messages(tracker: &Tracker) -> Vec<String> {
        handle_show(tracker, None).responses
    }

    /// Announcement sent once the bot is connected.
    pub fn get_ready_message(&self) -> String {
        format_ready(&self.trigger)
    }
}
