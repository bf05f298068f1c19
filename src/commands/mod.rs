//! Bot command parsing and execution.
//!
//! This module turns room messages into tracker updates and Markdown replies.
//!
//! # Overview
//!
//! 1. **Parsing** - [`Commander::parse`] turns a message body into a [`Command`]
//! 2. **Execution** - [`Commander::execute`] routes the command to its action handler
//! 3. **Response** - handlers return a [`CommandResult`] with the messages to send
//!
//! ```text
//! Room message
//!      │
//!      ▼
//! ┌─────────────┐
//! │  Commander  │  ← parse() + execute()
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────────────────┐
//! │ Action Handlers         │
//! │  - handle_help          │
//! │  - handle_roll          │
//! │  - handle_show          │
//! │  - handle_adjust        │
//! │  - handle_set           │
//! │  - handle_scene_start   │
//! │  - handle_scene_end     │
//! └─────────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │  CommandResult     │
//! │  - responses (MD)  │
//! │  - reminder reset  │
//! └────────────────────┘
//! ```
//!
//! # Command Structure
//!
//! All commands follow the format: `<trigger> <subcommand> [args...]`, the
//! trigger word being `dune` by default.
//!
//! | Command | Arguments | Description |
//! |---------|-----------|-------------|
//! | `help` | None | Display help information |
//! | `roll` | `<n> [threshold] [difficulty]` | Roll n d20 |
//! | `show` | `[momentum\|threat]` | Show the scene and counters |
//! | `add` / `use` | `<momentum\|threat> [n]` | Increase / decrease a counter |
//! | `set` | `<momentum\|threat> <n>` | Set a counter |
//! | `scene start` | `<name...>` | Start a scene, ending the active one |
//! | `scene end` | None | End the scene, spending one momentum |
//!
//! # Error Handling
//!
//! No parse error produces a reply. [`CommandParseError`] only tells the
//! caller how loudly to log the dropped message.

mod actions;
mod command;
mod commander;
mod markdown_response;

pub use crate::commands::{
    command::{Adjustment, Command, RollRequest},
    commander::Commander,
};

use crate::{dice::Dice, tracker::Tracker};

/// Runtime context for command execution.
///
/// # Fields
///
/// * `tracker` - Tracker state, locked for the duration of the command
/// * `dice` - Source of d20 rolls
/// * `sender_name` - Display name of the user who sent the command
pub struct CommandContext<'a> {
    /// Tracker state
    pub tracker: &'a mut Tracker,
    /// Dice used by the `roll` command
    pub dice: &'a mut (dyn Dice + Send),
    /// Display name of the command issuer
    pub sender_name: &'a str,
}

/// Result of command execution.
///
/// Handlers apply their tracker changes themselves; what is left for the
/// caller is sending the responses and resetting the reminder.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// Markdown messages to send to the room, in order
    pub responses: Vec<String>,
    /// Whether the periodic reminder should restart its window
    pub reset_reminder: bool,
}

impl CommandResult {
    /// Result made of the given responses, without reminder reset.
    pub fn with_responses(responses: Vec<String>) -> Self {
        CommandResult {
            responses,
            reset_reminder: false,
        }
    }
}

/// Errors that can occur during command parsing.
///
/// None of them is reported to the user; each one stops the processing of
/// the message.
///
/// # Variants
///
/// * `NotForBot` - Message does not start with the trigger word.
/// * `Ignored` - Unknown command, sub-command or counter key.
/// * `Rejected` - Well-formed but refused input, such as a non-positive count.
/// * `Malformed` - A required argument is missing or not a number.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandParseError {
    /// Message is not for this bot
    NotForBot,
    /// Message is for the bot but names nothing it knows
    Ignored(String),
    /// Input refused without state change
    Rejected(String),
    /// Missing or invalid required argument
    Malformed(String),
}
