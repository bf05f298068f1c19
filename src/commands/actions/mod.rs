//! Command action handlers.
//!
//! Individual handler functions for each bot command. Each handler processes
//! one command and returns a [`CommandResult`](crate::commands::CommandResult).
//!
//! # Handler Pattern
//!
//! Handlers follow a consistent pattern:
//! 1. Receive the tracker (and dice or sender name when needed)
//! 2. Apply the command to the tracker, which persists it
//! 3. Return the Markdown responses, in the order they must be sent
//!
//! # Available Handlers
//!
//! - [`handle_help`] - Display help information
//! - [`handle_roll`] - Roll a pool of d20
//! - [`handle_show`] - Report the scene and counters
//! - [`handle_adjust`] - Add to or use a counter
//! - [`handle_set`] - Set a counter
//! - [`handle_scene_start`] / [`handle_scene_end`] - Scene lifecycle

mod adjust;
mod help;
mod roll;
mod scene;
mod set;
mod show;

pub use crate::commands::actions::{
    adjust::handle_adjust,
    help::handle_help,
    roll::handle_roll,
    scene::{handle_scene_end, handle_scene_start},
    set::handle_set,
    show::handle_show,
};
