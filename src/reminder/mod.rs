//! Periodic status reminder.
//!
//! The [`Reminder`] nudges the room with the current status when the table
//! has gone quiet. It combines a debounce (no fire until the room has been
//! quiet for `message_wait_time`) with a rate limit (no more than one fire per
//! `reset_wait_time`). Showing the status by hand restarts the rate limit window.

mod periodic;

pub use crate::reminder::periodic::Reminder;
