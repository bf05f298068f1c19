//! Matrix protocol integration for the bot.
//!
//! The module is structured around the [`MatrixClient`] which coordinates:
//! - **Encryption**: login or restoration, cross-signing and key backup
//! - **Session**: persistence of the login and sync token
//! - **Sync**: invite handling and delivery of room messages

mod client;
mod encryption;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// User credentials for a Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// User ID of the matrix account
    pub user_id: String,
    /// Password of the matrix account
    pub password: String,
    /// Passphrase to recover the matrix account secrets
    pub passphrase: String,
}

/// Message received in a joined room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Raw message text, `None` for non-text messages (images, files, emotes, notices)
    pub body: Option<String>,
    /// Room the message was sent in
    pub room_id: String,
    /// Matrix id of the sender
    pub sender_id: String,
    /// Display name of the sender in the room, the user id when unknown
    pub sender_name: String,
}
