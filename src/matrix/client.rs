//! Matrix client wrapper for bot messaging and synchronization.

use std::path::Path;

use anyhow::anyhow;
use log::{error, info};
use matrix_sdk::{
    Client,
    ruma::{RoomId, events::room::message::RoomMessageEventContent},
};

use crate::matrix::{
    IncomingMessage, UserCredentials, encryption::connect, session::SessionStore,
    sync::MatrixSync,
};

/// Display name of the bot account.
const DISPLAY_NAME: &str = "Dune RPG Helper";

/// High-level Matrix client for bot messaging operations.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Creates a logged in client with encryption ready.
    ///
    /// The login is restored from `session_dir` when possible, otherwise the
    /// bot logs in with its password and saves the new session there.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be used or the
    /// login and encryption setup fail.
    pub async fn new(
        credentials: &UserCredentials,
        session_dir: impl AsRef<Path>,
    ) -> Result<Self, anyhow::Error> {
        let sessions = SessionStore::open(session_dir).await?;
        let client = connect(credentials, &sessions).await?;

        client.account().set_display_name(Some(DISPLAY_NAME)).await?;

        let matrix_sync = MatrixSync::new(&client, &sessions);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// `on_ready` runs once the bot has caught up with the server, then
    /// `on_message` receives every new message. Never returns under
    /// normal operation.
    pub async fn sync<R, F>(&self, on_ready: R, on_message: F)
    where
        R: FnOnce(),
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        match self.matrix_sync.sync(on_ready, on_message).await {
            Ok(_) => info!("matrix sync ended successfully"),
            Err(e) => error!("matrix sync ended with error: {:?}", e),
        }
    }

    /// Sends a Markdown message to a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room id is invalid, the bot is not in the room,
    /// or the server refuses the message.
    pub async fn send_message(&self, room_id: &str, body: &str) -> Result<(), anyhow::Error> {
        let room_id = RoomId::parse(room_id)?;
        let room = self
            .client
            .get_room(&room_id)
            .ok_or_else(|| anyhow!("bot is not in room {}", room_id))?;

        room.send(RoomMessageEventContent::text_markdown(body)).await?;
        Ok(())
    }
}
