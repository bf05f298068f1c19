//! Matrix client synchronization and event handling.
//!
//! The [`MatrixSync::sync`] method:
//! 1. Performs an initial sync to catch up on offline events (especially invites)
//! 2. Registers the message handler, so only new messages are delivered
//! 3. Signals readiness, then syncs forever, persisting the sync token

use std::sync::Arc;

use log::{debug, error, info, warn};
use matrix_sdk::{
    Client, LoopCtrl, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::matrix::{IncomingMessage, session::SessionStore};

/// Longest wait between two attempts to join a room.
const MAX_JOIN_DELAY_SECS: u64 = 3600;

/// Runs the sync loop of an authenticated client.
pub struct MatrixSync {
    /// The matrix client
    client: Client,
    /// Where sync tokens are saved
    sessions: SessionStore,
}

impl MatrixSync {
    pub fn new(client: &Client, sessions: &SessionStore) -> Self {
        MatrixSync {
            client: client.to_owned(),
            sessions: sessions.to_owned(),
        }
    }

    /// Syncs forever.
    ///
    /// `on_ready` is called once, after the initial sync. `on_message` is
    /// called for every message received afterwards in a joined room, except
    /// the bot's own. Only text messages carry a body.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync loop ends on a server or network error.
    pub async fn sync<R, F>(&self, on_ready: R, on_message: F) -> Result<(), anyhow::Error>
    where
        R: FnOnce(),
        F: Fn(IncomingMessage) + Send + Sync + 'static,
    {
        info!("start syncing");

        self.client.add_event_handler(auto_join_rooms);

        // Enable room members lazy-loading
        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        if let Some(sync_token) = self.sessions.sync_token() {
            sync_settings = sync_settings.token(sync_token);
        }

        // Catch up without handling old messages
        let next_batch = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response.next_batch,
                Err(e) => {
                    error!("initial sync failed, trying again: {e}");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        self.save_sync_token(&next_batch).await;

        let on_message = Arc::new(on_message);
        self.client.add_event_handler({
            let on_message = Arc::clone(&on_message);
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_message = Arc::clone(&on_message);
                async move { on_room_message(event, room, on_message.as_ref()).await }
            }
        });

        on_ready();

        sync_settings = sync_settings.token(next_batch);
        self.client
            .sync_with_result_callback(sync_settings, |sync_result| async move {
                let response = sync_result?;
                self.save_sync_token(&response.next_batch).await;
                Ok(LoopCtrl::Continue)
            })
            .await?;

        Ok(())
    }

    async fn save_sync_token(&self, token: &str) {
        if let Err(e) = self.sessions.save_sync_token(token).await {
            error!("failed to save sync token: {:?}", e);
        }
    }
}

/// Joins rooms the bot is invited to.
///
/// Joining is retried with a doubling delay, see
/// <https://github.com/matrix-org/synapse/issues/4345>.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        info!("joining room {}", room.room_id());
        let mut delay = 2;

        while let Err(e) = room.join().await {
            if delay > MAX_JOIN_DELAY_SECS {
                error!("giving up joining room {} ({e:?})", room.room_id());
                return;
            }
            warn!(
                "failed to join room {} ({e:?}), retrying in {delay}s",
                room.room_id()
            );
            sleep(Duration::from_secs(delay)).await;
            delay *= 2;
        }
        info!("joined room {}", room.room_id());
    });
}

/// Turns a room message event into an [`IncomingMessage`].
async fn on_room_message<F>(event: OriginalSyncRoomMessageEvent, room: Room, on_message: &F)
where
    F: Fn(IncomingMessage),
{
    if room.state() != RoomState::Joined {
        return;
    }

    if event.sender.as_str() == room.own_user_id().as_str() {
        return;
    }

    let sender_name = match room.get_member_no_sync(&event.sender).await {
        Ok(Some(member)) => member.name().to_owned(),
        Ok(None) => event.sender.to_string(),
        Err(e) => {
            debug!("could not get member {}: {:?}", event.sender, e);
            event.sender.to_string()
        }
    };

    on_message(IncomingMessage {
        body: text_body(event.content.msgtype),
        room_id: room.room_id().to_string(),
        sender_id: event.sender.to_string(),
        sender_name,
    });
}

/// Body of a text message, `None` for any other message type.
fn text_body(msgtype: MessageType) -> Option<String> {
    match msgtype {
        MessageType::Text(text_content) => Some(text_content.body),
        _ => None,
    }
}
