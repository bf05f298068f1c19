//! Bot module wiring the Matrix client to the tracker.
//!
//! # Overview
//!
//! The bot listens to one Matrix room. Messages starting with the trigger word
//! are parsed into commands, applied to the [`Tracker`], and answered in the
//! same room. When the room goes quiet, a [`Reminder`] posts the current
//! status.
//!
//! # Architecture
//!
//! The bot operates with two concurrent tasks:
//!
//! 1. **Matrix Sync Task**: listens for Matrix messages and spawns one task
//!    per message to parse, execute and answer it.
//! 2. **Reminder Task**: started once the first sync is done, checks every
//!    `message_wait_time` whether the room deserves a status reminder.
//!
//! # Command Processing Flow
//!
//! ```text
//! Matrix Message → Notify Reminder → Room Filter → Parse → Execute (tracker locked) → Send Responses
//! ```

use std::{path::Path, sync::Arc};

use futures::FutureExt;
use log::{debug, error, info, warn};
use tokio::{fs, sync::Mutex};

use crate::{
    commands::{CommandContext, CommandParseError, Commander},
    config::Config,
    dice::{Dice, RandomDice},
    matrix::{IncomingMessage, MatrixClient, UserCredentials},
    reminder::Reminder,
    store::JsonStore,
    tracker::Tracker,
};

/// Tracker state file, inside the data directory.
const TRACKER_FILE: &str = "tracker.json";
/// Matrix session directory, inside the data directory.
const SESSION_DIR: &str = "session";

/// Shared state needed to process a single Matrix message.
#[derive(Clone)]
struct MessageContext {
    /// Room the bot answers in
    room_id: Arc<str>,
    /// Thread-safe reference to the Matrix client
    matrix_client: Arc<MatrixClient>,
    /// Thread-safe reference to the command handler
    commander: Arc<Commander>,
    /// Tracker state, locked for the whole execution of a command
    tracker: Arc<Mutex<Tracker>>,
    /// Dice used by `roll`
    dice: Arc<Mutex<Box<dyn Dice + Send>>>,
    /// Periodic status reminder
    reminder: Arc<Reminder>,
}

/// Main bot structure.
///
/// # Thread Safety
///
/// All shared state is wrapped in `Arc` for safe sharing across async tasks.
/// The tracker and the dice sit behind a `Mutex`, so commands never
/// interleave their mutations.
pub struct Bot {
    /// Matrix client for sending and receiving messages.
    matrix_client: Arc<MatrixClient>,

    /// Command parser and executor.
    commander: Arc<Commander>,

    /// Momentum, threat and scene, persisted in the data directory.
    tracker: Arc<Mutex<Tracker>>,

    /// Source of d20 rolls.
    dice: Arc<Mutex<Box<dyn Dice + Send>>>,

    /// Status reminder, started once the bot is ready.
    reminder: Arc<Reminder>,

    /// Room the bot listens and answers in.
    room_id: Arc<str>,
}

impl Bot {
    /// Creates a new Bot instance from configuration and the data directory.
    ///
    /// The tracker store is loaded first, so a corrupted state file stops the
    /// bot before it logs in to Matrix.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The data directory cannot be created
    /// - The tracker store exists but is not valid JSON
    /// - Matrix login or session restoration fails
    pub async fn new(config: Config, data_dir: &Path) -> Result<Self, anyhow::Error> {
        fs::create_dir_all(data_dir).await?;

        let store = JsonStore::load(data_dir.join(TRACKER_FILE)).await?;
        let tracker = Arc::new(Mutex::new(Tracker::new(store)));

        let matrix_client = Arc::new(
            MatrixClient::new(
                &UserCredentials {
                    user_id: config.matrix.user_id,
                    password: config.matrix.password,
                    passphrase: config.matrix.passphrase,
                },
                data_dir.join(SESSION_DIR),
            )
            .await?,
        );

        let reminder = Arc::new(Reminder::new(
            config.tracker.reminder.reset_wait(),
            config.tracker.reminder.message_wait(),
        ));

        let dice: Box<dyn Dice + Send> = Box::new(RandomDice::new());

        Ok(Bot {
            matrix_client,
            commander: Arc::new(Commander::new(&config.tracker.trigger)),
            tracker,
            dice: Arc::new(Mutex::new(dice)),
            reminder,
            room_id: config.tracker.room_id.into(),
        })
    }

    /// Starts the bot and runs until the Matrix sync ends.
    ///
    /// Once the initial sync is done, the ready message is sent and the
    /// reminder is started.
    pub async fn start(self) {
        let context = MessageContext {
            room_id: Arc::clone(&self.room_id),
            matrix_client: Arc::clone(&self.matrix_client),
            commander: Arc::clone(&self.commander),
            tracker: Arc::clone(&self.tracker),
            dice: Arc::clone(&self.dice),
            reminder: Arc::clone(&self.reminder),
        };

        let on_ready = {
            let context = context.clone();
            move || Self::on_ready(context)
        };

        let on_message =
            move |message: IncomingMessage| Self::handle_matrix_message(context.clone(), message);

        info!("listening to room {}", self.room_id);
        self.matrix_client.sync(on_ready, on_message).await;
    }

    /// Starts the reminder and announces the bot in the room.
    fn on_ready(ctx: MessageContext) {
        let on_fire = {
            let ctx = ctx.clone();
            move || {
                let ctx = ctx.clone();
                async move {
                    let messages = Commander::get_status_messages(&*ctx.tracker.lock().await);
                    send_all(&ctx.matrix_client, &ctx.room_id, &messages).await;
                }
                .boxed()
            }
        };
        // Runs for the lifetime of the process
        let _reminder_task = ctx.reminder.start(on_fire);

        tokio::spawn(async move {
            let ready_message = ctx.commander.get_ready_message();
            send_all(&ctx.matrix_client, &ctx.room_id, &[ready_message]).await;
            info!("bot is ready");
        });
    }

    /// Handles an incoming Matrix message and processes it as a command.
    ///
    /// Every message counts as activity for the reminder, whatever its room
    /// or content. Parse errors are only logged; no error reaches the room.
    fn handle_matrix_message(ctx: MessageContext, message: IncomingMessage) {
        tokio::spawn(async move {
            debug!("got message from {}: {:?}", message.sender_id, message.body);
            ctx.reminder.notify_activity().await;

            let Some(body) = command_body(&message, &ctx.room_id) else {
                return;
            };

            let command = match ctx.commander.parse(body) {
                Ok(command) => command,
                Err(e) => {
                    log_parse_error(&message, e);
                    return;
                }
            };

            let result = {
                let mut tracker = ctx.tracker.lock().await;
                let mut dice = ctx.dice.lock().await;
                let context = CommandContext {
                    tracker: &mut *tracker,
                    dice: &mut **dice,
                    sender_name: &message.sender_name,
                };
                ctx.commander.execute(&command, context).await
            };

            let result = match result {
                Ok(result) => result,
                Err(e) => {
                    error!("failed to execute {:?}: {:?}", command, e);
                    return;
                }
            };

            if result.reset_reminder {
                ctx.reminder.reset().await;
            }

            send_all(&ctx.matrix_client, &ctx.room_id, &result.responses).await;
        });
    }
}

/// Text to parse as a command: text messages from the tracked room only.
fn command_body<'a>(message: &'a IncomingMessage, room_id: &str) -> Option<&'a str> {
    if message.room_id != room_id {
        debug!("ignoring message from room {}", message.room_id);
        return None;
    }
    message.body.as_deref()
}

fn log_parse_error(message: &IncomingMessage, error: CommandParseError) {
    match error {
        CommandParseError::NotForBot => {}
        CommandParseError::Ignored(reason) => {
            info!("ignored command from {}: {}", message.sender_id, reason)
        }
        CommandParseError::Rejected(reason) => {
            warn!("rejected command from {}: {}", message.sender_id, reason)
        }
        CommandParseError::Malformed(reason) => error!(
            "malformed command from {} ({:?}): {}",
            message.sender_id, message.body, reason
        ),
    }
}

/// Sends messages to the room in order, logging failures.
async fn send_all(matrix_client: &MatrixClient, room_id: &str, messages: &[String]) {
    for message in messages {
        if let Err(e) = matrix_client.send_message(room_id, message).await {
            error!("failed to send message to {}: {:?}", room_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(room_id: &str, body: Option<&str>) -> IncomingMessage {
        IncomingMessage {
            body: body.map(str::to_owned),
            room_id: room_id.to_owned(),
            sender_id: "@leto:example.org".to_owned(),
            sender_name: "Leto".to_owned(),
        }
    }

    #[test]
    fn test_command_body_in_tracked_room() {
        let message = message("!table:example.org", Some("dune show"));
        assert_eq!(
            command_body(&message, "!table:example.org"),
            Some("dune show")
        );
    }

    #[test]
    fn test_command_body_skips_other_rooms() {
        let message = message("!other:example.org", Some("dune show"));
        assert_eq!(command_body(&message, "!table:example.org"), None);
    }

    #[test]
    fn test_command_body_skips_non_text_messages() {
        let message = message("!table:example.org", None);
        assert_eq!(command_body(&message, "!table:example.org"), None);
    }
}
