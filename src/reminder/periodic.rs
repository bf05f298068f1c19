//! Debounced, rate-limited periodic reminder.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use log::{debug, info};
use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, Instant},
};

/// Timestamps observed by the reminder.
#[derive(Debug, Default, Clone, Copy)]
struct ReminderClock {
    /// Last time the reminder fired or was reset
    last_reset: Option<Instant>,
    /// Last time any inbound activity was observed
    last_message: Option<Instant>,
}

impl ReminderClock {
    /// Whether the reminder should fire at `now`.
    ///
    /// Both timestamps must have been set at least once.
    fn is_due(
        &self,
        now: Instant,
        reset_wait_time: Duration,
        message_wait_time: Duration,
    ) -> bool {
        let (Some(last_reset), Some(last_message)) = (self.last_reset, self.last_message) else {
            return false;
        };

        debug!(
            "last reset was {:?} ago, trigger time is {:?}",
            now.saturating_duration_since(last_reset),
            reset_wait_time
        );
        debug!(
            "last message was {:?} ago, trigger time is {:?}",
            now.saturating_duration_since(last_message),
            message_wait_time
        );

        now > last_reset + reset_wait_time && now > last_message + message_wait_time
    }
}

/// Fires a callback when the channel has been quiet for a while.
///
/// The callback runs at most once every `reset_wait_time`, and only once
/// `message_wait_time` has passed since the last observed activity. The
/// conditions are checked every `message_wait_time`.
#[derive(Debug)]
pub struct Reminder {
    /// Observed timestamps
    clock: Mutex<ReminderClock>,
    /// Minimum time between two fires
    reset_wait_time: Duration,
    /// Quiet time required before firing, also the polling cadence
    message_wait_time: Duration,
}

impl Reminder {
    /// Creates a reminder with both timestamps unset.
    pub fn new(reset_wait_time: Duration, message_wait_time: Duration) -> Self {
        Reminder {
            clock: Mutex::new(ReminderClock::default()),
            reset_wait_time,
            message_wait_time,
        }
    }

    /// Restarts the `reset_wait_time` window from now.
    pub async fn reset(&self) {
        self.clock.lock().await.last_reset = Some(Instant::now());
    }

    /// Records inbound activity.
    pub async fn notify_activity(&self) {
        self.clock.lock().await.last_message = Some(Instant::now());
    }

    /// Whether the reminder would fire now.
    async fn is_due(&self) -> bool {
        self.clock
            .lock()
            .await
            .is_due(Instant::now(), self.reset_wait_time, self.message_wait_time)
    }

    /// Runs the reminder loop forever.
    ///
    /// Resets once, then every `message_wait_time` checks whether the reminder
    /// is due and, if so, awaits `on_fire` and resets again.
    pub async fn run<F>(&self, on_fire: F)
    where
        F: Fn() -> BoxFuture<'static, ()>,
    {
        info!(
            "reminder running, quiet time {:?}, minimum interval {:?}",
            self.message_wait_time, self.reset_wait_time
        );
        self.reset().await;

        loop {
            time::sleep(self.message_wait_time).await;

            // The clock lock is released before the callback, which may reset it
            if self.is_due().await {
                info!("channel is quiet, firing reminder");
                on_fire().await;
                self.reset().await;
            }
        }
    }

    /// Spawns [`Reminder::run`] on the runtime.
    ///
    /// The loop never ends on its own; abort the returned handle to stop it.
    pub fn start<F>(self: &Arc<Self>, on_fire: F) -> JoinHandle<()>
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        let reminder = Arc::clone(self);
        tokio::spawn(async move { reminder.run(on_fire).await })
    }
}
