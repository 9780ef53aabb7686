//! Long-polling loop feeding updates into the dialogue engine
//!
//! Updates are handled one at a time, in order, which serializes every
//! conversation step of a user.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::client::TelegramClient;
use super::models::Update;
use crate::dialogue::DialogueEngine;

/// Pause after a failed `getUpdates`
const RETRY_DELAY: std::time::Duration = std::time::Duration::from_secs(5);

/// How often abandoned conversations are swept
const SWEEP_INTERVAL_SECS: i64 = 60;

pub struct Poller {
    client: TelegramClient,
    engine: Arc<DialogueEngine>,
    poll_timeout_secs: u64,
    offset: i64,
    last_sweep: DateTime<Utc>,
}

impl Poller {
    pub fn new(client: TelegramClient, engine: Arc<DialogueEngine>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            engine,
            poll_timeout_secs,
            offset: 0,
            last_sweep: Utc::now(),
        }
    }

    /// Next update id the poller will ask for
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Poll forever; transport errors are logged and retried
    pub async fn run(mut self) {
        info!("Polling Telegram for updates");
        loop {
            if let Err(e) = self.poll_once().await {
                warn!("getUpdates failed: {:#}", e);
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let now = Utc::now();
            if now - self.last_sweep > Duration::seconds(SWEEP_INTERVAL_SECS) {
                self.engine.evict_idle(now);
                self.last_sweep = now;
            }
        }
    }

    /// Fetch one batch of updates and dispatch them in order.
    /// Returns how many updates the batch held.
    pub async fn poll_once(&mut self) -> Result<usize> {
        let updates = self
            .client
            .get_updates(self.offset, self.poll_timeout_secs)
            .await?;
        let count = updates.len();
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            self.dispatch(update).await;
        }
        Ok(count)
    }

    async fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let (Some(from), Some(text)) = (message.from, message.text) else {
            return;
        };
        if from.is_bot {
            return;
        }

        let Some(reply) = self.engine.handle(from.id, &text, Utc::now()) else {
            return;
        };

        if let Err(e) = self.client.send_message(message.chat.id, &reply).await {
            error!(user = from.id, "Failed to send reply: {:#}", e);
        }
    }
}
