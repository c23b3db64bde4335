use crate::telegram::{Message, TelegramClient, Update};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const START_REPLY: &str = "Bot is running! Relevant articles will be published to the channel.";

const POLL_TIMEOUT_SECS: u64 = 30;
const ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Answers `/start` in the chat it was sent from. Independent of the publishing cycle.
pub struct CommandListener {
    client: TelegramClient,
    offset: i64,
}

impl CommandListener {
    pub fn new(client: TelegramClient) -> Self {
        Self { client, offset: 0 }
    }

    /// Long-polls forever; failures are logged and polling resumes after a pause.
    pub async fn run(mut self) {
        info!("Command listener started");
        loop {
            match self.client.get_updates(self.offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    for update in updates {
                        self.handle_update(update).await;
                    }
                }
                Err(e) => {
                    warn!("Polling for commands failed: {}", e);
                    tokio::time::sleep(ERROR_PAUSE).await;
                }
            }
        }
    }

    async fn handle_update(&mut self, update: Update) {
        self.offset = self.offset.max(update.update_id + 1);

        let Some(message) = update.message else {
            return;
        };
        if !is_start_command(&message) {
            return;
        }

        debug!("Replying to /start in chat {}", message.chat.id);
        if let Err(e) = self
            .client
            .send_message(&message.chat.id.to_string(), START_REPLY, None)
            .await
        {
            warn!("Failed to answer /start in chat {}: {}", message.chat.id, e);
        }
    }
}

/// `/start`, optionally addressed as `/start@botname` and followed by a payload.
/// Channel posts have no invoking user and are never answered.
fn is_start_command(message: &Message) -> bool {
    if message.chat.kind == "channel" {
        return false;
    }
    let Some(command) = message.text.as_deref().and_then(|t| t.split_whitespace().next()) else {
        return false;
    };
    command == "/start" || command.starts_with("/start@")
}
