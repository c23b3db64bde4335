use crate::telegram::TelegramClient;
use crate::traits::Publisher;
use crate::types::Result;
use async_trait::async_trait;

pub const ORIGINAL_LINK_LABEL: &str = "Original link:";

/// Renders the channel post: bold title, optional body, then the source link.
pub fn compose_message(title: &str, body: &str, link: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("**{}**\n\n{} {}", title.trim(), ORIGINAL_LINK_LABEL, link)
    } else {
        format!("**{}**\n\n{}\n\n{} {}", title.trim(), body, ORIGINAL_LINK_LABEL, link)
    }
}

/// Posts to a Telegram channel with Markdown parsing enabled.
pub struct TelegramPublisher {
    client: TelegramClient,
}

impl TelegramPublisher {
    pub fn new(client: TelegramClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for TelegramPublisher {
    async fn publish(&self, destination: &str, text: &str) -> Result<()> {
        self.client.send_message(destination, text, Some("Markdown")).await
    }
}
