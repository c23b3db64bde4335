use crate::types::{redact_token, RelayError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Envelope every Bot API method replies with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Minimal Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    api_base: String,
}

impl TelegramClient {
    pub fn new(client: Client, bot_token: impl Into<String>) -> Self {
        Self {
            client,
            bot_token: bot_token.into(),
            api_base: TELEGRAM_API_BASE.to_string(),
        }
    }

    /// Points the client at another Bot API server (self-hosted or a test double).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Send a text message to a chat id or `@channel` handle
    pub async fn send_message(&self, chat_id: &str, text: &str, parse_mode: Option<&str>) -> Result<()> {
        let mut payload = json!({
            "chat_id": chat_id,
            "text": text,
            "disable_web_page_preview": false,
        });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }

        let _: ApiResponse<serde_json::Value> = self.call("sendMessage", &payload).await?;
        Ok(())
    }

    /// Long-poll for updates newer than `offset`
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let payload = json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });

        let response: ApiResponse<Vec<Update>> = self.call("getUpdates", &payload).await?;
        Ok(response.result.unwrap_or_default())
    }

    async fn call<T>(&self, method: &str, payload: &serde_json::Value) -> Result<ApiResponse<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = self
            .client
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await
            .map_err(|e| RelayError::Publish(redact_token(&e.to_string(), &self.bot_token)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::Publish(redact_token(&e.to_string(), &self.bot_token)))?;

        let parsed: Option<ApiResponse<T>> = serde_json::from_str(&body).ok();
        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(api),
            Some(api) => Err(RelayError::Publish(format!(
                "{} returned {}: {}",
                method,
                status,
                api.description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(RelayError::Publish(format!(
                "{} returned {} with unreadable body",
                method, status
            ))),
        }
    }
}
