use chrono::{DateTime, Utc};
use uuid::Uuid;
// Shared vocabulary lives in the interfaces crate
pub use interfaces::defs::{Ingester, InputItem, LiveSourceSpec, OutboundMessage, WatchRest};

/// Entries read from a feed are called input items everywhere else in the workspace.
pub type FeedEntry = InputItem;

#[derive(Debug, Clone)]
pub struct FetchResult {
    pub feed_id: Uuid,
    pub success: bool,
    pub error: Option<String>,
    pub fetch_time: DateTime<Utc>,
    pub response_time_ms: u64,
    pub http_status: Option<u16>,
    pub content: Option<String>, // RSS/XML content
}

impl FetchResult {
    pub(crate) fn failed(feed_id: Uuid, fetch_time: DateTime<Utc>, response_time_ms: u64, error: String) -> Self {
        Self {
            feed_id,
            success: false,
            error: Some(error),
            fetch_time,
            response_time_ms,
            http_status: None,
            content: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_feed_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "RSS-Relay/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 1,
            retry_delay_seconds: 5,
            max_feed_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub entries: Vec<ParsedEntry>,
}

#[derive(Debug, Clone)]
pub struct ParsedEntry {
    pub link: String,
    pub title: String,
    pub summary: Option<String>,
}

impl ParsedEntry {
    pub fn into_input_item(self, source: &LiveSourceSpec) -> InputItem {
        InputItem {
            uri: self.link,
            live_source_uri: source.uri.clone(),
            title: self.title,
            summary: self.summary.unwrap_or_default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed exceeds the {limit_mb}MB size limit")]
    FeedTooLarge { limit_mb: usize },

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Removes a bot token from text that is about to be logged.
pub fn redact_token(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    text.replace(token, "***")
}
