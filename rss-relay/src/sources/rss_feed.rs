use crate::traits::FeedReader;
use crate::types::{FeedEntry, FetchConfig, LiveSourceSpec, RelayError, Result};
use crate::{FeedParser, Fetcher};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reads RSS/Atom sources over HTTP. Entries are fetched fresh on every call.
pub struct HttpFeedReader {
    fetcher: Fetcher,
    parser: FeedParser,
}

impl HttpFeedReader {
    pub fn new(fetch_config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(fetch_config)?,
            parser: FeedParser::new(),
        })
    }

    /// Parses an already downloaded document as if it came from `source`.
    pub fn entries_from_document(&self, source: &LiveSourceSpec, content: &str) -> Result<Vec<FeedEntry>> {
        let parsed_feed = self.parser.parse_feed(content)?;
        debug!(
            "Feed {} ({}) lists {} entries",
            source.uri,
            parsed_feed.title.as_deref().unwrap_or("untitled"),
            parsed_feed.entries.len()
        );
        Ok(parsed_feed
            .entries
            .into_iter()
            .map(|entry| entry.into_input_item(source))
            .collect())
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn fetch(&self, source: &LiveSourceSpec) -> Result<Vec<FeedEntry>> {
        let fetch_id = Uuid::new_v4();
        let fetch_result = self.fetcher.fetch_feed(fetch_id, &source.uri).await?;

        if !fetch_result.success {
            let error_msg = fetch_result.error.unwrap_or_else(|| "Fetch failed".to_string());
            return Err(RelayError::General(error_msg));
        }

        let Some(content) = fetch_result.content else {
            warn!("No content returned for RSS feed {}", source.uri);
            return Ok(Vec::new());
        };

        let entries = self.entries_from_document(source, &content)?;
        info!(
            "Pulled {} entries from {} in {}ms",
            entries.len(),
            source.uri,
            fetch_result.response_time_ms
        );
        Ok(entries)
    }
}
