use crate::rss_utils::feed::extract_text_from_html;
use crate::types::{ParsedEntry, ParsedFeed, RelayError, Result};
use feed_rs::parser;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct FeedParser;

impl FeedParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses an RSS, Atom or JSON Feed document.
    ///
    /// Entries without a link are dropped, and a link that appears twice in
    /// the same document is only kept the first time.
    pub fn parse_feed(&self, content: &str) -> Result<ParsedFeed> {
        debug!("Parsing feed content ({} bytes)", content.len());

        let feed = parser::parse(content.as_bytes())
            .map_err(|e| RelayError::Parse(format!("Failed to parse feed: {}", e)))?;

        let title = feed.title.map(|t| t.content);

        let mut seen_links = HashSet::new();
        let mut entries = Vec::new();

        for entry in feed.entries {
            let Some(parsed_entry) = self.parse_entry(entry) else {
                continue;
            };
            if !seen_links.insert(parsed_entry.link.clone()) {
                debug!("Skipping duplicate entry with link: {}", parsed_entry.link);
                continue;
            }
            entries.push(parsed_entry);
        }

        debug!("Parsed feed with {} entries", entries.len());

        Ok(ParsedFeed { title, entries })
    }

    fn parse_entry(&self, entry: feed_rs::model::Entry) -> Option<ParsedEntry> {
        let link = entry
            .links
            .first()
            .map(|l| l.href.trim().to_string())
            .filter(|href| !href.is_empty())?;

        let title = entry
            .title
            .map(|t| t.content.trim().to_string())
            .unwrap_or_default();

        // Prefer the summary element, fall back to the content body
        let raw_summary = entry
            .summary
            .map(|s| s.content)
            .or_else(|| entry.content.and_then(|c| c.body));

        let summary = raw_summary
            .map(|s| extract_text_from_html(&s))
            .filter(|s| !s.is_empty());

        Some(ParsedEntry { link, title, summary })
    }
}
