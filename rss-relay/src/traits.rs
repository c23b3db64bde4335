use crate::types::{FeedEntry, LiveSourceSpec, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::warn;

/// Reads a feed source into entries.
#[async_trait]
pub trait FeedReader: Send + Sync {
    /// Fetch and parse every entry the source currently lists.
    /// Any failure is scoped to this one source.
    async fn fetch(&self, source: &LiveSourceSpec) -> Result<Vec<FeedEntry>>;
}

/// Durable record of links that were already published.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// All recorded links; an empty set when nothing has been recorded yet.
    async fn load(&self) -> Result<HashSet<String>>;

    /// Durably append one link. Appending a link twice is harmless.
    async fn record(&self, link: &str) -> Result<()>;
}

/// Machine translation with source language auto-detection.
#[async_trait]
pub trait Translator: Send + Sync {
    fn translator_name(&self) -> String;

    async fn try_translate(&self, text: &str, target_language: &str) -> Result<String>;

    /// Translate, or hand back the input untouched when the service fails.
    async fn translate_or_original(&self, text: &str, target_language: &str) -> String {
        match self.try_translate(text, target_language).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("{} failed, keeping original text: {}", self.translator_name(), e);
                text.to_string()
            }
        }
    }
}

/// Delivers a rendered message to a channel.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, destination: &str, text: &str) -> Result<()>;
}
