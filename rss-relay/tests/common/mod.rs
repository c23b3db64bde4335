#![allow(dead_code)]

use async_trait::async_trait;
use rss_relay::{
    FeedEntry, FeedReader, LiveSourceSpec, Publisher, RelayConfig, RelayError, Result, SeenStore, Translator,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn entry(source: &str, link: &str, title: &str, summary: &str) -> FeedEntry {
    FeedEntry {
        uri: link.to_string(),
        live_source_uri: source.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
    }
}

/// Config pointing at the given sources, translation off.
pub fn config_for(sources: &[&str]) -> RelayConfig {
    let mut config = RelayConfig::new("123:test", "@test_channel");
    config.feeds = sources.iter().map(|uri| LiveSourceSpec::new(*uri)).collect();
    config.target_language = None;
    config
}

/// Serves canned entries per source URI; unknown sources fail.
#[derive(Clone, Default)]
pub struct StaticFeedReader {
    feeds: Arc<Mutex<HashMap<String, Vec<FeedEntry>>>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl StaticFeedReader {
    pub fn with_feed(self, source: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.lock().unwrap().insert(source.to_string(), entries);
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedReader for StaticFeedReader {
    async fn fetch(&self, source: &LiveSourceSpec) -> Result<Vec<FeedEntry>> {
        self.fetches.lock().unwrap().push(source.uri.clone());
        self.feeds
            .lock()
            .unwrap()
            .get(&source.uri)
            .cloned()
            .ok_or_else(|| RelayError::Parse(format!("no such feed: {}", source.uri)))
    }
}

/// In-memory seen set; can be told to refuse particular links or all loads.
#[derive(Clone, Default)]
pub struct MemorySeenStore {
    links: Arc<Mutex<HashSet<String>>>,
    refuse: Arc<Mutex<HashSet<String>>>,
    unavailable: Arc<Mutex<bool>>,
}

impl MemorySeenStore {
    pub fn with_links(links: &[&str]) -> Self {
        let store = Self::default();
        store.links.lock().unwrap().extend(links.iter().map(|l| l.to_string()));
        store
    }

    pub fn refuse(&self, link: &str) {
        self.refuse.lock().unwrap().insert(link.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.lock().unwrap().contains(link)
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn load(&self) -> Result<HashSet<String>> {
        if *self.unavailable.lock().unwrap() {
            return Err(RelayError::Io(std::io::Error::other("disk gone")));
        }
        Ok(self.links.lock().unwrap().clone())
    }

    async fn record(&self, link: &str) -> Result<()> {
        if self.refuse.lock().unwrap().contains(link) {
            return Err(RelayError::Io(std::io::Error::other("disk full")));
        }
        self.links.lock().unwrap().insert(link.to_string());
        Ok(())
    }
}

/// Captures every message; fails for bodies containing a configured marker.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: Arc<Mutex<usize>>,
    fail_marker: Arc<Mutex<Option<String>>>,
}

impl RecordingPublisher {
    pub fn failing_on(marker: &str) -> Self {
        let publisher = Self::default();
        *publisher.fail_marker.lock().unwrap() = Some(marker.to_string());
        publisher
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, destination: &str, text: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(marker) = self.fail_marker.lock().unwrap().as_deref() {
            if text.contains(marker) {
                return Err(RelayError::Publish("Too Many Requests: retry after 5".to_string()));
            }
        }
        self.sent.lock().unwrap().push((destination.to_string(), text.to_string()));
        Ok(())
    }
}

/// Tags text with the target language so translation is visible in assertions.
pub struct TaggingTranslator;

#[async_trait]
impl Translator for TaggingTranslator {
    fn translator_name(&self) -> String {
        "Tagging translator".to_string()
    }

    async fn try_translate(&self, text: &str, target_language: &str) -> Result<String> {
        Ok(format!("[{}] {}", target_language, text))
    }
}

pub struct FailingTranslator;

#[async_trait]
impl Translator for FailingTranslator {
    fn translator_name(&self) -> String {
        "Failing translator".to_string()
    }

    async fn try_translate(&self, _text: &str, _target_language: &str) -> Result<String> {
        Err(RelayError::Translation("HTTP 429 Too Many Requests".to_string()))
    }
}
