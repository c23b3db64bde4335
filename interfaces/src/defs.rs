use std::time::Duration;

/// A feed source to poll, identified by its URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveSourceSpec {
    pub uri: String,
}

impl LiveSourceSpec {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

/// How long a scheduler should rest before polling a source again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct WatchRest {
    pub wait_at_least_ms: u64,
}

impl WatchRest {
    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.wait_at_least_ms)
    }
}

impl From<Duration> for WatchRest {
    fn from(duration: Duration) -> Self {
        Self {
            wait_at_least_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

/// Decides the polling cadence for a source.
pub trait Ingester {
    fn watch(&self, source: &LiveSourceSpec) -> WatchRest;
}

/// One entry read from a feed. `uri` is the entry's link and its unique key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputItem {
    pub uri: String,
    pub live_source_uri: String,
    pub title: String,
    pub summary: String,
}

impl InputItem {
    pub fn has_summary(&self) -> bool {
        !self.summary.trim().is_empty()
    }
}

/// A rendered message bound for a channel. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    pub destination: String,
    pub body: String,
}
