pub mod commands;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod pipeline;
pub mod publisher;
pub mod relevance;
pub mod rss_utils;
pub mod sources;
pub mod state;
pub mod telegram;
pub mod traits;
pub mod translator;
pub mod types;

pub use types::*;
pub use commands::CommandListener;
pub use config::{Cli, RelayConfig};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use pipeline::{CycleReport, EntryOutcome, RelayPipeline};
pub use publisher::{compose_message, TelegramPublisher};
pub use relevance::{is_relevant, CriteriaPreset, KeywordSet, RelevanceCriteria};
pub use sources::HttpFeedReader;
pub use state::FileSeenStore;
pub use telegram::TelegramClient;
pub use traits::{FeedReader, Publisher, SeenStore, Translator};
pub use translator::{GoogleTranslator, PassthroughTranslator};
