use crate::config::RelayConfig;
use crate::publisher::compose_message;
use crate::relevance::is_relevant;
use crate::rss_utils::text::truncate;
use crate::traits::{FeedReader, Publisher, SeenStore, Translator};
use crate::types::{FeedEntry, OutboundMessage, Result};
use std::collections::HashSet;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// What happened to one entry during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Duplicate,
    Irrelevant,
    Published,
    /// Delivery failed; the link stays unseen and is retried next cycle.
    PublishFailed(String),
    /// Delivered, but the link could not be written to the seen file.
    RecordFailed(String),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub sources_ok: usize,
    pub sources_failed: usize,
    pub entries_seen: usize,
    pub duplicates: usize,
    pub irrelevant: usize,
    pub published: usize,
    pub publish_failures: usize,
    pub record_failures: usize,
}

impl CycleReport {
    fn tally(&mut self, outcome: &EntryOutcome) {
        self.entries_seen += 1;
        match outcome {
            EntryOutcome::Duplicate => self.duplicates += 1,
            EntryOutcome::Irrelevant => self.irrelevant += 1,
            EntryOutcome::Published => self.published += 1,
            EntryOutcome::PublishFailed(_) => self.publish_failures += 1,
            EntryOutcome::RecordFailed(_) => {
                self.published += 1;
                self.record_failures += 1;
            }
        }
    }
}

/// Polls every configured feed and relays relevant, unseen entries.
pub struct RelayPipeline {
    config: RelayConfig,
    reader: Box<dyn FeedReader>,
    seen_store: Box<dyn SeenStore>,
    translator: Box<dyn Translator>,
    publisher: Box<dyn Publisher>,
}

impl RelayPipeline {
    pub fn new(
        config: RelayConfig,
        reader: Box<dyn FeedReader>,
        seen_store: Box<dyn SeenStore>,
        translator: Box<dyn Translator>,
        publisher: Box<dyn Publisher>,
    ) -> Self {
        Self {
            config,
            reader,
            seen_store,
            translator,
            publisher,
        }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Runs cycles forever: once after the first delay, then on every interval tick.
    /// A cycle always finishes before the next tick is awaited, so cycles never overlap.
    pub async fn run(&self) {
        info!(
            "Relay scheduled: first cycle in {:?}, then every {:?}",
            self.config.first_delay,
            self.config.cycle_rest()
        );
        tokio::time::sleep(self.config.first_delay).await;

        let mut ticker = interval(self.config.cycle_rest());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_logged_cycle().await;
        }
    }

    /// Runs one cycle inside its own span and logs the outcome.
    pub async fn run_logged_cycle(&self) -> Option<CycleReport> {
        let span = info_span!("cycle", id = %Uuid::new_v4());
        match self.run_cycle().instrument(span).await {
            Ok(report) => {
                info!(
                    "Cycle finished: {} published, {} duplicates, {} irrelevant, {} publish failures, {}/{} sources failed",
                    report.published,
                    report.duplicates,
                    report.irrelevant,
                    report.publish_failures,
                    report.sources_failed,
                    report.sources_ok + report.sources_failed
                );
                Some(report)
            }
            Err(e) => {
                error!("Cycle aborted: {}", e);
                None
            }
        }
    }

    /// One pass over every source, in configured order.
    ///
    /// Only failing to load the seen set aborts the cycle; every other failure
    /// is confined to its source or entry.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let mut seen = self.seen_store.load().await?;
        let mut report = CycleReport::default();

        for source in &self.config.feeds {
            let entries = match self.reader.fetch(source).await {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Skipping source {} this cycle: {}", source.uri, e);
                    report.sources_failed += 1;
                    continue;
                }
            };
            report.sources_ok += 1;

            for entry in &entries {
                let outcome = self.process_entry(entry, &mut seen).await;
                report.tally(&outcome);
            }
        }

        Ok(report)
    }

    async fn process_entry(&self, entry: &FeedEntry, seen: &mut HashSet<String>) -> EntryOutcome {
        let link = entry.uri.trim();

        if seen.contains(link) {
            debug!("Already published: {}", link);
            return EntryOutcome::Duplicate;
        }

        let summary = self.config.include_summary.then_some(entry.summary.as_str());
        if !is_relevant(&entry.title, summary, &self.config.criteria) {
            debug!("Not relevant: {}", entry.title);
            return EntryOutcome::Irrelevant;
        }

        let message = self.compose(entry).await;
        if let Err(e) = self.publisher.publish(&message.destination, &message.body).await {
            error!("Failed to publish {}: {}", link, e);
            return EntryOutcome::PublishFailed(e.to_string());
        }
        info!("Published: {}", entry.title);

        seen.insert(link.to_string());
        if let Err(e) = self.seen_store.record(link).await {
            error!("Published {} but could not record it as seen: {}", link, e);
            return EntryOutcome::RecordFailed(e.to_string());
        }

        EntryOutcome::Published
    }

    /// Builds the channel post for an entry that passed filtering.
    pub async fn compose(&self, entry: &FeedEntry) -> OutboundMessage {
        let max_len = self.config.summary_max_len;
        let body = if self.config.include_summary {
            truncate(&entry.summary, max_len)
        } else {
            String::new()
        };

        let (title, body) = match self.config.target_language.as_deref() {
            Some(target) => {
                let title = self.translator.translate_or_original(&entry.title, target).await;
                // Translation can lengthen the text, so bound it again
                let body = if body.is_empty() {
                    body
                } else {
                    truncate(&self.translator.translate_or_original(&body, target).await, max_len)
                };
                (title, body)
            }
            None => (entry.title.clone(), body),
        };

        OutboundMessage {
            destination: self.config.channel_id.clone(),
            body: compose_message(&title, &body, entry.uri.trim()),
        }
    }
}
