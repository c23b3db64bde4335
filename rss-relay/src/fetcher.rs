use crate::types::{FetchConfig, FetchResult, RelayError, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use chrono::Utc;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Minimum spacing between two requests to the same host.
const MIN_HOST_INTERVAL: Duration = Duration::from_secs(1);

pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    rate_limiter: Arc<Mutex<HashMap<String, Instant>>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Downloads a feed document. Transport problems are reported through
    /// `FetchResult::error`; only an unusable URL is returned as `Err`.
    pub async fn fetch_feed(&self, feed_id: Uuid, url: &str) -> Result<FetchResult> {
        let start_time = Instant::now();
        let fetch_time = Utc::now();

        debug!("Fetching feed: {} (ID: {})", url, feed_id);

        self.apply_rate_limit(url).await?;

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 8),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 30)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.fetch_once(url).await {
                Ok((status, content)) => {
                    info!("Successfully fetched feed: {} ({} bytes)", url, content.len());
                    return Ok(FetchResult {
                        feed_id,
                        success: true,
                        error: None,
                        fetch_time,
                        response_time_ms: start_time.elapsed().as_millis() as u64,
                        http_status: Some(status),
                        content: Some(content),
                    });
                }
                // Oversized documents will not shrink on retry.
                Err(e @ RelayError::FeedTooLarge { .. }) => {
                    last_error = Some(e);
                    break;
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                    }
                    break;
                }
            }
        }

        let error_msg = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string());
        warn!("Failed to fetch feed {}: {}", url, error_msg);

        Ok(FetchResult::failed(
            feed_id,
            fetch_time,
            start_time.elapsed().as_millis() as u64,
            error_msg,
        ))
    }

    async fn fetch_once(&self, url: &str) -> Result<(u16, String)> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RelayError::General(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let limit_mb = self.config.max_feed_size_mb;
        let max_bytes = limit_mb as u64 * 1024 * 1024;
        if response.content_length().is_some_and(|len| len > max_bytes) {
            return Err(RelayError::FeedTooLarge { limit_mb });
        }

        // Content-Length is absent for chunked or compressed bodies, so cap while reading
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if (body.len() + chunk.len()) as u64 > max_bytes {
                return Err(RelayError::FeedTooLarge { limit_mb });
            }
            body.extend_from_slice(&chunk);
        }

        let content = String::from_utf8_lossy(&body).into_owned();
        Ok((status.as_u16(), content))
    }

    async fn apply_rate_limit(&self, url: &str) -> Result<()> {
        let parsed_url = Url::parse(url)?;
        let host = parsed_url.host_str().unwrap_or("").to_string();

        let mut rate_limiter = self.rate_limiter.lock().await;
        if let Some(last_request) = rate_limiter.get(&host) {
            let elapsed = last_request.elapsed();
            if elapsed < MIN_HOST_INTERVAL {
                let wait_time = MIN_HOST_INTERVAL - elapsed;
                debug!("Rate limiting {}: waiting {:?}", host, wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }
        rate_limiter.insert(host, Instant::now());

        Ok(())
    }
}
