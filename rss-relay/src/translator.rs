use crate::traits::Translator;
use crate::types::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the public Google Translate endpoint.
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: GOOGLE_TRANSLATE_URL.to_string(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn translator_name(&self) -> String {
        "Google translator".to_string()
    }

    async fn try_translate(&self, text: &str, target_language: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        debug!("Translating {} chars to {}", text.chars().count(), target_language);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Translation(format!("HTTP {}", status)));
        }

        let body: Value = response.json().await?;
        parse_translation(&body)
    }
}

/// Joins the translated segments of a `translate_a/single` reply.
///
/// The reply is a nested array; element 0 holds one `[translated, original, ...]`
/// array per sentence.
pub fn parse_translation(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| RelayError::Translation("unexpected response shape".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(RelayError::Translation("empty translation".to_string()));
    }

    Ok(translated)
}

/// Used when translation is switched off; returns text as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    fn translator_name(&self) -> String {
        "Passthrough translator".to_string()
    }

    async fn try_translate(&self, text: &str, _target_language: &str) -> Result<String> {
        Ok(text.to_string())
    }
}
