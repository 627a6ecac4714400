//! LLM-based extraction of environmental events from news articles.
//!
//! Articles are processed in bounded batches. Each article gets one
//! single-turn extraction call; the model returns either a JSON object
//! matching the event schema or the `null` sentinel. Malformed output, schema
//! violations and provider failures all degrade to "no event" - an article
//! can never fail the batch.

use lazy_static::lazy_static;
use moka::future::Cache;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;

use crate::prompts;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};

use super::models::{EnvironmentalEvent, EventKind, EventSeverity, NewsArticle};
use super::schema::validate_event_json;

lazy_static! {
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

/// Alternate date formats accepted after ISO-8601 fails.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%B %d, %Y", "%b %d, %Y"];

/// Extraction tuning knobs.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Hard cap on articles per extraction batch
    pub batch_size: usize,

    /// Events below this confidence are discarded
    pub min_confidence: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            min_confidence: 0.5,
        }
    }
}

/// Extracts structured environmental events from articles via an LLM.
pub struct EventExtractor {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    config: ExtractorConfig,

    /// Per-URL cache of raw extraction outcomes, so re-evaluating the same
    /// company does not repeat LLM calls.
    cache: Cache<String, Option<EnvironmentalEvent>>,
}

impl EventExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(provider, CompletionConfig::default(), ExtractorConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn LlmProvider>,
        completion: CompletionConfig,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            provider,
            completion,
            config,
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(24 * 3600))
                .build(),
        }
    }

    /// Extract events from articles, batched, confidence-filtered.
    pub async fn extract_events(
        &self,
        articles: &[NewsArticle],
        company_name: &str,
    ) -> Vec<EnvironmentalEvent> {
        let mut events = Vec::new();

        for batch in articles.chunks(self.config.batch_size.max(1)) {
            for article in batch {
                let outcome = match self.cache.get(&article.url).await {
                    Some(cached) => cached,
                    None => {
                        let extracted = self.extract_single(article, company_name).await;
                        self.cache.insert(article.url.clone(), extracted.clone()).await;
                        extracted
                    }
                };

                if let Some(event) = outcome {
                    if event.confidence >= self.config.min_confidence {
                        events.push(event);
                    } else {
                        tracing::debug!(
                            url = %article.url,
                            confidence = event.confidence,
                            "event discarded below confidence threshold"
                        );
                    }
                }
            }
        }

        events
    }

    async fn extract_single(
        &self,
        article: &NewsArticle,
        company_name: &str,
    ) -> Option<EnvironmentalEvent> {
        let messages = vec![
            ChatMessage::system(prompts::EXTRACTION_SYSTEM_PROMPT),
            ChatMessage::user(prompts::extraction_prompt(company_name, article)),
        ];

        match self.provider.complete(messages, &self.completion).await {
            Ok(response) => self.parse_response(&response.content, article),
            Err(e) => {
                tracing::warn!(url = %article.url, error = %e, "extraction call failed, skipping article");
                None
            }
        }
    }

    /// Parse one model response into an event, or nothing.
    fn parse_response(&self, response: &str, article: &NewsArticle) -> Option<EnvironmentalEvent> {
        let trimmed = response.trim();

        // The "not an environmental event" sentinel.
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("not applicable")
        {
            return None;
        }

        // The model may wrap the object in prose; take the JSON block.
        let json_str = JSON_OBJECT.find(trimmed)?.as_str();

        let value: serde_json::Value = match serde_json::from_str(json_str) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(url = %article.url, error = %e, "unparseable extraction output");
                return None;
            }
        };

        if let Err(errors) = validate_event_json(&value) {
            tracing::warn!(url = %article.url, errors = ?errors, "extraction output failed schema");
            return None;
        }

        let kind = EventKind::parse_lenient(value["event_type"].as_str().unwrap_or(""));
        let severity = EventSeverity::parse_lenient(value["severity"].as_str().unwrap_or(""));
        let raw_date = value["date"].as_str().unwrap_or("").to_string();
        let date = normalize_event_date(&raw_date).unwrap_or(raw_date);

        let confidence = value["confidence"].as_f64().unwrap_or(0.5).clamp(0.0, 1.0);
        let financial_impact = value["financial_impact"].as_f64();
        let keywords = value["keywords"]
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|k| k.as_str().map(|s| s.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Some(EnvironmentalEvent {
            kind,
            description: value["description"].as_str().unwrap_or("").to_string(),
            date,
            severity,
            financial_impact,
            source_article: article.clone(),
            keywords,
            confidence,
        })
    }
}

/// Normalize a date to YYYY-MM-DD: ISO-8601 first, then the alternate formats.
fn normalize_event_date(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(&raw.replace('Z', "+00:00")) {
        return Some(dt.date_naive().format("%Y-%m-%d").to_string());
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}
