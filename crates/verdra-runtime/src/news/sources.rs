//! News search backends and the multi-source fallback manager.
//!
//! Every backend answers the same query shape:
//! `"{company}" AND (keyword1 OR keyword2 OR ...)` over a date range. The
//! manager tries the preferred backend first and falls through the remaining
//! configured backends in registration order, each at most once per search.
//! Total failure yields an empty list, never an error.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::providers::ApiCredential;

use super::models::NewsArticle;

/// Default keyword set for environmental news queries.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "environment",
    "climate",
    "pollution",
    "emission",
    "fine",
    "penalty",
    "lawsuit",
    "violation",
    "regulation",
    "EPA",
    "investigation",
    "carbon",
    "greenhouse gas",
    "sustainability",
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from a single news backend.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },
}

/// A news search request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub company: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub keywords: Vec<String>,
    pub max_results: usize,
}

impl SearchQuery {
    /// A query over one calendar year with the default keyword set.
    pub fn for_report_year(company: impl Into<String>, year: i32) -> Option<Self> {
        Some(Self {
            company: company.into(),
            start_date: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end_date: NaiveDate::from_ymd_opt(year, 12, 31)?,
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            max_results: 50,
        })
    }

    /// The backend query string: `"{company}" AND (kw1 OR kw2 OR ...)`.
    pub fn query_string(&self) -> String {
        let keywords = self.keywords.join(" OR ");
        format!("\"{}\" AND ({})", self.company, keywords)
    }

    fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A single news search backend.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Backend name used for preference selection and logs.
    fn name(&self) -> &str;

    /// Search for articles matching the query.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError>;
}

/// Normalize a backend timestamp to YYYY-MM-DD.
fn normalize_published(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw.replace('Z', "+00:00")) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Brave Search
// ---------------------------------------------------------------------------

/// Brave Search news backend.
pub struct BraveNews {
    credential: ApiCredential,
    client: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct BraveResponse {
    #[serde(default)]
    news: Vec<BraveItem>,
}

#[derive(serde::Deserialize)]
struct BraveItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    published: String,
    #[serde(default)]
    relevance_score: Option<f64>,
}

impl BraveNews {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            client: reqwest::Client::new(),
            base_url: "https://api.search.brave.com/res/v1/news/search".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl NewsSource for BraveNews {
    fn name(&self) -> &str {
        "brave"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError> {
        tracing::info!(source = self.name(), company = %query.company, "searching news");
        let response = self
            .client
            .get(&self.base_url)
            .header("X-Subscription-Token", self.credential.expose())
            .query(&[
                ("q", query.query_string()),
                ("count", query.max_results.to_string()),
                ("freshness", "pd365".to_string()),
                ("country", "us".to_string()),
                ("search_lang", "en".to_string()),
            ])
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                provider: "brave",
                status: status.as_u16(),
                body,
            });
        }

        let body: BraveResponse = response.json().await?;
        let articles = body
            .news
            .into_iter()
            .filter_map(|item| {
                let date = normalize_published(&item.published)?;
                if !query.contains_date(date) {
                    return None;
                }
                Some(NewsArticle {
                    title: item.title,
                    url: item.url,
                    source: item.source.unwrap_or_else(|| "Unknown".to_string()),
                    published_date: date.format("%Y-%m-%d").to_string(),
                    snippet: item.description,
                    relevance_score: item.relevance_score.unwrap_or(0.0),
                })
            })
            .take(query.max_results)
            .collect();

        Ok(articles)
    }
}

// ---------------------------------------------------------------------------
// NewsAPI ("google" provider)
// ---------------------------------------------------------------------------

/// NewsAPI.org backend.
pub struct GoogleNews {
    credential: ApiCredential,
    client: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiItem>,
}

#[derive(serde::Deserialize)]
struct NewsApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    source: Option<NewsApiSource>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
}

#[derive(serde::Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: String,
}

impl GoogleNews {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            client: reqwest::Client::new(),
            base_url: "https://newsapi.org/v2/everything".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl NewsSource for GoogleNews {
    fn name(&self) -> &str {
        "google"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError> {
        tracing::info!(source = self.name(), company = %query.company, "searching news");
        let response = self
            .client
            .get(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.credential.expose()))
            .query(&[
                ("q", query.query_string()),
                ("from", query.start_date.format("%Y-%m-%d").to_string()),
                ("to", query.end_date.format("%Y-%m-%d").to_string()),
                ("sortBy", "relevancy".to_string()),
                ("pageSize", query.max_results.min(100).to_string()),
                ("language", "en".to_string()),
            ])
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                provider: "google",
                status: status.as_u16(),
                body,
            });
        }

        let body: NewsApiResponse = response.json().await?;
        let articles = body
            .articles
            .into_iter()
            .filter_map(|item| {
                let date = normalize_published(&item.published_at)?;
                let snippet = item
                    .description
                    .filter(|d| !d.is_empty())
                    .or_else(|| item.content.map(|c| c.chars().take(200).collect()))
                    .unwrap_or_default();
                Some(NewsArticle {
                    title: item.title,
                    url: item.url,
                    source: item
                        .source
                        .map(|s| s.name)
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    published_date: date.format("%Y-%m-%d").to_string(),
                    snippet,
                    relevance_score: 0.0,
                })
            })
            .take(query.max_results)
            .collect();

        Ok(articles)
    }
}

// ---------------------------------------------------------------------------
// Bing News
// ---------------------------------------------------------------------------

/// Bing News backend.
pub struct BingNews {
    credential: ApiCredential,
    client: reqwest::Client,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct BingResponse {
    #[serde(default)]
    value: Vec<BingItem>,
}

#[derive(serde::Deserialize)]
struct BingItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "datePublished", default)]
    date_published: String,
    #[serde(default)]
    provider: Vec<BingProvider>,
}

#[derive(serde::Deserialize)]
struct BingProvider {
    #[serde(default)]
    name: String,
}

impl BingNews {
    pub fn new(credential: ApiCredential) -> Self {
        Self {
            credential,
            client: reqwest::Client::new(),
            base_url: "https://api.bing.microsoft.com/v7.0/news/search".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl NewsSource for BingNews {
    fn name(&self) -> &str {
        "bing"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError> {
        tracing::info!(source = self.name(), company = %query.company, "searching news");
        let response = self
            .client
            .get(&self.base_url)
            .header("Ocp-Apim-Subscription-Key", self.credential.expose())
            .query(&[
                ("q", query.query_string()),
                ("count", query.max_results.min(100).to_string()),
                ("mkt", "en-US".to_string()),
                ("sortBy", "Date".to_string()),
            ])
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                provider: "bing",
                status: status.as_u16(),
                body,
            });
        }

        let body: BingResponse = response.json().await?;
        let articles = body
            .value
            .into_iter()
            .filter_map(|item| {
                let date = normalize_published(&item.date_published)?;
                if !query.contains_date(date) {
                    return None;
                }
                Some(NewsArticle {
                    title: item.name,
                    url: item.url,
                    source: item
                        .provider
                        .first()
                        .map(|p| p.name.clone())
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    published_date: date.format("%Y-%m-%d").to_string(),
                    snippet: item.description,
                    relevance_score: 0.0,
                })
            })
            .take(query.max_results)
            .collect();

        Ok(articles)
    }
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Multi-source search with ordered fallback.
pub struct SourceManager {
    sources: Vec<Box<dyn NewsSource>>,
    preferred: Option<String>,
}

/// Environment variable names for the built-in backends.
pub const BRAVE_API_KEY_ENV: &str = "BRAVE_API_KEY";
pub const GOOGLE_NEWS_API_KEY_ENV: &str = "GOOGLE_NEWS_API_KEY";
pub const BING_NEWS_API_KEY_ENV: &str = "BING_NEWS_API_KEY";

impl SourceManager {
    pub fn new(sources: Vec<Box<dyn NewsSource>>) -> Self {
        Self {
            sources,
            preferred: None,
        }
    }

    /// Build a manager from whichever backend API keys are present in the
    /// environment. An empty manager (no keys set) is the no-data state.
    pub fn from_env(preferred: &str) -> Self {
        let mut sources: Vec<Box<dyn NewsSource>> = Vec::new();
        if let Ok(credential) = ApiCredential::from_env(BRAVE_API_KEY_ENV, "Brave API key") {
            sources.push(Box::new(BraveNews::new(credential)));
        }
        if let Ok(credential) = ApiCredential::from_env(GOOGLE_NEWS_API_KEY_ENV, "NewsAPI key") {
            sources.push(Box::new(GoogleNews::new(credential)));
        }
        if let Ok(credential) = ApiCredential::from_env(BING_NEWS_API_KEY_ENV, "Bing News key") {
            sources.push(Box::new(BingNews::new(credential)));
        }
        Self::new(sources).with_preferred(preferred)
    }

    /// Prefer one backend by name; others remain as fallback.
    pub fn with_preferred(mut self, name: impl Into<String>) -> Self {
        self.preferred = Some(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the configured backends, in registration order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Search with fallback. Each backend is attempted at most once; the
    /// first non-empty result wins. All backends failing or empty yields an
    /// empty list.
    pub async fn search(&self, query: &SearchQuery) -> Vec<NewsArticle> {
        let order = self.attempt_order();

        for idx in order {
            let source = &self.sources[idx];
            match source.search(query).await {
                Ok(articles) if !articles.is_empty() => {
                    tracing::info!(
                        source = source.name(),
                        count = articles.len(),
                        "news search succeeded"
                    );
                    return dedupe(articles, query.max_results);
                }
                Ok(_) => {
                    tracing::info!(source = source.name(), "news search returned no articles");
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "news search failed");
                }
            }
        }

        tracing::warn!("all news sources failed or returned nothing");
        Vec::new()
    }

    /// Preferred backend first, then the rest in registration order.
    fn attempt_order(&self) -> Vec<usize> {
        let preferred_idx = self
            .preferred
            .as_deref()
            .and_then(|name| self.sources.iter().position(|s| s.name() == name));

        let mut order = Vec::with_capacity(self.sources.len());
        if let Some(idx) = preferred_idx {
            order.push(idx);
        }
        for idx in 0..self.sources.len() {
            if Some(idx) != preferred_idx {
                order.push(idx);
            }
        }
        order
    }
}

/// Drop articles whose URL or title was already seen.
fn dedupe(articles: Vec<NewsArticle>, max_results: usize) -> Vec<NewsArticle> {
    let mut seen_urls = HashSet::new();
    let mut seen_titles = HashSet::new();
    let mut unique = Vec::new();

    for article in articles {
        if seen_urls.contains(&article.url) || seen_titles.contains(&article.title) {
            continue;
        }
        seen_urls.insert(article.url.clone());
        seen_titles.insert(article.title.clone());
        unique.push(article);
        if unique.len() >= max_results {
            break;
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSource {
        name: &'static str,
        articles: Vec<NewsArticle>,
        fail: bool,
        calls: Arc<AtomicUsize>,
    }

    impl MockSource {
        fn new(name: &'static str, articles: Vec<NewsArticle>, fail: bool) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    articles,
                    fail,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl NewsSource for MockSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(SourceError::Api {
                    provider: "mock",
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(self.articles.clone())
            }
        }
    }

    fn article(title: &str, url: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            url: url.to_string(),
            source: "Mock".to_string(),
            published_date: "2023-06-15".to_string(),
            snippet: "snippet".to_string(),
            relevance_score: 0.0,
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::for_report_year("Acme Industrial", 2023).unwrap()
    }

    #[test]
    fn query_string_shape() {
        let q = SearchQuery {
            company: "Acme".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            keywords: vec!["fine".to_string(), "lawsuit".to_string()],
            max_results: 10,
        };
        assert_eq!(q.query_string(), "\"Acme\" AND (fine OR lawsuit)");
    }

    #[tokio::test]
    async fn preferred_source_wins_when_it_answers() {
        let (first, first_calls) = MockSource::new("brave", vec![article("a", "u1")], false);
        let (second, second_calls) = MockSource::new("google", vec![article("b", "u2")], false);
        let manager =
            SourceManager::new(vec![Box::new(first), Box::new(second)]).with_preferred("brave");

        let articles = manager.search(&query()).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "u1");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_preferred_falls_through_every_backend_once() {
        let (first, first_calls) = MockSource::new("brave", vec![], true);
        let (second, second_calls) = MockSource::new("google", vec![], true);
        let (third, third_calls) = MockSource::new("bing", vec![], true);
        let manager = SourceManager::new(vec![Box::new(first), Box::new(second), Box::new(third)])
            .with_preferred("brave");

        let articles = manager.search(&query()).await;
        assert!(articles.is_empty());
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_preferred_result_triggers_fallback() {
        let (first, _) = MockSource::new("brave", vec![], false);
        let (second, _) = MockSource::new("google", vec![article("b", "u2")], false);
        let manager =
            SourceManager::new(vec![Box::new(first), Box::new(second)]).with_preferred("brave");

        let articles = manager.search(&query()).await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].url, "u2");
    }

    #[tokio::test]
    async fn preferred_in_middle_of_registration_order() {
        let (first, first_calls) = MockSource::new("brave", vec![], true);
        let (second, second_calls) = MockSource::new("google", vec![article("b", "u2")], false);
        let manager =
            SourceManager::new(vec![Box::new(first), Box::new(second)]).with_preferred("google");

        let articles = manager.search(&query()).await;
        assert_eq!(articles[0].url, "u2");
        // Preferred answered; brave never attempted.
        assert_eq!(first_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn duplicate_urls_and_titles_are_dropped() {
        let articles = vec![
            article("a", "u1"),
            article("a", "u2"),   // duplicate title
            article("b", "u1"),   // duplicate url
            article("c", "u3"),
        ];
        let (source, _) = MockSource::new("brave", articles, false);
        let manager = SourceManager::new(vec![Box::new(source)]);

        let results = manager.search(&query()).await;
        let urls: Vec<&str> = results.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u3"]);
    }

    #[test]
    fn published_date_normalization() {
        assert_eq!(
            normalize_published("2023-06-15T10:00:00Z"),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert_eq!(
            normalize_published("2023-06-15"),
            NaiveDate::from_ymd_opt(2023, 6, 15)
        );
        assert_eq!(normalize_published("last tuesday"), None);
    }
}
