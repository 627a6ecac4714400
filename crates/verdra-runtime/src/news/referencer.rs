//! The news cross-referencer: search, extract, cross-validate, score.
//!
//! Reports through the same three-way [`CrossCheckOutcome`] union as the
//! registry adapters, so the orchestrator treats news evidence as one more
//! external cross-check. No configured backend is a first-class no-data
//! state; stage failures degrade, they never abort.

use verdra_core::{CrossCheckOutcome, DisclosureRecord, Finding, ValidationResult};

use super::credibility::CredibilityScorer;
use super::cross_validator::CrossValidator;
use super::extractor::EventExtractor;
use super::models::Contradiction;
use super::sources::{SearchQuery, SourceManager, DEFAULT_KEYWORDS};

/// Adapter name; results are reported as `adapter:news`.
pub const NEWS_ADAPTER_NAME: &str = "news";

/// Cross-references a disclosure against independently reported news.
pub struct NewsCrossReferencer {
    manager: SourceManager,
    extractor: EventExtractor,
    cross_validator: CrossValidator,
    scorer: CredibilityScorer,
    keywords: Vec<String>,
    max_results: usize,
}

impl NewsCrossReferencer {
    pub fn new(manager: SourceManager, extractor: EventExtractor) -> Self {
        Self {
            manager,
            extractor,
            cross_validator: CrossValidator::new(),
            scorer: CredibilityScorer::new(),
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            max_results: 50,
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Build a referencer from runtime config: backends from environment
    /// keys, extraction settings from the config's LLM section.
    pub fn from_config(
        config: &crate::config::RuntimeConfig,
        provider: std::sync::Arc<dyn crate::providers::LlmProvider>,
    ) -> Result<Self, crate::config::ConfigError> {
        let manager = SourceManager::from_env(&config.news.preferred_source);
        let extractor = EventExtractor::with_config(
            provider,
            config.llm.completion_config()?,
            super::extractor::ExtractorConfig {
                batch_size: config.news.extraction_batch_size,
                min_confidence: config.news.min_event_confidence,
            },
        );

        let mut referencer = Self::new(manager, extractor).with_max_results(config.news.max_results);
        if !config.news.keywords.is_empty() {
            referencer = referencer.with_keywords(config.news.keywords.clone());
        }
        Ok(referencer)
    }

    /// Run the four stages over one record.
    pub async fn cross_check(&self, record: &DisclosureRecord) -> CrossCheckOutcome {
        if self.manager.is_empty() {
            return CrossCheckOutcome::DataUnavailable {
                reason: "no news search backends configured".to_string(),
            };
        }

        let Some(query) = self.build_query(record) else {
            return CrossCheckOutcome::Failed {
                reason: format!("cannot build report period for year {}", record.report_year),
            };
        };

        // 1. Search (failure inside the manager already degrades to empty)
        let articles = self.manager.search(&query).await;

        // 2. Extract events
        let events = self
            .extractor
            .extract_events(&articles, &record.company_name)
            .await;

        // 3. Cross-validate
        let contradictions = self.cross_validator.validate(record, &events);

        // 4. Credibility score
        let credibility = self.scorer.score(&contradictions, events.len());

        tracing::info!(
            company = %record.company_name,
            articles = articles.len(),
            events = events.len(),
            contradictions = contradictions.len(),
            credibility,
            "news cross-reference complete"
        );

        let findings = contradictions.iter().map(to_finding).collect();

        let result = ValidationResult {
            validator_name: format!("adapter:{}", NEWS_ADAPTER_NAME),
            score: Some(credibility / 100.0),
            findings,
            metadata: Default::default(),
        }
        .with_meta("news_articles_found", articles.len().into())
        .with_meta("events_extracted", events.len().into())
        .with_meta("contradictions_found", contradictions.len().into())
        .with_meta(
            "report_period",
            format!("{} to {}", query.start_date, query.end_date).into(),
        )
        .with_meta(
            "data_sources_used",
            serde_json::to_value(self.manager.source_names()).unwrap_or_default(),
        )
        .with_meta("credibility_rating", self.scorer.rating(credibility).into());

        CrossCheckOutcome::Evaluated(result)
    }

    fn build_query(&self, record: &DisclosureRecord) -> Option<SearchQuery> {
        let mut query = SearchQuery::for_report_year(&record.company_name, record.report_year)?;
        query.keywords = self.keywords.clone();
        query.max_results = self.max_results;
        Some(query)
    }
}

fn to_finding(contradiction: &Contradiction) -> Finding {
    let mut finding = Finding::new(
        NEWS_ADAPTER_NAME,
        format!("NEWS-{}", contradiction.kind.as_str().to_uppercase()),
        contradiction.severity.into(),
        format!(
            "{}: {}",
            contradiction.kind.as_str(),
            contradiction.evidence_from_news
        ),
    )
    .with_field("credibility")
    .with_evidence(contradiction.event.source_article.url.clone())
    .with_recommendation(contradiction.recommendation.clone());

    if let Some(claim) = &contradiction.claim_in_report {
        finding.message = format!("{} (claim: {})", finding.message, claim);
    }
    finding
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::models::NewsArticle;
    use crate::news::sources::{NewsSource, SourceError};
    use crate::providers::{
        ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use verdra_core::Severity;

    struct StaticSource {
        articles: Vec<NewsArticle>,
    }

    #[async_trait]
    impl NewsSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn search(&self, _query: &SearchQuery) -> Result<Vec<NewsArticle>, SourceError> {
            Ok(self.articles.clone())
        }
    }

    struct StaticProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for StaticProvider {
        async fn complete(
            &self,
            _messages: Vec<ChatMessage>,
            _config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: self.response.clone(),
                model: "static".to_string(),
                stop_reason: None,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    fn article() -> NewsArticle {
        NewsArticle {
            title: "Acme fined over discharge".to_string(),
            url: "https://example.com/acme-fine".to_string(),
            source: "Reuters".to_string(),
            published_date: "2023-06-15".to_string(),
            snippet: "Regulators fined Acme $5M".to_string(),
            relevance_score: 0.0,
        }
    }

    fn referencer(articles: Vec<NewsArticle>, response: &str) -> NewsCrossReferencer {
        let manager = SourceManager::new(vec![Box::new(StaticSource { articles })]);
        let extractor = EventExtractor::new(Arc::new(StaticProvider {
            response: response.to_string(),
        }));
        NewsCrossReferencer::new(manager, extractor)
    }

    const FINE_JSON: &str = r#"{
        "event_type": "fine",
        "description": "Regulators fined Acme $5M for discharge violations",
        "date": "2023-06-15",
        "severity": "critical",
        "financial_impact": 5000000.0,
        "keywords": ["discharge", "fine"],
        "confidence": 0.9
    }"#;

    #[tokio::test]
    async fn no_backends_is_data_unavailable() {
        let manager = SourceManager::new(vec![]);
        let extractor = EventExtractor::new(Arc::new(StaticProvider {
            response: "null".to_string(),
        }));
        let referencer = NewsCrossReferencer::new(manager, extractor);
        let record = DisclosureRecord::new("Acme", 2023);

        assert!(matches!(
            referencer.cross_check(&record).await,
            CrossCheckOutcome::DataUnavailable { .. }
        ));
    }

    #[tokio::test]
    async fn clean_company_scores_full_credibility() {
        let referencer = referencer(vec![], "null");
        let record = DisclosureRecord::new("Acme", 2023);

        match referencer.cross_check(&record).await {
            CrossCheckOutcome::Evaluated(result) => {
                assert_eq!(result.validator_name, "adapter:news");
                assert_eq!(result.score, Some(1.0));
                assert!(result.findings.is_empty());
                assert_eq!(result.metadata["news_articles_found"], 0);
                assert_eq!(result.metadata["credibility_rating"], "Excellent");
            }
            other => panic!("expected Evaluated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn undisclosed_fine_produces_contradiction_findings() {
        let referencer = referencer(vec![article()], FINE_JSON);
        let record = DisclosureRecord::new("Acme", 2023);

        match referencer.cross_check(&record).await {
            CrossCheckOutcome::Evaluated(result) => {
                // Omission (critical, -30 tier) and timing mismatch (critical
                // tier) both fire for the same undisclosed event.
                let codes: Vec<&str> =
                    result.findings.iter().map(|f| f.code.as_str()).collect();
                assert!(codes.contains(&"NEWS-OMISSION"));
                assert!(codes.contains(&"NEWS-TIMING_MISMATCH"));
                assert_eq!(result.score, Some(0.4));
                assert!(result
                    .findings
                    .iter()
                    .any(|f| f.severity == Severity::Critical));
                assert_eq!(result.metadata["events_extracted"], 1);
            }
            other => panic!("expected Evaluated, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn irrelevant_articles_leave_credibility_untouched() {
        let referencer = referencer(vec![article()], "null");
        let record = DisclosureRecord::new("Acme", 2023);

        match referencer.cross_check(&record).await {
            CrossCheckOutcome::Evaluated(result) => {
                assert_eq!(result.metadata["news_articles_found"], 1);
                assert_eq!(result.metadata["events_extracted"], 0);
                assert_eq!(result.score, Some(1.0));
            }
            other => panic!("expected Evaluated, got {:?}", other),
        }
    }
}
