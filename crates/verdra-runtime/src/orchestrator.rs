//! Async orchestrator: the deterministic core pipeline plus the news stage.
//!
//! The core pipeline runs first (validators, then registry adapters); the
//! news cross-referencer runs last, under a stage-level timeout so one slow
//! external call cannot hold the evaluation indefinitely. Every degraded
//! stage lands in the result list instead of aborting the run.

use std::time::Duration;

use verdra_core::{
    outcome_to_result, CrossCheckOutcome, DisclosureRecord, Pipeline, ValidationResult,
};

use crate::news::{NewsCrossReferencer, NEWS_ADAPTER_NAME};

const DEFAULT_NEWS_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs a full evaluation: rule validators, registry adapters, news stage.
pub struct Orchestrator {
    pipeline: Pipeline,
    news: Option<NewsCrossReferencer>,
    news_timeout: Duration,
}

impl Orchestrator {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            news: None,
            news_timeout: DEFAULT_NEWS_TIMEOUT,
        }
    }

    /// Attach a news cross-referencer for the external phase.
    pub fn with_news(mut self, news: NewsCrossReferencer) -> Self {
        self.news = Some(news);
        self
    }

    /// Upper bound on the whole news stage.
    pub fn with_news_timeout(mut self, timeout: Duration) -> Self {
        self.news_timeout = timeout;
        self
    }

    /// Run the evaluation. Order-stable: core results precede the news
    /// result.
    pub async fn run(
        &self,
        record: &DisclosureRecord,
        cross_validate: bool,
    ) -> Vec<ValidationResult> {
        let mut results = self.pipeline.run(record, cross_validate);

        if cross_validate {
            if let Some(news) = &self.news {
                let outcome =
                    match tokio::time::timeout(self.news_timeout, news.cross_check(record)).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            tracing::warn!(
                                timeout = ?self.news_timeout,
                                "news cross-reference timed out"
                            );
                            CrossCheckOutcome::Failed {
                                reason: format!(
                                    "news cross-reference timed out after {:?}",
                                    self.news_timeout
                                ),
                            }
                        }
                    };
                results.push(outcome_to_result(NEWS_ADAPTER_NAME, outcome));
            }
        }

        results
    }
}
