//! Prompt templates for LLM event extraction.
//!
//! The extraction prompt is a fixed single-turn template: the model either
//! returns a JSON object matching the event schema or the literal sentinel
//! `null` for articles that are not about an environmental event.

use crate::news::NewsArticle;

/// System prompt framing the extraction task.
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"
You are an environmental compliance analyst. You extract structured
information about environmental and climate events from news articles.

Rules:
1. Return ONLY a JSON object or the literal string null - no prose
2. Extract the event date, not the article publication date
3. Report financial figures in USD
4. State your confidence honestly; do not inflate it
"#;

/// Build the per-article extraction prompt.
pub fn extraction_prompt(company_name: &str, article: &NewsArticle) -> String {
    format!(
        r#"Extract structured information about environmental/climate events from the following news article.

Company: {company}
Article Title: {title}
Article Date: {date}
Article Content: {snippet}

Extract the following information (return JSON only):
{{
  "event_type": "fine|lawsuit|accident|regulation|violation|investigation|ngo_report|other",
  "description": "Brief description of the event",
  "date": "YYYY-MM-DD (event date, not article date)",
  "severity": "critical|high|medium|low",
  "financial_impact": 1000000.0 (in USD, null if not mentioned),
  "keywords": ["keyword1", "keyword2"],
  "confidence": 0.9 (0.0-1.0, your confidence in this extraction)
}}

If the article is not about an environmental/climate event related to {company}, return null."#,
        company = company_name,
        title = article.title,
        date = article.published_date,
        snippet = article.snippet,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> NewsArticle {
        NewsArticle {
            title: "Acme fined over discharge".to_string(),
            url: "https://example.com/a".to_string(),
            source: "Reuters".to_string(),
            published_date: "2023-06-15".to_string(),
            snippet: "Regulators fined Acme $5M".to_string(),
            relevance_score: 0.0,
        }
    }

    #[test]
    fn prompt_contains_company_and_article() {
        let prompt = extraction_prompt("Acme Industrial", &article());
        assert!(prompt.contains("Acme Industrial"));
        assert!(prompt.contains("Acme fined over discharge"));
        assert!(prompt.contains("return null"));
    }

    #[test]
    fn prompt_pins_the_schema_fields() {
        let prompt = extraction_prompt("Acme", &article());
        for field in ["event_type", "description", "date", "severity", "confidence"] {
            assert!(prompt.contains(field));
        }
    }
}
