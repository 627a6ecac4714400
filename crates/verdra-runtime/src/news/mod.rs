//! News-based cross-referencing subsystem.
//!
//! Four sequential stages per run: multi-source search, LLM event
//! extraction, contradiction detection, credibility scoring.

mod credibility;
mod cross_validator;
mod extractor;
mod models;
mod referencer;
mod schema;
mod sources;

pub use credibility::CredibilityScorer;
pub use cross_validator::CrossValidator;
pub use extractor::{EventExtractor, ExtractorConfig};
pub use models::{
    Contradiction, ContradictionKind, ContradictionSeverity, EnvironmentalEvent, EventKind,
    EventSeverity, NewsArticle,
};
pub use referencer::{NewsCrossReferencer, NEWS_ADAPTER_NAME};
pub use schema::validate_event_json;
pub use sources::{
    BingNews, BraveNews, GoogleNews, NewsSource, SearchQuery, SourceError, SourceManager,
    BING_NEWS_API_KEY_ENV, BRAVE_API_KEY_ENV, DEFAULT_KEYWORDS, GOOGLE_NEWS_API_KEY_ENV,
};
