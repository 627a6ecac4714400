//! # verdra-runtime
//!
//! Network-bound subsystems for Verdra: the news cross-referencer and the
//! LLM provider abstraction behind it.
//!
//! ## Important
//!
//! This crate is OPTIONAL. The core evaluation in `verdra-core` is fully
//! deterministic and never touches the network.
//!
//! Use this crate when:
//! - Disclosed claims should be reconciled against independently reported
//!   news events
//! - You have news backend API keys and an LLM provider available
//!
//! Failure handling follows one policy throughout: external faults are
//! caught at the stage boundary and degrade into "no results" or a recorded
//! finding; they never abort an evaluation.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verdra_core::{DisclosureRecord, Pipeline};
//! use verdra_runtime::news::{BraveNews, EventExtractor, NewsCrossReferencer, SourceManager};
//! use verdra_runtime::providers::{AnthropicProvider, ApiCredential};
//! use verdra_runtime::Orchestrator;
//!
//! let manager = SourceManager::new(vec![Box::new(BraveNews::new(
//!     ApiCredential::from_env("BRAVE_API_KEY", "Brave API key")?,
//! ))]);
//! let extractor = EventExtractor::new(Arc::new(AnthropicProvider::from_env()?));
//!
//! let orchestrator = Orchestrator::new(Pipeline::default_pipeline())
//!     .with_news(NewsCrossReferencer::new(manager, extractor));
//!
//! let record = DisclosureRecord::from_json_file("acme-2023.json")?;
//! let results = orchestrator.run(&record, true).await;
//! ```

pub mod config;
pub mod news;
pub mod orchestrator;
pub mod prompts;
pub mod providers;

pub use config::{ConfigError, LlmConfig, NewsConfig, RuntimeConfig};
pub use orchestrator::Orchestrator;
