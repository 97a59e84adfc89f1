pub mod config;
pub mod error;
pub mod models;
pub mod feeds;
pub mod links;
pub mod llm;
pub mod curation;
pub mod bluesky;
pub mod storage;
pub mod logging;
pub mod notify;

#[cfg(test)]
mod testing;

pub use config::{BlueskyCredentials, CapPolicy, Config, PipelineConfig};
pub use error::{Error, Result};
pub use feeds::{FeedCollector, HttpContentFetcher, HttpFeedSource};
pub use llm::{GeminiProvider, LLMProvider};
pub use curation::{Curator, PublishPipeline, RunOutcome, Stage};
pub use bluesky::{BlueskyClient, PostingTransport, ThreadPublisher};
pub use storage::SeenStore;
