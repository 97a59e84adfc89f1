use std::env;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BLUESKY_SERVICE: &str = "https://bsky.social";

#[derive(Debug, Clone)]
pub struct Config {
    pub feed_urls: Vec<String>,
    pub bluesky: BlueskyCredentials,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub database_path: String,
    pub log_dir: String,
    pub max_summaries: usize,
    pub max_items: Option<usize>,
    pub cap_policy: CapPolicy,
    pub fetch_full_content: bool,
    pub link_cards: bool,
}

impl Config {
    /// Reads the run configuration from the environment.
    ///
    /// A missing `RSS_URLS` is not an error here: the pipeline initializes the
    /// store first and then refuses to run with an empty feed list.
    pub fn from_env() -> Result<Self> {
        let feed_urls = env::var("RSS_URLS")
            .map(|v| parse_feed_urls(&v))
            .unwrap_or_default();

        let bluesky = BlueskyCredentials::from_env()?;

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| Error::Config("GEMINI_API_KEY environment variable not set".to_string()))?;

        let gemini_model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let database_path = env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "rss_cache.db".to_string());

        let log_dir = log_dir_from_env();

        let max_summaries = env::var("MAX_SUMMARIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let max_items = env::var("MAX_ITEMS").ok().and_then(|v| v.parse().ok());

        let cap_policy = match env::var("ITEM_CAP_POLICY") {
            Ok(v) => v.parse()?,
            Err(_) => CapPolicy::Newest,
        };

        let fetch_full_content = env::var("FETCH_FULL_CONTENT")
            .ok()
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let link_cards = env::var("LINK_CARDS")
            .ok()
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self {
            feed_urls,
            bluesky,
            gemini_api_key,
            gemini_model,
            database_path,
            log_dir,
            max_summaries,
            max_items,
            cap_policy,
            fetch_full_content,
            link_cards,
        })
    }
}

#[derive(Clone)]
pub struct BlueskyCredentials {
    pub handle: String,
    pub app_password: String,
    pub service: String,
}

impl BlueskyCredentials {
    pub fn from_env() -> Result<Self> {
        let handle = env::var("BLUESKY_HANDLE")
            .map_err(|_| Error::Config("BLUESKY_HANDLE environment variable not set".to_string()))?;

        let app_password = env::var("BLUESKY_APP_PASSWORD").map_err(|_| {
            Error::Config("BLUESKY_APP_PASSWORD environment variable not set".to_string())
        })?;

        let service = env::var("BLUESKY_SERVICE")
            .unwrap_or_else(|_| DEFAULT_BLUESKY_SERVICE.to_string());

        Ok(Self {
            handle,
            app_password,
            service,
        })
    }
}

// Keeps the app password out of logs.
impl std::fmt::Debug for BlueskyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueskyCredentials")
            .field("handle", &self.handle)
            .field("app_password", &"***")
            .field("service", &self.service)
            .finish()
    }
}

/// Which end of the chronologically sorted batch survives a size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapPolicy {
    Oldest,
    #[default]
    Newest,
}

impl FromStr for CapPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "oldest" => Ok(CapPolicy::Oldest),
            "newest" => Ok(CapPolicy::Newest),
            other => Err(Error::Config(format!(
                "unknown item cap policy '{}', expected 'oldest' or 'newest'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub feed_urls: Vec<String>,
    pub max_summaries: usize,
    pub max_items: Option<usize>,
    pub cap_policy: CapPolicy,
    pub link_cards: bool,
    pub dry_run: bool,
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            feed_urls: config.feed_urls.clone(),
            max_summaries: config.max_summaries,
            max_items: config.max_items,
            cap_policy: config.cap_policy,
            link_cards: config.link_cards,
            dry_run: false,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_urls: Vec::new(),
            max_summaries: 3,
            max_items: None,
            cap_policy: CapPolicy::default(),
            link_cards: true,
            dry_run: false,
        }
    }
}

/// `LOG_DIR`, or `log` when unset. Read separately so logging can start
/// before the rest of the configuration is validated.
pub fn log_dir_from_env() -> String {
    env::var("LOG_DIR")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "log".to_string())
}

pub fn parse_feed_urls(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(String::from)
        .collect()
}
