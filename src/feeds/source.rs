use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::feeds::content::html_to_text;
use crate::models::FeedEntry;

pub const USER_AGENT: &str = concat!("feedthread/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches and parses one feed, returning its entries in document order.
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>>;
}

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(
                "application/rss+xml, application/atom+xml, application/xml;q=0.9, */*;q=0.8",
            ),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        tracing::debug!("Fetching feed: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Feed(format!("Failed to fetch feed {}: {}", url, status)));
        }

        let body = response.bytes().await?;
        parse_feed(&body)
    }
}

/// Parses RSS/Atom/JSON Feed bytes into entries. Entries without a link are dropped.
pub fn parse_feed(body: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| Error::Feed(format!("Failed to parse feed: {}", e)))?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let Some(link) = primary_link(&entry) else {
                tracing::debug!("Skipping entry without link: {}", entry.id);
                return None;
            };

            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Untitled".to_string());

            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|s| html_to_text(&s))
                .unwrap_or_default();

            Some(FeedEntry {
                title,
                link,
                summary,
                published: entry.published.or(entry.updated),
            })
        })
        .collect();

    Ok(entries)
}

fn primary_link(entry: &feed_rs::model::Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty())
}
