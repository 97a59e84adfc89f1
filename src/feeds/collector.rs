use std::collections::HashSet;
use std::sync::Arc;

use crate::config::CapPolicy;
use crate::error::Result;
use crate::feeds::content::ContentFetcher;
use crate::feeds::source::FeedSource;
use crate::models::CandidateItem;
use crate::storage::SeenStore;

/// Gathers unseen items from every configured feed, oldest first.
pub struct FeedCollector {
    source: Arc<dyn FeedSource>,
    content: Option<Arc<dyn ContentFetcher>>,
}

impl FeedCollector {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            content: None,
        }
    }

    /// Enables full-text enrichment of every collected item.
    pub fn with_content_fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.content = Some(fetcher);
        self
    }

    /// Feed failures are logged and skipped; only store errors are returned.
    pub async fn collect(
        &self,
        feed_urls: &[String],
        store: &SeenStore,
    ) -> Result<Vec<CandidateItem>> {
        let mut items = Vec::new();
        let mut collected = HashSet::new();

        for feed_url in feed_urls {
            let entries = match self.source.fetch(feed_url).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Skipping feed {}: {}", feed_url, e);
                    continue;
                }
            };

            tracing::info!("Feed {} returned {} entries", feed_url, entries.len());

            for entry in entries {
                if store.exists(&entry.link)? {
                    tracing::debug!("Already published: {}", entry.link);
                    continue;
                }
                if !collected.insert(entry.link.clone()) {
                    tracing::debug!("Duplicate within run: {}", entry.link);
                    continue;
                }

                let content = match &self.content {
                    Some(fetcher) => Some(fetcher.fetch_text(&entry.link).await),
                    None => None,
                };

                items.push(CandidateItem::from_entry(entry, content));
            }
        }

        sort_chronologically(&mut items);
        Ok(items)
    }
}

/// Ascending by publish time; undated items keep their encounter order after all dated ones.
pub fn sort_chronologically(items: &mut [CandidateItem]) {
    items.sort_by_key(|item| (item.published.is_none(), item.published));
}

/// Bounds a chronologically sorted batch to `max` items.
pub fn apply_cap(
    mut items: Vec<CandidateItem>,
    max: Option<usize>,
    policy: CapPolicy,
) -> Vec<CandidateItem> {
    let Some(max) = max else {
        return items;
    };
    if items.len() <= max {
        return items;
    }

    match policy {
        CapPolicy::Oldest => {
            items.truncate(max);
            items
        }
        CapPolicy::Newest => items.split_off(items.len() - max),
    }
}
