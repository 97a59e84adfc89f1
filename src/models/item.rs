use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry as returned by a feed source, before dedup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

/// A not-yet-published item collected during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub title: String,
    /// Canonical URL, also the item's identity in the seen store.
    pub link: String,
    /// Teaser text provided by the feed.
    pub summary: String,
    /// Fetched article body, or the teaser when enrichment is off or failed.
    pub content: String,
    pub published: Option<DateTime<Utc>>,
}

impl CandidateItem {
    pub fn from_entry(entry: FeedEntry, content: Option<String>) -> Self {
        let content = content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| entry.summary.clone());

        Self {
            title: entry.title,
            link: entry.link,
            summary: entry.summary,
            content,
            published: entry.published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItem {
    /// 1-based position in the ranking.
    pub position: usize,
    pub item: CandidateItem,
}

impl RankedItem {
    pub fn in_order(items: Vec<CandidateItem>) -> Vec<RankedItem> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| RankedItem { position: i + 1, item })
            .collect()
    }
}
