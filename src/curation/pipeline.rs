use std::fmt;

use crate::bluesky::ThreadPublisher;
use crate::config::PipelineConfig;
use crate::curation::composer::PostComposer;
use crate::curation::curator::Curator;
use crate::error::{Error, Result};
use crate::feeds::{apply_cap, FeedCollector};
use crate::models::{PostUnit, PublishedThread, RankedItem};
use crate::storage::SeenStore;

/// Stage at which a run gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ranking,
    Publishing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ranking => write!(f, "ranking"),
            Stage::Publishing => write!(f, "publishing"),
        }
    }
}

#[derive(Debug)]
pub enum RunOutcome {
    NoNewItems,
    /// The thread is live and `recorded` URLs were added to the seen store.
    Published {
        thread: PublishedThread,
        recorded: usize,
    },
    DryRun {
        posts: Vec<PostUnit>,
    },
    Aborted {
        stage: Stage,
        reason: String,
    },
}

impl RunOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RunOutcome::Aborted { .. })
    }
}

/// One poll-rank-summarize-post cycle.
pub struct PublishPipeline {
    collector: FeedCollector,
    curator: Curator,
    composer: PostComposer,
    publisher: ThreadPublisher,
    storage: SeenStore,
    config: PipelineConfig,
}

impl PublishPipeline {
    pub fn new(
        collector: FeedCollector,
        curator: Curator,
        publisher: ThreadPublisher,
        storage: SeenStore,
        config: PipelineConfig,
    ) -> Self {
        Self {
            collector,
            curator,
            composer: PostComposer::new(config.link_cards),
            publisher,
            storage,
            config,
        }
    }

    pub fn storage(&self) -> &SeenStore {
        &self.storage
    }

    pub async fn run(&mut self) -> Result<RunOutcome> {
        // Step 1: Make sure the dedup table exists
        self.storage.initialize()?;

        if self.config.feed_urls.is_empty() {
            return Err(Error::Config("RSS_URLS environment variable not set".to_string()));
        }

        // Step 2: Collect unseen items
        tracing::info!("Collecting new items from {} feed(s)", self.config.feed_urls.len());
        let items = self
            .collector
            .collect(&self.config.feed_urls, &self.storage)
            .await?;
        let items = apply_cap(items, self.config.max_items, self.config.cap_policy);

        if items.is_empty() {
            tracing::info!("No new items");
            return Ok(RunOutcome::NoNewItems);
        }
        tracing::info!("Found {} new item(s)", items.len());

        // Step 3: Rank
        let ranked = self.curator.rank(items).await;
        if ranked.is_empty() {
            return Ok(RunOutcome::Aborted {
                stage: Stage::Ranking,
                reason: "ranking backend unavailable".to_string(),
            });
        }

        // Step 4: Compose root and summary replies
        let posts = self.compose_thread(&ranked).await;

        if self.config.dry_run {
            tracing::info!("Dry run, composed {} post(s) without publishing", posts.len());
            return Ok(RunOutcome::DryRun { posts });
        }

        // Step 5: Publish
        let thread = match self.publisher.publish(&posts).await {
            Ok(thread) => thread,
            Err(e) => {
                tracing::error!("Publishing failed, seen store left unchanged: {}", e);
                return Ok(RunOutcome::Aborted {
                    stage: Stage::Publishing,
                    reason: e.to_string(),
                });
            }
        };

        // Step 6: Only a confirmed thread advances the dedup state
        let recorded = self
            .storage
            .add_all(ranked.iter().map(|r| r.item.link.as_str()))?;
        tracing::info!("Recorded {} URL(s) as published", recorded);

        Ok(RunOutcome::Published { thread, recorded })
    }

    async fn compose_thread(&self, ranked: &[RankedItem]) -> Vec<PostUnit> {
        let mut posts = vec![self.composer.compose_root(ranked)];

        for ranked_item in ranked.iter().take(self.config.max_summaries) {
            let summary = self.curator.summarize(&ranked_item.item.content).await;
            if summary.is_empty() {
                tracing::debug!("No summary for {}, skipping reply", ranked_item.item.link);
                continue;
            }
            posts.push(self.composer.compose_reply(&ranked_item.item, &summary));
        }

        posts
    }
}
