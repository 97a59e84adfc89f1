use std::sync::Arc;

use crate::llm::prompts::{ranking_prompt, summary_prompt};
use crate::llm::{match_ranking, LLMProvider};
use crate::models::{CandidateItem, RankedItem};

/// Shown in place of a summary when the backend fails.
pub const SUMMARY_FAILED_NOTE: &str = "(Summary generation failed.)";

/// Ranks and summarizes candidates through an injected LLM backend.
pub struct Curator {
    llm: Arc<dyn LLMProvider>,
}

impl Curator {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self { llm }
    }

    /// Orders items by importance.
    ///
    /// The result is a permutation of the input. It is empty only when the
    /// input is empty or the backend call itself failed, which callers treat
    /// as "ranking unavailable".
    pub async fn rank(&self, items: Vec<CandidateItem>) -> Vec<RankedItem> {
        if items.is_empty() {
            return Vec::new();
        }

        let prompt = ranking_prompt(&items);
        tracing::info!(
            "Ranking {} items with {} ({})",
            items.len(),
            self.llm.name(),
            self.llm.model()
        );

        let response = match self.llm.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Ranking request failed: {}", e);
                return Vec::new();
            }
        };

        let order = match_ranking(&response, &items);
        if order.is_empty() {
            tracing::warn!("Could not map ranking response to any item, keeping feed order");
            return RankedItem::in_order(items);
        }

        if order.len() < items.len() {
            tracing::debug!(
                "Ranking mentioned {} of {} items, appending the rest in feed order",
                order.len(),
                items.len()
            );
        }

        let mut slots: Vec<Option<CandidateItem>> = items.into_iter().map(Some).collect();
        let mut ranked: Vec<CandidateItem> = order
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect();
        ranked.extend(slots.into_iter().flatten());

        RankedItem::in_order(ranked)
    }

    /// Three-sentence summary of `content`; empty input yields an empty string.
    pub async fn summarize(&self, content: &str) -> String {
        if content.trim().is_empty() {
            return String::new();
        }

        match self.llm.generate(&summary_prompt(content)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!("Summary request failed: {}", e);
                SUMMARY_FAILED_NOTE.to_string()
            }
        }
    }
}
