use unicode_segmentation::UnicodeSegmentation;

use crate::models::{CandidateItem, ExternalLink, PostUnit, RankedItem};

/// Bluesky's displayed-length limit, in graphemes.
pub const MAX_POST_GRAPHEMES: usize = 300;
pub const TRUNCATION_PLACEHOLDER: &str = "...";
pub const ROOT_HEADER: &str = "[Feed digest]\n\nToday's picks, ranked by AI:\n";

/// Renders ranked items and summaries into post bodies within the budget.
#[derive(Debug, Clone)]
pub struct PostComposer {
    budget: usize,
    placeholder: String,
    link_cards: bool,
}

impl PostComposer {
    pub fn new(link_cards: bool) -> Self {
        Self {
            budget: MAX_POST_GRAPHEMES,
            placeholder: TRUNCATION_PLACEHOLDER.to_string(),
            link_cards,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    pub fn compose_root(&self, ranked: &[RankedItem]) -> PostUnit {
        let mut text = String::from(ROOT_HEADER);
        for ranked_item in ranked {
            text.push_str(&format!(
                "\n{}. {}\n{}",
                ranked_item.position, ranked_item.item.title, ranked_item.item.link
            ));
        }

        PostUnit::text(self.fit(&text))
    }

    pub fn compose_reply(&self, item: &CandidateItem, summary: &str) -> PostUnit {
        let mut text = format!("[Summary] {}\n\n{}", item.title, summary);

        if !self.link_cards {
            text.push_str(&format!("\n\n{}", item.link));
            return PostUnit::text(self.fit(&text));
        }

        PostUnit::text(self.fit(&text)).with_embed(ExternalLink {
            uri: item.link.clone(),
            title: item.title.clone(),
            description: summary.to_string(),
        })
    }

    pub fn fit(&self, text: &str) -> String {
        truncate_graphemes(text, self.budget, &self.placeholder)
    }
}

impl Default for PostComposer {
    fn default() -> Self {
        Self::new(true)
    }
}

pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Cuts `text` to at most `budget` graphemes, ending in `placeholder` when cut.
///
/// Text within the budget is returned unchanged. A placeholder longer than the
/// budget is itself cut to the budget.
pub fn truncate_graphemes(text: &str, budget: usize, placeholder: &str) -> String {
    if grapheme_len(text) <= budget {
        return text.to_string();
    }

    let placeholder_len = grapheme_len(placeholder);
    if placeholder_len > budget {
        return placeholder.graphemes(true).take(budget).collect();
    }

    let mut truncated: String = text.graphemes(true).take(budget - placeholder_len).collect();
    truncated.push_str(placeholder);
    truncated
}
