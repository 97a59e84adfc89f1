use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::error::Result;
use crate::feeds::source::USER_AGENT;

/// Upper bound on extracted article text, keeps summary prompts small.
pub const MAX_CONTENT_CHARS: usize = 8_000;

/// Best-effort article text extraction.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Returns the article text, or an empty string on any failure.
    async fn fetch_text(&self, url: &str) -> String;
}

pub struct HttpContentFetcher {
    client: Client,
}

impl HttpContentFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    async fn try_fetch(&self, url: &str) -> Result<Option<String>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Content fetch for {} returned {}", url, response.status());
            return Ok(None);
        }

        let html = response.text().await?;
        Ok(Some(extract_article_text(&html)))
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        match self.try_fetch(url).await {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!("Failed to fetch article content from {}: {}", url, e);
                String::new()
            }
        }
    }
}

/// Paragraph text of a page. Paragraphs inside `<article>` win over the rest of the page.
pub fn extract_article_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let scoped = Selector::parse("article p").expect("Invalid article selector");
    let any = Selector::parse("p").expect("Invalid paragraph selector");

    let mut paragraphs: Vec<String> = document
        .select(&scoped)
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|p| !p.is_empty())
        .collect();

    if paragraphs.is_empty() {
        paragraphs = document
            .select(&any)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|p| !p.is_empty())
            .collect();
    }

    paragraphs.join("\n").chars().take(MAX_CONTENT_CHARS).collect()
}

/// Strips markup from a feed teaser.
pub fn html_to_text(fragment: &str) -> String {
    if !fragment.contains('<') {
        return normalize_whitespace(fragment);
    }

    let html = Html::parse_fragment(fragment);
    normalize_whitespace(&html.root_element().text().collect::<String>())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
