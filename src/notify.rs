//! Single-post announcement of a newly opened pull request, driven by a
//! GitHub Actions event payload.

use serde::Deserialize;
use std::path::Path;

use crate::bluesky::ThreadPublisher;
use crate::curation::composer::{truncate_graphemes, MAX_POST_GRAPHEMES, TRUNCATION_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::models::{PostUnit, PublishedThread};

const MAX_BODY_GRAPHEMES: usize = 100;

#[derive(Deserialize)]
struct PullRequestEvent {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Deserialize)]
struct PullRequestPayload {
    title: Option<String>,
    html_url: Option<String>,
    user: Option<PayloadUser>,
    body: Option<String>,
}

#[derive(Deserialize)]
struct PayloadUser {
    login: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestNotice {
    pub title: String,
    pub url: String,
    pub author: String,
    pub body: String,
}

impl PullRequestNotice {
    pub fn from_event_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_event_json(&raw)
    }

    pub fn from_event_json(raw: &str) -> Result<Self> {
        let event: PullRequestEvent = serde_json::from_str(raw)?;
        let pr = event
            .pull_request
            .ok_or_else(|| Error::Config("event payload has no pull_request".to_string()))?;

        Ok(Self {
            title: non_empty(pr.title).unwrap_or_else(|| "(untitled)".to_string()),
            url: non_empty(pr.html_url).unwrap_or_else(|| "#".to_string()),
            author: non_empty(pr.user.and_then(|u| u.login))
                .unwrap_or_else(|| "unknown author".to_string()),
            body: non_empty(pr.body).unwrap_or_else(|| "(no description)".to_string()),
        })
    }

    pub fn compose(&self) -> PostUnit {
        let body = truncate_graphemes(self.body.trim(), MAX_BODY_GRAPHEMES, TRUNCATION_PLACEHOLDER);
        let text = format!(
            "New pull request opened\n\nTitle: {}\nAuthor: {}\n\n{}\n\nLink:\n{}",
            self.title, self.author, body, self.url
        );

        PostUnit::text(truncate_graphemes(&text, MAX_POST_GRAPHEMES, TRUNCATION_PLACEHOLDER))
    }
}

pub async fn announce(
    publisher: &ThreadPublisher,
    notice: &PullRequestNotice,
) -> Result<PublishedThread> {
    let post = notice.compose();
    tracing::info!("Announcing pull request: {}", notice.url);
    publisher.publish(std::slice::from_ref(&post)).await
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlueskyCredentials;
    use crate::curation::composer::grapheme_len;
    use crate::testing::RecordingTransport;
    use std::io::Write;
    use std::sync::Arc;

    const EVENT: &str = r#"{
        "action": "opened",
        "pull_request": {
            "title": "Add thread publisher",
            "html_url": "https://github.com/example/repo/pull/7",
            "user": { "login": "octocat" },
            "body": "Implements reply chaining."
        }
    }"#;

    #[test]
    fn test_parse_event() {
        let notice = PullRequestNotice::from_event_json(EVENT).unwrap();
        assert_eq!(notice.title, "Add thread publisher");
        assert_eq!(notice.url, "https://github.com/example/repo/pull/7");
        assert_eq!(notice.author, "octocat");
        assert_eq!(notice.body, "Implements reply chaining.");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let payload = r#"{"pull_request": {"body": null, "user": {}}}"#;
        let notice = PullRequestNotice::from_event_json(payload).unwrap();
        assert_eq!(notice.title, "(untitled)");
        assert_eq!(notice.url, "#");
        assert_eq!(notice.author, "unknown author");
        assert_eq!(notice.body, "(no description)");
    }

    #[test]
    fn test_event_without_pull_request_is_rejected() {
        let result = PullRequestNotice::from_event_json(r#"{"action": "push"}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_reads_event_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EVENT.as_bytes()).unwrap();

        let notice = PullRequestNotice::from_event_file(file.path()).unwrap();
        assert_eq!(notice.author, "octocat");
    }

    #[test]
    fn test_compose_truncates_long_body() {
        let notice = PullRequestNotice {
            title: "T".to_string(),
            url: "https://github.com/example/repo/pull/1".to_string(),
            author: "a".to_string(),
            body: "x".repeat(500),
        };

        let post = notice.compose();

        assert!(post.text.starts_with("New pull request opened\n\nTitle: T\nAuthor: a\n\n"));
        assert!(post.text.contains(&format!("{}...", "x".repeat(97))));
        assert!(post.text.ends_with("Link:\nhttps://github.com/example/repo/pull/1"));
        assert!(grapheme_len(&post.text) <= MAX_POST_GRAPHEMES);
    }

    #[tokio::test]
    async fn test_announce_posts_single_root() {
        let transport = Arc::new(RecordingTransport::new());
        let publisher = ThreadPublisher::new(
            transport.clone(),
            BlueskyCredentials {
                handle: "bot.bsky.social".to_string(),
                app_password: "pw".to_string(),
                service: "https://bsky.social".to_string(),
            },
        );
        let notice = PullRequestNotice::from_event_json(EVENT).unwrap();

        let thread = announce(&publisher, &notice).await.unwrap();

        assert_eq!(thread.len(), 1);
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].reply_to.is_none());
        assert!(calls[0].text.contains("Author: octocat"));
    }
}
