//! In-memory doubles for the external collaborators, shared by unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::bluesky::PostingTransport;
use crate::error::{Error, Result};
use crate::feeds::{ContentFetcher, FeedSource};
use crate::llm::LLMProvider;
use crate::models::{FeedEntry, PostReference, PostUnit, ReplyRef};

pub fn entry(title: &str, link: &str, published_secs: Option<i64>) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        link: link.to_string(),
        summary: format!("Teaser for {}", title),
        published: published_secs.and_then(|s| Utc.timestamp_opt(s, 0).single()),
    }
}

#[derive(Default)]
pub struct StaticFeedSource {
    feeds: HashMap<String, Option<Vec<FeedEntry>>>,
    fetched: Mutex<Vec<String>>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: &str, entries: Vec<FeedEntry>) -> Self {
        self.feeds.insert(url.to_string(), Some(entries));
        self
    }

    pub fn with_failing_feed(mut self, url: &str) -> Self {
        self.feeds.insert(url.to_string(), None);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        self.fetched.lock().unwrap().push(url.to_string());
        match self.feeds.get(url) {
            Some(Some(entries)) => Ok(entries.clone()),
            Some(None) => Err(Error::Feed(format!("Failed to fetch feed {}: 500", url))),
            None => Err(Error::Feed(format!("Unknown feed {}", url))),
        }
    }
}

#[derive(Default)]
pub struct StaticContentFetcher {
    pages: HashMap<String, String>,
}

impl StaticContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl ContentFetcher for StaticContentFetcher {
    async fn fetch_text(&self, url: &str) -> String {
        self.pages.get(url).cloned().unwrap_or_default()
    }
}

/// Replies from a queue; an `Err` entry simulates a backend failure.
#[derive(Default)]
pub struct ScriptedLLM {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLLM {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedLLM {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(Error::LLMApi(message)),
            None => Err(Error::LLMApi("no scripted reply left".to_string())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub text: String,
    pub embed_uri: Option<String>,
    pub reply_to: Option<ReplyRef>,
}

/// Records every call; can fail the login or the n-th (1-based) post creation.
#[derive(Default)]
pub struct RecordingTransport {
    fail_login: bool,
    fail_on_post: Option<usize>,
    logins: Mutex<Vec<String>>,
    calls: Mutex<Vec<CreateCall>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_login(mut self) -> Self {
        self.fail_login = true;
        self
    }

    pub fn failing_on_post(mut self, n: usize) -> Self {
        self.fail_on_post = Some(n);
        self
    }

    pub fn logins(&self) -> Vec<String> {
        self.logins.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<CreateCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reference(n: usize) -> PostReference {
        PostReference {
            uri: format!("at://did:plc:test/app.bsky.feed.post/{}", n),
            cid: format!("bafycid{}", n),
        }
    }
}

#[async_trait]
impl PostingTransport for RecordingTransport {
    async fn login(&self, handle: &str, _app_password: &str) -> Result<()> {
        self.logins.lock().unwrap().push(handle.to_string());
        if self.fail_login {
            return Err(Error::Bluesky("Invalid identifier or password".to_string()));
        }
        Ok(())
    }

    async fn create_post(
        &self,
        post: &PostUnit,
        reply_to: Option<&ReplyRef>,
    ) -> Result<PostReference> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(CreateCall {
            text: post.text.clone(),
            embed_uri: post.embed.as_ref().map(|e| e.uri.clone()),
            reply_to: reply_to.cloned(),
        });

        let n = calls.len();
        if self.fail_on_post == Some(n) {
            return Err(Error::Bluesky(format!("createRecord failed for post {}", n)));
        }
        Ok(Self::reference(n))
    }
}
