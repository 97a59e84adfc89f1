use std::sync::Arc;

use crate::bluesky::transport::PostingTransport;
use crate::config::BlueskyCredentials;
use crate::error::{Error, Result};
use crate::models::{PostUnit, PublishedThread, ReplyRef};

/// Publishes composed posts as a single reply chain.
pub struct ThreadPublisher {
    transport: Arc<dyn PostingTransport>,
    credentials: BlueskyCredentials,
}

impl ThreadPublisher {
    pub fn new(transport: Arc<dyn PostingTransport>, credentials: BlueskyCredentials) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    /// Posts `posts` as a thread: the first non-blank post is the root and
    /// every later non-blank post replies to the one submitted before it.
    ///
    /// Blank posts are skipped. The first failed call aborts the whole
    /// publish; posts created before it stay on the remote side but no
    /// partial thread is returned.
    pub async fn publish(&self, posts: &[PostUnit]) -> Result<PublishedThread> {
        if posts.is_empty() {
            return Err(Error::Publish("no posts to publish".to_string()));
        }

        let mut live = posts.iter().filter(|p| !p.is_blank());
        let Some(root_post) = live.next() else {
            return Err(Error::Publish("every post in the thread is blank".to_string()));
        };

        let skipped = posts.iter().filter(|p| p.is_blank()).count();
        if skipped > 0 {
            tracing::debug!("Skipping {} blank post(s)", skipped);
        }

        self.transport
            .login(&self.credentials.handle, &self.credentials.app_password)
            .await
            .map_err(|e| Error::Publish(format!("login failed: {}", e)))?;

        let root = self
            .transport
            .create_post(root_post, None)
            .await
            .map_err(|e| Error::Publish(format!("root post failed: {}", e)))?;
        tracing::info!("Posted thread root {}", root.uri);

        let mut parent = root.clone();
        let mut created = vec![root.clone()];

        for (n, post) in live.enumerate() {
            let reply_to = ReplyRef {
                root: root.clone(),
                parent: parent.clone(),
            };

            let reference = self
                .transport
                .create_post(post, Some(&reply_to))
                .await
                .map_err(|e| Error::Publish(format!("reply {} failed: {}", n + 1, e)))?;
            tracing::debug!("Posted reply {} as {}", n + 1, reference.uri);

            parent = reference.clone();
            created.push(reference);
        }

        tracing::info!("Published thread with {} post(s)", created.len());
        Ok(PublishedThread {
            root,
            posts: created,
        })
    }
}
