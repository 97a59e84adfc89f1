use serde::{Deserialize, Serialize};

/// Preview card attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub uri: String,
    pub title: String,
    pub description: String,
}

/// Body of a single post, ready to submit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PostUnit {
    pub text: String,
    pub embed: Option<ExternalLink>,
}

impl PostUnit {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embed: None,
        }
    }

    pub fn with_embed(mut self, embed: ExternalLink) -> Self {
        self.embed = Some(embed);
        self
    }

    /// Blank posts are never submitted.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Strong reference to a created post (`uri` + content hash `cid`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub root: PostReference,
    pub parent: PostReference,
}

/// References of every post of a fully published thread, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedThread {
    pub root: PostReference,
    pub posts: Vec<PostReference>,
}

impl PublishedThread {
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
