use async_trait::async_trait;

use crate::error::Result;
use crate::models::{PostReference, PostUnit, ReplyRef};

/// The account-side half of posting: one session, then one call per post.
#[async_trait]
pub trait PostingTransport: Send + Sync {
    async fn login(&self, handle: &str, app_password: &str) -> Result<()>;

    async fn create_post(
        &self,
        post: &PostUnit,
        reply_to: Option<&ReplyRef>,
    ) -> Result<PostReference>;
}
