use async_trait::async_trait;

use crate::error::Result;

/// A generative-text backend: one prompt in, raw text out.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
    fn model(&self) -> &str;
    fn name(&self) -> &str;
}
