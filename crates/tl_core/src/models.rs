use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Summarize the articles backing one event
    async fn summarize(&self, articles: &[Article]) -> Result<String>;
}
