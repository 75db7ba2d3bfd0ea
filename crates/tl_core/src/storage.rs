use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use crate::types::{EmbeddedArticle, Timeline};
use crate::Result;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch embedded articles matching `query` published in `[after, before)`
    async fn fetch_articles(
        &self,
        query: &str,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<Vec<EmbeddedArticle>>;
}

#[async_trait]
pub trait TimelineCache: Send + Sync {
    /// Get a cached timeline, `None` on a miss or an expired entry
    async fn get(&self, key: &str) -> Result<Option<Timeline>>;

    /// Store a timeline for `ttl`
    async fn put(&self, key: &str, timeline: &Timeline, ttl: Duration) -> Result<()>;
}
