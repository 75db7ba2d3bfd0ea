use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tl_core::{ArticleSource, EmbeddedArticle, Result};
use tracing::debug;

/// Thumbnail given to articles that were ingested without one.
pub const DEFAULT_THUMBNAIL_URL: &str = "https://placehold.co/600x400?text=News";

/// Reads embedded articles from a JSON array on disk.
///
/// A query matches an article when its title or snippet contains it,
/// ignoring case. An empty query matches everything.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    default_thumbnail: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_thumbnail: DEFAULT_THUMBNAIL_URL.to_string(),
        }
    }

    pub fn with_default_thumbnail(mut self, url: impl Into<String>) -> Self {
        self.default_thumbnail = url.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every article in the file. A missing or null `thumbnail_url` falls
    /// back to the default thumbnail.
    pub async fn load(&self) -> Result<Vec<EmbeddedArticle>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let records: Vec<Value> = serde_json::from_str(&raw)?;
        records
            .into_iter()
            .map(|mut record| {
                if let Some(fields) = record.as_object_mut() {
                    if fields.get("thumbnail_url").map_or(true, Value::is_null) {
                        fields.insert(
                            "thumbnail_url".to_string(),
                            Value::String(self.default_thumbnail.clone()),
                        );
                    }
                }
                Ok(serde_json::from_value(record)?)
            })
            .collect()
    }
}

fn matches_query(article: &EmbeddedArticle, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || article.title.to_lowercase().contains(&query)
        || article.snippet.to_lowercase().contains(&query)
}

#[async_trait]
impl ArticleSource for JsonFileSource {
    async fn fetch_articles(
        &self,
        query: &str,
        after: DateTime<Utc>,
        before: DateTime<Utc>,
    ) -> Result<Vec<EmbeddedArticle>> {
        let articles = self.load().await?;
        let total = articles.len();
        let matched: Vec<_> = articles
            .into_iter()
            .filter(|a| after <= a.date_published && a.date_published < before)
            .filter(|a| matches_query(a, query))
            .collect();
        debug!(
            "{} of {} articles in {} match '{}'",
            matched.len(),
            total,
            self.path.display(),
            query
        );
        Ok(matched)
    }
}
