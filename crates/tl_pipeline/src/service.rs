use std::sync::Arc;
use std::time::Duration;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{info, warn};
use tl_core::{ArticleSource, Error, Result, Summarizer, Timeline, TimelineCache};
use crate::pipeline::Pipeline;

/// Most articles a single query hands to the pipeline.
pub const DEFAULT_MAX_ARTICLES: usize = 1000;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How far back to fetch articles; `None` fetches everything.
    pub lookback: Option<chrono::Duration>,
    /// Articles beyond this count are dropped before clustering; `None` keeps all.
    pub max_articles: Option<usize>,
    pub cache_ttl: Duration,
    pub cache_key_prefix: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            lookback: Some(chrono::Duration::days(14)),
            max_articles: Some(DEFAULT_MAX_ARTICLES),
            cache_ttl: Duration::from_secs(4 * 60 * 60),
            cache_key_prefix: "timeline-".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn cache_key(&self, query: &str) -> String {
        format!("{}{}", self.cache_key_prefix, query)
    }

    /// `[after, before)` publication range for a request made at `now`.
    /// A lookback reaching past the earliest representable instant starts there.
    pub fn fetch_range(&self, now: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match self.lookback {
            Some(lookback) if lookback < chrono::Duration::zero() => Err(Error::InvalidConfig(
                format!("lookback must not be negative, got {}", lookback),
            )),
            Some(lookback) => Ok((
                now.checked_sub_signed(lookback).unwrap_or(DateTime::<Utc>::MIN_UTC),
                now,
            )),
            None => Ok((DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)),
        }
    }
}

/// Runs the pipeline for a query between its collaborators: article
/// retrieval before, summaries and caching after.
pub struct TimelineService {
    source: Arc<dyn ArticleSource>,
    pipeline: Pipeline,
    cache: Option<Arc<dyn TimelineCache>>,
    summarizer: Option<Arc<dyn Summarizer>>,
    config: ServiceConfig,
}

impl TimelineService {
    pub fn new(source: Arc<dyn ArticleSource>, pipeline: Pipeline) -> Self {
        Self {
            source,
            pipeline,
            cache: None,
            summarizer: None,
            config: ServiceConfig::default(),
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn TimelineCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub async fn get_timeline(&self, query: &str) -> Result<Timeline> {
        let key = self.config.cache_key(query);
        if let Some(cache) = &self.cache {
            match cache.get(&key).await {
                Ok(Some(timeline)) => {
                    info!("📦 Cache hit for {}", key);
                    return Ok(timeline);
                }
                Ok(None) => {}
                Err(e) => warn!("⚠️ Failed to read cached timeline {}: {}", key, e),
            }
        }

        let (after, before) = self.config.fetch_range(Utc::now())?;

        info!("📰 Fetching articles for '{}' in [{}, {})", query, after, before);
        let mut articles = self.source.fetch_articles(query, after, before).await?;
        if let Some(max_articles) = self.config.max_articles {
            if articles.len() > max_articles {
                warn!(
                    "⚠️ Keeping the first {} of {} articles for '{}'",
                    max_articles,
                    articles.len(),
                    query
                );
                articles.truncate(max_articles);
            }
        }

        info!("🧮 Generating events from {} articles", articles.len());
        let mut timeline = self.pipeline.generate_timeline(&articles)?;

        if let Some(summarizer) = &self.summarizer {
            info!("🤖 Summarizing {} events with {}", timeline.len(), summarizer.name());
            let summaries = try_join_all(
                timeline
                    .events
                    .iter()
                    .map(|event| summarizer.summarize(&event.articles)),
            )
            .await?;
            for (event, summary) in timeline.events.iter_mut().zip(summaries) {
                event.summary = Some(summary);
            }
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&key, &timeline, self.config.cache_ttl).await {
                warn!("⚠️ Failed to cache timeline {}: {}", key, e);
            }
        }

        Ok(timeline)
    }
}
