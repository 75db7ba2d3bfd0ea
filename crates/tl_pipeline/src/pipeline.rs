use std::sync::Arc;
use tracing::{debug, info};
use tl_core::{ClusteringError, EmbeddedArticle, Event, Result, Timeline};
use crate::clustering::{
    create_backend, partition_into_clusters, ClusteringBackend, EmbeddingMatrix,
};
use crate::events::synthesize_event;
use crate::windows::{partition_into_windows, Window};
use crate::PipelineConfig;

/// Sliding-window clustering: windows, per-window clustering, junk
/// rejection and one event per surviving cluster, most recent first.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    backend: Arc<dyn ClusteringBackend>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let backend = create_backend(config.xi)?;
        Ok(Self { config, backend })
    }

    pub fn with_backend(
        config: PipelineConfig,
        backend: Arc<dyn ClusteringBackend>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn backend(&self) -> &dyn ClusteringBackend {
        self.backend.as_ref()
    }

    /// Windows that hold enough articles to be clustered.
    pub fn clusterable_windows(&self, articles: &[EmbeddedArticle]) -> Result<Vec<Window>> {
        let min_samples = self.config.min_samples.resolve(articles.len());
        let windows = partition_into_windows(articles, self.config.window_delta, self.config.step)?;
        Ok(windows.into_iter().filter(|w| w.len() >= min_samples).collect())
    }

    /// Events sorted by date, most recent first. Events on the same date keep
    /// window order, then cluster order.
    ///
    /// Fails as a whole if any window cannot be clustered.
    pub fn generate_events(&self, articles: &[EmbeddedArticle]) -> Result<Vec<Event>> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let min_samples = self.config.min_samples.resolve(articles.len());
        let windows = self.clusterable_windows(articles)?;
        info!(
            "🪟 Clustering {} windows over {} articles (min_samples={}, backend={})",
            windows.len(),
            articles.len(),
            min_samples,
            self.backend.name()
        );

        let mut events = Vec::new();
        for window in &windows {
            events.extend(self.window_events(articles, window, min_samples)?);
        }

        events.sort_by(|a, b| b.date.cmp(&a.date));
        info!("✨ Generated {} events", events.len());
        Ok(events)
    }

    pub fn generate_timeline(&self, articles: &[EmbeddedArticle]) -> Result<Timeline> {
        Ok(Timeline::new(self.generate_events(articles)?))
    }

    fn window_events(
        &self,
        articles: &[EmbeddedArticle],
        window: &Window,
        min_samples: usize,
    ) -> Result<Vec<Event>> {
        let matrix = EmbeddingMatrix::from_members(articles, &window.members)?;
        let labels = self.backend.fit(&matrix, min_samples)?;
        if labels.len() != window.len() {
            return Err(ClusteringError::LabelCountMismatch {
                expected: window.len(),
                found: labels.len(),
            }
            .into());
        }

        let clusters = partition_into_clusters(&window.members, &labels);
        let found = clusters.len();
        let kept = self.config.junk_policy.apply(clusters);
        debug!(
            "Window {} ({}..={}): {} articles, {} clusters, {} kept",
            window.center,
            window.start,
            window.end,
            window.len(),
            found,
            kept.len()
        );

        Ok(kept.iter().map(|cluster| synthesize_event(articles, cluster)).collect())
    }
}
