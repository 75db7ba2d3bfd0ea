use serde::{Deserialize, Serialize};
use tl_core::{Error, Result};
use crate::filter::JunkPolicy;

/// Queries with at least this many articles cluster with a larger `min_samples`.
pub const LARGE_QUERY_THRESHOLD: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MinSamples {
    /// 2 for fewer than 200 articles, 3 otherwise
    #[default]
    Auto,
    Fixed(usize),
}

impl MinSamples {
    /// Resolve against the total article count of the query, not a single window.
    pub fn resolve(&self, total_articles: usize) -> usize {
        match self {
            MinSamples::Auto if total_articles < LARGE_QUERY_THRESHOLD => 2,
            MinSamples::Auto => 3,
            MinSamples::Fixed(n) => *n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Window radius in days
    pub window_delta: u32,
    /// Days between consecutive window centers
    pub step: u32,
    pub xi: f64,
    pub min_samples: MinSamples,
    pub junk_policy: JunkPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_delta: 1,
            step: 3,
            xi: 0.05,
            min_samples: MinSamples::Auto,
            junk_policy: JunkPolicy::RemoveLargest,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(Error::InvalidConfig("step must be at least 1 day".to_string()));
        }
        if !(self.xi > 0.0 && self.xi < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "xi must be in (0, 1), got {}",
                self.xi
            )));
        }
        if let MinSamples::Fixed(n) = self.min_samples {
            if n < 2 {
                return Err(Error::InvalidConfig(format!(
                    "min_samples must be at least 2, got {}",
                    n
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}
