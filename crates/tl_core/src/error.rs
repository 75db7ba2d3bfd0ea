use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Clustering failed: {0}")]
    Clustering(#[from] ClusteringError),

    #[error("Article source error: {0}")]
    Source(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True when the request failed because a window could not be clustered,
    /// as opposed to succeeding with no events.
    pub fn is_clustering_failure(&self) -> bool {
        matches!(self, Error::Clustering(_))
    }
}

/// Reasons a window's embedding matrix cannot be fitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusteringError {
    #[error("article {index} has an empty embedding")]
    EmptyEmbedding { index: usize },

    #[error("article {index} has a {found}-dimensional embedding, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("article {index} has a non-finite embedding component")]
    NonFiniteEmbedding { index: usize },

    #[error("{samples} samples cannot be clustered with min_samples={min_samples}")]
    TooFewSamples { samples: usize, min_samples: usize },

    #[error("invalid clustering parameter: {0}")]
    InvalidParameter(String),

    #[error("backend returned {found} labels for {expected} samples")]
    LabelCountMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustering_failure_is_distinguishable() {
        let err: Error = ClusteringError::EmptyEmbedding { index: 3 }.into();
        assert!(err.is_clustering_failure());
        assert_eq!(
            err.to_string(),
            "Clustering failed: article 3 has an empty embedding"
        );

        let err = Error::Source("index unavailable".to_string());
        assert!(!err.is_clustering_failure());
    }
}
