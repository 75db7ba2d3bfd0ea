use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tl_core::{ClusteringError, EmbeddedArticle};

pub mod optics;

pub use optics::Optics;

/// Label assigned to points that belong to no dense region.
pub const NOISE: i32 = -1;

/// Density-based clustering over one window's embeddings.
///
/// Implementations must be deterministic for a fixed matrix and row order.
/// They are free to be order-sensitive: reachability-based algorithms
/// legitimately give different boundaries when the same rows are shuffled.
pub trait ClusteringBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// One label per matrix row, [`NOISE`] for unclustered rows.
    fn fit(&self, matrix: &EmbeddingMatrix<'_>, min_samples: usize)
        -> Result<Vec<i32>, ClusteringError>;
}

/// Validated, borrowed view of a set of embeddings with a common dimension.
#[derive(Debug, Clone)]
pub struct EmbeddingMatrix<'a> {
    rows: Vec<&'a [f32]>,
    dim: usize,
}

impl<'a> EmbeddingMatrix<'a> {
    pub fn new(rows: Vec<&'a [f32]>) -> Result<Self, ClusteringError> {
        let dim = rows.first().map_or(0, |row| row.len());
        for (index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                return Err(ClusteringError::EmptyEmbedding { index });
            }
            if row.len() != dim {
                return Err(ClusteringError::DimensionMismatch {
                    index,
                    expected: dim,
                    found: row.len(),
                });
            }
            if row.iter().any(|x| !x.is_finite()) {
                return Err(ClusteringError::NonFiniteEmbedding { index });
            }
        }
        Ok(Self { rows, dim })
    }

    /// Matrix of the articles at `members`, in that order.
    pub fn from_members(
        articles: &'a [EmbeddedArticle],
        members: &[usize],
    ) -> Result<Self, ClusteringError> {
        Self::new(members.iter().map(|&i| articles[i].embedding.as_slice()).collect())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &'a [f32] {
        self.rows[i]
    }

    pub fn distance(&self, i: usize, j: usize) -> f64 {
        euclidean(self.rows[i], self.rows[j])
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Articles of one window sharing a label. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    label: i32,
    members: Vec<usize>,
}

impl Cluster {
    pub(crate) fn new(label: i32, members: Vec<usize>) -> Self {
        debug_assert!(!members.is_empty());
        Self { label, members }
    }

    pub fn label(&self) -> i32 {
        self.label
    }

    pub fn is_noise(&self) -> bool {
        self.label == NOISE
    }

    /// Article indices in window order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn articles<'a>(
        &'a self,
        articles: &'a [EmbeddedArticle],
    ) -> impl Iterator<Item = &'a EmbeddedArticle> + 'a {
        self.members.iter().map(move |&i| &articles[i])
    }
}

/// Groups `members` by label, one cluster per distinct label in ascending
/// label order (noise first). Noise is kept as an ordinary cluster.
pub fn partition_into_clusters(members: &[usize], labels: &[i32]) -> Vec<Cluster> {
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (&member, &label) in members.iter().zip(labels) {
        groups.entry(label).or_default().push(member);
    }
    groups
        .into_iter()
        .map(|(label, members)| Cluster::new(label, members))
        .collect()
}

pub fn create_backend(xi: f64) -> Result<Arc<dyn ClusteringBackend>, ClusteringError> {
    Ok(Arc::new(Optics::new(xi)?))
}
