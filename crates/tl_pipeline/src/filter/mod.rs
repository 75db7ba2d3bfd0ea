use serde::{Deserialize, Serialize};
use crate::clustering::Cluster;

/// How a window's junk cluster is rejected before events are built.
///
/// The largest density cluster of a window usually collects background
/// coverage of the query rather than one dateable story. `RemoveLargest`
/// drops it unconditionally, which can also discard a genuinely large event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JunkPolicy {
    /// Drop exactly one cluster per window: the one with the most articles,
    /// the first in label order on ties.
    #[default]
    RemoveLargest,
    /// Drop every cluster holding more than `max_articles` articles.
    RemoveByThreshold { max_articles: usize },
    /// Keep every cluster.
    None,
}

impl JunkPolicy {
    pub fn apply(&self, mut clusters: Vec<Cluster>) -> Vec<Cluster> {
        match *self {
            JunkPolicy::RemoveLargest => {
                if let Some(index) = largest_cluster(&clusters) {
                    clusters.remove(index);
                }
                clusters
            }
            JunkPolicy::RemoveByThreshold { max_articles } => {
                clusters.retain(|c| c.len() <= max_articles);
                clusters
            }
            JunkPolicy::None => clusters,
        }
    }
}

/// Index of the first cluster with the maximum article count.
fn largest_cluster(clusters: &[Cluster]) -> Option<usize> {
    let mut largest: Option<usize> = None;
    for (i, cluster) in clusters.iter().enumerate() {
        match largest {
            Some(j) if clusters[j].len() >= cluster.len() => {}
            _ => largest = Some(i),
        }
    }
    largest
}
