//! OPTICS ordering with xi-steep cluster extraction.
//!
//! The ordering visits points by smallest reachability and starts from the
//! lowest unprocessed row index, so cluster boundaries depend on row order.
//! Callers that need stable results must keep article order stable.

use tl_core::ClusteringError;
use super::{ClusteringBackend, EmbeddingMatrix, NOISE};

/// Digits kept on distances so that near-equal reachabilities compare equal.
const DISTANCE_DECIMALS: i32 = 15;

fn round_distance(d: f64) -> f64 {
    let scale = 10f64.powi(DISTANCE_DECIMALS);
    let scaled = d * scale;
    if scaled.is_finite() {
        scaled.round_ties_even() / scale
    } else {
        d
    }
}

#[derive(Debug, Clone)]
pub struct Optics {
    xi: f64,
    predecessor_correction: bool,
}

impl Optics {
    pub fn new(xi: f64) -> Result<Self, ClusteringError> {
        if !(xi > 0.0 && xi < 1.0) {
            return Err(ClusteringError::InvalidParameter(format!(
                "xi must be in (0, 1), got {}",
                xi
            )));
        }
        Ok(Self {
            xi,
            predecessor_correction: true,
        })
    }

    pub fn xi(&self) -> f64 {
        self.xi
    }

    pub fn without_predecessor_correction(mut self) -> Self {
        self.predecessor_correction = false;
        self
    }
}

impl ClusteringBackend for Optics {
    fn name(&self) -> &str {
        "optics-xi"
    }

    fn fit(
        &self,
        matrix: &EmbeddingMatrix<'_>,
        min_samples: usize,
    ) -> Result<Vec<i32>, ClusteringError> {
        if min_samples < 2 {
            return Err(ClusteringError::InvalidParameter(format!(
                "min_samples must be at least 2, got {}",
                min_samples
            )));
        }
        if matrix.len() < min_samples {
            return Err(ClusteringError::TooFewSamples {
                samples: matrix.len(),
                min_samples,
            });
        }

        let graph = ReachabilityGraph::compute(matrix, min_samples);
        let plot = graph.plot();
        let clusters = xi_clusters(
            &plot,
            self.xi,
            min_samples,
            min_samples,
            self.predecessor_correction,
        );
        Ok(extract_labels(&graph.ordering, &clusters))
    }
}

/// Result of the OPTICS ordering pass, indexed by row.
#[derive(Debug, Clone)]
pub struct ReachabilityGraph {
    pub ordering: Vec<usize>,
    pub reachability: Vec<f64>,
    pub predecessor: Vec<Option<usize>>,
    pub core_distances: Vec<f64>,
}

impl ReachabilityGraph {
    pub fn compute(matrix: &EmbeddingMatrix<'_>, min_samples: usize) -> Self {
        let n = matrix.len();
        let distances: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| round_distance(matrix.distance(i, j))).collect())
            .collect();

        // Neighbour counting includes the point itself.
        let core_distances: Vec<f64> = distances
            .iter()
            .map(|row| {
                let mut sorted = row.clone();
                sorted.sort_by(f64::total_cmp);
                sorted.get(min_samples.saturating_sub(1)).copied().unwrap_or(f64::INFINITY)
            })
            .collect();

        let mut reachability = vec![f64::INFINITY; n];
        let mut predecessor = vec![None; n];
        let mut processed = vec![false; n];
        let mut ordering = Vec::with_capacity(n);

        for _ in 0..n {
            let Some(point) = (0..n)
                .filter(|&i| !processed[i])
                .min_by(|&a, &b| reachability[a].total_cmp(&reachability[b]))
            else {
                break;
            };
            processed[point] = true;
            ordering.push(point);

            let core = core_distances[point];
            if core.is_infinite() {
                continue;
            }
            for other in 0..n {
                if processed[other] {
                    continue;
                }
                let reach = core.max(distances[point][other]);
                if reach < reachability[other] {
                    reachability[other] = reach;
                    predecessor[other] = Some(point);
                }
            }
        }

        Self {
            ordering,
            reachability,
            predecessor,
            core_distances,
        }
    }

    /// Reachability and predecessor in visiting order, with a trailing
    /// infinite reachability so a cluster can close at the end of the plot.
    pub fn plot(&self) -> ReachabilityPlot<'_> {
        let mut reachability: Vec<f64> =
            self.ordering.iter().map(|&p| self.reachability[p]).collect();
        reachability.push(f64::INFINITY);
        ReachabilityPlot {
            reachability,
            predecessor: self.ordering.iter().map(|&p| self.predecessor[p]).collect(),
            ordering: &self.ordering,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReachabilityPlot<'a> {
    /// `ordering.len() + 1` entries, the last one infinite.
    pub reachability: Vec<f64>,
    pub predecessor: Vec<Option<usize>>,
    pub ordering: &'a [usize],
}

#[derive(Debug, Clone, Copy)]
struct SteepDownArea {
    start: usize,
    end: usize,
    mib: f64,
}

/// Grows a steep region from `start`. The region may contain at most
/// `min_samples` consecutive points that are neither steep nor moving the
/// other way.
fn extend_region(steep: &[bool], xward: &[bool], start: usize, min_samples: usize) -> usize {
    let mut non_xward_points = 0;
    let mut end = start;
    for index in start..steep.len() {
        if steep[index] {
            non_xward_points = 0;
            end = index;
        } else if !xward[index] {
            non_xward_points += 1;
            if non_xward_points > min_samples {
                break;
            }
        } else {
            return end;
        }
    }
    end
}

fn update_filter_sdas(sdas: &mut Vec<SteepDownArea>, mib: f64, xi_complement: f64, r: &[f64]) {
    if mib.is_infinite() {
        sdas.clear();
        return;
    }
    sdas.retain(|sda| mib <= r[sda.start] * xi_complement);
    for sda in sdas.iter_mut() {
        sda.mib = sda.mib.max(mib);
    }
}

/// Shrinks `[s, e]` from the right until its end is reachable from inside it.
fn correct_predecessor(
    plot: &ReachabilityPlot<'_>,
    s: usize,
    mut e: usize,
) -> Option<(usize, usize)> {
    let r = &plot.reachability;
    while s < e {
        if r[s] > r[e] {
            return Some((s, e));
        }
        if let Some(p_e) = plot.predecessor[e] {
            if plot.ordering[s..e].contains(&p_e) {
                return Some((s, e));
            }
        }
        e -= 1;
    }
    None
}

/// Cluster intervals `(start, end)` over plot positions, inclusive. Nested
/// clusters come before the clusters that contain them.
pub fn xi_clusters(
    plot: &ReachabilityPlot<'_>,
    xi: f64,
    min_samples: usize,
    min_cluster_size: usize,
    predecessor_correction: bool,
) -> Vec<(usize, usize)> {
    let r = &plot.reachability;
    let n = r.len().saturating_sub(1);
    let xi_complement = 1.0 - xi;

    let ratio: Vec<f64> = (0..n).map(|i| r[i] / r[i + 1]).collect();
    let steep_upward: Vec<bool> = ratio.iter().map(|&q| q <= xi_complement).collect();
    let steep_downward: Vec<bool> = ratio.iter().map(|&q| q >= 1.0 / xi_complement).collect();
    let downward: Vec<bool> = ratio.iter().map(|&q| q > 1.0).collect();
    let upward: Vec<bool> = ratio.iter().map(|&q| q < 1.0).collect();

    let mut sdas: Vec<SteepDownArea> = Vec::new();
    let mut clusters = Vec::new();
    let mut index = 0;
    let mut mib = 0.0_f64;

    for steep_index in (0..n).filter(|&i| steep_upward[i] || steep_downward[i]) {
        if steep_index < index {
            continue;
        }

        mib = r[index..=steep_index].iter().fold(mib, |acc, &x| acc.max(x));
        update_filter_sdas(&mut sdas, mib, xi_complement, r);

        if steep_downward[steep_index] {
            let end = extend_region(&steep_downward, &upward, steep_index, min_samples);
            sdas.push(SteepDownArea {
                start: steep_index,
                end,
                mib: 0.0,
            });
            index = end + 1;
            mib = r[index];
            continue;
        }

        let u_start = steep_index;
        let u_end = extend_region(&steep_upward, &downward, u_start, min_samples);
        index = u_end + 1;
        mib = r[index];

        let mut u_clusters = Vec::new();
        for d in &sdas {
            let mut c_start = d.start;
            let mut c_end = u_end;

            if r[c_end + 1] * xi_complement < d.mib {
                continue;
            }

            // Move the boundary on the higher side down to the level of the other.
            let d_max = r[d.start];
            if d_max * xi_complement >= r[c_end + 1] {
                while r[c_start + 1] > r[c_end + 1] && c_start < d.end {
                    c_start += 1;
                }
            } else if r[c_end + 1] * xi_complement >= d_max {
                while c_end > u_start && r[c_end - 1] > d_max {
                    c_end -= 1;
                }
            }

            if predecessor_correction {
                match correct_predecessor(plot, c_start, c_end) {
                    Some((s, e)) => {
                        c_start = s;
                        c_end = e;
                    }
                    None => continue,
                }
            }

            if (c_end + 1).saturating_sub(c_start) < min_cluster_size {
                continue;
            }
            if c_start > d.end || c_end < u_start {
                continue;
            }
            u_clusters.push((c_start, c_end));
        }

        u_clusters.reverse();
        clusters.extend(u_clusters);
    }

    clusters
}

/// Labels rows from plot intervals. An interval only gets a label when none
/// of its points is labelled yet; the rest stays noise.
pub fn extract_labels(ordering: &[usize], clusters: &[(usize, usize)]) -> Vec<i32> {
    let mut plot_labels = vec![NOISE; ordering.len()];
    let mut label = 0;
    for &(start, end) in clusters {
        let span = &mut plot_labels[start..=end];
        if span.iter().all(|&l| l == NOISE) {
            span.fill(label);
            label += 1;
        }
    }

    let mut labels = vec![NOISE; ordering.len()];
    for (position, &row) in ordering.iter().enumerate() {
        labels[row] = plot_labels[position];
    }
    labels
}
