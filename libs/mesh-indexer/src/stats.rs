//! # Deduplication Statistics
//!
//! Per-mesh corner/vertex counts and a comparison between two indexing runs,
//! e.g. the same scene indexed with and without normals.

use serde::Serialize;

/// Corner and vertex counts of one indexed mesh (or a sum over many).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Number of source corners (= index count)
    pub corner_count: usize,
    /// Number of distinct output vertices
    pub vertex_count: usize,
}

impl DedupStats {
    /// Creates statistics from raw counts.
    pub fn new(corner_count: usize, vertex_count: usize) -> Self {
        Self {
            corner_count,
            vertex_count,
        }
    }

    /// Sums statistics over many meshes.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use mesh_indexer::DedupStats;
    ///
    /// let total = DedupStats::total([DedupStats::new(6, 4), DedupStats::new(3, 3)]);
    /// assert_eq!(total, DedupStats::new(9, 7));
    /// ```
    pub fn total<I: IntoIterator<Item = DedupStats>>(stats: I) -> Self {
        stats.into_iter().fold(Self::default(), |acc, s| Self {
            corner_count: acc.corner_count + s.corner_count,
            vertex_count: acc.vertex_count + s.vertex_count,
        })
    }

    /// Corners that reused an existing vertex.
    pub fn shared_corners(&self) -> usize {
        self.corner_count.saturating_sub(self.vertex_count)
    }

    /// Average number of corners per output vertex (1.0 means no sharing).
    pub fn reuse_ratio(&self) -> f64 {
        if self.vertex_count == 0 {
            0.0
        } else {
            self.corner_count as f64 / self.vertex_count as f64
        }
    }
}

/// Side-by-side comparison of two indexing runs over the same input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DedupComparison {
    /// The reference run
    pub baseline: DedupStats,
    /// The run being compared against the reference
    pub candidate: DedupStats,
    /// Vertex count reduction from baseline to candidate, in percent
    pub vertex_reduction_percent: f64,
    /// Index count reduction from baseline to candidate, in percent
    pub index_reduction_percent: f64,
}

impl DedupComparison {
    /// Compares `candidate` against `baseline`.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use mesh_indexer::{DedupComparison, DedupStats};
    ///
    /// let with_normals = DedupStats::new(36, 24);
    /// let without_normals = DedupStats::new(36, 8);
    /// let cmp = DedupComparison::between(with_normals, without_normals);
    /// assert!((cmp.vertex_reduction_percent - 66.666).abs() < 0.01);
    /// assert_eq!(cmp.index_reduction_percent, 0.0);
    /// ```
    pub fn between(baseline: DedupStats, candidate: DedupStats) -> Self {
        Self {
            baseline,
            candidate,
            vertex_reduction_percent: reduction_percent(baseline.vertex_count, candidate.vertex_count),
            index_reduction_percent: reduction_percent(baseline.corner_count, candidate.corner_count),
        }
    }
}

fn reduction_percent(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (before as f64 - after as f64) * 100.0 / before as f64
}
