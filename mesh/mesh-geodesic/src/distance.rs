//! Distance field representation.
//!
//! Stores per-vertex distance values computed by geodesic algorithms.

use crate::engine::PropagationEngine;
use crate::point::SurfacePoint;

/// Per-vertex distance field.
///
/// A snapshot of an engine's result for every vertex of the mesh: the
/// distance to the nearest source and which source that was.
#[derive(Debug, Clone, Default)]
pub struct DistanceField {
    /// Distance values for each vertex.
    /// `f64::INFINITY` indicates an unreachable vertex.
    distances: Vec<f64>,
    /// Position of the nearest source for each vertex, if reached.
    nearest: Vec<Option<usize>>,
}

impl DistanceField {
    /// Create a new distance field with all distances set to infinity.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            distances: vec![f64::INFINITY; vertex_count],
            nearest: vec![None; vertex_count],
        }
    }

    /// Capture the result of the last propagation of `engine`.
    #[must_use]
    pub fn from_engine<E: PropagationEngine + ?Sized>(engine: &E, vertex_count: usize) -> Self {
        let (distances, nearest) = (0..vertex_count)
            .map(|v| match engine.best_source(SurfacePoint::vertex(v)) {
                Some((source, distance)) => (distance, Some(source)),
                None => (f64::INFINITY, None),
            })
            .unzip();
        Self { distances, nearest }
    }

    /// Get the distance to a vertex.
    ///
    /// Returns `f64::INFINITY` if the vertex is unreachable or the index is out of bounds.
    #[inline]
    #[must_use]
    pub fn distance(&self, vertex: usize) -> f64 {
        self.distances.get(vertex).copied().unwrap_or(f64::INFINITY)
    }

    /// Position of the source that reached `vertex` first.
    #[inline]
    #[must_use]
    pub fn nearest_source(&self, vertex: usize) -> Option<usize> {
        self.nearest.get(vertex).copied().flatten()
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Check if the distance field is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Get all distances as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.distances
    }

    /// Consume and return the distances.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.distances
    }

    /// Count the number of reachable vertices (finite distance).
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.distances.iter().filter(|d| d.is_finite()).count()
    }

    /// Count the number of unreachable vertices (infinite distance).
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.distances.iter().filter(|d| !d.is_finite()).count()
    }

    /// Iterate over (vertex index, distance) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.distances.iter().copied().enumerate()
    }

    /// Iterate over reachable vertices only.
    pub fn iter_reachable(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.iter().filter(|(_, d)| d.is_finite())
    }

    /// Find the vertex with the maximum finite distance.
    ///
    /// Returns `None` if no vertices are reachable.
    #[must_use]
    pub fn farthest_vertex(&self) -> Option<(usize, f64)> {
        self.iter_reachable()
            .max_by(|(_, d1), (_, d2)| d1.total_cmp(d2))
    }
}
