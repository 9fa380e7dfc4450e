//! Dijkstra's algorithm for geodesic distance computation.
//!
//! This module implements shortest-path propagation on mesh surfaces
//! using Dijkstra's algorithm on the edge graph.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mesh_types::IndexedMesh;
use tracing::trace;

use crate::adjacency::AdjacencyList;
use crate::distance::DistanceField;
use crate::engine::{EngineFactory, PropagationEngine};
use crate::error::{GeodesicError, GeodesicResult};
use crate::point::SurfacePoint;

/// Marks a vertex that no source has reached.
const NO_SOURCE: u32 = u32::MAX;

/// Geodesic distance solver using Dijkstra's algorithm.
///
/// Holds the read-only edge graph of a mesh and hands out
/// [`DijkstraEngine`]s that borrow it. The solver is `Sync`, so one solver
/// can serve engines on many threads.
///
/// # Performance
///
/// Time complexity: O((V + E) log V) per propagation.
/// Space complexity: O(V + E) for the adjacency list, O(V) per engine.
///
/// # Example
///
/// ```
/// use mesh_geodesic::GeodesicSolver;
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// let solver = GeodesicSolver::new(&mesh);
/// let distances = solver.compute_from_vertex(0);
/// assert!((distances.distance(1) - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct GeodesicSolver {
    /// Adjacency list for the mesh.
    adjacency: AdjacencyList,
}

/// State for the priority queue in Dijkstra's algorithm.
#[derive(Debug, Clone, Copy)]
struct State {
    /// Current vertex.
    vertex: u32,
    /// Distance from source(s) to this vertex.
    distance: f64,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.vertex == other.vertex && (self.distance - other.distance).abs() < f64::EPSILON
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl GeodesicSolver {
    /// Create a new geodesic solver from a mesh.
    ///
    /// Faces referencing missing vertices are left out of the edge graph;
    /// use [`GeodesicSolver::try_new`] to reject such meshes instead.
    #[must_use]
    pub fn new(mesh: &IndexedMesh) -> Self {
        Self {
            adjacency: AdjacencyList::from_mesh(mesh),
        }
    }

    /// Create a solver, failing if any face references a missing vertex.
    ///
    /// # Errors
    ///
    /// Returns [`GeodesicError::InvalidVertex`] for the first bad face index.
    pub fn try_new(mesh: &IndexedMesh) -> GeodesicResult<Self> {
        let vertex_count = mesh.vertices.len();
        if let Some(&index) = mesh
            .faces
            .iter()
            .flatten()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(GeodesicError::InvalidVertex {
                index: index as usize,
                vertex_count,
            });
        }
        Ok(Self::new(mesh))
    }

    /// Create a solver from a pre-built adjacency list.
    ///
    /// Use this if you already have an adjacency list to avoid rebuilding.
    #[must_use]
    pub const fn from_adjacency(adjacency: AdjacencyList) -> Self {
        Self { adjacency }
    }

    /// Get a reference to the internal adjacency list.
    #[must_use]
    pub const fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    /// Get the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.vertex_count()
    }

    /// Compute distances from a single source vertex.
    ///
    /// Unreachable vertices have distance `f64::INFINITY`.
    #[must_use]
    pub fn compute_from_vertex(&self, source: usize) -> DistanceField {
        self.compute_from_vertices(&[source])
    }

    /// Compute distances from multiple source vertices.
    ///
    /// The distance to a vertex is the minimum distance to any source.
    /// Out-of-range sources are ignored.
    #[must_use]
    pub fn compute_from_vertices(&self, sources: &[usize]) -> DistanceField {
        self.compute_with_cutoff(sources, f64::INFINITY)
    }

    /// Compute distances with a maximum distance cutoff.
    ///
    /// Vertices beyond the cutoff distance are left at infinity,
    /// which can improve performance for localized queries.
    #[must_use]
    pub fn compute_with_cutoff(&self, sources: &[usize], max_distance: f64) -> DistanceField {
        let sources: Vec<SurfacePoint> = SurfacePoint::from_vertices(sources).collect();
        let mut engine = self.engine();
        engine.propagate(&sources, max_distance, None);
        DistanceField::from_engine(&engine, self.vertex_count())
    }
}

impl EngineFactory for GeodesicSolver {
    type Engine<'a>
        = DijkstraEngine<'a>
    where
        Self: 'a;

    fn vertex_count(&self) -> usize {
        self.adjacency.vertex_count()
    }

    fn engine(&self) -> DijkstraEngine<'_> {
        DijkstraEngine::new(&self.adjacency)
    }
}

/// Propagation engine running Dijkstra's algorithm over a borrowed edge graph.
///
/// Edge weights are Euclidean edge lengths, so distances are exact for
/// paths along mesh edges and an upper bound on the surface geodesic
/// otherwise. Buffers are sized once and reset lazily, which keeps
/// repeated short-range propagations proportional to the area they touch.
#[derive(Debug, Clone)]
pub struct DijkstraEngine<'a> {
    adjacency: &'a AdjacencyList,
    /// Best known distance per vertex.
    distances: Vec<f64>,
    /// Position in the source slice of the nearest source, or `NO_SOURCE`.
    nearest: Vec<u32>,
    /// Vertices whose distance is final.
    settled: Vec<bool>,
    /// Vertices the current propagation must reach before it may stop.
    pending_stop: Vec<bool>,
    /// Vertices written by the last propagation.
    touched: Vec<u32>,
    heap: BinaryHeap<State>,
}

impl<'a> DijkstraEngine<'a> {
    /// Create an engine over an adjacency list.
    #[must_use]
    pub fn new(adjacency: &'a AdjacencyList) -> Self {
        let vertex_count = adjacency.vertex_count();
        Self {
            adjacency,
            distances: vec![f64::INFINITY; vertex_count],
            nearest: vec![NO_SOURCE; vertex_count],
            settled: vec![false; vertex_count],
            pending_stop: vec![false; vertex_count],
            touched: Vec::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// Number of vertices the last propagation assigned a distance to.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.touched
            .iter()
            .filter(|&&v| self.distances[v as usize].is_finite())
            .count()
    }

    /// Forget the previous propagation.
    fn reset(&mut self) {
        for v in self.touched.drain(..) {
            let v = v as usize;
            self.distances[v] = f64::INFINITY;
            self.nearest[v] = NO_SOURCE;
            self.settled[v] = false;
            self.pending_stop[v] = false;
        }
        self.heap.clear();
    }

    /// Record a tentative distance, remembering the vertex for the next reset.
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32, meshes with >4B vertices unsupported
    fn relax(&mut self, vertex: usize, distance: f64, source: u32) {
        if self.distances[vertex].is_infinite() && !self.pending_stop[vertex] {
            self.touched.push(vertex as u32);
        }
        self.distances[vertex] = distance;
        self.nearest[vertex] = source;
        self.heap.push(State {
            vertex: vertex as u32,
            distance,
        });
    }

    /// Mark stop points, returning how many distinct ones lie on the mesh.
    #[allow(clippy::cast_possible_truncation)]
    fn mark_stop_points(&mut self, stop_points: &[SurfacePoint]) -> usize {
        let vertex_count = self.adjacency.vertex_count();
        let mut remaining = 0;
        for point in stop_points {
            let v = point.vertex_index();
            if v < vertex_count && !self.pending_stop[v] {
                self.pending_stop[v] = true;
                self.touched.push(v as u32);
                remaining += 1;
            }
        }
        remaining
    }
}

impl PropagationEngine for DijkstraEngine<'_> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: source positions beyond u32::MAX are not supported
    fn propagate(
        &mut self,
        sources: &[SurfacePoint],
        max_distance: f64,
        stop_points: Option<&[SurfacePoint]>,
    ) {
        self.reset();

        let vertex_count = self.adjacency.vertex_count();
        if vertex_count == 0 || sources.is_empty() || max_distance.is_nan() || max_distance < 0.0 {
            return;
        }

        let mut remaining_stops = stop_points.map(|points| self.mark_stop_points(points));
        if remaining_stops == Some(0) {
            // Nothing on the mesh to reach
            return;
        }

        // First occurrence wins for duplicated sources
        for (position, source) in sources.iter().enumerate() {
            let v = source.vertex_index();
            if v < vertex_count && self.nearest[v] == NO_SOURCE {
                self.relax(v, 0.0, position as u32);
            }
        }

        // Process vertices in order of increasing distance
        while let Some(State { vertex, distance }) = self.heap.pop() {
            let vertex_idx = vertex as usize;

            // Skip stale entries and vertices already finalized
            if distance > self.distances[vertex_idx] || self.settled[vertex_idx] {
                continue;
            }
            self.settled[vertex_idx] = true;

            if let Some(remaining) = remaining_stops.as_mut() {
                if self.pending_stop[vertex_idx] {
                    *remaining -= 1;
                    if *remaining == 0 {
                        break;
                    }
                }
            }

            let source = self.nearest[vertex_idx];
            for &(neighbor, edge_length) in self.adjacency.neighbors(vertex_idx) {
                let neighbor_idx = neighbor as usize;
                let new_distance = distance + edge_length;

                if new_distance <= max_distance && new_distance < self.distances[neighbor_idx] {
                    self.relax(neighbor_idx, new_distance, source);
                }
            }
        }

        trace!(
            sources = sources.len(),
            reached = self.touched.len(),
            "Propagation finished"
        );
    }

    fn best_source(&self, point: SurfacePoint) -> Option<(usize, f64)> {
        let v = point.vertex_index();
        let distance = *self.distances.get(v)?;
        let source = *self.nearest.get(v)?;
        (source != NO_SOURCE && distance.is_finite()).then_some((source as usize, distance))
    }
}
