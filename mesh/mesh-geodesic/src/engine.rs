//! Capability contract for geodesic propagation engines.
//!
//! Distance drivers depend only on what these traits promise, so any
//! engine that can propagate a wavefront from a set of sources and report
//! the nearest source of a point can be swapped in.

use crate::SurfacePoint;

/// A single-threaded, mutable distance propagator bound to one mesh.
///
/// Each call to [`propagate`](Self::propagate) discards the previous
/// result. Engines are not meant to be shared between threads; give every
/// worker its own through an [`EngineFactory`].
pub trait PropagationEngine {
    /// Expand a distance wavefront from `sources`.
    ///
    /// Propagation never extends beyond `max_distance`
    /// (`f64::INFINITY` means unbounded). With `stop_points`, the engine
    /// may stop as soon as every stop point has its final distance;
    /// distances of other points are then unspecified.
    ///
    /// Duplicate sources are allowed. Sources outside the mesh are ignored.
    fn propagate(
        &mut self,
        sources: &[SurfacePoint],
        max_distance: f64,
        stop_points: Option<&[SurfacePoint]>,
    );

    /// Nearest source of `point` after the last propagation.
    ///
    /// Returns the position of that source in the slice given to
    /// [`propagate`](Self::propagate) and its distance, or `None` when no
    /// source reached the point.
    fn best_source(&self, point: SurfacePoint) -> Option<(usize, f64)>;

    /// Distance from `point` to its nearest source, `f64::INFINITY` if unreached.
    fn distance(&self, point: SurfacePoint) -> f64 {
        self.best_source(point).map_or(f64::INFINITY, |(_, d)| d)
    }
}

/// Shared, read-only mesh state that hands out private engines.
///
/// A factory is built once per mesh and may be used from many threads at
/// the same time; every engine it creates borrows it immutably.
pub trait EngineFactory: Sync {
    /// The engine type handed out by this factory.
    type Engine<'a>: PropagationEngine
    where
        Self: 'a;

    /// Number of vertices of the underlying mesh.
    fn vertex_count(&self) -> usize;

    /// Create a fresh engine bound to this factory's mesh.
    fn engine(&self) -> Self::Engine<'_>;
}
