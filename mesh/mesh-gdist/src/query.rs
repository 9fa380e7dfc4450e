//! Source-to-target distance queries.
//!
//! One propagation from a set of sources answers the distance of every
//! target to its nearest source. All input is validated before the engine
//! is created, so a failed query never writes a partial result.

use mesh_geodesic::{EngineFactory, GeodesicSolver, PropagationEngine, SurfacePoint};
use mesh_types::IndexedMesh;
use tracing::debug;

use crate::error::{GdistError, GdistResult, IndexRole, check_indices};
use crate::params::{GdistParams, PropagationMode};

/// The source that reached a target first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestSource {
    /// Position of the source in the query's source list.
    pub position: usize,
    /// Vertex index of the source.
    pub vertex: usize,
    /// Geodesic distance from that source to the target.
    pub distance: f64,
}

/// Compute the geodesic distance from the nearest of `sources` to each target.
///
/// Returns one distance per target, in target order. Targets no source
/// reaches within `params.max_distance` get `f64::INFINITY`. Duplicate
/// sources and targets are allowed.
///
/// # Errors
///
/// - [`GdistError::InvalidParams`] for a NaN or negative `max_distance`
/// - [`GdistError::InvalidMesh`] if a face references a missing vertex
/// - [`GdistError::IndexOutOfRange`] for a source or target outside the mesh
///
/// # Example
///
/// ```
/// use mesh_gdist::{compute_gdist, GdistParams};
/// use mesh_types::{IndexBase, IndexedMesh};
///
/// let coords = [0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.2, 0.0];
/// let mesh = IndexedMesh::from_flat(&coords, &[0, 1, 2], IndexBase::ZeroBased)?;
///
/// let distances = compute_gdist(&mesh, &[1], &[0, 2], &GdistParams::default())?;
/// assert!((distances[0] - 0.2).abs() < 1e-6);
/// # Ok::<(), mesh_gdist::GdistError>(())
/// ```
pub fn compute_gdist(
    mesh: &IndexedMesh,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
) -> GdistResult<Vec<f64>> {
    let mut distances = vec![f64::INFINITY; targets.len()];
    compute_gdist_into(mesh, sources, targets, params, &mut distances)?;
    Ok(distances)
}

/// Like [`compute_gdist`], writing into a caller-allocated buffer.
///
/// `out` must hold exactly one slot per target. On error `out` is left
/// untouched.
///
/// # Errors
///
/// Everything [`compute_gdist`] reports, plus
/// [`GdistError::BufferSizeMismatch`] when `out.len() != targets.len()`.
pub fn compute_gdist_into(
    mesh: &IndexedMesh,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
    out: &mut [f64],
) -> GdistResult<()> {
    mesh.validate_indices()?;
    validate_query(mesh.vertices.len(), sources, targets, params)?;
    check_output(targets.len(), out.len())?;

    let solver = GeodesicSolver::new(mesh);
    compute_gdist_into_with(&solver, sources, targets, params, out)
}

/// Dense query through any engine factory.
///
/// # Errors
///
/// Same as [`compute_gdist_into`], minus mesh validation, which is the
/// factory's concern.
pub fn compute_gdist_into_with<F: EngineFactory>(
    factory: &F,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
    out: &mut [f64],
) -> GdistResult<()> {
    validate_query(factory.vertex_count(), sources, targets, params)?;
    check_output(targets.len(), out.len())?;

    debug!(
        sources = sources.len(),
        targets = targets.len(),
        max_distance = params.max_distance,
        mode = ?params.propagation,
        "Computing geodesic distances"
    );

    let mut engine = factory.engine();
    let target_points = run_query(&mut engine, sources, targets, params);

    for (slot, &point) in out.iter_mut().zip(&target_points) {
        *slot = engine.distance(point);
    }
    Ok(())
}

/// For each target, report which source reached it first and how far it is.
///
/// `None` marks a target no source reaches within `params.max_distance`.
///
/// # Errors
///
/// Same as [`compute_gdist`].
///
/// # Example
///
/// ```
/// use mesh_gdist::{nearest_sources, GdistParams};
/// use mesh_types::{IndexBase, IndexedMesh};
///
/// let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.5, 1.0, 0.0, 1.5, 1.0, 0.0];
/// let triangles = [0, 1, 3, 1, 4, 3, 1, 2, 4];
/// let mesh = IndexedMesh::from_flat(&coords, &triangles, IndexBase::ZeroBased)?;
///
/// let nearest = nearest_sources(&mesh, &[0, 2], &[0, 2], &GdistParams::default())?;
/// assert_eq!(nearest[0].map(|n| n.vertex), Some(0));
/// assert_eq!(nearest[1].map(|n| n.position), Some(1));
/// # Ok::<(), mesh_gdist::GdistError>(())
/// ```
pub fn nearest_sources(
    mesh: &IndexedMesh,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
) -> GdistResult<Vec<Option<NearestSource>>> {
    mesh.validate_indices()?;
    validate_query(mesh.vertices.len(), sources, targets, params)?;

    let solver = GeodesicSolver::new(mesh);
    nearest_sources_with(&solver, sources, targets, params)
}

/// Nearest-source query through any engine factory.
///
/// # Errors
///
/// Same as [`compute_gdist_into_with`].
pub fn nearest_sources_with<F: EngineFactory>(
    factory: &F,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
) -> GdistResult<Vec<Option<NearestSource>>> {
    validate_query(factory.vertex_count(), sources, targets, params)?;

    let mut engine = factory.engine();
    let target_points = run_query(&mut engine, sources, targets, params);

    Ok(target_points
        .iter()
        .map(|&point| -> Option<NearestSource> {
            let (position, distance) = engine.best_source(point)?;
            // Plugged-in engines may report a position outside `sources`
            let &vertex = sources.get(position)?;
            Some(NearestSource {
                position,
                vertex,
                distance,
            })
        })
        .collect())
}

fn validate_query(
    vertex_count: usize,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
) -> GdistResult<()> {
    params.validate()?;
    check_indices(IndexRole::Source, sources, vertex_count)?;
    check_indices(IndexRole::Target, targets, vertex_count)
}

const fn check_output(expected: usize, actual: usize) -> GdistResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(GdistError::BufferSizeMismatch { expected, actual })
    }
}

/// Propagate according to the mode and return the target points.
fn run_query<E: PropagationEngine>(
    engine: &mut E,
    sources: &[usize],
    targets: &[usize],
    params: &GdistParams,
) -> Vec<SurfacePoint> {
    let source_points: Vec<SurfacePoint> = SurfacePoint::from_vertices(sources).collect();
    let target_points: Vec<SurfacePoint> = SurfacePoint::from_vertices(targets).collect();

    let stop_points = match params.propagation {
        PropagationMode::StopAtTargets => Some(target_points.as_slice()),
        PropagationMode::BoundedRadius => None,
    };
    engine.propagate(&source_points, params.max_distance, stop_points);

    target_points
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use mesh_types::{IndexBase, Vertex};

    /// Unit right triangle scaled so the legs are 0.2 long.
    fn small_triangle() -> IndexedMesh {
        let coords = [0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.2, 0.0];
        IndexedMesh::from_flat(&coords, &[0, 1, 2], IndexBase::ZeroBased).unwrap()
    }

    /// Triangle plus one vertex no face uses.
    fn triangle_with_isolated_vertex() -> IndexedMesh {
        let mut mesh = small_triangle();
        mesh.vertices.push(Vertex::from_coords(3.0, 3.0, 3.0));
        mesh
    }

    #[test]
    fn adjacent_vertices_measure_edge_length() {
        let mesh = small_triangle();
        let d = compute_gdist(&mesh, &[1], &[0, 2], &GdistParams::default()).unwrap();
        assert!((d[0] - 0.2).abs() < 1e-6);
        assert!((d[1] - 0.2 * 2.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn target_order_is_preserved() {
        let mesh = small_triangle();
        let forward = compute_gdist(&mesh, &[0], &[1, 2, 0], &GdistParams::default()).unwrap();
        let reversed = compute_gdist(&mesh, &[0], &[0, 2, 1], &GdistParams::default()).unwrap();
        assert_eq!(forward[0], reversed[2]);
        assert_eq!(forward[2], reversed[0]);
        assert_eq!(forward[2], 0.0);
    }

    #[test]
    fn unreached_targets_are_infinite() {
        let mesh = triangle_with_isolated_vertex();
        let d = compute_gdist(&mesh, &[0], &[3, 1], &GdistParams::default()).unwrap();
        assert!(d[0].is_infinite() && d[0] > 0.0);
        assert!((d[1] - 0.2).abs() < 1e-6);

        let d = compute_gdist(&mesh, &[0], &[1], &GdistParams::bounded(0.1)).unwrap();
        assert_eq!(d, vec![f64::INFINITY]);
    }

    #[test]
    fn both_modes_agree() {
        let mesh = triangle_with_isolated_vertex();
        let stop = GdistParams::bounded(0.25);
        let radius = stop.with_propagation(PropagationMode::BoundedRadius);

        let a = compute_gdist(&mesh, &[0], &[1, 2, 3], &stop).unwrap();
        let b = compute_gdist(&mesh, &[0], &[1, 2, 3], &radius).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_selections() {
        let mesh = small_triangle();
        let d = compute_gdist(&mesh, &[], &[0, 1], &GdistParams::default()).unwrap();
        assert!(d.iter().all(|x| x.is_infinite()));

        let d = compute_gdist(&mesh, &[0], &[], &GdistParams::default()).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn out_of_range_indices_fail_before_writing() {
        let mesh = small_triangle();
        let mut out = [7.0, 7.0];

        let err = compute_gdist_into(&mesh, &[0, 3], &[1, 2], &GdistParams::default(), &mut out);
        assert!(matches!(
            err,
            Err(GdistError::IndexOutOfRange {
                role: IndexRole::Source,
                index: 3,
                ..
            })
        ));

        let err = compute_gdist_into(&mesh, &[0], &[1, 5], &GdistParams::default(), &mut out);
        assert!(matches!(
            err,
            Err(GdistError::IndexOutOfRange {
                role: IndexRole::Target,
                index: 5,
                ..
            })
        ));
        assert_eq!(out, [7.0, 7.0]);
    }

    #[test]
    fn buffer_size_is_checked() {
        let mesh = small_triangle();
        let mut out = [0.0; 3];
        let err = compute_gdist_into(&mesh, &[0], &[1, 2], &GdistParams::default(), &mut out);
        assert!(matches!(
            err,
            Err(GdistError::BufferSizeMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn invalid_params_rejected() {
        let mesh = small_triangle();
        let err = compute_gdist(&mesh, &[0], &[1], &GdistParams::bounded(f64::NAN));
        assert!(matches!(err, Err(GdistError::InvalidParams(_))));
    }

    #[test]
    fn malformed_mesh_rejected() {
        let mut mesh = small_triangle();
        mesh.faces.push([0, 1, 42]);
        let err = compute_gdist(&mesh, &[0], &[1], &GdistParams::default());
        assert!(matches!(err, Err(GdistError::InvalidMesh(_))));
    }

    #[test]
    fn nearest_source_attribution() {
        let mesh = triangle_with_isolated_vertex();
        let nearest =
            nearest_sources(&mesh, &[2, 1, 2], &[1, 2, 0, 3], &GdistParams::default()).unwrap();

        assert_eq!(
            nearest[0],
            Some(NearestSource {
                position: 1,
                vertex: 1,
                distance: 0.0
            })
        );
        assert_eq!(nearest[1].map(|n| n.position), Some(0));
        // Vertex 0 is 0.2 from both; either source is a valid answer
        assert!((nearest[2].unwrap().distance - 0.2).abs() < 1e-6);
        assert_eq!(nearest[3], None);
    }

    /// Factory whose engine claims every point was reached by source 42.
    struct StraySourceFactory;

    struct StraySourceEngine;

    impl PropagationEngine for StraySourceEngine {
        fn propagate(&mut self, _: &[SurfacePoint], _: f64, _: Option<&[SurfacePoint]>) {}

        #[allow(clippy::cast_precision_loss)]
        fn best_source(&self, point: SurfacePoint) -> Option<(usize, f64)> {
            Some((42, point.vertex_index() as f64))
        }
    }

    impl EngineFactory for StraySourceFactory {
        type Engine<'a>
            = StraySourceEngine
        where
            Self: 'a;

        fn vertex_count(&self) -> usize {
            3
        }

        fn engine(&self) -> StraySourceEngine {
            StraySourceEngine
        }
    }

    #[test]
    fn stray_source_position_is_unattributed() {
        let nearest =
            nearest_sources_with(&StraySourceFactory, &[0], &[1, 2], &GdistParams::default())
                .unwrap();
        assert_eq!(nearest, vec![None, None]);
    }
}
