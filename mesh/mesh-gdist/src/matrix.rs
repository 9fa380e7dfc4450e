//! Sparse geodesic distance matrices.
//!
//! Every row is an independent single-source propagation over the shared,
//! read-only mesh, so rows fan out over rayon's pool:
//!
//! 1. Each worker creates its own engine from the factory (`map_init`)
//! 2. Each row fills a private buffer
//! 3. After all rows have joined, buffers are concatenated into one
//!    exactly-sized [`SparseMatrix`]
//!
//! Nothing is shared mutably between rows, so no locking is needed. The
//! order in which rows land in the result is unspecified.

use hashbrown::HashSet;
use mesh_geodesic::{EngineFactory, GeodesicSolver, PropagationEngine, SurfacePoint};
use mesh_types::IndexedMesh;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{GdistResult, IndexRole, check_indices};
use crate::params::GdistParams;
use crate::sparse::{SparseEntry, SparseMatrix};

/// Meshes at least this large get a warning when built without a limit.
const LARGE_MESH_VERTICES: usize = 10_000;

/// Build the sparse matrix of geodesic distances between all vertex pairs
/// closer than `params.max_distance`.
///
/// Entry `(i, j)` is present iff the distance from vertex `i` to vertex `j`
/// is finite, nonzero and at most `params.max_distance`. Diagonal entries
/// never appear. Cost grows with the square of the vertex count when the
/// limit is large; the limit is the only practical control on run time.
///
/// # Errors
///
/// - [`GdistError::InvalidParams`](crate::GdistError::InvalidParams) for a NaN or negative limit
/// - [`GdistError::InvalidMesh`](crate::GdistError::InvalidMesh) if a face references a missing vertex
/// - [`GdistError::AllocationFailure`](crate::GdistError::AllocationFailure) if the result cannot be allocated
///
/// # Example
///
/// ```
/// use mesh_gdist::{local_gdist_matrix, GdistParams};
/// use mesh_types::{IndexBase, IndexedMesh};
///
/// let coords = [0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.2, 0.0];
/// let mesh = IndexedMesh::from_flat(&coords, &[0, 1, 2], IndexBase::ZeroBased)?;
///
/// let matrix = local_gdist_matrix(&mesh, &GdistParams::default())?;
/// assert_eq!(matrix.len(), 6);
/// assert!((matrix.get(1, 0).unwrap_or(0.0) - 0.2).abs() < 1e-6);
/// assert_eq!(matrix.get(1, 1), None);
/// # Ok::<(), mesh_gdist::GdistError>(())
/// ```
pub fn local_gdist_matrix(mesh: &IndexedMesh, params: &GdistParams) -> GdistResult<SparseMatrix> {
    params.validate()?;
    mesh.validate_indices()?;

    let solver = GeodesicSolver::new(mesh);
    local_gdist_matrix_with(&solver, params)
}

/// All-pairs sparse matrix through any engine factory.
///
/// # Errors
///
/// Same as [`local_gdist_matrix`], minus mesh validation.
pub fn local_gdist_matrix_with<F: EngineFactory>(
    factory: &F,
    params: &GdistParams,
) -> GdistResult<SparseMatrix> {
    params.validate()?;

    let vertex_count = factory.vertex_count();
    if !params.is_bounded() && vertex_count >= LARGE_MESH_VERTICES {
        warn!(
            vertices = vertex_count,
            "Building an unbounded all-pairs matrix; consider setting max_distance"
        );
    }

    info!(
        vertices = vertex_count,
        max_distance = params.max_distance,
        parallel = params.parallel,
        "Starting sparse geodesic matrix build"
    );

    let rows: Vec<usize> = (0..vertex_count).collect();
    let columns: Vec<SurfacePoint> = (0..vertex_count).map(SurfacePoint::vertex).collect();
    let plan = RowPlan {
        columns: &columns,
        stop_at_columns: false,
        params,
    };

    let matrix = SparseMatrix::from_row_buffers(vertex_count, assemble(factory, &rows, &plan))?;

    info!(entries = matrix.len(), "Sparse geodesic matrix complete");
    Ok(matrix)
}

/// Build the sparse matrix of geodesic distances among selected vertices.
///
/// Rows and columns are vertex indices of the full mesh (the matrix is
/// `vertex_count × vertex_count`), but only pairs of selected points are
/// measured. Each propagation stops once every selected point is reached.
/// Repeated points are measured once.
///
/// # Errors
///
/// Same as [`local_gdist_matrix`], plus
/// [`GdistError::IndexOutOfRange`](crate::GdistError::IndexOutOfRange) for a point outside the mesh.
pub fn distance_matrix_of_selected_points(
    mesh: &IndexedMesh,
    points: &[usize],
    params: &GdistParams,
) -> GdistResult<SparseMatrix> {
    params.validate()?;
    mesh.validate_indices()?;
    check_indices(IndexRole::Point, points, mesh.vertices.len())?;

    let solver = GeodesicSolver::new(mesh);
    distance_matrix_of_selected_points_with(&solver, points, params)
}

/// Selected-points sparse matrix through any engine factory.
///
/// # Errors
///
/// Same as [`distance_matrix_of_selected_points`], minus mesh validation.
pub fn distance_matrix_of_selected_points_with<F: EngineFactory>(
    factory: &F,
    points: &[usize],
    params: &GdistParams,
) -> GdistResult<SparseMatrix> {
    params.validate()?;
    let vertex_count = factory.vertex_count();
    check_indices(IndexRole::Point, points, vertex_count)?;

    let mut seen = HashSet::with_capacity(points.len());
    let rows: Vec<usize> = points.iter().copied().filter(|&p| seen.insert(p)).collect();
    let columns: Vec<SurfacePoint> = rows.iter().copied().map(SurfacePoint::vertex).collect();

    info!(
        points = rows.len(),
        vertices = vertex_count,
        max_distance = params.max_distance,
        "Starting selected-points geodesic matrix build"
    );

    let plan = RowPlan {
        columns: &columns,
        stop_at_columns: true,
        params,
    };

    let matrix = SparseMatrix::from_row_buffers(vertex_count, assemble(factory, &rows, &plan))?;

    info!(entries = matrix.len(), "Selected-points geodesic matrix complete");
    Ok(matrix)
}

/// What every row of a matrix build measures.
struct RowPlan<'a> {
    /// Candidate columns, in the order entries are emitted.
    columns: &'a [SurfacePoint],
    /// Pass the columns to the engine as stop points.
    stop_at_columns: bool,
    params: &'a GdistParams,
}

impl RowPlan<'_> {
    /// Propagate from `row` alone and collect its entries.
    fn fill<E: PropagationEngine>(&self, engine: &mut E, row: usize) -> Vec<SparseEntry> {
        let stop_points = self.stop_at_columns.then_some(self.columns);
        engine.propagate(
            &[SurfacePoint::vertex(row)],
            self.params.max_distance,
            stop_points,
        );

        self.columns
            .iter()
            .filter_map(|&column| {
                let value = engine.distance(column);
                self.params.keeps(value).then_some(SparseEntry {
                    row,
                    column: column.vertex_index(),
                    value,
                })
            })
            .collect()
    }
}

/// Fan rows out over workers and gather their private buffers.
fn assemble<F: EngineFactory>(
    factory: &F,
    rows: &[usize],
    plan: &RowPlan<'_>,
) -> Vec<Vec<SparseEntry>> {
    if plan.params.parallel {
        rows.par_iter()
            .map_init(|| factory.engine(), |engine, &row| plan.fill(engine, row))
            .collect()
    } else {
        let mut engine = factory.engine();
        rows.iter().map(|&row| plan.fill(&mut engine, row)).collect()
    }
}
