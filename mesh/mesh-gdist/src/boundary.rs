//! Flat-buffer entry points for callers outside Rust.
//!
//! A foreign caller hands over raw coordinate and index arrays and gets
//! back either a dense distance vector (copied out, nothing to free) or a
//! handle to a sparse matrix that stays owned by a
//! [`SparseBufferRegistry`] until it is released.
//!
//! Releasing is exactly-once and checked: handles carry the tag of the
//! registry that issued them, and serials are never reused, so a second
//! release or a foreign handle is reported instead of corrupting memory.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use mesh_types::{IndexBase, IndexedMesh, MeshResult};
use tracing::{debug, warn};

use crate::error::{GdistError, GdistResult, IndexRole, check_indices};
use crate::matrix::local_gdist_matrix;
use crate::params::GdistParams;
use crate::query::compute_gdist;
use crate::sparse::SparseMatrix;

/// Borrowed flat mesh arrays as a foreign caller provides them.
///
/// `vertices` holds `x, y, z` per vertex, `triangles` three vertex
/// indices per face. Nothing is validated until [`FlatMesh::to_mesh`].
#[derive(Debug, Clone, Copy)]
pub struct FlatMesh<'a> {
    /// Vertex coordinates, three per vertex.
    pub vertices: &'a [f64],
    /// Triangle vertex indices, three per face.
    pub triangles: &'a [u32],
}

impl<'a> FlatMesh<'a> {
    /// Wrap flat coordinate and index arrays.
    #[must_use]
    pub const fn new(vertices: &'a [f64], triangles: &'a [u32]) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Number of whole vertices in the coordinate array.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of whole triangles in the index array.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Copy the arrays into an owned, validated mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`MeshError`](mesh_types::MeshError) if an array length
    /// is not a multiple of three, a coordinate is not finite, or an index
    /// does not name a vertex under `base`.
    pub fn to_mesh(&self, base: IndexBase) -> MeshResult<IndexedMesh> {
        IndexedMesh::from_flat(self.vertices, self.triangles, base)
    }
}

/// Dense distance query on flat arrays.
///
/// `params.index_base` applies to the triangle indices only; source and
/// target indices are always zero-based vertex indices. `sources = None`
/// selects vertex 0 alone; `targets = None` selects every vertex in index
/// order.
///
/// # Errors
///
/// - [`GdistError::InvalidMesh`] for malformed arrays
/// - [`GdistError::IndexOutOfRange`] for a selection outside the mesh (an
///   empty mesh has no default source)
/// - [`GdistError::InvalidParams`] for a NaN or negative `max_distance`
pub fn compute_distances(
    flat: FlatMesh<'_>,
    sources: Option<&[u32]>,
    targets: Option<&[u32]>,
    params: &GdistParams,
) -> GdistResult<Vec<f64>> {
    params.validate()?;
    let mesh = flat.to_mesh(params.index_base)?;
    let vertex_count = mesh.vertices.len();

    let sources = match sources {
        Some(indices) => widen_selection(IndexRole::Source, indices, vertex_count)?,
        None if vertex_count == 0 => {
            return Err(GdistError::index_out_of_range(IndexRole::Source, 0, 0));
        }
        None => vec![0],
    };
    let targets = match targets {
        Some(indices) => widen_selection(IndexRole::Target, indices, vertex_count)?,
        None => (0..vertex_count).collect(),
    };

    compute_gdist(&mesh, &sources, &targets, params)
}

/// Copy caller indices into vertex indices, checking they name vertices.
fn widen_selection(role: IndexRole, indices: &[u32], vertex_count: usize) -> GdistResult<Vec<usize>> {
    let widened: Vec<usize> = indices.iter().map(|&i| i as usize).collect();
    check_indices(role, &widened, vertex_count)?;
    Ok(widened)
}

/// Registry tags are unique per process so handles never alias across registries.
static NEXT_REGISTRY_TAG: AtomicU64 = AtomicU64::new(1);

/// Handle to a sparse matrix owned by a [`SparseBufferRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SparseBufferId {
    registry: u64,
    serial: u64,
}

impl SparseBufferId {
    /// Serial number of this handle within its registry.
    #[must_use]
    pub const fn serial(self) -> u64 {
        self.serial
    }
}

impl fmt::Display for SparseBufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.registry, self.serial)
    }
}

/// Owner of every sparse matrix handed across the boundary.
///
/// The registry is `Sync`; builds run outside the lock, only insertion
/// and release take it.
///
/// # Example
///
/// ```
/// use mesh_gdist::{FlatMesh, GdistError, GdistParams, SparseBufferRegistry};
///
/// let coords = [0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0, 0.2, 0.0];
/// let flat = FlatMesh::new(&coords, &[0, 1, 2]);
///
/// let registry = SparseBufferRegistry::new();
/// let id = registry.build_sparse_matrix(flat, &GdistParams::default())?;
/// assert_eq!(registry.with_buffer(id, |m| m.len())?, 6);
///
/// let matrix = registry.release(id)?;
/// assert_eq!(matrix.to_packed().len(), 18);
/// assert!(matches!(registry.release(id), Err(GdistError::DoubleRelease { .. })));
/// # Ok::<(), GdistError>(())
/// ```
#[derive(Debug)]
pub struct SparseBufferRegistry {
    tag: u64,
    next_serial: AtomicU64,
    live: Mutex<HashMap<u64, SparseMatrix>>,
}

impl Default for SparseBufferRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseBufferRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tag: NEXT_REGISTRY_TAG.fetch_add(1, Ordering::Relaxed),
            next_serial: AtomicU64::new(0),
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Build the sparse all-pairs matrix of a flat mesh and keep it here.
    ///
    /// # Errors
    ///
    /// Any error of [`local_gdist_matrix`], or [`GdistError::InvalidMesh`]
    /// for malformed arrays. Nothing is registered on failure.
    pub fn build_sparse_matrix(
        &self,
        flat: FlatMesh<'_>,
        params: &GdistParams,
    ) -> GdistResult<SparseBufferId> {
        params.validate()?;
        let mesh = flat.to_mesh(params.index_base)?;
        let matrix = local_gdist_matrix(&mesh, params)?;
        Ok(self.insert(matrix))
    }

    /// Take ownership of a matrix and hand out its handle.
    pub fn insert(&self, matrix: SparseMatrix) -> SparseBufferId {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let id = SparseBufferId {
            registry: self.tag,
            serial,
        };
        debug!(%id, entries = matrix.len(), "Registered sparse buffer");
        self.lock().insert(serial, matrix);
        id
    }

    /// Read a live matrix.
    ///
    /// # Errors
    ///
    /// [`GdistError::StaleBuffer`] if the handle was released,
    /// [`GdistError::UnmanagedRelease`] if this registry never issued it.
    pub fn with_buffer<R>(
        &self,
        id: SparseBufferId,
        f: impl FnOnce(&SparseMatrix) -> R,
    ) -> GdistResult<R> {
        self.check_issued(id)?;
        let live = self.lock();
        live.get(&id.serial)
            .map(f)
            .ok_or(GdistError::StaleBuffer { id })
    }

    /// Release a matrix, returning it to the caller.
    ///
    /// # Errors
    ///
    /// [`GdistError::DoubleRelease`] if the handle was already released,
    /// [`GdistError::UnmanagedRelease`] if this registry never issued it.
    pub fn release(&self, id: SparseBufferId) -> GdistResult<SparseMatrix> {
        self.check_issued(id)?;
        match self.lock().remove(&id.serial) {
            Some(matrix) => {
                debug!(%id, "Released sparse buffer");
                Ok(matrix)
            }
            None => {
                warn!(%id, "Sparse buffer released twice");
                Err(GdistError::DoubleRelease { id })
            }
        }
    }

    /// Number of matrices not yet released.
    #[must_use]
    pub fn live_buffers(&self) -> usize {
        self.lock().len()
    }

    fn check_issued(&self, id: SparseBufferId) -> GdistResult<()> {
        if id.registry == self.tag && id.serial < self.next_serial.load(Ordering::Relaxed) {
            Ok(())
        } else {
            warn!(%id, registry = self.tag, "Rejected sparse buffer from another registry");
            Err(GdistError::UnmanagedRelease { id })
        }
    }

    // A panic inside `with_buffer` poisons the lock but leaves the map intact.
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, SparseMatrix>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const COORDS: [f64; 12] = [
        0.0, 0.0, 0.0, //
        0.2, 0.0, 0.0, //
        0.0, 0.2, 0.0, //
        5.0, 5.0, 5.0,
    ];

    #[test]
    fn flat_mesh_counts() {
        let flat = FlatMesh::new(&COORDS, &[0, 1, 2]);
        assert_eq!(flat.vertex_count(), 4);
        assert_eq!(flat.triangle_count(), 1);
        assert_eq!(flat.to_mesh(IndexBase::ZeroBased).unwrap().faces.len(), 1);
    }

    #[test]
    fn default_selections() {
        let flat = FlatMesh::new(&COORDS, &[0, 1, 2]);
        let d = compute_distances(flat, None, None, &GdistParams::default()).unwrap();
        assert_eq!(d.len(), 4);
        assert!(d[0].abs() < 1e-12);
        assert!((d[1] - 0.2).abs() < 1e-6);
        assert!((d[2] - 0.2).abs() < 1e-6);
        assert!(d[3].is_infinite());
    }

    #[test]
    fn one_based_triangles_keep_zero_based_selections() {
        let params = GdistParams::one_indexed();
        let flat = FlatMesh::new(&COORDS, &[1, 2, 3]);

        let d = compute_distances(flat, Some(&[0][..]), Some(&[1][..]), &params).unwrap();
        assert!((d[0] - 0.2).abs() < 1e-6);

        let d = compute_distances(flat, Some(&[1][..]), Some(&[0, 2][..]), &params).unwrap();
        assert!((d[0] - 0.2).abs() < 1e-6);
        assert!((d[1] - 0.2 * 2.0_f64.sqrt()).abs() < 1e-6);

        let err = compute_distances(flat, Some(&[4][..]), None, &params);
        assert!(matches!(
            err,
            Err(GdistError::IndexOutOfRange {
                role: IndexRole::Source,
                index: 4,
                ..
            })
        ));
    }

    #[test]
    fn selection_out_of_range_reports_caller_index() {
        let flat = FlatMesh::new(&COORDS, &[0, 1, 2]);
        let err = compute_distances(flat, None, Some(&[1, 4][..]), &GdistParams::default());
        assert!(matches!(
            err,
            Err(GdistError::IndexOutOfRange {
                role: IndexRole::Target,
                index: 4,
                vertex_count: 4,
            })
        ));
    }

    #[test]
    fn empty_mesh_has_no_default_source() {
        let flat = FlatMesh::new(&[], &[]);
        let err = compute_distances(flat, None, None, &GdistParams::default());
        assert!(matches!(err, Err(GdistError::IndexOutOfRange { index: 0, .. })));

        let d = compute_distances(flat, Some(&[][..]), None, &GdistParams::default()).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn malformed_arrays_are_rejected() {
        let flat = FlatMesh::new(&COORDS[..10], &[0, 1, 2]);
        let err = compute_distances(flat, None, None, &GdistParams::default());
        assert!(matches!(err, Err(GdistError::InvalidMesh(_))));
    }

    #[test]
    fn registry_lifecycle() {
        let registry = SparseBufferRegistry::new();
        let flat = FlatMesh::new(&COORDS, &[0, 1, 2]);

        let a = registry.build_sparse_matrix(flat, &GdistParams::default()).unwrap();
        let b = registry.build_sparse_matrix(flat, &GdistParams::bounded(0.25)).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.live_buffers(), 2);

        assert_eq!(registry.with_buffer(b, SparseMatrix::len).unwrap(), 4);
        let released = registry.release(a).unwrap();
        assert_eq!(released.len(), 6);
        assert_eq!(registry.live_buffers(), 1);

        assert!(matches!(
            registry.release(a),
            Err(GdistError::DoubleRelease { id }) if id == a
        ));
        assert!(matches!(
            registry.with_buffer(a, SparseMatrix::len),
            Err(GdistError::StaleBuffer { .. })
        ));
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let ours = SparseBufferRegistry::new();
        let theirs = SparseBufferRegistry::new();
        let id = theirs.insert(SparseMatrix::new(0));

        assert!(matches!(
            ours.release(id),
            Err(GdistError::UnmanagedRelease { .. })
        ));
        assert_eq!(theirs.live_buffers(), 1);

        let forged = SparseBufferId {
            registry: ours.tag,
            serial: 7,
        };
        assert!(matches!(
            ours.release(forged),
            Err(GdistError::UnmanagedRelease { .. })
        ));
    }

    #[test]
    fn failed_build_registers_nothing() {
        let registry = SparseBufferRegistry::default();
        let flat = FlatMesh::new(&COORDS, &[0, 1, 9]);
        assert!(registry.build_sparse_matrix(flat, &GdistParams::default()).is_err());
        assert_eq!(registry.live_buffers(), 0);
    }

    #[test]
    fn id_display() {
        let registry = SparseBufferRegistry::new();
        let id = registry.insert(SparseMatrix::new(3));
        assert_eq!(id.serial(), 0);
        assert!(format!("{id}").ends_with(":0"));
    }
}
