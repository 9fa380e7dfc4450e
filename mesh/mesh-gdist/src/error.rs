//! Error types for distance queries.

use std::fmt;

use mesh_types::MeshError;
use thiserror::Error;

use crate::boundary::SparseBufferId;

/// Result type for distance queries.
pub type GdistResult<T> = Result<T, GdistError>;

/// What a caller-supplied vertex index was meant to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexRole {
    /// A propagation source.
    Source,
    /// A query target.
    Target,
    /// A point of a selected-points matrix.
    Point,
}

impl fmt::Display for IndexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Source => "source",
            Self::Target => "target",
            Self::Point => "point",
        })
    }
}

/// Errors reported by distance queries.
///
/// Every variant is detected before propagation starts or before any
/// output is written, so a failed call never leaves partial results.
#[derive(Debug, Error)]
pub enum GdistError {
    /// The mesh arrays are malformed.
    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),

    /// A source, target or point index does not name a vertex.
    #[error("{role} index {index} is out of range (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        /// Which selection held the index.
        role: IndexRole,
        /// The offending index.
        index: usize,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// The sparse result buffer could not be allocated.
    #[error("failed to allocate a sparse result of {entries} entries")]
    AllocationFailure {
        /// Number of entries requested.
        entries: usize,
    },

    /// A caller-provided output buffer has the wrong length.
    #[error("output buffer holds {actual} values, expected {expected}")]
    BufferSizeMismatch {
        /// Required length (the number of targets).
        expected: usize,
        /// Length of the buffer provided.
        actual: usize,
    },

    /// Query parameters are unusable.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// A sparse buffer was released a second time.
    #[error("sparse buffer {id} was already released")]
    DoubleRelease {
        /// The buffer handle.
        id: SparseBufferId,
    },

    /// A handle was released that this registry never issued.
    #[error("sparse buffer {id} was not issued by this registry")]
    UnmanagedRelease {
        /// The buffer handle.
        id: SparseBufferId,
    },

    /// A released buffer was accessed.
    #[error("sparse buffer {id} is no longer live")]
    StaleBuffer {
        /// The buffer handle.
        id: SparseBufferId,
    },
}

impl GdistError {
    /// Create an invalid params error.
    #[must_use]
    pub fn invalid_params(details: impl Into<String>) -> Self {
        Self::InvalidParams(details.into())
    }

    /// Create an out-of-range index error.
    #[must_use]
    pub const fn index_out_of_range(role: IndexRole, index: usize, vertex_count: usize) -> Self {
        Self::IndexOutOfRange {
            role,
            index,
            vertex_count,
        }
    }
}

/// Check that every index names a vertex, reporting the first that does not.
pub(crate) fn check_indices(
    role: IndexRole,
    indices: &[usize],
    vertex_count: usize,
) -> GdistResult<()> {
    match indices.iter().find(|&&i| i >= vertex_count) {
        Some(&index) => Err(GdistError::index_out_of_range(role, index, vertex_count)),
        None => Ok(()),
    }
}
