//! Error types for mesh construction.

use thiserror::Error;

/// Result type for mesh construction.
pub type MeshResult<T> = Result<T, MeshError>;

/// Reasons a pair of flat arrays cannot be turned into a mesh.
///
/// All of these are detected before any mesh is built, so a failed
/// construction never leaves a partial mesh behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The coordinate array length is not a multiple of 3.
    #[error("vertex coordinate array has length {len}, which is not a multiple of 3")]
    InvalidCoordinateLength {
        /// Length of the coordinate array.
        len: usize,
    },

    /// The triangle index array length is not a multiple of 3.
    #[error("triangle index array has length {len}, which is not a multiple of 3")]
    InvalidIndexLength {
        /// Length of the index array.
        len: usize,
    },

    /// A one-based triangle index was 0.
    #[error("face {face} contains index {index}, below the one-based index base")]
    IndexBelowBase {
        /// Face that holds the index.
        face: usize,
        /// The raw (un-normalized) index.
        index: u32,
    },

    /// A normalized triangle index does not name a vertex.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    FaceIndexOutOfRange {
        /// Face that holds the index.
        face: usize,
        /// The normalized (zero-based) index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A vertex coordinate is NaN or infinite.
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// The offending vertex.
        vertex: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MeshError::InvalidCoordinateLength { len: 7 };
        assert!(format!("{err}").contains("multiple of 3"));

        let err = MeshError::FaceIndexOutOfRange {
            face: 2,
            index: 9,
            vertex_count: 4,
        };
        let msg = format!("{err}");
        assert!(msg.contains("face 2"));
        assert!(msg.contains("vertex 9"));
        assert!(msg.contains("4 vertices"));

        let err = MeshError::IndexBelowBase { face: 0, index: 0 };
        assert!(format!("{err}").contains("one-based"));
    }
}
