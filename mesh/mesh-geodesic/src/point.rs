//! Points on a mesh surface.

use std::fmt;

/// A location on the mesh surface at which distances are measured or from
/// which they are propagated.
///
/// Only vertex locations are represented; points inside an edge or face
/// are not constructed by anything in this workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfacePoint {
    vertex: usize,
}

impl SurfacePoint {
    /// The surface point sitting on a vertex.
    #[inline]
    #[must_use]
    pub const fn vertex(index: usize) -> Self {
        Self { vertex: index }
    }

    /// Index of the vertex this point sits on.
    #[inline]
    #[must_use]
    pub const fn vertex_index(self) -> usize {
        self.vertex
    }

    /// Surface points for a run of vertex indices.
    pub fn from_vertices(indices: &[usize]) -> impl Iterator<Item = Self> + '_ {
        indices.iter().copied().map(Self::vertex)
    }
}

impl From<usize> for SurfacePoint {
    fn from(index: usize) -> Self {
        Self::vertex(index)
    }
}

impl fmt::Display for SurfacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vertex {}", self.vertex)
    }
}
