//! Indexed triangle mesh.

use crate::{IndexBase, MeshError, MeshResult, MeshTopology, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices
/// by zero-based index. A mesh built through [`IndexedMesh::from_flat`]
/// is guaranteed to have every face index in `[0, vertex_count)`; it is
/// not checked for manifoldness or consistent orientation.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Vertex positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// // Create a single triangle
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as zero-based indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and zero-based faces without validation.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Build a mesh from flat coordinate and triangle index arrays.
    ///
    /// # Arguments
    ///
    /// * `coords` - Flat vertex positions `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `triangles` - Flat face indices `[a0, b0, c0, a1, b1, c1, ...]`
    /// * `base` - Numbering convention of `triangles`
    ///
    /// # Errors
    ///
    /// Returns an error, without building anything, if:
    /// - `coords.len()` or `triangles.len()` is not a multiple of 3
    /// - a coordinate is NaN or infinite
    /// - a one-based index is 0
    /// - a normalized index is not below the vertex count
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexBase, IndexedMesh, MeshError};
    ///
    /// let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    ///
    /// let mesh = IndexedMesh::from_flat(&coords, &[0, 1, 2], IndexBase::ZeroBased)?;
    /// assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    ///
    /// let err = IndexedMesh::from_flat(&coords, &[0, 1, 3], IndexBase::ZeroBased);
    /// assert!(matches!(err, Err(MeshError::FaceIndexOutOfRange { index: 3, .. })));
    /// # Ok::<(), MeshError>(())
    /// ```
    pub fn from_flat(coords: &[f64], triangles: &[u32], base: IndexBase) -> MeshResult<Self> {
        if coords.len() % 3 != 0 {
            return Err(MeshError::InvalidCoordinateLength { len: coords.len() });
        }
        if triangles.len() % 3 != 0 {
            return Err(MeshError::InvalidIndexLength {
                len: triangles.len(),
            });
        }

        let vertices: Vec<Vertex> = coords
            .chunks_exact(3)
            .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
            .collect();

        if let Some(vertex) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(MeshError::NonFiniteCoordinate { vertex });
        }

        let vertex_count = vertices.len();
        let faces = triangles
            .chunks_exact(3)
            .enumerate()
            .map(|(face, c)| {
                let mut normalized = [0u32; 3];
                for (slot, &raw) in normalized.iter_mut().zip(c) {
                    let index = base
                        .normalize(raw)
                        .ok_or(MeshError::IndexBelowBase { face, index: raw })?;
                    if index as usize >= vertex_count {
                        return Err(MeshError::FaceIndexOutOfRange {
                            face,
                            index,
                            vertex_count,
                        });
                    }
                    *slot = index;
                }
                Ok(normalized)
            })
            .collect::<MeshResult<Vec<_>>>()?;

        Ok(Self { vertices, faces })
    }

    /// Check that every face index names an existing vertex.
    ///
    /// Meshes assembled by hand through [`IndexedMesh::from_parts`] or the
    /// public fields skip the checks of [`IndexedMesh::from_flat`]; this
    /// runs the index part of them.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::FaceIndexOutOfRange`] for the first bad index.
    pub fn validate_indices(&self) -> MeshResult<()> {
        let vertex_count = self.vertices.len();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::FaceIndexOutOfRange {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Flatten the vertex positions back to `[x0, y0, z0, x1, ...]`.
    #[must_use]
    pub fn flat_coords(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Flatten the faces back to indices in the given convention.
    #[must_use]
    pub fn flat_triangles(&self, base: IndexBase) -> Vec<u32> {
        self.faces
            .iter()
            .flatten()
            .map(|&i| i + base.offset())
            .collect()
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    fn faces(&self) -> impl Iterator<Item = [u32; 3]> {
        self.faces.iter().copied()
    }
}
