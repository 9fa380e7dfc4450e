//! Core mesh types for geodesic distance queries.
//!
//! This crate provides the mesh model every distance query runs on:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`IndexBase`] - Whether incoming triangle indices start at 0 or 1
//! - [`MeshError`] - Why a set of flat arrays could not become a mesh
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Flat Arrays
//!
//! Callers usually hold meshes as two flat arrays: `[x0, y0, z0, x1, ...]`
//! for coordinates and `[a0, b0, c0, a1, ...]` for triangles.
//! [`IndexedMesh::from_flat`] turns them into a mesh, normalizing one-based
//! indices and rejecting anything that would let a face reference a vertex
//! that does not exist. No topological validation (manifoldness,
//! orientation) is performed.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexBase, IndexedMesh, MeshTopology};
//!
//! let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let triangles = [1, 2, 3];
//!
//! let mesh = IndexedMesh::from_flat(&coords, &triangles, IndexBase::OneBased)?;
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.faces[0], [0, 1, 2]);
//! # Ok::<(), mesh_types::MeshError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod index;
mod mesh;
mod traits;
mod vertex;

pub use error::{MeshError, MeshResult};
pub use index::IndexBase;
pub use mesh::IndexedMesh;
pub use traits::MeshTopology;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
