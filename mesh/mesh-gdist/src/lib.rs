//! Geodesic distance queries and sparse distance matrices on triangle meshes.
//!
//! This crate drives a propagation engine to answer two kinds of question:
//!
//! - **Dense queries** - [`compute_gdist`]: distance from the nearest of a set
//!   of sources to each of a set of targets, optionally bounded
//! - **Sparse matrices** - [`local_gdist_matrix`]: every vertex pair within
//!   `max_distance`, built in parallel across source vertices
//! - **Selected points** - [`distance_matrix_of_selected_points`]: pairwise
//!   distances among a chosen subset of vertices
//! - **Boundary** - [`compute_distances`] and [`SparseBufferRegistry`] for
//!   callers that hold flat arrays and need explicit buffer release
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Distances
//!
//! Unreached targets get `f64::INFINITY`, never NaN. Sparse matrices only
//! hold entries that are finite, nonzero and at most `max_distance`, so the
//! diagonal is always absent.
//!
//! # Accuracy
//!
//! The bundled engine measures shortest paths along mesh edges. Its
//! distances are never shorter than the true surface geodesic and are exact
//! whenever the shortest path follows edges. Elsewhere they overestimate: on
//! a flat triangulated grid, the corner-to-corner distance across a 2 × 1
//! block is `1 + √2 ≈ 2.414` instead of `√5 ≈ 2.236`, and the ratio can
//! reach `√2` for paths running against the diagonal. Refining the mesh does
//! not close that gap. Callers that need exact geodesics plug an exact
//! engine in through the `_with` functions.
//!
//! The plain functions use the bundled [`GeodesicSolver`](mesh_geodesic::GeodesicSolver).
//! Each has a `_with` variant that accepts any
//! [`EngineFactory`](mesh_geodesic::EngineFactory).
//!
//! # Example
//!
//! ```
//! use mesh_gdist::{compute_gdist, local_gdist_matrix, GdistParams};
//! use mesh_types::{IndexBase, IndexedMesh};
//!
//! // Two triangles forming a unit square
//! let coords = [
//!     0.0, 0.0, 0.0,
//!     1.0, 0.0, 0.0,
//!     1.0, 1.0, 0.0,
//!     0.0, 1.0, 0.0,
//! ];
//! let mesh = IndexedMesh::from_flat(&coords, &[0, 1, 2, 0, 2, 3], IndexBase::ZeroBased)?;
//!
//! let d = compute_gdist(&mesh, &[0], &[2], &GdistParams::default())?;
//! assert!((d[0] - 2.0_f64.sqrt()).abs() < 1e-10);
//!
//! let matrix = local_gdist_matrix(&mesh, &GdistParams::bounded(1.0))?;
//! assert_eq!(matrix.len(), 8);
//! # Ok::<(), mesh_gdist::GdistError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod boundary;
mod error;
mod matrix;
mod params;
mod query;
mod sparse;

pub use boundary::{FlatMesh, SparseBufferId, SparseBufferRegistry, compute_distances};
pub use error::{GdistError, GdistResult, IndexRole};
pub use matrix::{
    distance_matrix_of_selected_points, distance_matrix_of_selected_points_with,
    local_gdist_matrix, local_gdist_matrix_with,
};
pub use params::{GdistParams, PropagationMode};
pub use query::{
    NearestSource, compute_gdist, compute_gdist_into, compute_gdist_into_with, nearest_sources,
    nearest_sources_with,
};
pub use sparse::{SparseEntry, SparseMatrix};
