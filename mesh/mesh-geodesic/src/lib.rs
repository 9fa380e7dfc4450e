//! Geodesic (surface) distance propagation for triangle meshes.
//!
//! This crate provides the propagation side of distance queries:
//!
//! - **Engine contract** - [`PropagationEngine`] and [`EngineFactory`], the
//!   only capabilities distance drivers rely on
//! - **Dijkstra engine** - [`GeodesicSolver`] / [`DijkstraEngine`], shortest
//!   paths along mesh edges with cutoff and early stopping
//! - **Distance field** - Per-vertex distance and nearest-source values
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It can be used in:
//! - CLI tools
//! - Web applications (WASM)
//! - Servers
//! - Python bindings
//!
//! # Algorithm
//!
//! The bundled engine runs Dijkstra's algorithm on the mesh edge graph with
//! Euclidean edge weights. This gives exact distances **along edges** and
//! an upper bound on the true surface geodesic elsewhere; on a regular
//! triangulated grid the bound can be off by up to a factor of `√2`,
//! however fine the grid. An exact window-propagation engine can be plugged in through the
//! traits without touching any caller.
//!
//! # Example
//!
//! ```
//! use mesh_geodesic::{EngineFactory, GeodesicSolver, PropagationEngine, SurfacePoint};
//! use mesh_types::{IndexedMesh, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! let solver = GeodesicSolver::new(&mesh);
//! let mut engine = solver.engine();
//! engine.propagate(&[SurfacePoint::vertex(0)], f64::INFINITY, None);
//!
//! assert!(engine.distance(SurfacePoint::vertex(0)) < 1e-10);
//! assert!((engine.distance(SurfacePoint::vertex(1)) - 1.0).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod dijkstra;
mod distance;
mod engine;
mod error;
mod point;

pub use adjacency::AdjacencyList;
pub use dijkstra::{DijkstraEngine, GeodesicSolver};
pub use distance::DistanceField;
pub use engine::{EngineFactory, PropagationEngine};
pub use error::{GeodesicError, GeodesicResult};
pub use point::SurfacePoint;
