//! Mesh adjacency data structure.
//!
//! Provides efficient neighbor lookup for mesh vertices.

use mesh_types::IndexedMesh;
use tracing::warn;

/// Adjacency list for mesh vertices.
///
/// Stores neighbors for each vertex, enabling efficient graph traversal.
/// Each neighbor entry includes the neighbor index and edge length.
/// The list is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct AdjacencyList {
    /// For each vertex, list of (neighbor index, edge length) pairs.
    neighbors: Vec<Vec<(u32, f64)>>,
}

impl AdjacencyList {
    /// Build an adjacency list from a mesh.
    ///
    /// Faces that reference a vertex outside the mesh are skipped (and
    /// reported once through `tracing`), so a malformed mesh yields a
    /// smaller graph rather than a panic. Vertices used by no face get an
    /// empty neighbor list.
    #[must_use]
    pub fn from_mesh(mesh: &IndexedMesh) -> Self {
        let vertex_count = mesh.vertices.len();
        let mut neighbors: Vec<Vec<(u32, f64)>> = vec![Vec::new(); vertex_count];
        let mut skipped = 0usize;

        for &[i0, i1, i2] in &mesh.faces {
            let (Some(v0), Some(v1), Some(v2)) = (
                mesh.vertices.get(i0 as usize),
                mesh.vertices.get(i1 as usize),
                mesh.vertices.get(i2 as usize),
            ) else {
                skipped += 1;
                continue;
            };

            Self::add_edge(&mut neighbors, i0, i1, v0.distance_to(v1));
            Self::add_edge(&mut neighbors, i1, i2, v1.distance_to(v2));
            Self::add_edge(&mut neighbors, i2, i0, v2.distance_to(v0));
        }

        if skipped > 0 {
            warn!(
                skipped,
                vertices = vertex_count,
                "Skipped faces with out-of-range vertex indices"
            );
        }

        Self { neighbors }
    }

    /// Add an edge between two vertices (if not already present).
    ///
    /// Degenerate edges from a vertex to itself are ignored.
    fn add_edge(neighbors: &mut [Vec<(u32, f64)>], v0: u32, v1: u32, length: f64) {
        if v0 == v1 {
            return;
        }

        if !neighbors[v0 as usize].iter().any(|&(n, _)| n == v1) {
            neighbors[v0 as usize].push((v1, length));
        }

        if !neighbors[v1 as usize].iter().any(|&(n, _)| n == v0) {
            neighbors[v1 as usize].push((v0, length));
        }
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Get the neighbors of a vertex.
    ///
    /// Returns a slice of (neighbor index, edge length) pairs.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        self.neighbors.get(vertex).map_or(&[], |v| v.as_slice())
    }

    /// Check if the adjacency list is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        // Each edge is stored twice (once for each direction)
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Count vertices that belong to no edge.
    #[must_use]
    pub fn isolated_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_empty()).count()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::map_unwrap_or
)]
mod tests {
    use super::*;
    use mesh_types::Vertex;

    #[test]
    fn adjacency_from_triangle() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let adj = AdjacencyList::from_mesh(&mesh);

        assert_eq!(adj.vertex_count(), 3);
        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.isolated_count(), 0);
        assert_eq!(adj.neighbors(0).len(), 2);
        assert_eq!(adj.neighbors(1).len(), 2);
        assert_eq!(adj.neighbors(2).len(), 2);
    }

    #[test]
    fn adjacency_edge_lengths() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(3.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 4.0, 0.0));
        mesh.faces.push([0, 1, 2]);

        let adj = AdjacencyList::from_mesh(&mesh);
        let neighbors_0 = adj.neighbors(0);

        let edge_01 = neighbors_0.iter().find(|&&(n, _)| n == 1).unwrap();
        assert!((edge_01.1 - 3.0).abs() < 1e-10);

        let edge_02 = neighbors_0.iter().find(|&&(n, _)| n == 2).unwrap();
        assert!((edge_02.1 - 4.0).abs() < 1e-10);

        let edge_12 = adj.neighbors(1).iter().find(|&&(n, _)| n == 2).unwrap();
        assert!((edge_12.1 - 5.0).abs() < 1e-10);
    }

    #[test]
    fn adjacency_empty_mesh() {
        let mesh = IndexedMesh::new();
        let adj = AdjacencyList::from_mesh(&mesh);

        assert!(adj.is_empty());
        assert_eq!(adj.vertex_count(), 0);
        assert_eq!(adj.edge_count(), 0);
    }

    #[test]
    fn adjacency_shared_edge() {
        // Two triangles sharing an edge
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, 1.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.5, -1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 3, 1]);

        let adj = AdjacencyList::from_mesh(&mesh);

        assert_eq!(adj.vertex_count(), 4);
        // Edges: 0-1, 1-2, 2-0, 0-3, 3-1 = 5 edges
        assert_eq!(adj.edge_count(), 5);
        assert_eq!(adj.neighbors(0).len(), 3);
    }

    #[test]
    fn adjacency_skips_out_of_range_faces() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
        mesh.faces.push([0, 1, 2]);
        mesh.faces.push([0, 1, 7]);

        let adj = AdjacencyList::from_mesh(&mesh);

        assert_eq!(adj.vertex_count(), 3);
        assert_eq!(adj.edge_count(), 3);
        assert!(adj.neighbors(7).is_empty());
    }

    #[test]
    fn adjacency_isolated_and_degenerate() {
        let mut mesh = IndexedMesh::new();
        mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::from_coords(9.0, 9.0, 9.0));
        mesh.faces.push([0, 1, 1]);

        let adj = AdjacencyList::from_mesh(&mesh);

        assert_eq!(adj.edge_count(), 1);
        assert_eq!(adj.isolated_count(), 1);
        assert!(adj.neighbors(2).is_empty());
    }
}
