//! Property-based tests for distance queries and sparse matrices.
//!
//! These tests use proptest to generate random height-field meshes and
//! verify metric and pruning invariants.
//!
//! Run with: cargo test -p mesh-gdist -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use mesh_gdist::{
    FlatMesh, GdistParams, PropagationMode, compute_distances, compute_gdist, local_gdist_matrix,
};
use mesh_types::{IndexBase, IndexedMesh, Vertex};
use proptest::prelude::*;

const EPS: f64 = 1e-9;

// =============================================================================
// Strategies for generating random meshes
// =============================================================================

/// Triangulated `n × n` height field with unit spacing and random heights.
fn height_field(n: u32, heights: &[f64]) -> IndexedMesh {
    let stride = n + 1;
    let mut mesh = IndexedMesh::with_capacity((stride * stride) as usize, (2 * n * n) as usize);
    for j in 0..stride {
        for i in 0..stride {
            let z = heights[(j * stride + i) as usize];
            mesh.vertices
                .push(Vertex::from_coords(f64::from(i), f64::from(j), z));
        }
    }
    for j in 0..n {
        for i in 0..n {
            let a = j * stride + i;
            mesh.faces.push([a, a + 1, a + stride + 1]);
            mesh.faces.push([a, a + stride + 1, a + stride]);
        }
    }
    mesh
}

/// Generate a connected height-field mesh with 9 to 36 vertices.
fn arb_mesh() -> impl Strategy<Value = IndexedMesh> {
    (2u32..=5).prop_flat_map(|n| {
        let count = ((n + 1) * (n + 1)) as usize;
        prop::collection::vec(-2.0..2.0f64, count).prop_map(move |h| height_field(n, &h))
    })
}

/// A mesh together with one of its vertex indices.
fn arb_mesh_and_vertex() -> impl Strategy<Value = (IndexedMesh, usize)> {
    arb_mesh().prop_flat_map(|mesh| {
        let n = mesh.vertices.len();
        (Just(mesh), 0..n)
    })
}

// =============================================================================
// Metric properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_matrix_is_symmetric(mesh in arb_mesh()) {
        let matrix = local_gdist_matrix(&mesh, &GdistParams::default()).unwrap();
        for entry in matrix.iter() {
            let back = matrix.get(entry.column, entry.row);
            prop_assert!(back.is_some());
            prop_assert!((back.unwrap() - entry.value).abs() <= EPS * entry.value.max(1.0));
        }
    }

    #[test]
    fn proptest_matrix_excludes_self(mesh in arb_mesh(), limit in 0.0..4.0f64) {
        let matrix = local_gdist_matrix(&mesh, &GdistParams::bounded(limit)).unwrap();
        for entry in matrix.iter() {
            prop_assert_ne!(entry.row, entry.column);
            prop_assert!(entry.value > 0.0);
            prop_assert!(entry.value <= limit);
        }
    }

    #[test]
    fn proptest_triangle_inequality((mesh, source) in arb_mesh_and_vertex()) {
        let n = mesh.vertices.len();
        let targets: Vec<usize> = (0..n).collect();
        let params = GdistParams::default();
        let from_source = compute_gdist(&mesh, &[source], &targets, &params).unwrap();

        for via in 0..n {
            let from_via = compute_gdist(&mesh, &[via], &targets, &params).unwrap();
            for target in 0..n {
                let direct = from_source[target];
                let detour = from_source[via] + from_via[target];
                prop_assert!(direct <= detour + EPS * detour.max(1.0));
            }
        }
    }

    #[test]
    fn proptest_bounded_matrix_is_subset(
        mesh in arb_mesh(),
        low in 0.0..2.0f64,
        extra in 0.0..2.0f64,
    ) {
        let small = local_gdist_matrix(&mesh, &GdistParams::bounded(low)).unwrap();
        let large = local_gdist_matrix(&mesh, &GdistParams::bounded(low + extra)).unwrap();

        prop_assert!(small.len() <= large.len());
        for entry in small.iter() {
            let wider = large.get(entry.row, entry.column);
            prop_assert_eq!(wider, Some(entry.value));
        }
    }
}

// =============================================================================
// Query semantics
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn proptest_bounded_query_sentinel(
        (mesh, source) in arb_mesh_and_vertex(),
        limit in 0.0..3.0f64,
    ) {
        let targets: Vec<usize> = (0..mesh.vertices.len()).collect();
        let unbounded = compute_gdist(&mesh, &[source], &targets, &GdistParams::default()).unwrap();
        let params = GdistParams::bounded(limit).with_propagation(PropagationMode::BoundedRadius);
        let bounded = compute_gdist(&mesh, &[source], &targets, &params).unwrap();

        for (&full, &cut) in unbounded.iter().zip(&bounded) {
            prop_assert!(!cut.is_nan());
            if full <= limit {
                prop_assert_eq!(cut, full);
            } else {
                prop_assert_eq!(cut, f64::INFINITY);
            }
        }
    }

    #[test]
    fn proptest_modes_agree(
        (mesh, source) in arb_mesh_and_vertex(),
        targets in prop::collection::vec(0usize..9, 1..6),
        limit in 0.5..5.0f64,
    ) {
        let stop = GdistParams::bounded(limit);
        let radius = stop.with_propagation(PropagationMode::BoundedRadius);
        let a = compute_gdist(&mesh, &[source], &targets, &stop).unwrap();
        let b = compute_gdist(&mesh, &[source], &targets, &radius).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn proptest_index_convention_equivalence(
        (mesh, source) in arb_mesh_and_vertex(),
    ) {
        let coords = mesh.flat_coords();
        let zero = mesh.flat_triangles(IndexBase::ZeroBased);
        let one = mesh.flat_triangles(IndexBase::OneBased);
        let src = u32::try_from(source).unwrap();

        let d0 = compute_distances(
            FlatMesh::new(&coords, &zero),
            Some(&[src][..]),
            None,
            &GdistParams::default(),
        ).unwrap();
        let d1 = compute_distances(
            FlatMesh::new(&coords, &one),
            Some(&[src][..]),
            None,
            &GdistParams::one_indexed(),
        ).unwrap();
        prop_assert_eq!(d0, d1);
    }
}
