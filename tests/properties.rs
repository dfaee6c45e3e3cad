// Copyright 2025 Lars Brubaker
// Property tests over random grids of rectangular obstacles.

mod helpers;

use helpers::{build, rect, total_area, verify_delaunay, verify_mesh};
use navmesh_cdt::{Point, Polygon, Real};
use proptest::prelude::*;

const CELL: Real = 10.0;

/// One optional obstacle per grid cell, given as insets from the cell corner.
fn grid() -> impl Strategy<Value = (usize, Vec<Option<(Real, Real, Real, Real)>>)> {
    (1usize..5).prop_flat_map(|n| {
        let cell = prop::option::of((1.0..4.0, 1.0..4.0, 1.0..5.0, 1.0..5.0));
        (Just(n), prop::collection::vec(cell, n * n))
    })
}

fn obstacles(n: usize, cells: &[Option<(Real, Real, Real, Real)>]) -> Vec<Vec<Real>> {
    cells
        .iter()
        .enumerate()
        .filter_map(|(k, c)| {
            let (dx, dy, w, h) = (*c)?;
            let x = (k % n) as Real * CELL + dx;
            let y = (k / n) as Real * CELL + dy;
            Some(rect(x, y, x + w, y + h))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Euler holds, faces are CCW triangles and every free edge is Delaunay.
    #[test]
    fn mesh_is_valid_cdt((n, cells) in grid()) {
        let side = n as Real * CELL;
        let holes = obstacles(n, &cells);
        let refs: Vec<&[Real]> = holes.iter().map(|h| h.as_slice()).collect();
        let dcdt = build(&rect(0.0, 0.0, side, side), &refs);
        verify_mesh(&dcdt);
        verify_delaunay(&dcdt);
        let constrained = dcdt.get_mesh_edges().unwrap().constrained.len();
        prop_assert_eq!(constrained, 4 + 4 * holes.len());
    }

    /// Walkable area is the boundary area minus every obstacle.
    #[test]
    fn walkable_area_is_conserved((n, cells) in grid()) {
        let side = n as Real * CELL;
        let holes = obstacles(n, &cells);
        let refs: Vec<&[Real]> = holes.iter().map(|h| h.as_slice()).collect();
        let dcdt = build(&rect(0.0, 0.0, side, side), &refs);

        let hole_area: Real = holes.iter().map(|h| Polygon::from_coords(h).area()).sum();
        let walkable = dcdt.extract_faces(Point::new(0.5, 0.5)).unwrap();
        prop_assert!((total_area(&walkable) - (side * side - hole_area)).abs() < 1e-6);

        let all = dcdt.extract_faces_all().unwrap();
        prop_assert!((total_area(&all) - side * side).abs() < 1e-6);
        prop_assert!(walkable.iter().all(|t| all.contains(t)));
    }

    /// Repeated extraction returns identical results.
    #[test]
    fn extraction_is_idempotent((n, cells) in grid()) {
        let side = n as Real * CELL;
        let holes = obstacles(n, &cells);
        let refs: Vec<&[Real]> = holes.iter().map(|h| h.as_slice()).collect();
        let dcdt = build(&rect(0.0, 0.0, side, side), &refs);

        let seed = Point::new(0.5, 0.5);
        prop_assert_eq!(dcdt.extract_faces(seed).unwrap(), dcdt.extract_faces(seed).unwrap());
        prop_assert_eq!(dcdt.extract_faces_all().unwrap(), dcdt.extract_faces_all().unwrap());
        prop_assert_eq!(dcdt.get_mesh_edges().unwrap(), dcdt.get_mesh_edges().unwrap());
    }
}
