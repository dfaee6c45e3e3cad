// Copyright 2025 Lars Brubaker
// End-to-end tests of the sentinel buffer protocol.

mod helpers;

use navmesh_cdt::wire::{
    decode_faces_and_edges, encode_edges, parse_input, triangulate_edges, triangulate_faces, END,
};
use navmesh_cdt::{Dcdt, DcdtError, Point, Real, DEFAULT_EPSILON};

fn scenario_b(seed: Option<(Real, Real)>) -> Vec<Real> {
    let mut data = Vec::new();
    if let Some((x, y)) = seed {
        data.extend_from_slice(&[END, x, y]);
    }
    data.extend_from_slice(&[-10.0, -10.0, 10.0, -10.0, 10.0, 10.0, -10.0, 10.0, END]);
    data.extend_from_slice(&[1.0, 1.0, 7.0, 3.0, 3.0, 8.0, END]);
    data.push(END);
    data
}

#[test]
fn faces_buffer_matches_session() {
    let data = scenario_b(Some((-5.0, -5.0)));
    let out = triangulate_faces(&data, DEFAULT_EPSILON).unwrap();
    let (edges, faces) = decode_faces_and_edges(&out).unwrap();
    assert_eq!(edges.len(), 7);

    let input = parse_input(&data).unwrap();
    let dcdt = Dcdt::from_polygons(&input.boundary, &input.obstacles, DEFAULT_EPSILON).unwrap();
    let expected = dcdt.extract_faces(Point::new(-5.0, -5.0)).unwrap();
    assert_eq!(faces, expected);
    assert!((helpers::total_area(&faces) - 381.0).abs() < 1e-9);
}

#[test]
fn faces_buffer_without_seed_uses_recorded_seed() {
    let with = triangulate_faces(&scenario_b(Some((-5.0, -5.0))), DEFAULT_EPSILON).unwrap();
    let without = triangulate_faces(&scenario_b(None), DEFAULT_EPSILON).unwrap();
    let (_, a) = decode_faces_and_edges(&with).unwrap();
    let (_, b) = decode_faces_and_edges(&without).unwrap();
    assert_eq!(a.len(), b.len());
    assert!((helpers::total_area(&a) - helpers::total_area(&b)).abs() < 1e-9);
}

#[test]
fn edges_buffer_lists_constrained_first() {
    let data = scenario_b(None);
    let out = triangulate_edges(&data, DEFAULT_EPSILON).unwrap();

    let input = parse_input(&data).unwrap();
    let dcdt = Dcdt::from_polygons(&input.boundary, &input.obstacles, DEFAULT_EPSILON).unwrap();
    let edges = dcdt.get_mesh_edges().unwrap();
    assert_eq!(out, encode_edges(&edges));
    assert_eq!(out.len(), 4 * dcdt.edge_count());

    let first = &out[..4 * edges.constrained.len()];
    for chunk in first.chunks_exact(4) {
        let (a, b) = (Point::new(chunk[0], chunk[1]), Point::new(chunk[2], chunk[3]));
        assert!(edges.constrained.iter().any(|s| s.a == a && s.b == b));
    }
}

#[test]
fn bad_buffers_fail_fast() {
    let mut missing_list_end = scenario_b(None);
    missing_list_end.pop();
    assert!(matches!(
        triangulate_edges(&missing_list_end, DEFAULT_EPSILON),
        Err(DcdtError::MalformedInput { .. })
    ));

    let two_points = [0.0, 0.0, 1.0, 1.0, END, END];
    assert!(matches!(
        triangulate_edges(&two_points, DEFAULT_EPSILON),
        Err(DcdtError::MalformedInput { .. })
    ));

    let bad_seed = scenario_b(Some((50.0, 50.0)));
    assert!(matches!(
        triangulate_faces(&bad_seed, DEFAULT_EPSILON),
        Err(DcdtError::InvalidSeed { .. })
    ));
}
