// Copyright 2025 Lars Brubaker
// Shared test utilities for navmesh-cdt tests.

#![allow(dead_code)]

use navmesh_cdt::{Dcdt, DcdtOption, Point, Polygon, Real, Segment, Triangle, DEFAULT_EPSILON};

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build a validated session from flat coordinate lists.
pub fn build(boundary: &[Real], obstacles: &[&[Real]]) -> Dcdt {
    init_logging();
    let mut dcdt = Dcdt::new();
    dcdt.set_option(DcdtOption::ValidateTopology, true);
    dcdt.init(&Polygon::from_coords(boundary), DEFAULT_EPSILON)
        .expect("boundary should triangulate");
    for obstacle in obstacles {
        dcdt.insert_polygon(&Polygon::from_coords(obstacle))
            .expect("obstacle should insert");
    }
    dcdt
}

/// Axis-aligned rectangle as a CCW coordinate list.
pub fn rect(x0: Real, y0: Real, x1: Real, y1: Real) -> Vec<Real> {
    vec![x0, y0, x1, y0, x1, y1, x0, y1]
}

pub fn total_area(faces: &[Triangle]) -> Real {
    faces.iter().map(|t| t.area()).sum()
}

pub fn polygon_area(coords: &[Real]) -> Real {
    Polygon::from_coords(coords).area()
}

/// V - E + F = 2 counting the outer face, and every face a CCW triangle.
pub fn verify_mesh(dcdt: &Dcdt) {
    let mesh = dcdt.mesh();
    mesh.check().expect("mesh topology");
    let v = dcdt.vertex_count() as i64;
    let e = dcdt.edge_count() as i64;
    let f = dcdt.face_count() as i64 + 1;
    assert_eq!(v - e + f, 2, "V={} E={} F={}", v, e, f);
    for f in mesh.bounded_faces() {
        assert!(mesh.is_triangle(f), "face {} is not a triangle", f);
        let [a, b, c] = mesh.triangle(f);
        assert!(navmesh_cdt::geom::orient2d(a, b, c) > 0.0, "face {} is not CCW", f);
    }
}

/// Every flippable edge passes the in-circle test.
pub fn verify_delaunay(dcdt: &Dcdt) {
    let mesh = dcdt.mesh();
    for e in mesh.undirected_edges() {
        if mesh.is_flippable(e) {
            assert!(
                mesh.edge_is_locally_delaunay(e),
                "edge {} -> {} is not locally Delaunay",
                mesh.org_pos(e),
                mesh.dst_pos(e)
            );
        }
    }
}

pub fn has_vertex_near(dcdt: &Dcdt, p: Point, eps: Real) -> bool {
    let mesh = dcdt.mesh();
    mesh.live_vertices().any(|v| mesh.pos(v).dist(p) <= eps)
}

fn point_segment_dist(a: Point, b: Point, p: Point) -> Real {
    let ab = b - a;
    let len2 = ab.norm2();
    if len2 == 0.0 {
        return a.dist(p);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a.lerp(b, t).dist(p)
}

/// The segment lies along one edge of one of the input outlines.
pub fn on_outline(s: &Segment, outlines: &[&[Real]], tol: Real) -> bool {
    outlines.iter().any(|coords| {
        Polygon::from_coords(coords)
            .edges()
            .any(|(a, b)| point_segment_dist(a, b, s.a) <= tol && point_segment_dist(a, b, s.b) <= tol)
    })
}

pub fn total_length(segments: &[Segment]) -> Real {
    segments.iter().map(|s| s.length()).sum()
}
