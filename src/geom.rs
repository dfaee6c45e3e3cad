// Copyright 2025 Lars Brubaker
// License: MIT
//
// Planar point type and the geometric predicates used by the mesh.
//
// All predicates are plain f64 evaluations. Callers that need a tolerance
// (collinearity, vertex merging) go through `side_of` / `dist`, which measure
// in units of length so that the caller's epsilon keeps a geometric meaning.

use std::fmt;
use std::ops::{Add, Sub};

pub type Real = f64;

/// A point (or vector) in the plane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn dot(self, o: Point) -> Real {
        self.x * o.x + self.y * o.y
    }

    #[inline]
    pub fn cross(self, o: Point) -> Real {
        self.x * o.y - self.y * o.x
    }

    #[inline]
    pub fn norm2(self) -> Real {
        self.dot(self)
    }

    #[inline]
    pub fn dist(self, o: Point) -> Real {
        (self - o).norm2().sqrt()
    }

    /// Linear interpolation from `self` (t = 0) to `o` (t = 1).
    #[inline]
    pub fn lerp(self, o: Point, t: Real) -> Point {
        Point::new(self.x + (o.x - self.x) * t, self.y + (o.y - self.y) * t)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

/// Which side of a directed line a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    On,
}

/// Twice the signed area of triangle (a, b, c); positive when CCW.
#[inline]
pub fn orient2d(a: Point, b: Point, c: Point) -> Real {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Signed area of triangle (a, b, c).
#[inline]
pub fn triangle_area(a: Point, b: Point, c: Point) -> Real {
    0.5 * orient2d(a, b, c)
}

#[inline]
pub fn centroid(a: Point, b: Point, c: Point) -> Point {
    Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// Signed distance from `p` to the line through `a`→`b` (positive on the left).
/// Degenerate lines measure the distance to `a`.
pub fn line_dist(a: Point, b: Point, p: Point) -> Real {
    let len = a.dist(b);
    if len == 0.0 {
        return a.dist(p);
    }
    orient2d(a, b, p) / len
}

/// Classify `p` against the directed line `a`→`b`; within `eps` counts as `On`.
pub fn side_of(a: Point, b: Point, p: Point, eps: Real) -> Side {
    let d = line_dist(a, b, p);
    if d > eps {
        Side::Left
    } else if d < -eps {
        Side::Right
    } else {
        Side::On
    }
}

/// In-circle predicate: positive when `d` lies strictly inside the
/// circumcircle of the CCW triangle (a, b, c), negative outside, zero on it.
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> Real {
    let adx = a.x - d.x;
    let ady = a.y - d.y;
    let bdx = b.x - d.x;
    let bdy = b.y - d.y;
    let cdx = c.x - d.x;
    let cdy = c.y - d.y;

    let ab_det = adx * bdy - bdx * ady;
    let bc_det = bdx * cdy - cdx * bdy;
    let ca_det = cdx * ady - adx * cdy;

    let a_lift = adx * adx + ady * ady;
    let b_lift = bdx * bdx + bdy * bdy;
    let c_lift = cdx * cdx + cdy * cdy;

    a_lift * bc_det + b_lift * ca_det + c_lift * ab_det
}

/// Returns true if segments (a, b) and (c, d) cross at a single interior
/// point of both. Touching at endpoints or overlapping collinearly is not a
/// proper crossing.
pub fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orient2d(a, b, c);
    let d2 = orient2d(a, b, d);
    let d3 = orient2d(c, d, a);
    let d4 = orient2d(c, d, b);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Intersection point of the lines through (o1, d1) and (o2, d2), clamped to
/// the first segment. Returns None for parallel lines.
pub fn edge_intersect(o1: Point, d1: Point, o2: Point, d2: Point) -> Option<Point> {
    let r = d1 - o1;
    let s = d2 - o2;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let t = (o2 - o1).cross(s) / denom;
    Some(o1.lerp(d1, t.clamp(0.0, 1.0)))
}

/// Barycentric containment test for a CCW triangle, inclusive of the border.
pub fn point_in_triangle(a: Point, b: Point, c: Point, p: Point) -> bool {
    orient2d(a, b, p) >= 0.0 && orient2d(b, c, p) >= 0.0 && orient2d(c, a, p) >= 0.0
}
