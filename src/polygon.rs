// Copyright 2025 Lars Brubaker
// Closed point loops used as boundary and obstacle input.

use crate::error::{DcdtError, Result};
use crate::geom::{Point, Real};

/// An ordered, implicitly closed loop of points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Polygon { points }
    }

    /// Build from a flat `[x0, y0, x1, y1, ...]` slice. A trailing odd value is
    /// ignored.
    pub fn from_coords(coords: &[Real]) -> Self {
        Polygon {
            points: coords
                .chunks_exact(2)
                .map(|c| Point::new(c[0], c[1]))
                .collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    /// Consecutive point pairs, including the closing pair.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area; positive for CCW loops.
    pub fn signed_area(&self) -> Real {
        self.edges().map(|(a, b)| a.cross(b)).sum::<Real>() * 0.5
    }

    pub fn area(&self) -> Real {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn perimeter(&self) -> Real {
        self.edges().map(|(a, b)| a.dist(b)).sum()
    }

    /// Axis-aligned bounds as (min, max). Returns None for an empty polygon.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }

    /// Even-odd ray casting. Points exactly on the outline may go either way.
    pub fn contains(&self, p: Point) -> bool {
        let mut inside = false;
        for (a, b) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Drop points within `eps` of their predecessor, including the closing
    /// point when it repeats the first.
    pub fn dedup(&self, eps: Real) -> Polygon {
        let mut out: Vec<Point> = Vec::with_capacity(self.points.len());
        for &p in &self.points {
            if out.last().map_or(true, |q| q.dist(p) > eps) {
                out.push(p);
            }
        }
        while out.len() > 1 && out[0].dist(out[out.len() - 1]) <= eps {
            out.pop();
        }
        Polygon { points: out }
    }

    /// Check the polygon is usable as construction input and return its
    /// merged form.
    pub fn validated(&self, eps: Real) -> Result<Polygon> {
        if let Some(p) = self.points.iter().find(|p| !p.is_finite()) {
            return Err(DcdtError::malformed(format!(
                "non-finite coordinate ({}, {})",
                p.x, p.y
            )));
        }
        let merged = self.dedup(eps);
        if merged.len() < 3 {
            return Err(DcdtError::malformed(format!(
                "polygon has {} distinct points, need at least 3",
                merged.len()
            )));
        }
        if merged.area() <= eps * merged.perimeter() {
            let p = merged.points[0];
            return Err(DcdtError::degenerate("polygon encloses no area", p.x, p.y));
        }
        Ok(merged)
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Polygon::new(points)
    }
}

impl From<&[(Real, Real)]> for Polygon {
    fn from(pairs: &[(Real, Real)]) -> Self {
        Polygon::new(pairs.iter().map(|&p| p.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::from_coords(&[-10.0, -10.0, 10.0, -10.0, 10.0, 10.0, -10.0, 10.0])
    }

    #[test]
    fn area_and_orientation() {
        let sq = square();
        assert_eq!(sq.signed_area(), 400.0);
        assert!(sq.is_ccw());
        let rev = Polygon::new(sq.points().iter().rev().copied().collect());
        assert_eq!(rev.signed_area(), -400.0);
        assert_eq!(sq.perimeter(), 80.0);
    }

    #[test]
    fn contains_point() {
        let sq = square();
        assert!(sq.contains(Point::new(0.0, 0.0)));
        assert!(sq.contains(Point::new(9.9, -9.9)));
        assert!(!sq.contains(Point::new(10.5, 0.0)));

        let l_shape = Polygon::from_coords(&[0.0, 0.0, 4.0, 0.0, 4.0, 2.0, 2.0, 2.0, 2.0, 4.0, 0.0, 4.0]);
        assert!(l_shape.contains(Point::new(1.0, 3.0)));
        assert!(!l_shape.contains(Point::new(3.0, 3.0)));
    }

    #[test]
    fn bounds_of_square() {
        let (lo, hi) = square().bounds().unwrap();
        assert_eq!(lo, Point::new(-10.0, -10.0));
        assert_eq!(hi, Point::new(10.0, 10.0));
        assert!(Polygon::default().bounds().is_none());
    }

    #[test]
    fn dedup_merges_close_points() {
        let poly = Polygon::from_coords(&[1.0, 1.0, 1.0, 1.000001, 7.0, 3.0, 3.0, 8.0, 1.0, 1.0]);
        let merged = poly.dedup(1e-5);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn validated_rejects_bad_input() {
        let two = Polygon::from_coords(&[0.0, 0.0, 1.0, 1.0]);
        assert!(matches!(two.validated(1e-5), Err(DcdtError::MalformedInput { .. })));

        let flat = Polygon::from_coords(&[0.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
        assert!(matches!(flat.validated(1e-5), Err(DcdtError::DegenerateGeometry { .. })));

        let nan = Polygon::from_coords(&[0.0, 0.0, f64::NAN, 0.0, 2.0, 1.0]);
        assert!(matches!(nan.validated(1e-5), Err(DcdtError::MalformedInput { .. })));

        assert_eq!(square().validated(1e-5).unwrap().len(), 4);
    }
}
