// Copyright 2025 Lars Brubaker
// Point location, incremental insertion and Delaunay legalization.

use tracing::{trace, warn};

use super::{sym, EdgeIdx, Mesh, VertIdx, F_OUTER, INVALID};
use crate::error::{DcdtError, Result};
use crate::geom::{in_circle, line_dist, orient2d, Point, Real};

/// Relative tolerance of the in-circle test; cocircular quads are left alone.
const IN_CIRCLE_EPS: Real = 1e-12;

/// Where a query point falls in the subdivision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    /// Within epsilon of an existing vertex.
    OnVertex(VertIdx),
    /// Within epsilon of the interior of this edge.
    OnEdge(EdgeIdx),
    /// Strictly inside the left face of this edge.
    InFace(EdgeIdx),
    Outside,
}

impl Mesh {
    /// Check if an edge is locally Delaunay: the apex of its right triangle
    /// is not strictly inside the circumcircle of its left triangle.
    pub fn edge_is_locally_delaunay(&self, e: EdgeIdx) -> bool {
        let a = self.org_pos(e);
        let b = self.dst_pos(e);
        let c = self.dst_pos(self.lnext(e));
        let d = self.dst_pos(self.lnext(sym(e)));

        let scale = [a, b, c]
            .iter()
            .map(|p| (*p - d).norm2())
            .fold(0.0, Real::max);
        in_circle(a, b, c, d) <= IN_CIRCLE_EPS * scale * scale
    }

    /// An edge the legalizer may flip: unconstrained and between two triangles.
    pub fn is_flippable(&self, e: EdgeIdx) -> bool {
        !self.is_constrained(e) && self.is_triangle(self.lface(e)) && self.is_triangle(self.rface(e))
    }

    /// Flip non-Delaunay edges until every edge reachable from `stack` is
    /// locally Delaunay. Constrained edges are never touched. Returns the
    /// number of flips performed.
    pub fn legalize(&mut self, mut stack: Vec<EdgeIdx>) -> usize {
        for &e in &stack {
            self.edges[e as usize].mark = true;
            self.edges[(e ^ 1) as usize].mark = true;
        }

        let max_iter = 16 * self.edges.len() + 64;
        let mut iter = 0;
        let mut flips = 0;

        while let Some(e) = stack.pop() {
            if iter >= max_iter {
                warn!(max_iter, "legalization stopped at its iteration cap");
                for &rest in &stack {
                    self.edges[rest as usize].mark = false;
                    self.edges[(rest ^ 1) as usize].mark = false;
                }
                break;
            }
            iter += 1;
            self.edges[e as usize].mark = false;
            self.edges[(e ^ 1) as usize].mark = false;

            if !self.edge_alive(e) || !self.is_flippable(e) || self.edge_is_locally_delaunay(e) {
                continue;
            }
            let neighbors = [
                self.lnext(e),
                self.lprev(e),
                self.lnext(e ^ 1),
                self.lprev(e ^ 1),
            ];
            if !self.flip_edge(e) {
                continue;
            }
            flips += 1;
            for &nb in &neighbors {
                if !self.edges[nb as usize].mark && self.is_flippable(nb) {
                    self.edges[nb as usize].mark = true;
                    self.edges[(nb ^ 1) as usize].mark = true;
                    stack.push(nb);
                }
            }
        }
        flips
    }

    /// Find where `p` lies. Walks from the last touched edge and falls back to
    /// a scan of every face when the walk leaves the domain or runs too long.
    pub fn locate(&self, p: Point, eps: Real) -> Location {
        let start = if self.edge_alive(self.hint) && self.lface(self.hint) != F_OUTER {
            self.hint
        } else if self.edge_alive(self.hint) && self.rface(self.hint) != F_OUTER {
            sym(self.hint)
        } else {
            match self.bounded_faces().next() {
                Some(f) => self.faces[f as usize].an_edge,
                None => return Location::Outside,
            }
        };

        let max_steps = self.faces.len() + 16;
        let mut e = start;
        for _ in 0..max_steps {
            let tri = [e, self.lnext(e), self.lnext(self.lnext(e))];
            if let Some(v) = tri
                .iter()
                .map(|&x| self.org(x))
                .find(|&v| self.pos(v).dist(p) <= eps)
            {
                return Location::OnVertex(v);
            }

            let exit = tri
                .iter()
                .copied()
                .find(|&x| orient2d(self.org_pos(x), self.dst_pos(x), p) < 0.0);
            match exit {
                None => return self.classify_in_triangle(e, p, eps),
                Some(x) => {
                    if self.rface(x) == F_OUTER {
                        let (a, b) = (self.org_pos(x), self.dst_pos(x));
                        if line_dist(a, b, p).abs() <= eps && within_span(a, b, p) {
                            return Location::OnEdge(x);
                        }
                        return self.locate_by_scan(p, eps);
                    }
                    // enter the neighbour through the shared edge; start its
                    // loop after the entry edge so the walk keeps moving
                    e = self.lnext(sym(x));
                }
            }
        }
        trace!(x = p.x, y = p.y, "location walk exhausted, scanning");
        self.locate_by_scan(p, eps)
    }

    fn classify_in_triangle(&self, e: EdgeIdx, p: Point, eps: Real) -> Location {
        let tri = [e, self.lnext(e), self.lnext(self.lnext(e))];
        let nearest = tri
            .iter()
            .map(|&x| (x, line_dist(self.org_pos(x), self.dst_pos(x), p).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((x, d)) if d <= eps => Location::OnEdge(x),
            _ => Location::InFace(e),
        }
    }

    /// Linear fallback over all bounded faces.
    pub fn locate_by_scan(&self, p: Point, eps: Real) -> Location {
        if let Some(v) = self
            .live_vertices()
            .find(|&v| self.verts[v as usize].an_edge != INVALID && self.pos(v).dist(p) <= eps)
        {
            return Location::OnVertex(v);
        }
        for f in self.bounded_faces() {
            let e = self.faces[f as usize].an_edge;
            let tri = [e, self.lnext(e), self.lnext(self.lnext(e))];
            let inside = tri
                .iter()
                .all(|&x| line_dist(self.org_pos(x), self.dst_pos(x), p) >= -eps);
            if inside {
                return self.classify_in_triangle(e, p, eps);
            }
        }
        Location::Outside
    }

    /// Insert `p` and restore the Delaunay property around it. A point within
    /// `eps` of an existing vertex is merged and that vertex is returned.
    pub fn insert_point(&mut self, p: Point, eps: Real) -> Result<VertIdx> {
        match self.locate(p, eps) {
            Location::OnVertex(v) => {
                trace!(x = p.x, y = p.y, v, "merged with existing vertex");
                Ok(v)
            }
            Location::Outside => Err(DcdtError::OutsideDomain { x: p.x, y: p.y }),
            Location::InFace(e) => {
                let (v, opposite) = self.insert_in_face(e, p);
                let flips = self.legalize(opposite);
                trace!(x = p.x, y = p.y, v, flips, "inserted vertex in face");
                Ok(v)
            }
            Location::OnEdge(e) => {
                let (v, opposite) = self.insert_on_edge(e, p);
                let flips = self.legalize(opposite);
                trace!(x = p.x, y = p.y, v, flips, "inserted vertex on edge");
                Ok(v)
            }
        }
    }

    /// Split the triangle left of `e1` with spokes to a new vertex at `p`.
    /// Returns the vertex and the three edges opposite it.
    fn insert_in_face(&mut self, e1: EdgeIdx, p: Point) -> (VertIdx, Vec<EdgeIdx>) {
        let e2 = self.lnext(e1);
        let e3 = self.lnext(e2);
        let spoke = self.add_edge_vertex(e3, p);
        let v = self.dst(spoke);
        let n1 = self.connect(e1, sym(spoke));
        self.connect(e2, sym(n1));
        self.hint = spoke;
        (v, vec![e1, e2, e3])
    }

    /// Split edge `e` at the projection of `p` and connect the new vertex to
    /// the apex of each bounded side. Returns the vertex and the edges
    /// opposite it.
    fn insert_on_edge(&mut self, e: EdgeIdx, p: Point) -> (VertIdx, Vec<EdgeIdx>) {
        let p = project_onto(self.org_pos(e), self.dst_pos(e), p);
        let e_new = self.split_edge(e, p);
        let v = self.dst(e);
        let mut opposite = Vec::with_capacity(4);

        if self.lface(e) != F_OUTER {
            let far = self.lprev(e);
            opposite.push(self.lnext(e_new));
            opposite.push(far);
            self.connect(e, far);
        }
        let r = sym(e_new);
        if self.lface(r) != F_OUTER {
            let far = self.lprev(r);
            opposite.push(self.lnext(sym(e)));
            opposite.push(far);
            self.connect(r, far);
        }
        self.hint = e_new;
        (v, opposite)
    }
}

/// Foot of `p` on segment a-b, or `p` itself when the foot is not strictly
/// inside the segment.
fn project_onto(a: Point, b: Point, p: Point) -> Point {
    if !within_span(a, b, p) {
        return p;
    }
    let ab = b - a;
    a.lerp(b, (p - a).dot(ab) / ab.norm2())
}

/// Projection of `p` falls strictly between `a` and `b`.
fn within_span(a: Point, b: Point, p: Point) -> bool {
    let ab = b - a;
    let t = (p - a).dot(ab);
    t > 0.0 && t < ab.norm2()
}
