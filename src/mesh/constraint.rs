// Copyright 2025 Lars Brubaker
// Constrained edge insertion and constraint-aware face classification.

use std::collections::VecDeque;

use tracing::{trace, warn};

use super::{sym, EdgeIdx, FaceIdx, Mesh, VertIdx, F_OUTER, INVALID};
use crate::error::{DcdtError, Result};
use crate::geom::{edge_intersect, orient2d, segments_cross, side_of, Point, Real, Side};

/// Nesting limit for Steiner splits of a single constraint.
const MAX_SPLIT_DEPTH: u32 = 24;

impl Mesh {
    /// Make the segment between two existing vertices part of the mesh and
    /// mark it constrained. The segment may end up as a chain of constrained
    /// sub-edges when it runs through other vertices or needs Steiner splits.
    pub fn insert_constrained_edge(&mut self, a: VertIdx, b: VertIdx, eps: Real) -> Result<()> {
        self.constrain_path(a, b, eps, 0)
    }

    fn constrain_path(&mut self, a: VertIdx, b: VertIdx, eps: Real, depth: u32) -> Result<()> {
        if depth > MAX_SPLIT_DEPTH {
            let p = self.pos(a);
            return Err(DcdtError::degenerate("constraint needs too many splits", p.x, p.y));
        }
        let mut from = a;
        let max_steps = self.verts.len() + 16;
        let mut steps = 0;
        while from != b {
            steps += 1;
            if steps > max_steps {
                let p = self.pos(from);
                return Err(DcdtError::degenerate("constraint walk does not advance", p.x, p.y));
            }
            if let Some(e) = self.find_edge(from, b) {
                self.set_constrained(e);
                break;
            }
            if let Some(e) = self.edge_along(from, b, eps) {
                trace!(from, to = self.dst(e), "constraint runs along existing edge");
                self.set_constrained(e);
                from = self.dst(e);
                continue;
            }
            from = self.insert_segment(from, b, eps, depth)?;
        }
        self.hint = self.verts[b as usize].an_edge;
        Ok(())
    }

    /// Nearest edge out of `a` whose destination lies within `eps` of the
    /// segment a→b and strictly between its endpoints.
    fn edge_along(&self, a: VertIdx, b: VertIdx, eps: Real) -> Option<EdgeIdx> {
        let pa = self.pos(a);
        let pb = self.pos(b);
        let ab = pb - pa;
        let len2 = ab.norm2();
        let start = self.verts[a as usize].an_edge;
        if start == INVALID {
            return None;
        }
        self.vertex_ring(start)
            .into_iter()
            .filter_map(|e| {
                let pw = self.dst_pos(e);
                let t = (pw - pa).dot(ab);
                let on_line = side_of(pa, pb, pw, eps) == Side::On;
                (on_line && t > 0.0 && t < len2).then_some((e, t))
            })
            .min_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(e, _)| e)
    }

    /// The edge of the triangle at `a` that the ray a→b leaves through.
    fn first_crossing(&self, a: VertIdx, pb: Point) -> Option<EdgeIdx> {
        let pa = self.pos(a);
        let start = self.verts[a as usize].an_edge;
        if start == INVALID {
            return None;
        }
        self.vertex_ring(start).into_iter().find_map(|e| {
            if self.lface(e) == F_OUTER {
                return None;
            }
            let c = self.lnext(e);
            let px = self.org_pos(c);
            let py = self.dst_pos(c);
            (orient2d(pa, px, pb) > 0.0 && orient2d(pa, py, pb) < 0.0).then_some(c)
        })
    }

    /// Force a constrained edge from `a` toward `b` by removing every edge
    /// it crosses. Stops early at a vertex lying on the segment and returns
    /// the vertex actually reached.
    fn insert_segment(&mut self, a: VertIdx, b: VertIdx, eps: Real, depth: u32) -> Result<VertIdx> {
        let pa = self.pos(a);
        let pb = self.pos(b);
        let obstacle_at = |m: &Mesh, e: EdgeIdx| {
            let q = edge_intersect(m.org_pos(e), m.dst_pos(e), pa, pb).unwrap_or(m.org_pos(e));
            DcdtError::IntersectingObstacles { x: q.x, y: q.y }
        };

        let mut c = match self.first_crossing(a, pb) {
            Some(c) => c,
            None => return Err(DcdtError::OutsideDomain { x: pb.x, y: pb.y }),
        };

        // walk the corridor; org(c) is right of a→b and dst(c) is left
        let mut crossed = Vec::new();
        let w = loop {
            if self.is_constrained(c) || self.rface(c) == F_OUTER {
                return Err(obstacle_at(&*self, c));
            }
            if crossed.len() > self.edges.len() {
                return Err(DcdtError::degenerate("constraint corridor does not close", pa.x, pa.y));
            }
            crossed.push(c);
            let t = sym(c);
            let z = self.dst(self.lnext(t));
            if z == b {
                break b;
            }
            match side_of(pa, pb, self.pos(z), eps) {
                Side::On => break z,
                Side::Left => c = self.lnext(t),
                Side::Right => c = self.lnext(self.lnext(t)),
            }
        };
        let pw = self.pos(w);
        trace!(a, w, crossed = crossed.len(), "removing edges crossed by constraint");

        let mut new_edges = Vec::new();
        let mut queue: VecDeque<EdgeIdx> = VecDeque::with_capacity(crossed.len());
        for e in crossed {
            if segments_cross(pa, pw, self.org_pos(e), self.dst_pos(e)) {
                queue.push_back(e);
            } else {
                new_edges.push(e);
            }
        }

        let mut stalled = 0;
        while let Some(e) = queue.pop_front() {
            if self.flip_edge(e) {
                stalled = 0;
                let (u, v) = (self.org(e), self.dst(e));
                let touches = u == a || u == w || v == a || v == w;
                if !touches && segments_cross(pa, pw, self.pos(u), self.pos(v)) {
                    queue.push_back(e);
                } else {
                    new_edges.push(e);
                }
                continue;
            }
            queue.push_back(e);
            stalled += 1;
            if stalled > queue.len() {
                // no convex quad left in the corridor
                return self.split_constraint(a, w, e, eps, depth);
            }
        }

        let aw = self
            .find_edge(a, w)
            .ok_or_else(|| DcdtError::degenerate("constraint edge missing after flips", pa.x, pa.y))?;
        self.set_constrained(aw);
        let flips = self.legalize(new_edges);
        trace!(a, w, flips, "constraint inserted");
        Ok(w)
    }

    /// Split `e` where it crosses a→w and constrain the two halves
    /// separately. Returns `w`.
    pub(crate) fn split_constraint(
        &mut self,
        a: VertIdx,
        w: VertIdx,
        e: EdgeIdx,
        eps: Real,
        depth: u32,
    ) -> Result<VertIdx> {
        let pa = self.pos(a);
        let q = edge_intersect(pa, self.pos(w), self.org_pos(e), self.dst_pos(e))
            .ok_or_else(|| DcdtError::degenerate("parallel crossing edge", pa.x, pa.y))?;
        warn!(x = q.x, y = q.y, "constraint stalled, inserting Steiner vertex");
        let m = self.insert_point(q, eps)?;
        if m == a || m == w {
            return Err(DcdtError::degenerate("Steiner vertex merged into constraint endpoint", q.x, q.y));
        }
        self.constrain_path(a, m, eps, depth + 1)?;
        self.constrain_path(m, w, eps, depth + 1)?;
        Ok(w)
    }

    /// Number of constrained edges crossed on the cheapest dual path from the
    /// outer face to each face. Dead faces report `u32::MAX`. Faces inside
    /// the boundary and outside every obstacle have odd depth.
    pub fn face_depths(&self) -> Vec<u32> {
        let mut depth = vec![u32::MAX; self.faces.len()];
        depth[F_OUTER as usize] = 0;
        let mut queue: VecDeque<FaceIdx> = VecDeque::new();
        queue.push_back(F_OUTER);

        while let Some(f) = queue.pop_front() {
            let loop_edges: Vec<EdgeIdx> = if f == F_OUTER {
                (0..self.edges.len() as EdgeIdx)
                    .filter(|&e| self.edge_alive(e) && self.lface(e) == F_OUTER)
                    .collect()
            } else {
                self.face_loop(self.faces[f as usize].an_edge)
            };
            for e in loop_edges {
                let g = self.rface(e);
                if g == INVALID || g == f {
                    continue;
                }
                let cost = u32::from(self.is_constrained(e));
                let d = depth[f as usize] + cost;
                if d < depth[g as usize] {
                    depth[g as usize] = d;
                    if cost == 0 {
                        queue.push_front(g);
                    } else {
                        queue.push_back(g);
                    }
                }
            }
        }
        depth
    }
}
