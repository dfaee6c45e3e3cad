// Copyright 2025 Lars Brubaker
// License: MIT
//
// Half-edge planar subdivision (Guibas/Stolfi style) in flat arenas.
//
// Design:
//   - INVALID: u32::MAX  (null index)
//   - Half-edges allocated in pairs: edges[i] and edges[i^1] are always a pair.
//     sym(e) = e ^ 1.  Even index = e, odd index = eSym.
//   - faces[0] is the unbounded outer face and is never killed.
//   - Deleted slots are marked dead and never reused, so indices held by a
//     caller stay stable for the lifetime of the mesh.

pub mod constraint;
pub mod delaunay;

use crate::geom::{orient2d, segments_cross, Point};

pub const INVALID: u32 = u32::MAX;

/// Index into Mesh::verts
pub type VertIdx = u32;
/// Index into Mesh::faces
pub type FaceIdx = u32;
/// Index into Mesh::edges
pub type EdgeIdx = u32;

/// The unbounded face surrounding the triangulated domain.
pub const F_OUTER: FaceIdx = 0;

/// Compute the symmetric half-edge index (always the other half of the pair).
#[inline(always)]
pub fn sym(e: EdgeIdx) -> EdgeIdx {
    e ^ 1
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub pos: Point,
    /// Some half-edge with this vertex as origin, INVALID while isolated.
    pub an_edge: EdgeIdx,
    pub alive: bool,
}

#[derive(Clone, Debug)]
pub struct Face {
    pub an_edge: EdgeIdx,
    pub alive: bool,
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Next edge CCW around the origin vertex.
    pub onext: EdgeIdx,
    /// Next edge CCW around the left face.
    pub lnext: EdgeIdx,
    /// Origin vertex index, INVALID once the edge is deleted.
    pub org: VertIdx,
    /// Left face index.
    pub lface: FaceIdx,
    /// Boundary or obstacle outline; exempt from flips.
    pub constrained: bool,
    /// Scratch flag for work stacks.
    pub mark: bool,
}

impl Default for HalfEdge {
    fn default() -> Self {
        Self {
            onext: INVALID,
            lnext: INVALID,
            org: INVALID,
            lface: INVALID,
            constrained: false,
            mark: false,
        }
    }
}

/// The half-edge mesh.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub verts: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub edges: Vec<HalfEdge>,
    /// Walk start for point location.
    pub(crate) hint: EdgeIdx,
}

impl Mesh {
    /// Create an empty mesh holding only the outer face.
    pub fn new() -> Self {
        Mesh {
            verts: Vec::new(),
            faces: vec![Face {
                an_edge: INVALID,
                alive: true,
            }],
            edges: Vec::new(),
            hint: INVALID,
        }
    }

    /// Two CCW triangles covering the axis-aligned box `lo`..`hi`.
    pub fn with_box(lo: Point, hi: Point) -> Self {
        let mut m = Mesh::new();
        let v0 = m.make_vertex(lo);
        let v1 = m.make_vertex(Point::new(hi.x, lo.y));
        let e0 = m.make_edge(v0, v1).unwrap_or(INVALID);
        let e1 = m.add_edge_vertex(e0, hi);
        let e2 = m.add_edge_vertex(e1, Point::new(lo.x, hi.y));
        let e3 = m.connect(e2, e0);
        m.connect(e3, e2);
        m.hint = e0;
        m
    }

    // ──────────────── Navigation helpers ────────────────

    #[inline]
    pub fn org(&self, e: EdgeIdx) -> VertIdx {
        self.edges[e as usize].org
    }

    /// Destination vertex of e (= org of Sym).
    #[inline]
    pub fn dst(&self, e: EdgeIdx) -> VertIdx {
        self.edges[(e ^ 1) as usize].org
    }

    #[inline]
    pub fn onext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext
    }

    #[inline]
    pub fn lnext(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].lnext
    }

    /// Oprev: Sym->Lnext
    #[inline]
    pub fn oprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[(e ^ 1) as usize].lnext
    }

    /// Lprev: Onext->Sym
    #[inline]
    pub fn lprev(&self, e: EdgeIdx) -> EdgeIdx {
        self.edges[e as usize].onext ^ 1
    }

    #[inline]
    pub fn lface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[e as usize].lface
    }

    /// Right face of e (= lface of Sym).
    #[inline]
    pub fn rface(&self, e: EdgeIdx) -> FaceIdx {
        self.edges[(e ^ 1) as usize].lface
    }

    #[inline]
    pub fn pos(&self, v: VertIdx) -> Point {
        self.verts[v as usize].pos
    }

    #[inline]
    pub fn org_pos(&self, e: EdgeIdx) -> Point {
        self.pos(self.org(e))
    }

    #[inline]
    pub fn dst_pos(&self, e: EdgeIdx) -> Point {
        self.pos(self.dst(e))
    }

    #[inline]
    pub fn is_constrained(&self, e: EdgeIdx) -> bool {
        self.edges[e as usize].constrained
    }

    #[inline]
    pub fn edge_alive(&self, e: EdgeIdx) -> bool {
        (e as usize) < self.edges.len() && self.edges[e as usize].org != INVALID
    }

    /// Half-edges around the origin of `e`, starting at `e`.
    pub fn vertex_ring(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        self.orbit(e, |m, x| m.onext(x))
    }

    /// Half-edges of the left face of `e`, starting at `e`.
    pub fn face_loop(&self, e: EdgeIdx) -> Vec<EdgeIdx> {
        self.orbit(e, |m, x| m.lnext(x))
    }

    fn orbit(&self, start: EdgeIdx, step: impl Fn(&Mesh, EdgeIdx) -> EdgeIdx) -> Vec<EdgeIdx> {
        let mut out = Vec::new();
        let mut e = start;
        loop {
            out.push(e);
            e = step(self, e);
            if e == start || e == INVALID || out.len() > self.edges.len() {
                break;
            }
        }
        out
    }

    /// Count vertices in a face loop.
    pub fn face_degree(&self, f: FaceIdx) -> usize {
        let e = self.faces[f as usize].an_edge;
        if e == INVALID {
            return 0;
        }
        self.face_loop(e).len()
    }

    /// True for a live bounded face with exactly three edges.
    pub fn is_triangle(&self, f: FaceIdx) -> bool {
        f != F_OUTER && f != INVALID && self.faces[f as usize].alive && self.face_degree(f) == 3
    }

    /// Corner positions of a bounded triangle, CCW.
    pub fn triangle(&self, f: FaceIdx) -> [Point; 3] {
        let e0 = self.faces[f as usize].an_edge;
        let e1 = self.lnext(e0);
        let e2 = self.lnext(e1);
        [self.org_pos(e0), self.org_pos(e1), self.org_pos(e2)]
    }

    /// Live bounded faces.
    pub fn bounded_faces(&self) -> impl Iterator<Item = FaceIdx> + '_ {
        (1..self.faces.len() as FaceIdx).filter(move |&f| self.faces[f as usize].alive)
    }

    /// One half-edge (the even one) per live undirected edge.
    pub fn undirected_edges(&self) -> impl Iterator<Item = EdgeIdx> + '_ {
        (0..self.edges.len() as EdgeIdx)
            .step_by(2)
            .filter(move |&e| self.edges[e as usize].org != INVALID)
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = VertIdx> + '_ {
        (0..self.verts.len() as VertIdx).filter(move |&v| self.verts[v as usize].alive)
    }

    pub fn vertex_count(&self) -> usize {
        self.live_vertices().count()
    }

    pub fn edge_count(&self) -> usize {
        self.undirected_edges().count()
    }

    /// Bounded faces only.
    pub fn face_count(&self) -> usize {
        self.bounded_faces().count()
    }

    /// Half-edge from `a` to `b`, if the mesh has one.
    pub fn find_edge(&self, a: VertIdx, b: VertIdx) -> Option<EdgeIdx> {
        let start = self.verts[a as usize].an_edge;
        if start == INVALID {
            return None;
        }
        self.vertex_ring(start).into_iter().find(|&e| self.dst(e) == b)
    }

    pub fn set_constrained(&mut self, e: EdgeIdx) {
        self.edges[e as usize].constrained = true;
        self.edges[(e ^ 1) as usize].constrained = true;
    }

    // ──────────────────────── Private allocation helpers ─────────────────────

    /// Allocate a new half-edge pair.  Returns the index of `e` (even); sym is `e ^ 1`.
    fn make_edge_pair(&mut self) -> EdgeIdx {
        let e_new = self.edges.len() as EdgeIdx;
        let e_sym = e_new ^ 1;
        self.edges.push(HalfEdge {
            onext: e_new,
            lnext: e_sym,
            ..HalfEdge::default()
        });
        self.edges.push(HalfEdge {
            onext: e_sym,
            lnext: e_new,
            ..HalfEdge::default()
        });
        e_new
    }

    /// Allocate a new face for the loop starting at `e_orig`.
    fn make_face(&mut self, e_orig: EdgeIdx) -> FaceIdx {
        let f_new = self.faces.len() as FaceIdx;
        self.faces.push(Face {
            an_edge: e_orig,
            alive: true,
        });
        for e in self.face_loop(e_orig) {
            self.edges[e as usize].lface = f_new;
        }
        f_new
    }

    /// Mark a vertex dead. Its edges must already be gone.
    fn kill_vertex(&mut self, v_del: VertIdx) {
        let v = &mut self.verts[v_del as usize];
        v.alive = false;
        v.an_edge = INVALID;
    }

    /// Remove a face, re-pointing its loop to `new_lface`.
    fn kill_face(&mut self, f_del: FaceIdx, new_lface: FaceIdx) {
        let e_start = self.faces[f_del as usize].an_edge;
        if e_start != INVALID {
            for e in self.face_loop(e_start) {
                self.edges[e as usize].lface = new_lface;
            }
        }
        self.faces[f_del as usize].alive = false;
        self.faces[f_del as usize].an_edge = INVALID;
    }

    fn kill_edge(&mut self, e_del: EdgeIdx) {
        let e_del = e_del & !1;
        for e in [e_del, e_del ^ 1] {
            let he = &mut self.edges[e as usize];
            he.org = INVALID;
            he.lface = INVALID;
            he.onext = INVALID;
            he.lnext = INVALID;
        }
    }

    /// Detach `e` from the ring around its origin; kill the origin if it
    /// becomes isolated.
    fn detach_origin(&mut self, e: EdgeIdx) {
        let org = self.org(e);
        let onext = self.onext(e);
        if onext == e {
            self.kill_vertex(org);
        } else {
            self.verts[org as usize].an_edge = onext;
            let oprev = self.oprev(e);
            self.splice(e, oprev);
        }
    }

    // ──────────────────────── Public mesh operations ──────────────────────────

    /// Create an isolated vertex.
    pub fn make_vertex(&mut self, pos: Point) -> VertIdx {
        let v = self.verts.len() as VertIdx;
        self.verts.push(Vertex {
            pos,
            an_edge: INVALID,
            alive: true,
        });
        v
    }

    /// Connect two isolated vertices with a new edge lying in the outer face.
    /// Returns None if either vertex already has edges.
    pub fn make_edge(&mut self, v1: VertIdx, v2: VertIdx) -> Option<EdgeIdx> {
        if v1 == v2
            || self.verts[v1 as usize].an_edge != INVALID
            || self.verts[v2 as usize].an_edge != INVALID
        {
            return None;
        }
        let e = self.make_edge_pair();
        let e_sym = e ^ 1;
        self.edges[e as usize].org = v1;
        self.edges[e_sym as usize].org = v2;
        self.edges[e as usize].lface = F_OUTER;
        self.edges[e_sym as usize].lface = F_OUTER;
        self.verts[v1 as usize].an_edge = e;
        self.verts[v2 as usize].an_edge = e_sym;
        if self.faces[F_OUTER as usize].an_edge == INVALID {
            self.faces[F_OUTER as usize].an_edge = e;
        }
        Some(e)
    }

    /// The fundamental connectivity-changing operation: exchanges a->Onext
    /// and b->Onext (and the matching Lnext links). Vertex and face records
    /// are the caller's responsibility.
    pub fn splice(&mut self, a: EdgeIdx, b: EdgeIdx) {
        let a_onext = self.edges[a as usize].onext;
        let b_onext = self.edges[b as usize].onext;
        self.edges[(a_onext ^ 1) as usize].lnext = b;
        self.edges[(b_onext ^ 1) as usize].lnext = a;
        self.edges[a as usize].onext = b_onext;
        self.edges[b as usize].onext = a_onext;
    }

    /// Create a new edge eNew = eOrg->Lnext whose destination is a new vertex
    /// at `pos`. eOrg and eNew share the same left face.
    pub fn add_edge_vertex(&mut self, e_org: EdgeIdx, pos: Point) -> EdgeIdx {
        let e_new = self.make_edge_pair();
        let e_new_sym = e_new ^ 1;

        let e_org_lnext = self.lnext(e_org);
        self.splice(e_new, e_org_lnext);

        let e_org_dst = self.dst(e_org);
        self.edges[e_new as usize].org = e_org_dst;

        let v_new = self.make_vertex(pos);
        self.edges[e_new_sym as usize].org = v_new;
        self.verts[v_new as usize].an_edge = e_new_sym;

        let e_org_lface = self.lface(e_org);
        self.edges[e_new as usize].lface = e_org_lface;
        self.edges[e_new_sym as usize].lface = e_org_lface;

        e_new
    }

    /// Split eOrg into eOrg and eNew at a new vertex placed at `pos`, with
    /// eNew = eOrg->Lnext. Both halves keep the constrained flag.
    pub fn split_edge(&mut self, e_org: EdgeIdx, pos: Point) -> EdgeIdx {
        let temp = self.add_edge_vertex(e_org, pos);
        let e_new = temp ^ 1;

        // Disconnect eOrg from eOrg->Dst and reconnect to eNew->Org
        let e_org_sym = e_org ^ 1;
        let e_org_sym_oprev = self.oprev(e_org_sym);
        self.splice(e_org_sym, e_org_sym_oprev);
        self.splice(e_org_sym, e_new);

        let e_new_org = self.org(e_new);
        self.edges[e_org_sym as usize].org = e_new_org;
        let e_new_dst = self.dst(e_new);
        self.verts[e_new_dst as usize].an_edge = e_new ^ 1;

        let e_org_rface = self.rface(e_org);
        self.edges[(e_new ^ 1) as usize].lface = e_org_rface;

        let constrained = self.edges[e_org as usize].constrained;
        self.edges[e_new as usize].constrained = constrained;
        self.edges[(e_new ^ 1) as usize].constrained = constrained;

        e_new
    }

    /// Create a new edge from eOrg->Dst to eDst->Org and return it.
    /// If both lie on the same face loop the face is split and the new
    /// edge's loop receives a fresh face; otherwise the two faces merge.
    pub fn connect(&mut self, e_org: EdgeIdx, e_dst: EdgeIdx) -> EdgeIdx {
        let e_new = self.make_edge_pair();
        let e_new_sym = e_new ^ 1;

        let e_dst_lface = self.lface(e_dst);
        let e_org_lface = self.lface(e_org);
        let joining_loops = e_dst_lface != e_org_lface;

        if joining_loops {
            self.kill_face(e_dst_lface, e_org_lface);
        }

        // Connect: Splice(eNew, eOrg->Lnext); Splice(eNewSym, eDst)
        let e_org_lnext = self.lnext(e_org);
        self.splice(e_new, e_org_lnext);
        self.splice(e_new_sym, e_dst);

        let e_org_dst = self.dst(e_org);
        self.edges[e_new as usize].org = e_org_dst;
        let e_dst_org = self.org(e_dst);
        self.edges[e_new_sym as usize].org = e_dst_org;
        self.edges[e_new as usize].lface = e_org_lface;
        self.edges[e_new_sym as usize].lface = e_org_lface;

        // Make sure the old face points to a valid half-edge
        self.faces[e_org_lface as usize].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new);
        }

        e_new
    }

    /// Remove edge eDel, merging its two faces (or splitting one face when
    /// the edge was a bridge).
    pub fn delete_edge(&mut self, e_del: EdgeIdx) {
        let e_del_sym = e_del ^ 1;

        let e_del_lface = self.lface(e_del);
        let e_del_rface = self.rface(e_del);
        let joining_loops = e_del_lface != e_del_rface;

        if joining_loops {
            let (keep, gone) = if e_del_lface == F_OUTER {
                (e_del_lface, e_del_rface)
            } else {
                (e_del_rface, e_del_lface)
            };
            self.kill_face(gone, keep);
        }

        let e_del_onext = self.onext(e_del);
        if e_del_onext == e_del {
            let org = self.org(e_del);
            self.kill_vertex(org);
        } else {
            let e_del_oprev = self.oprev(e_del);
            let rface = self.rface(e_del);
            self.faces[rface as usize].an_edge = e_del_oprev;
            let org = self.org(e_del);
            self.verts[org as usize].an_edge = e_del_onext;

            self.splice(e_del, e_del_oprev);

            if !joining_loops {
                self.make_face(e_del);
            }
        }

        let e_del_sym_onext = self.onext(e_del_sym);
        if e_del_sym_onext == e_del_sym {
            let org = self.org(e_del_sym);
            self.kill_vertex(org);
            let lface = self.lface(e_del);
            if lface != F_OUTER {
                self.kill_face(lface, INVALID);
            } else {
                self.faces[F_OUTER as usize].an_edge = INVALID;
            }
        } else {
            let lface = self.lface(e_del);
            let e_del_sym_oprev = self.oprev(e_del_sym);
            self.faces[lface as usize].an_edge = e_del_sym_oprev;
            let org = self.org(e_del_sym);
            self.verts[org as usize].an_edge = e_del_sym_onext;
            self.splice(e_del_sym, e_del_sym_oprev);
        }

        if self.hint == e_del || self.hint == e_del_sym {
            self.hint = INVALID;
        }
        self.kill_edge(e_del);
    }

    /// Destroy a bounded face, merging it into the outer face. Edges whose
    /// other side is already the outer face are deleted, and vertices left
    /// without edges are killed.
    pub fn zap_face(&mut self, f_zap: FaceIdx) {
        debug_assert_ne!(f_zap, F_OUTER);
        let e_start = self.faces[f_zap as usize].an_edge;
        let mut e_next = self.lnext(e_start);

        loop {
            let e = e_next;
            e_next = self.lnext(e);

            self.edges[e as usize].lface = F_OUTER;

            if self.rface(e) == F_OUTER {
                self.detach_origin(e);
                self.detach_origin(e ^ 1);
                if self.hint == e || self.hint == e ^ 1 {
                    self.hint = INVALID;
                }
                if self.faces[F_OUTER as usize].an_edge | 1 == e | 1 {
                    self.faces[F_OUTER as usize].an_edge = INVALID;
                }
                self.kill_edge(e);
            } else {
                self.faces[F_OUTER as usize].an_edge = e;
            }

            if e == e_start {
                break;
            }
        }

        self.faces[f_zap as usize].alive = false;
        self.faces[f_zap as usize].an_edge = INVALID;
    }

    /// Rotate `edge` to the other diagonal of the quadrilateral formed by its
    /// two triangles. Refused (returns false) for constrained edges, edges
    /// not shared by two bounded triangles, and non-convex quadrilaterals.
    pub fn flip_edge(&mut self, edge: EdgeIdx) -> bool {
        if self.is_constrained(edge) {
            return false;
        }
        let fa = self.lface(edge);
        let fb = self.rface(edge);
        if !self.is_triangle(fa) || !self.is_triangle(fb) {
            return false;
        }
        let e_sym = edge ^ 1;
        let a = self.oprev(edge);
        let b = self.oprev(e_sym);
        let (p, q) = (self.org_pos(edge), self.dst_pos(edge));
        let (c, d) = (self.dst_pos(b), self.dst_pos(a));
        if !segments_cross(p, q, c, d) {
            return false;
        }

        let a_org = self.org(edge);
        let b_org = self.org(e_sym);
        if self.verts[a_org as usize].an_edge == edge {
            self.verts[a_org as usize].an_edge = a;
        }
        if self.verts[b_org as usize].an_edge == e_sym {
            self.verts[b_org as usize].an_edge = b;
        }

        self.splice(edge, a);
        self.splice(e_sym, b);
        let a_lnext = self.lnext(a);
        let b_lnext = self.lnext(b);
        self.splice(edge, a_lnext);
        self.splice(e_sym, b_lnext);
        self.edges[edge as usize].org = self.dst(a);
        self.edges[e_sym as usize].org = self.dst(b);

        for e in self.face_loop(edge) {
            self.edges[e as usize].lface = fa;
        }
        for e in self.face_loop(e_sym) {
            self.edges[e as usize].lface = fb;
        }
        self.faces[fa as usize].an_edge = edge;
        self.faces[fb as usize].an_edge = e_sym;
        true
    }

    /// Re-point the outer face at a live edge on its loop after deletions.
    pub(crate) fn repair_outer(&mut self) {
        let outer = &self.faces[F_OUTER as usize];
        if self.edge_alive(outer.an_edge) && self.lface(outer.an_edge) == F_OUTER {
            return;
        }
        self.faces[F_OUTER as usize].an_edge = (0..self.edges.len() as EdgeIdx)
            .find(|&e| self.edge_alive(e) && self.lface(e) == F_OUTER)
            .unwrap_or(INVALID);
    }

    /// Pick a live edge bordering a bounded face as the location walk start.
    pub(crate) fn reset_hint(&mut self) {
        let hint = self
            .bounded_faces()
            .next()
            .map(|f| self.faces[f as usize].an_edge)
            .unwrap_or(INVALID);
        self.hint = hint;
    }

    /// Full consistency check of the subdivision.
    pub fn check(&self) -> Result<(), String> {
        for e in 0..self.edges.len() as EdgeIdx {
            let he = &self.edges[e as usize];
            if he.org == INVALID {
                continue;
            }
            let sy = &self.edges[(e ^ 1) as usize];
            if sy.org == INVALID {
                return Err(format!("edge {} alive but its sym is dead", e));
            }
            if !self.edge_alive(he.onext) || !self.edge_alive(he.lnext) {
                return Err(format!("edge {} links to a dead edge", e));
            }
            if self.org(he.onext) != he.org {
                return Err(format!("edge {}: onext has a different origin", e));
            }
            if self.oprev(he.onext) != e {
                return Err(format!("edge {}: lnext/onext rings disagree", e));
            }
            if self.org(he.lnext) != self.dst(e) {
                return Err(format!("edge {}: lnext does not start at dst", e));
            }
            if he.lface == INVALID || !self.faces[he.lface as usize].alive {
                return Err(format!("edge {} has a dead left face", e));
            }
            if self.lface(he.lnext) != he.lface {
                return Err(format!("edge {}: face loop changes face", e));
            }
            if he.constrained != sy.constrained {
                return Err(format!("edge {}: halves disagree on constraint", e));
            }
            if !self.verts[he.org as usize].alive {
                return Err(format!("edge {} starts at a dead vertex", e));
            }
        }

        let mut v_count = 0i64;
        for v in self.live_vertices() {
            let an = self.verts[v as usize].an_edge;
            if an == INVALID {
                continue;
            }
            v_count += 1;
            if !self.edge_alive(an) || self.org(an) != v {
                return Err(format!("vertex {} has a stale incident edge", v));
            }
        }

        let mut f_count = 0i64;
        for f in 0..self.faces.len() as FaceIdx {
            let face = &self.faces[f as usize];
            if !face.alive || face.an_edge == INVALID {
                continue;
            }
            f_count += 1;
            if !self.edge_alive(face.an_edge) || self.lface(face.an_edge) != f {
                return Err(format!("face {} has a stale edge", f));
            }
            if f == F_OUTER {
                continue;
            }
            if self.face_degree(f) != 3 {
                return Err(format!("face {} has {} edges", f, self.face_degree(f)));
            }
            let [a, b, c] = self.triangle(f);
            if orient2d(a, b, c) <= 0.0 {
                return Err(format!("face {} is not positively oriented", f));
            }
        }

        let e_count = self.edge_count() as i64;
        if e_count > 0 && v_count - e_count + f_count != 2 {
            return Err(format!(
                "Euler characteristic {} (V={}, E={}, F={})",
                v_count - e_count + f_count,
                v_count,
                e_count,
                f_count
            ));
        }
        Ok(())
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Mesh {
        Mesh::with_box(Point::new(0.0, 0.0), Point::new(1.0, 1.0))
    }

    #[test]
    fn make_edge_creates_single_edge() {
        let mut mesh = Mesh::new();
        let v1 = mesh.make_vertex(Point::new(0.0, 0.0));
        let v2 = mesh.make_vertex(Point::new(1.0, 0.0));
        let e = mesh.make_edge(v1, v2).unwrap();
        assert_eq!(mesh.edges.len(), 2);
        assert_eq!(mesh.org(e), v1);
        assert_eq!(mesh.dst(e), v2);
        assert_eq!(mesh.lface(e), F_OUTER);
        assert_eq!(mesh.rface(e), F_OUTER);
        // both endpoints are now attached
        assert!(mesh.make_edge(v1, v2).is_none());
        assert!(mesh.check().is_ok());
    }

    #[test]
    fn sym_involution() {
        for e in 0u32..16 {
            assert_eq!(sym(sym(e)), e);
        }
    }

    #[test]
    fn box_is_two_triangles() {
        let mesh = unit_box();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.face_count(), 2);
        for f in mesh.bounded_faces() {
            assert!(mesh.is_triangle(f));
        }
        mesh.check().unwrap();
    }

    #[test]
    fn flip_box_diagonal() {
        let mut mesh = unit_box();
        let diag = mesh
            .undirected_edges()
            .find(|&e| mesh.lface(e) != F_OUTER && mesh.rface(e) != F_OUTER)
            .unwrap();
        let before = (mesh.org_pos(diag), mesh.dst_pos(diag));
        assert!(mesh.flip_edge(diag));
        mesh.check().unwrap();
        let after = (mesh.org_pos(diag), mesh.dst_pos(diag));
        assert_ne!(before, after);
        assert!(after.0.dist(after.1) > 1.4);
        // flipping back restores the original diagonal (up to direction)
        assert!(mesh.flip_edge(diag));
        mesh.check().unwrap();
    }

    #[test]
    fn flip_refuses_constrained_and_hull_edges() {
        let mut mesh = unit_box();
        let hull = mesh
            .undirected_edges()
            .find(|&e| mesh.lface(e) == F_OUTER || mesh.rface(e) == F_OUTER)
            .unwrap();
        assert!(!mesh.flip_edge(hull));
        let diag = mesh
            .undirected_edges()
            .find(|&e| mesh.lface(e) != F_OUTER && mesh.rface(e) != F_OUTER)
            .unwrap();
        mesh.set_constrained(diag);
        assert!(!mesh.flip_edge(diag));
    }

    #[test]
    fn split_then_connect_keeps_triangles() {
        let mut mesh = unit_box();
        let diag = mesh
            .undirected_edges()
            .find(|&e| mesh.lface(e) != F_OUTER && mesh.rface(e) != F_OUTER)
            .unwrap();
        mesh.set_constrained(diag);
        let mid = mesh.org_pos(diag).lerp(mesh.dst_pos(diag), 0.5);
        let e_new = mesh.split_edge(diag, mid);
        assert!(mesh.is_constrained(e_new));
        assert_eq!(mesh.pos(mesh.org(e_new)), mid);
        let l = mesh.lprev(diag);
        mesh.connect(diag, l);
        let r = sym(e_new);
        let rl = mesh.lprev(r);
        mesh.connect(r, rl);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.vertex_count(), 5);
        mesh.check().unwrap();
    }

    #[test]
    fn zap_all_faces_empties_mesh() {
        let mut mesh = unit_box();
        let faces: Vec<FaceIdx> = mesh.bounded_faces().collect();
        mesh.zap_face(faces[0]);
        mesh.check().unwrap();
        assert_eq!(mesh.face_count(), 1);
        mesh.zap_face(faces[1]);
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn delete_diagonal_merges_faces() {
        let mut mesh = unit_box();
        let diag = mesh
            .undirected_edges()
            .find(|&e| mesh.lface(e) != F_OUTER && mesh.rface(e) != F_OUTER)
            .unwrap();
        mesh.delete_edge(diag);
        assert_eq!(mesh.face_count(), 1);
        let f = mesh.bounded_faces().next().unwrap();
        assert_eq!(mesh.face_degree(f), 4);
        assert_eq!(mesh.edge_count(), 4);
    }
}
