// Copyright 2025 Lars Brubaker
// Read-only extraction of faces and edges from a finished session.

use std::collections::VecDeque;

use super::Dcdt;
use crate::error::{DcdtError, Result};
use crate::geom::{centroid, point_in_triangle, triangle_area, Point, Real};
use crate::mesh::delaunay::Location;
use crate::mesh::{FaceIdx, F_OUTER};

/// A mesh face as three CCW corner positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Triangle { a, b, c }
    }

    pub fn points(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    pub fn area(&self) -> Real {
        triangle_area(self.a, self.b, self.c)
    }

    pub fn centroid(&self) -> Point {
        centroid(self.a, self.b, self.c)
    }

    pub fn contains(&self, p: Point) -> bool {
        point_in_triangle(self.a, self.b, self.c, p)
    }
}

/// An undirected mesh edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Segment { a, b }
    }

    pub fn length(&self) -> Real {
        self.a.dist(self.b)
    }
}

/// Mesh edges split by whether they are part of an outline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshEdges {
    pub constrained: Vec<Segment>,
    pub unconstrained: Vec<Segment>,
}

impl MeshEdges {
    pub fn len(&self) -> usize {
        self.constrained.len() + self.unconstrained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Dcdt {
    /// Flood fill from the face containing `seed` across unconstrained
    /// edges. Faces come back in breadth-first visit order.
    pub fn extract_faces(&self, seed: Point) -> Result<Vec<Triangle>> {
        self.require_init()?;
        let start = match self.seed_face(seed)? {
            Some(f) => f,
            None => return Ok(Vec::new()),
        };

        let mesh = self.mesh();
        let mut visited = vec![false; mesh.faces.len()];
        let mut queue = VecDeque::new();
        let mut out = Vec::new();
        visited[start as usize] = true;
        queue.push_back(start);

        while let Some(f) = queue.pop_front() {
            out.push(self.face_triangle(f));
            for e in mesh.face_loop(mesh.faces[f as usize].an_edge) {
                if mesh.is_constrained(e) {
                    continue;
                }
                let g = mesh.rface(e);
                if g != F_OUTER && !visited[g as usize] {
                    visited[g as usize] = true;
                    queue.push_back(g);
                }
            }
        }
        Ok(out)
    }

    /// The walkable faces reachable from the recorded seed.
    pub fn extract_domain_faces(&self) -> Result<Vec<Triangle>> {
        self.extract_faces(self.seed()?)
    }

    /// Every bounded face, including obstacle interiors, in arena order.
    pub fn extract_faces_all(&self) -> Result<Vec<Triangle>> {
        self.require_init()?;
        Ok(self
            .mesh()
            .bounded_faces()
            .map(|f| self.face_triangle(f))
            .collect())
    }

    /// All undirected edges, each reported once.
    pub fn get_mesh_edges(&self) -> Result<MeshEdges> {
        self.require_init()?;
        let mesh = self.mesh();
        let mut edges = MeshEdges::default();
        for e in mesh.undirected_edges() {
            let s = Segment::new(mesh.org_pos(e), mesh.dst_pos(e));
            if mesh.is_constrained(e) {
                edges.constrained.push(s);
            } else {
                edges.unconstrained.push(s);
            }
        }
        Ok(edges)
    }

    fn face_triangle(&self, f: FaceIdx) -> Triangle {
        let [a, b, c] = self.mesh().triangle(f);
        Triangle::new(a, b, c)
    }

    /// Start face for a flood fill. `None` means the seed is outside the
    /// domain and the fill is empty (only without `StrictSeed`).
    fn seed_face(&self, seed: Point) -> Result<Option<FaceIdx>> {
        let invalid = DcdtError::InvalidSeed {
            x: seed.x,
            y: seed.y,
        };
        if !seed.is_finite() {
            return Err(invalid);
        }
        let mesh = self.mesh();
        let depth = mesh.face_depths();
        let walkable = |f: FaceIdx| f != F_OUTER && depth[f as usize] % 2 == 1;

        let candidates: Vec<FaceIdx> = match mesh.locate(seed, self.epsilon()) {
            Location::InFace(e) => vec![mesh.lface(e)],
            Location::OnEdge(e) => {
                if self.strict_seed && mesh.is_constrained(e) {
                    return Err(invalid);
                }
                vec![mesh.lface(e), mesh.rface(e)]
            }
            Location::OnVertex(v) => {
                if self.strict_seed {
                    return Err(invalid);
                }
                let an = mesh.verts[v as usize].an_edge;
                mesh.vertex_ring(an).into_iter().map(|e| mesh.lface(e)).collect()
            }
            Location::Outside => {
                if self.strict_seed {
                    return Err(invalid);
                }
                return Ok(None);
            }
        };

        if self.strict_seed {
            return match candidates.into_iter().find(|&f| f != F_OUTER) {
                Some(f) if walkable(f) => Ok(Some(f)),
                _ => Err(invalid),
            };
        }
        let bounded = || candidates.iter().copied().filter(|&f| f != F_OUTER);
        Ok(bounded().find(|&f| walkable(f)).or_else(|| bounded().next()))
    }
}
