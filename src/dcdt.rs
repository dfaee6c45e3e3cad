// Copyright 2025 Lars Brubaker
// License: MIT
//
// Triangulation session: builds the constrained Delaunay mesh of a boundary
// polygon and its obstacles, and answers extraction queries on it.
//
// The session owns its mesh outright. Construction goes through a bounding
// box of two triangles; once the boundary is constrained everything outside
// it is stripped, so the outer face of the finished mesh is the exterior of
// the boundary.

mod extract;

pub use extract::{MeshEdges, Segment, Triangle};

use tracing::debug;

use crate::error::{DcdtError, Result};
use crate::geom::{centroid, triangle_area, Point, Real};
use crate::mesh::delaunay::Location;
use crate::mesh::{FaceIdx, Mesh, VertIdx, F_OUTER};
use crate::polygon::Polygon;

/// Default merge tolerance for `init`.
pub const DEFAULT_EPSILON: Real = 0.00001;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DcdtOption {
    /// Run the full topology check after every construction call.
    ValidateTopology,
    /// Reject flood-fill seeds that are not strictly inside the walkable
    /// domain instead of guessing a start face.
    StrictSeed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Initialized,
    Refined,
}

/// A constrained Delaunay triangulation session.
#[derive(Clone, Debug)]
pub struct Dcdt {
    mesh: Mesh,
    state: SessionState,
    eps: Real,
    seed: Point,
    validate_topology: bool,
    strict_seed: bool,
}

impl Dcdt {
    pub fn new() -> Self {
        Dcdt {
            mesh: Mesh::new(),
            state: SessionState::Empty,
            eps: DEFAULT_EPSILON,
            seed: Point::default(),
            validate_topology: false,
            strict_seed: true,
        }
    }

    /// Build a session from a boundary and a list of obstacles in one go.
    pub fn from_polygons(boundary: &Polygon, obstacles: &[Polygon], eps: Real) -> Result<Self> {
        let mut dcdt = Dcdt::new();
        dcdt.init(boundary, eps)?;
        for obstacle in obstacles {
            dcdt.insert_polygon(obstacle)?;
        }
        Ok(dcdt)
    }

    pub fn set_option(&mut self, option: DcdtOption, value: bool) {
        match option {
            DcdtOption::ValidateTopology => self.validate_topology = value,
            DcdtOption::StrictSeed => self.strict_seed = value,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn epsilon(&self) -> Real {
        self.eps
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.mesh.edge_count()
    }

    pub fn face_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Drop the mesh and return to `Empty`. Options are kept.
    pub fn reset(&mut self) {
        self.mesh = Mesh::new();
        self.state = SessionState::Empty;
        self.seed = Point::default();
    }

    /// Triangulate the domain bounded by `boundary`. Points closer than `eps`
    /// are merged. A session that already holds a mesh is left alone;
    /// any other failure leaves the session `Empty`.
    pub fn init(&mut self, boundary: &Polygon, eps: Real) -> Result<()> {
        if self.state != SessionState::Empty {
            return Err(DcdtError::AlreadyInitialized);
        }
        if !eps.is_finite() || eps < 0.0 {
            return Err(DcdtError::malformed(format!("invalid epsilon {}", eps)));
        }
        let res = self.build_domain(boundary, eps);
        if res.is_err() {
            self.reset();
        }
        res
    }

    /// Insert an obstacle outline as constrained edges. On failure the whole
    /// session is reset.
    pub fn insert_polygon(&mut self, obstacle: &Polygon) -> Result<()> {
        self.require_init()?;
        let res = self.add_obstacle(obstacle);
        if res.is_err() {
            self.reset();
        }
        res
    }

    /// A point strictly inside the walkable domain, recorded at `init` and
    /// moved only if an obstacle later covers it.
    pub fn seed(&self) -> Result<Point> {
        self.require_init()?;
        Ok(self.seed)
    }

    pub(crate) fn require_init(&self) -> Result<()> {
        match self.state {
            SessionState::Empty => Err(DcdtError::QueryBeforeInit),
            _ => Ok(()),
        }
    }

    fn build_domain(&mut self, boundary: &Polygon, eps: Real) -> Result<()> {
        let boundary = boundary.validated(eps)?;
        let (lo, hi) = boundary
            .bounds()
            .ok_or_else(|| DcdtError::malformed("empty boundary"))?;
        let margin = lo.dist(hi);
        let pad = Point::new(margin, margin);

        self.eps = eps;
        self.mesh = Mesh::with_box(lo - pad, hi + pad);
        self.insert_loop(&boundary)?;
        self.strip_exterior();
        self.state = SessionState::Initialized;
        self.seed = self.pick_seed()?;
        self.validate()?;

        debug!(
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "domain initialized"
        );
        Ok(())
    }

    fn add_obstacle(&mut self, obstacle: &Polygon) -> Result<()> {
        let obstacle = obstacle.validated(self.eps)?;
        self.insert_loop(&obstacle)?;
        self.state = SessionState::Refined;
        if !self.is_walkable_seed(self.seed) {
            self.seed = self.pick_seed()?;
        }
        self.validate()?;

        debug!(
            points = obstacle.len(),
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            faces = self.face_count(),
            "obstacle inserted"
        );
        Ok(())
    }

    /// Insert the points of a closed loop and constrain each of its edges.
    fn insert_loop(&mut self, poly: &Polygon) -> Result<()> {
        let mut verts: Vec<VertIdx> = Vec::with_capacity(poly.len());
        for &p in poly.points() {
            let v = self.mesh.insert_point(p, self.eps)?;
            if verts.last() != Some(&v) {
                verts.push(v);
            }
        }
        while verts.len() > 1 && verts.first() == verts.last() {
            verts.pop();
        }
        if verts.len() < 3 {
            let p = poly.points()[0];
            return Err(DcdtError::degenerate(
                "polygon collapses to fewer than 3 mesh vertices",
                p.x,
                p.y,
            ));
        }
        let n = verts.len();
        for i in 0..n {
            self.mesh
                .insert_constrained_edge(verts[i], verts[(i + 1) % n], self.eps)?;
        }
        Ok(())
    }

    /// Zap every face reachable from the bounding box without crossing a
    /// constrained edge.
    fn strip_exterior(&mut self) {
        let depth = self.mesh.face_depths();
        let outside: Vec<FaceIdx> = self
            .mesh
            .bounded_faces()
            .filter(|&f| depth[f as usize] == 0)
            .collect();
        for f in outside {
            self.mesh.zap_face(f);
        }
        self.mesh.repair_outer();
        self.mesh.reset_hint();
    }

    /// Centroid of the largest walkable triangle.
    fn pick_seed(&self) -> Result<Point> {
        let depth = self.mesh.face_depths();
        self.mesh
            .bounded_faces()
            .filter(|&f| depth[f as usize] % 2 == 1)
            .map(|f| {
                let [a, b, c] = self.mesh.triangle(f);
                (centroid(a, b, c), triangle_area(a, b, c))
            })
            .max_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(p, _)| p)
            .ok_or(DcdtError::InvalidSeed {
                x: self.seed.x,
                y: self.seed.y,
            })
    }

    fn is_walkable_seed(&self, p: Point) -> bool {
        match self.mesh.locate(p, self.eps) {
            Location::InFace(e) => {
                let f = self.mesh.lface(e);
                f != F_OUTER && self.mesh.face_depths()[f as usize] % 2 == 1
            }
            _ => false,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.validate_topology {
            self.mesh.check().map_err(DcdtError::Topology)?;
        }
        Ok(())
    }
}

impl Default for Dcdt {
    fn default() -> Self {
        Self::new()
    }
}
