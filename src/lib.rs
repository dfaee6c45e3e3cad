// navmesh-cdt: constrained Delaunay navigation meshes
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod dcdt;
pub mod error;
pub mod geom;
pub mod mesh;
pub mod polygon;
pub mod wire;

pub use dcdt::{Dcdt, DcdtOption, MeshEdges, Segment, SessionState, Triangle, DEFAULT_EPSILON};
pub use error::{DcdtError, Result};
pub use geom::{Point, Real};
pub use polygon::Polygon;
