// Copyright 2025 Lars Brubaker
// Flat sentinel-terminated number buffers exchanged with host code.
//
// Input:   [END, sx, sy]? (x y)* END (x y)* END ... END
// Edges:   (x1 y1 x2 y2)*            constrained first, then unconstrained
// Faces:   (x1 y1 x2 y2)* END (x1 y1 x2 y2 x3 y3)*

use tracing::debug;

use crate::dcdt::{Dcdt, MeshEdges, Segment, Triangle};
use crate::error::{DcdtError, Result};
use crate::geom::{Point, Real};
use crate::polygon::Polygon;

/// Polygon and section terminator. Never a valid coordinate.
pub const END: Real = -12345.6;

/// A parsed input buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WireInput {
    pub seed: Option<Point>,
    pub boundary: Polygon,
    pub obstacles: Vec<Polygon>,
}

/// Parse a polygon list. The first polygon is the boundary, the rest are
/// obstacles. A seed point may precede the list, but only behind a leading
/// `END` marker; a bare leading pair is read as the first boundary point.
pub fn parse_input(data: &[Real]) -> Result<WireInput> {
    let mut pos = 0;
    let mut seed = None;
    if data.first() == Some(&END) {
        if data.len() < 3 {
            return Err(DcdtError::malformed("truncated seed prefix"));
        }
        let p = Point::new(data[1], data[2]);
        if !p.is_finite() || p.x == END || p.y == END {
            return Err(DcdtError::malformed("invalid seed coordinates"));
        }
        seed = Some(p);
        pos = 3;
    }

    let mut polygons: Vec<Polygon> = Vec::new();
    loop {
        match data.get(pos) {
            None => return Err(DcdtError::malformed("missing list terminator")),
            Some(&v) if v == END => break,
            Some(_) => {}
        }
        let len = data[pos..]
            .iter()
            .position(|&v| v == END)
            .ok_or_else(|| DcdtError::malformed(format!("polygon {} is not terminated", polygons.len())))?;
        let coords = &data[pos..pos + len];
        if coords.len() % 2 != 0 {
            return Err(DcdtError::malformed(format!(
                "polygon {} has an odd coordinate count {}",
                polygons.len(),
                coords.len()
            )));
        }
        if let Some(v) = coords.iter().find(|v| !v.is_finite()) {
            return Err(DcdtError::malformed(format!("non-finite coordinate {}", v)));
        }
        polygons.push(Polygon::from_coords(coords));
        pos += len + 1;
    }

    let mut polygons = polygons.into_iter();
    let boundary = polygons
        .next()
        .ok_or_else(|| DcdtError::malformed("empty boundary"))?;
    Ok(WireInput {
        seed,
        boundary,
        obstacles: polygons.collect(),
    })
}

fn push_segment(out: &mut Vec<Real>, s: &Segment) {
    out.extend_from_slice(&[s.a.x, s.a.y, s.b.x, s.b.y]);
}

/// Constrained edges followed by unconstrained ones, four numbers each.
pub fn encode_edges(edges: &MeshEdges) -> Vec<Real> {
    let mut out = Vec::with_capacity(edges.len() * 4);
    for s in edges.constrained.iter().chain(&edges.unconstrained) {
        push_segment(&mut out, s);
    }
    out
}

/// Constrained edges, one `END`, then six numbers per face.
pub fn encode_faces_and_edges(constrained: &[Segment], faces: &[Triangle]) -> Vec<Real> {
    let mut out = Vec::with_capacity(constrained.len() * 4 + 1 + faces.len() * 6);
    for s in constrained {
        push_segment(&mut out, s);
    }
    out.push(END);
    for t in faces {
        for p in t.points() {
            out.push(p.x);
            out.push(p.y);
        }
    }
    out
}

/// Split a face buffer back into its edges and faces.
pub fn decode_faces_and_edges(data: &[Real]) -> Result<(Vec<Segment>, Vec<Triangle>)> {
    let split = data
        .iter()
        .position(|&v| v == END)
        .ok_or_else(|| DcdtError::malformed("missing edge section terminator"))?;
    let (edge_part, face_part) = (&data[..split], &data[split + 1..]);
    if edge_part.len() % 4 != 0 {
        return Err(DcdtError::malformed("edge section is not a multiple of 4"));
    }
    if face_part.len() % 6 != 0 {
        return Err(DcdtError::malformed("face section is not a multiple of 6"));
    }
    let edges = edge_part
        .chunks_exact(4)
        .map(|c| Segment::new(Point::new(c[0], c[1]), Point::new(c[2], c[3])))
        .collect();
    let faces = face_part
        .chunks_exact(6)
        .map(|c| {
            Triangle::new(
                Point::new(c[0], c[1]),
                Point::new(c[2], c[3]),
                Point::new(c[4], c[5]),
            )
        })
        .collect();
    Ok((edges, faces))
}

fn build(input: &WireInput, eps: Real) -> Result<Dcdt> {
    let dcdt = Dcdt::from_polygons(&input.boundary, &input.obstacles, eps)?;
    debug!(
        obstacles = input.obstacles.len(),
        faces = dcdt.face_count(),
        "triangulated wire input"
    );
    Ok(dcdt)
}

/// Triangulate an input buffer and return every mesh edge.
pub fn triangulate_edges(data: &[Real], eps: Real) -> Result<Vec<Real>> {
    let input = parse_input(data)?;
    let dcdt = build(&input, eps)?;
    Ok(encode_edges(&dcdt.get_mesh_edges()?))
}

/// Triangulate an input buffer and return the constrained edges and the
/// walkable faces reached from the input seed, or the recorded one.
pub fn triangulate_faces(data: &[Real], eps: Real) -> Result<Vec<Real>> {
    let input = parse_input(data)?;
    let dcdt = build(&input, eps)?;
    let seed = match input.seed {
        Some(s) => s,
        None => dcdt.seed()?,
    };
    let faces = dcdt.extract_faces(seed)?;
    let edges = dcdt.get_mesh_edges()?;
    Ok(encode_faces_and_edges(&edges.constrained, &faces))
}
