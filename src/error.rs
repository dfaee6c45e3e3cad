// Copyright 2025 Lars Brubaker
// Error type shared by construction, extraction and the wire codec.

use thiserror::Error;

/// Failure reported by a triangulation session or the wire codec.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DcdtError {
    /// The input buffer or polygon cannot be read as a polygon list.
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    /// A polygon encloses no area or collapses under the merge tolerance.
    #[error("degenerate geometry near ({x}, {y}): {reason}")]
    DegenerateGeometry { reason: String, x: f64, y: f64 },

    /// A new constraint crosses an existing constrained edge.
    #[error("obstacle crosses an existing constrained edge near ({x}, {y})")]
    IntersectingObstacles { x: f64, y: f64 },

    /// A point does not lie inside the triangulated domain.
    #[error("point ({x}, {y}) lies outside the triangulated domain")]
    OutsideDomain { x: f64, y: f64 },

    /// Extraction or refinement was requested on an empty session.
    #[error("session has not been initialized")]
    QueryBeforeInit,

    /// `init` was called on a session that already holds a mesh.
    #[error("session is already initialized; call reset first")]
    AlreadyInitialized,

    /// The flood-fill seed lies on a constrained edge or outside the walkable domain.
    #[error("seed ({x}, {y}) is not strictly inside the walkable domain")]
    InvalidSeed { x: f64, y: f64 },

    /// Topology validation failed after a construction step.
    #[error("mesh topology check failed: {0}")]
    Topology(String),
}

pub type Result<T> = std::result::Result<T, DcdtError>;

impl DcdtError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        DcdtError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>, x: f64, y: f64) -> Self {
        DcdtError::DegenerateGeometry {
            reason: reason.into(),
            x,
            y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_coordinates() {
        let e = DcdtError::IntersectingObstacles { x: 1.5, y: -2.0 };
        assert_eq!(
            e.to_string(),
            "obstacle crosses an existing constrained edge near (1.5, -2)"
        );
        let e = DcdtError::degenerate("zero area", 0.0, 3.0);
        assert!(e.to_string().contains("zero area"));
    }
}
