//! Error type shared by contour resolution, triangulation and refinement.

use thiserror::Error;

/// Failures surfaced to callers of the meshing entry points.
///
/// - `DegenerateInput`: too few points after resolution, or collinear/coincident
///   geometry where a circumcircle or cavity is undefined.
/// - `RefinementNotConverged`: the quality loop hit its iteration ceiling.
/// - `InvariantViolation`: an internal lookup failed (e.g. a shared segment
///   between two triangles is missing). Not recoverable by adjusting inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: String },

    #[error("refinement did not converge within {iterations} iterations")]
    RefinementNotConverged { iterations: usize },

    #[error("mesh invariant violated: {what}")]
    InvariantViolation { what: String },
}

impl MeshError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(what: impl Into<String>) -> Self {
        Self::InvariantViolation { what: what.into() }
    }

    /// True for the error kinds a caller may fix by changing points or thresholds.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvariantViolation { .. })
    }
}
