//! Refinement parameters and counters.
//!
//! Policy
//! - The minimum angle is capped at 30°; above that Ruppert's loop is not
//!   guaranteed to terminate.
//! - `threshold` exempts short features: segments shorter than it are never
//!   split for encroachment, and triangles whose edges are all no longer than
//!   it are never skinny.

/// Largest accepted minimum-angle bound, in degrees.
pub const MAX_MIN_ANGLE_DEG: f64 = 30.0;

/// Quality and budget knobs for [`crate::refine::triangulate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineCfg {
    /// Minimum interior angle in degrees (clamped to `[0, 30]`).
    pub min_angle_deg: f64,
    /// Feature-size exemption for splitting and skinniness.
    pub threshold: f64,
    /// Loop passes allowed before giving up.
    pub max_iterations: usize,
}

impl Default for RefineCfg {
    fn default() -> Self {
        Self {
            min_angle_deg: 20.0,
            threshold: 0.1,
            max_iterations: 10_000,
        }
    }
}

impl RefineCfg {
    /// Angle bound in radians after clamping.
    #[inline]
    pub fn min_angle_rad(&self) -> f64 {
        let deg = if self.min_angle_deg.is_nan() {
            0.0
        } else {
            self.min_angle_deg.clamp(0.0, MAX_MIN_ANGLE_DEG)
        };
        deg.to_radians()
    }
}

/// What refinement did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Passes of the refinement loop.
    pub iterations: usize,
    /// Constraint segments bisected.
    pub segment_splits: usize,
    /// Points inserted beyond the polygon vertices (midpoints and circumcenters).
    pub steiner_points: usize,
}
