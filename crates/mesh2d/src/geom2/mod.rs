//! 2D geometry primitives and predicates.
//!
//! Purpose
//! - Provide the value types (`Point2`, `Seg2`, `Tri2`, `Circle`) and the
//!   floating-point predicates every other module builds on.
//! - Keep tolerances explicit: each eps-aware predicate takes its slack from
//!   `GeomCfg` instead of a hidden constant.
//!
//! Code cross-refs: `contour`, `pslg::Polygon`, `mesh::Mesh`, `refine`

pub mod rand;
mod types;
mod util;

pub use types::{Circle, GeomCfg, Point2, Seg2, Tri2};
pub use util::{
    angle_at, bounds, convex_hull, distance_to_line, is_degenerate, left_side, midpoint,
    min_angle, orient2d, segments_cross, segments_intersect,
};
