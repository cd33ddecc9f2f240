//! Curated API surface.
//!
//! Prefer these re-exports over deep module paths; the module layout below
//! may change, these names will not without a version bump.

// Geometry
pub use crate::geom2::{
    bounds, convex_hull, min_angle, orient2d, segments_cross, segments_intersect, Circle, GeomCfg,
    Point2, Seg2, Tri2,
};
// Random inputs
pub use crate::geom2::rand::{
    draw_scribble, draw_star_polygon, recenter_rescale, RadialCfg, ReplayToken, VertexCount,
};
// Contour and polygon
pub use crate::contour::{resolve_contour, resolve_points, thin};
pub use crate::pslg::Polygon;
// Triangulation and refinement
pub use crate::error::MeshError;
pub use crate::export::MeshBuffers;
pub use crate::mesh::{Mesh, Segment, SegmentKey, Triangle, TriangleKey, Vertex, VertexKey};
pub use crate::refine::{triangulate, RefineCfg, RefineStats, Triangulation, MAX_MIN_ANGLE_DEG};
pub use crate::mesh_contour;
