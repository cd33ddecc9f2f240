//! Contour resolution and quality triangulation in 2D.
//!
//! Pipeline: raw closed point sequence → `contour::resolve_contour` (simple
//! boundary) → `refine::triangulate` (conforming Delaunay mesh refined with
//! Ruppert's algorithm) → `export::MeshBuffers`.
//!
//! API Policy
//! - `api` is the curated surface; module paths may move between releases.
//! - Every fallible entry point returns `MeshError`; nothing panics on bad
//!   geometry.

pub mod api;
pub mod contour;
pub mod error;
pub mod export;
pub mod geom2;
pub mod mesh;
pub mod pslg;
pub mod refine;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use contour::resolve_contour;
pub use error::MeshError;
pub use geom2::{GeomCfg, Point2};
pub use pslg::Polygon;
pub use refine::{triangulate, RefineCfg, RefineStats, Triangulation};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::contour::{resolve_contour, thin};
    pub use crate::error::MeshError;
    pub use crate::export::MeshBuffers;
    pub use crate::geom2::rand::{
        draw_scribble, draw_star_polygon, recenter_rescale, RadialCfg, ReplayToken, VertexCount,
    };
    pub use crate::geom2::{GeomCfg, Point2, Seg2, Tri2};
    pub use crate::pslg::Polygon;
    pub use crate::refine::{triangulate, RefineCfg, RefineStats, Triangulation};
    pub use nalgebra::{Vector2 as Vec2, Vector3 as Vec3};
}

/// Resolve `points` and triangulate the result with default tolerances.
pub fn mesh_contour(points: &[Point2], cfg: RefineCfg) -> Result<Triangulation, MeshError> {
    let geom = GeomCfg::default();
    let polygon = resolve_contour(points, &geom)?;
    triangulate(&polygon, cfg, geom)
}
