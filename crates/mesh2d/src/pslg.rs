//! Planar straight-line graph for a single closed boundary.
//!
//! Purpose
//! - Hold the ordered boundary vertices and the derived constraint segments
//!   `(v[i], v[i+1 mod n])` that the triangulator must conform to.
//! - Answer boundary-inclusive point containment for interior classification.
//!
//! Conventions
//! - Immutable after construction. Orientation is whatever the input carries;
//!   `signed_area()` reports it.
//! - Containment: a vertex match or a point within `eps_on` of a boundary
//!   segment is inside; otherwise ray-casting parity decides.
//!
//! Code cross-refs: `contour::resolve_contour`, `refine::triangulate`

use crate::contour;
use crate::error::MeshError;
use crate::geom2::{self, GeomCfg, Point2, Seg2};

/// Closed polygon boundary plus its constraint segments.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
    segments: Vec<Seg2>,
}

impl Polygon {
    /// Store `vertices` in order and derive one segment per consecutive pair (wrapping).
    pub fn new(vertices: Vec<Point2>) -> Self {
        let n = vertices.len();
        let segments = (0..n)
            .map(|i| Seg2::new(vertices[i], vertices[(i + 1) % n]))
            .collect();
        Self { vertices, segments }
    }

    /// Resolve a possibly self-intersecting closed point sequence, then construct.
    pub fn contour(points: &[Point2], cfg: &GeomCfg) -> Result<Self, MeshError> {
        contour::resolve_contour(points, cfg)
    }

    /// Convex hull of `points` as a CCW polygon (collinear points dropped).
    pub fn convex_hull(points: &[Point2]) -> Result<Self, MeshError> {
        geom2::convex_hull(points)
            .map(Self::new)
            .ok_or_else(|| MeshError::degenerate("convex hull needs 3 non-collinear points"))
    }

    #[inline]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[inline]
    pub fn segments(&self) -> &[Seg2] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Boundary-inclusive containment with the default tolerance.
    pub fn contains(&self, p: Point2) -> bool {
        self.contains_eps(p, GeomCfg::default().eps_on)
    }

    /// Boundary-inclusive containment: on-boundary within `eps` counts as inside.
    pub fn contains_eps(&self, p: Point2, eps: f64) -> bool {
        if self.vertices.iter().any(|&v| v == p) {
            return true;
        }
        if self.segments.iter().any(|s| s.on(p, eps)) {
            return true;
        }
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n.wrapping_sub(1);
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > p.y) != (vj.y > p.y) {
                let x = (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x;
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Shoelace area, positive for counter-clockwise boundaries.
    pub fn signed_area(&self) -> f64 {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let p = self.vertices[i];
                let q = self.vertices[(i + 1) % n];
                p.x * q.y - q.x * p.y
            })
            .sum();
        0.5 * twice
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Axis-aligned bounding box `(min, max)`.
    pub fn bounds(&self) -> Option<(Point2, Point2)> {
        geom2::bounds(&self.vertices)
    }
}
