//! Basic 2D value types and tolerances shared by every predicate.
//!
//! - `GeomCfg`: centralizes the on-segment and degeneracy epsilons.
//! - `Seg2`: segment by value, with diametral-circle encroachment and on-test.
//! - `Tri2`: triangle by value, with circumcircle and quality predicates.
//! - `Circle`: center + radius, strict containment.
//!
//! Code cross-refs: `util::{orient2d, is_degenerate}`, `mesh::types`.

use nalgebra::Vector2;

use super::util::{distance_to_line, is_degenerate, midpoint, min_angle};

/// A point in the plane.
pub type Point2 = Vector2<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Distance slack for "point lies on segment" and boundary-inclusive containment.
    pub eps_on: f64,
    /// Relative threshold on `|cross| / (|ab|·|ac|)` below which a triangle is collinear.
    pub eps_det: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_on: 1e-4,
            eps_det: 1e-12,
        }
    }
}

/// Circle with strict membership.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Strictly inside: `|p - center| < radius`.
    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        (p - self.center).norm() < self.radius
    }

    /// Inside by more than `margin`.
    #[inline]
    pub fn contains_by(&self, p: Point2, margin: f64) -> bool {
        (p - self.center).norm() < self.radius - margin
    }
}

/// Segment `a → b` by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seg2 {
    pub a: Point2,
    pub b: Point2,
}

impl Seg2 {
    #[inline]
    pub fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    #[inline]
    pub fn midpoint(&self) -> Point2 {
        midpoint(self.a, self.b)
    }

    /// True if `p` is one of the endpoints (exact coordinate match).
    #[inline]
    pub fn has_point(&self, p: Point2) -> bool {
        p == self.a || p == self.b
    }

    /// Same endpoints in either direction.
    #[inline]
    pub fn same_as(&self, other: &Seg2) -> bool {
        (self.a == other.a && self.b == other.b) || (self.a == other.b && self.b == other.a)
    }

    /// `p` lies strictly inside the diametral circle; the endpoints never encroach.
    pub fn encroached_by(&self, p: Point2) -> bool {
        if self.has_point(p) {
            return false;
        }
        (self.midpoint() - p).norm() < self.length() * 0.5
    }

    /// `p` is within `eps` of the supporting line and inside the (slackened) bounding box.
    pub fn on(&self, p: Point2, eps: f64) -> bool {
        if self.has_point(p) {
            return true;
        }
        if self.length() <= 0.0 || distance_to_line(self.a, self.b, p) > eps {
            return false;
        }
        let (lo_x, hi_x) = (self.a.x.min(self.b.x), self.a.x.max(self.b.x));
        let (lo_y, hi_y) = (self.a.y.min(self.b.y), self.a.y.max(self.b.y));
        lo_x - eps <= p.x && p.x <= hi_x + eps && lo_y - eps <= p.y && p.y <= hi_y + eps
    }
}

/// Triangle by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tri2 {
    pub a: Point2,
    pub b: Point2,
    pub c: Point2,
}

impl Tri2 {
    #[inline]
    pub fn new(a: Point2, b: Point2, c: Point2) -> Self {
        Self { a, b, c }
    }

    /// Circumscribed circle from the intersection of two perpendicular bisectors.
    ///
    /// `None` when the corners are (numerically) collinear or coincide.
    pub fn circumcircle(&self, cfg: &GeomCfg) -> Option<Circle> {
        if is_degenerate(self.a, self.b, self.c, cfg.eps_det) {
            return None;
        }
        let (x1, y1) = (self.a.x, self.a.y);
        let (x2, y2) = (self.b.x, self.b.y);
        let (x3, y3) = (self.c.x, self.c.y);
        let d = 2.0 * ((x2 - x1) * (y3 - y1) - (y2 - y1) * (x3 - x1));
        let s2 = x2 * x2 - x1 * x1 + y2 * y2 - y1 * y1;
        let s3 = x3 * x3 - x1 * x1 + y3 * y3 - y1 * y1;
        let x = ((y3 - y1) * s2 + (y1 - y2) * s3) / d;
        let y = ((x1 - x3) * s2 + (x2 - x1) * s3) / d;
        let center = Point2::new(x, y);
        let radius = (self.a - center).norm();
        if !(radius.is_finite() && center.x.is_finite() && center.y.is_finite()) {
            return None;
        }
        Some(Circle::new(center, radius))
    }

    /// Edge lengths `|ab|, |bc|, |ca|`.
    #[inline]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.b - self.a).norm(),
            (self.c - self.b).norm(),
            (self.a - self.c).norm(),
        ]
    }

    /// Smallest interior angle in radians.
    #[inline]
    pub fn min_angle(&self) -> f64 {
        min_angle(self.a, self.b, self.c)
    }

    /// Quality predicate: minimum angle below `angle` (radians), unless every edge
    /// is no longer than `threshold`.
    pub fn is_skinny(&self, angle: f64, threshold: f64) -> bool {
        if self.edge_lengths().iter().all(|&l| l <= threshold) {
            return false;
        }
        self.min_angle() < angle
    }

    /// Signed area, positive for counter-clockwise corners.
    #[inline]
    pub fn signed_area(&self) -> f64 {
        super::util::orient2d(self.a, self.b, self.c) * 0.5
    }
}
