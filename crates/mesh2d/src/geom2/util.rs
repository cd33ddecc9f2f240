use nalgebra::Vector2;

use super::types::Point2;

/// Twice the signed area of `(a, b, c)`; positive when `c` is left of `a → b`.
#[inline]
pub fn orient2d(a: Point2, b: Point2, c: Point2) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// `p` lies strictly left of the directed line `from → to`.
#[inline]
pub fn left_side(from: Point2, to: Point2, p: Point2) -> bool {
    orient2d(from, to, p) > 0.0
}

/// Collinear (or coincident) corners, judged by the sine of the angle at `a`.
#[inline]
pub fn is_degenerate(a: Point2, b: Point2, c: Point2, eps: f64) -> bool {
    let lab = (b - a).norm();
    let lac = (c - a).norm();
    if lab <= 0.0 || lac <= 0.0 || (c - b).norm() <= 0.0 {
        return true;
    }
    orient2d(a, b, c).abs() <= eps * lab * lac
}

#[inline]
pub fn midpoint(a: Point2, b: Point2) -> Point2 {
    (a + b) * 0.5
}

/// Distance from `p` to the infinite line through `a` and `b`.
#[inline]
pub fn distance_to_line(a: Point2, b: Point2, p: Point2) -> f64 {
    let len = (b - a).norm();
    if len <= 0.0 {
        return (p - a).norm();
    }
    orient2d(a, b, p).abs() / len
}

/// Angle at `from` between the rays towards `to0` and `to1`, in [0, π].
#[inline]
pub fn angle_at(from: Point2, to0: Point2, to1: Point2) -> f64 {
    let v0 = to0 - from;
    let v1 = to1 - from;
    let denom = (v0.norm_squared() * v1.norm_squared()).sqrt();
    if denom <= 0.0 {
        return 0.0;
    }
    (v0.dot(&v1) / denom).clamp(-1.0, 1.0).acos()
}

/// Smallest of the three interior angles.
#[inline]
pub fn min_angle(a: Point2, b: Point2, c: Point2) -> f64 {
    angle_at(a, b, c).min(angle_at(b, a, c)).min(angle_at(c, a, b))
}

/// Closed segment intersection `p0p1 ∩ p2p3` (touching counts, parallel never does).
pub fn segments_intersect(p0: Point2, p1: Point2, p2: Point2, p3: Point2) -> bool {
    let s1 = p1 - p0;
    let s2 = p3 - p2;
    let denom = -s2.x * s1.y + s1.x * s2.y;
    if denom == 0.0 || !denom.is_finite() {
        return false;
    }
    let s = (-s1.y * (p0.x - p2.x) + s1.x * (p0.y - p2.y)) / denom;
    let t = (s2.x * (p0.y - p2.y) - s2.y * (p0.x - p2.x)) / denom;
    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Which side of `a → b` the point `p` lies on: `1` left, `-1` right, `0` within
/// `eps` (relative to the lengths involved) of the line.
#[inline]
fn side(a: Point2, b: Point2, p: Point2, eps: f64) -> i8 {
    let tol = eps * (b - a).norm() * (p - a).norm();
    let o = orient2d(a, b, p);
    if o > tol {
        1
    } else if o < -tol {
        -1
    } else {
        0
    }
}

/// Proper crossing: each segment's endpoints lie strictly on opposite sides of
/// the other. Touching or overlapping within `eps` does not count.
pub fn segments_cross(a: Point2, b: Point2, c: Point2, d: Point2, eps: f64) -> bool {
    side(a, b, c, eps) * side(a, b, d, eps) < 0 && side(c, d, a, eps) * side(c, d, b, eps) < 0
}

/// Axis-aligned bounds `(min, max)`; `None` for an empty slice.
pub fn bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = *points.first()?;
    let mut lo = first;
    let mut hi = first;
    for p in &points[1..] {
        lo = Vector2::new(lo.x.min(p.x), lo.y.min(p.y));
        hi = Vector2::new(hi.x.max(p.x), hi.y.max(p.y));
    }
    Some((lo, hi))
}

/// Andrew’s monotone chain convex hull (returns hull in CCW order, collinear points dropped).
pub fn convex_hull(points: &[Point2]) -> Option<Vec<Point2>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }
    let mut lower: Vec<Point2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && orient2d(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Point2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && orient2d(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}
