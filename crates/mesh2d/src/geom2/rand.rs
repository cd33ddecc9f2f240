//! Random polygons and scribbles in 2D (radial jitter + replay tokens).
//!
//! Purpose
//! - Provide small, deterministic samplers for meshing inputs: simple
//!   star-shaped polygons (for quality/property checks) and free scribbles
//!   (for contour resolution, which must cope with self-intersections).
//!
//! Model
//! - Star polygons start from `n` equally spaced angles on [0, 2π), add bounded
//!   angular and radial jitter and keep the angular order, so the boundary never
//!   crosses itself.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!
//! Code cross-refs: `pslg::Polygon`, `contour::resolve_contour`

use super::types::Point2;
use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Radial-jitter sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radial jitter (relative amplitude). Radii = `base_radius * (1 + u)`, with `u∈[-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    /// Base radius before recenter/rescale.
    pub base_radius: f64,
    /// Random global phase in [0, 2π)?
    pub random_phase: bool,
}
impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            random_phase: true,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing, cheap and stable.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a simple star-shaped polygon (CCW vertex ring) via radial jitter.
pub fn draw_star_polygon(cfg: RadialCfg, tok: ReplayToken) -> Vec<Point2> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng).max(3);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = 2.0 * std::f64::consts::PI / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * 2.0 * std::f64::consts::PI
    } else {
        0.0
    };
    let mut angles: Vec<f64> = (0..n)
        .map(|k| {
            let base = phase + (k as f64) * delta;
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            base + jitter
        })
        .collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    angles
        .into_iter()
        .map(|th| {
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u).max(1e-6) * r0;
            Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}

/// Draw `n` uniform points in `[-extent, extent]²` in visiting order (a closed scribble).
pub fn draw_scribble(n: usize, extent: f64, tok: ReplayToken) -> Vec<Point2> {
    let mut rng = tok.to_std_rng();
    let e = extent.abs().max(1e-9);
    (0..n)
        .map(|_| Vector2::new(rng.gen_range(-e..=e), rng.gen_range(-e..=e)))
        .collect()
}

/// Translate to the area centroid and scale so the farthest vertex sits at `r_out`.
///
/// `None` for fewer than three points, zero area, or a non-positive radius.
pub fn recenter_rescale(points: &[Point2], r_out: f64) -> Option<Vec<Point2>> {
    if !(r_out.is_finite() && r_out > 0.0) {
        return None;
    }
    let c = polygon_area_centroid(points)?;
    let r_out0 = points.iter().map(|p| (p - c).norm()).fold(0.0, f64::max);
    if r_out0 <= 0.0 {
        return None;
    }
    let s = r_out / r_out0;
    Some(points.iter().map(|p| (p - c) * s).collect())
}

/// Compute polygon area centroid (either orientation, non-degenerate).
fn polygon_area_centroid(verts: &[Point2]) -> Option<Point2> {
    if verts.len() < 3 {
        return None;
    }
    let mut a: f64 = 0.0;
    let mut cx: f64 = 0.0;
    let mut cy: f64 = 0.0;
    for i in 0..verts.len() {
        let p = verts[i];
        let q = verts[(i + 1) % verts.len()];
        let cross = p.x * q.y - q.x * p.y;
        a += cross;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }
    a *= 0.5;
    if a.abs() < 1e-18 {
        return None;
    }
    Some(Vector2::new(cx / (6.0 * a), cy / (6.0 * a)))
}
