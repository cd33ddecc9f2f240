//! Ruppert refinement of a conforming Delaunay triangulation.
//!
//! Purpose
//! - Turn a polygon into a triangulation whose interior triangles all meet a
//!   minimum-angle bound (modulo the feature-size exemption) and whose
//!   boundary segments are not encroached.
//!
//! Algorithm
//! - Bootstrap the scaffold, insert every polygon vertex.
//! - Loop while a constraint segment (length ≥ threshold) is encroached by a
//!   live vertex, or an interior triangle is skinny:
//!   1. split encroached constraint segments at their midpoint until none is;
//!   2. take the first skinny interior triangle; if its circumcenter encroaches
//!      constraint segments, split those, else insert the circumcenter.
//! - Finalize: drop every triangle that is not interior (scaffold included).
//!
//! Interior classification
//! - All three corners inside the polygon (boundary inclusive) and every
//!   non-constraint edge with its midpoint inside. The per-vertex answer is
//!   cached; vertices never move.
//!
//! References
//! - J. Ruppert, "A Delaunay Refinement Algorithm for Quality 2-Dimensional
//!   Mesh Generation", J. Algorithms 18 (1995).
//! - Code cross-refs: `mesh::Mesh::insert`, `pslg::Polygon::contains_eps`

mod cfg;

use slotmap::SecondaryMap;

use crate::error::MeshError;
use crate::export::MeshBuffers;
use crate::geom2::{GeomCfg, Point2, Seg2, Tri2};
use crate::mesh::{Mesh, TriangleKey, VertexKey};
use crate::pslg::Polygon;

pub use cfg::{RefineCfg, RefineStats, MAX_MIN_ANGLE_DEG};

/// Refined triangulation of a polygon.
#[derive(Clone, Debug)]
pub struct Triangulation {
    polygon: Polygon,
    geom: GeomCfg,
    cfg: RefineCfg,
    mesh: Mesh,
    constraint_vertices: Vec<Point2>,
    constraint_segments: Vec<Seg2>,
    inside: SecondaryMap<VertexKey, bool>,
    stats: RefineStats,
}

/// Triangulate `polygon` and refine it to the quality bound of `cfg`.
pub fn triangulate(
    polygon: &Polygon,
    cfg: RefineCfg,
    geom: GeomCfg,
) -> Result<Triangulation, MeshError> {
    if polygon.len() < 3 {
        return Err(MeshError::degenerate(format!(
            "polygon needs at least 3 vertices, got {}",
            polygon.len()
        )));
    }
    let mut mesh = Mesh::scaffold(polygon.vertices(), geom)?;
    for &p in polygon.vertices() {
        mesh.insert(p)?;
    }
    let mut tri = Triangulation {
        polygon: polygon.clone(),
        geom,
        cfg,
        mesh,
        constraint_vertices: polygon.vertices().to_vec(),
        constraint_segments: polygon.segments().to_vec(),
        inside: SecondaryMap::new(),
        stats: RefineStats::default(),
    };
    tri.refine()?;
    tri.finalize()?;
    tracing::debug!(
        iterations = tri.stats.iterations,
        segment_splits = tri.stats.segment_splits,
        steiner_points = tri.stats.steiner_points,
        triangles = tri.mesh.triangle_count(),
        "triangulation refined"
    );
    Ok(tri)
}

impl Triangulation {
    /// Final triangles by value, CCW.
    pub fn triangles(&self) -> Vec<Tri2> {
        self.mesh
            .triangles()
            .filter_map(|(k, _)| self.mesh.tri2(k))
            .collect()
    }

    /// The live mesh (read-only).
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Boundary segments after splitting, in boundary order per split.
    #[inline]
    pub fn constraint_segments(&self) -> &[Seg2] {
        &self.constraint_segments
    }

    /// Boundary vertices including split midpoints.
    #[inline]
    pub fn constraint_vertices(&self) -> &[Point2] {
        &self.constraint_vertices
    }

    #[inline]
    pub fn stats(&self) -> RefineStats {
        self.stats
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[inline]
    pub fn cfg(&self) -> RefineCfg {
        self.cfg
    }

    /// Sum of triangle areas.
    pub fn area(&self) -> f64 {
        self.triangles().iter().map(Tri2::signed_area).sum()
    }

    /// Export buffers with vertices embedded at `z = 0`.
    pub fn build(&self) -> MeshBuffers {
        MeshBuffers::from_mesh(&self.mesh)
    }

    /// Export buffers with a caller-supplied vertex projection.
    pub fn build_with<F>(&self, project: F) -> MeshBuffers
    where
        F: FnMut(Point2) -> nalgebra::Vector3<f64>,
    {
        MeshBuffers::from_mesh_with(&self.mesh, project)
    }

    fn refine(&mut self) -> Result<(), MeshError> {
        let angle = self.cfg.min_angle_rad();
        loop {
            let pending =
                self.find_encroached().is_some() || self.find_skinny(angle)?.is_some();
            if !pending {
                return Ok(());
            }
            if self.stats.iterations >= self.cfg.max_iterations {
                return Err(MeshError::RefinementNotConverged {
                    iterations: self.stats.iterations,
                });
            }
            self.stats.iterations += 1;

            while let Some(i) = self.find_encroached() {
                self.split_segment(i)?;
            }
            if let Some(t) = self.find_skinny(angle)? {
                let center = self.mesh.triangle_ref(t)?.circle.center;
                let hits: Vec<usize> = self
                    .constraint_segments
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.encroached_by(center))
                    .map(|(i, _)| i)
                    .collect();
                if hits.is_empty() {
                    if self.mesh.vertex_at(center).is_none() {
                        self.stats.steiner_points += 1;
                    }
                    self.mesh.insert(center)?;
                } else {
                    // Highest index first keeps the remaining indices valid.
                    for &i in hits.iter().rev() {
                        self.split_segment(i)?;
                    }
                }
            }

            if cfg!(debug_assertions) {
                self.mesh.check_invariants()?;
            }
            tracing::debug!(
                iteration = self.stats.iterations,
                triangles = self.mesh.triangle_count(),
                segments = self.constraint_segments.len(),
                "refinement pass"
            );
        }
    }

    /// Index of the first constraint segment (length ≥ threshold) encroached
    /// by a live vertex.
    fn find_encroached(&self) -> Option<usize> {
        let threshold = self.cfg.threshold;
        self.constraint_segments.iter().position(|s| {
            s.length() >= threshold && self.mesh.vertices().any(|(_, v)| s.encroached_by(v.p))
        })
    }

    fn find_skinny(&mut self, angle: f64) -> Result<Option<TriangleKey>, MeshError> {
        let threshold = self.cfg.threshold;
        let candidates: Vec<TriangleKey> = self
            .mesh
            .triangles()
            .filter(|&(k, _)| {
                self.mesh
                    .tri2(k)
                    .is_some_and(|t| t.is_skinny(angle, threshold))
            })
            .map(|(k, _)| k)
            .collect();
        for k in candidates {
            if self.is_interior(k)? {
                return Ok(Some(k));
            }
        }
        Ok(None)
    }

    /// Bisect constraint segment `i` and insert the midpoint into the mesh.
    fn split_segment(&mut self, i: usize) -> Result<(), MeshError> {
        let s = self
            .constraint_segments
            .get(i)
            .copied()
            .ok_or_else(|| MeshError::invariant(format!("constraint segment {i} out of range")))?;
        let m = s.midpoint();
        let ia = self.constraint_vertices.iter().position(|&p| p == s.a);
        let ib = self.constraint_vertices.iter().position(|&p| p == s.b);
        match (ia, ib) {
            (Some(ia), Some(ib)) if ia.abs_diff(ib) == 1 => {
                self.constraint_vertices.insert(ia.max(ib), m)
            }
            _ => self.constraint_vertices.push(m),
        }
        self.mesh.insert(m)?;
        self.constraint_segments
            .splice(i..=i, [Seg2::new(s.a, m), Seg2::new(m, s.b)]);
        self.stats.segment_splits += 1;
        self.stats.steiner_points += 1;
        tracing::trace!(index = i, x = m.x, y = m.y, "split constraint segment");
        Ok(())
    }

    fn is_interior(&mut self, t: TriangleKey) -> Result<bool, MeshError> {
        let verts = self.mesh.triangle_ref(t)?.verts;
        for v in verts {
            if !self.vertex_inside(v)? {
                return Ok(false);
            }
        }
        for i in 0..3 {
            let edge = Seg2::new(
                self.mesh.point(verts[i])?,
                self.mesh.point(verts[(i + 1) % 3])?,
            );
            if self.is_constraint(&edge) {
                continue;
            }
            if !self.polygon.contains_eps(edge.midpoint(), self.geom.eps_on) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn vertex_inside(&mut self, v: VertexKey) -> Result<bool, MeshError> {
        if let Some(&inside) = self.inside.get(v) {
            return Ok(inside);
        }
        let inside = self
            .polygon
            .contains_eps(self.mesh.point(v)?, self.geom.eps_on);
        self.inside.insert(v, inside);
        Ok(inside)
    }

    fn is_constraint(&self, edge: &Seg2) -> bool {
        self.constraint_segments.iter().any(|s| s.same_as(edge))
    }

    /// Remove every triangle that is not interior.
    fn finalize(&mut self) -> Result<(), MeshError> {
        let keys: Vec<TriangleKey> = self.mesh.triangles().map(|(k, _)| k).collect();
        let mut outside = Vec::new();
        for k in keys {
            if !self.is_interior(k)? {
                outside.push(k);
            }
        }
        for k in &outside {
            self.mesh.remove_triangle(*k);
        }
        tracing::debug!(removed = outside.len(), "finalized triangulation");
        Ok(())
    }
}
