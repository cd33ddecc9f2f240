//! Live triangulation: arenas, Bowyer–Watson insertion, flip legalization and
//! reference-count garbage collection.

use std::collections::HashMap;

use slotmap::{SecondaryMap, SlotMap};

use super::types::{
    coord_key, edge_key, Segment, SegmentKey, Triangle, TriangleKey, Vertex, VertexKey,
};
use crate::error::MeshError;
use crate::geom2::{bounds, is_degenerate, midpoint, orient2d, GeomCfg, Point2, Seg2, Tri2};

/// Queue work allowed per live triangle during one legalization run. Flips
/// with a margin always terminate, so running out means a broken mesh.
const LEGALIZE_WORK_PER_TRIANGLE: usize = 32;

/// Edge of an insertion cavity that stays on its boundary.
#[derive(Clone, Copy, Debug)]
struct FrontierEdge {
    a: VertexKey,
    b: VertexKey,
    inner: TriangleKey,
    outer: Option<TriangleKey>,
}

/// Arena-owned Delaunay triangulation with a scaffold triangle around the input.
#[derive(Clone, Debug)]
pub struct Mesh {
    cfg: GeomCfg,
    vertices: SlotMap<VertexKey, Vertex>,
    segments: SlotMap<SegmentKey, Segment>,
    triangles: SlotMap<TriangleKey, Triangle>,
    by_coord: HashMap<(u64, u64), VertexKey>,
    by_edge: HashMap<(VertexKey, VertexKey), SegmentKey>,
    scaffold: [VertexKey; 3],
}

impl Mesh {
    /// Mesh holding only the scaffold triangle for the bounds of `points`.
    ///
    /// The scaffold is centred on the bounding box at three times the diagonal
    /// scale, so it strictly contains every point of the box.
    pub fn scaffold(points: &[Point2], cfg: GeomCfg) -> Result<Self, MeshError> {
        let (lo, hi) =
            bounds(points).ok_or_else(|| MeshError::degenerate("no points to bound"))?;
        let diagonal = (hi - lo).norm();
        if !(diagonal.is_finite() && diagonal > 0.0) {
            return Err(MeshError::degenerate(format!(
                "bounding box diagonal is {diagonal}"
            )));
        }
        let center = midpoint(lo, hi);
        let dh = 0.5 * diagonal;
        let rdh = 3f64.sqrt() * dh;
        let mut mesh = Self {
            cfg,
            vertices: SlotMap::with_key(),
            segments: SlotMap::with_key(),
            triangles: SlotMap::with_key(),
            by_coord: HashMap::new(),
            by_edge: HashMap::new(),
            scaffold: [VertexKey::default(); 3],
        };
        let a = mesh.add_vertex(center + Point2::new(-rdh, -dh) * 3.0);
        let b = mesh.add_vertex(center + Point2::new(rdh, -dh) * 3.0);
        let c = mesh.add_vertex(center + Point2::new(0.0, diagonal) * 3.0);
        mesh.scaffold = [a, b, c];
        mesh.add_triangle(a, b, c)?;
        Ok(mesh)
    }

    /// Scaffold plus every point of `points` inserted in order.
    pub fn delaunay(points: &[Point2], cfg: GeomCfg) -> Result<Self, MeshError> {
        let mut mesh = Self::scaffold(points, cfg)?;
        for &p in points {
            mesh.insert(p)?;
        }
        Ok(mesh)
    }

    #[inline]
    pub fn cfg(&self) -> &GeomCfg {
        &self.cfg
    }

    /// Keys of the scaffold corners (stale once finalization removed them).
    #[inline]
    pub fn scaffold_vertices(&self) -> [VertexKey; 3] {
        self.scaffold
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexKey, &Vertex)> + '_ {
        self.vertices.iter()
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegmentKey, &Segment)> + '_ {
        self.segments.iter()
    }

    pub fn triangles(&self) -> impl Iterator<Item = (TriangleKey, &Triangle)> + '_ {
        self.triangles.iter()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn vertex(&self, k: VertexKey) -> Option<&Vertex> {
        self.vertices.get(k)
    }

    #[inline]
    pub fn segment(&self, k: SegmentKey) -> Option<&Segment> {
        self.segments.get(k)
    }

    #[inline]
    pub fn triangle(&self, k: TriangleKey) -> Option<&Triangle> {
        self.triangles.get(k)
    }

    #[inline]
    pub fn position(&self, k: VertexKey) -> Option<Point2> {
        self.vertices.get(k).map(|v| v.p)
    }

    /// Live vertex at exactly `p`.
    #[inline]
    pub fn vertex_at(&self, p: Point2) -> Option<VertexKey> {
        self.by_coord.get(&coord_key(p)).copied()
    }

    /// Live segment joining `a` and `b` in either direction.
    #[inline]
    pub fn segment_between(&self, a: VertexKey, b: VertexKey) -> Option<SegmentKey> {
        self.by_edge.get(&edge_key(a, b)).copied()
    }

    /// Triangles citing segment `s` (empty for a dead key).
    pub fn triangles_on(&self, s: SegmentKey) -> &[TriangleKey] {
        self.segments.get(s).map_or(&[], |seg| seg.faces())
    }

    /// Triangle `k` by value.
    pub fn tri2(&self, k: TriangleKey) -> Option<Tri2> {
        let t = self.triangles.get(k)?;
        let [a, b, c] = t.verts;
        Some(Tri2::new(
            self.position(a)?,
            self.position(b)?,
            self.position(c)?,
        ))
    }

    /// Segment `k` by value.
    pub fn seg2(&self, k: SegmentKey) -> Option<Seg2> {
        let s = self.segments.get(k)?;
        Some(Seg2::new(self.position(s.a)?, self.position(s.b)?))
    }

    /// Insert `p`, keeping the triangulation Delaunay.
    ///
    /// Returns the existing vertex when one already sits at `p`.
    pub fn insert(&mut self, p: Point2) -> Result<VertexKey, MeshError> {
        if let Some(k) = self.vertex_at(p) {
            return Ok(k);
        }
        if !(p.x.is_finite() && p.y.is_finite()) {
            return Err(MeshError::degenerate("non-finite point"));
        }
        let seed = self
            .locate(p)?
            .ok_or_else(|| MeshError::degenerate(format!("point {p:?} lies outside the scaffold")))?;
        let mut cavity = self.grow_cavity(seed, p)?;
        self.repair_cavity(&mut cavity, seed, p)?;
        let frontier = self.frontier(&cavity)?;
        // Nothing is mutated until every new triangle is known to be valid.
        self.check_fan(&frontier, p)?;

        let v = self.add_vertex(p);
        let mut stack = Vec::with_capacity(frontier.len());
        for f in &frontier {
            self.add_triangle(f.a, f.b, v)?;
            if let Some(s) = self.segment_between(f.a, f.b) {
                stack.push(s);
            }
        }
        for t in cavity {
            self.remove_triangle(t);
        }
        self.legalize(stack)?;
        tracing::trace!(
            x = p.x,
            y = p.y,
            triangles = self.triangles.len(),
            "inserted vertex"
        );
        Ok(v)
    }

    /// Create the triangle `(a, b, c)`, reordered CCW, creating missing segments.
    pub fn add_triangle(
        &mut self,
        a: VertexKey,
        b: VertexKey,
        c: VertexKey,
    ) -> Result<TriangleKey, MeshError> {
        let (pa, pb, pc) = (self.point(a)?, self.point(b)?, self.point(c)?);
        if is_degenerate(pa, pb, pc, self.cfg.eps_det) {
            return Err(MeshError::degenerate(format!(
                "collinear triangle {pa:?} {pb:?} {pc:?}"
            )));
        }
        let (b, c, pb, pc) = if orient2d(pa, pb, pc) < 0.0 {
            (c, b, pc, pb)
        } else {
            (b, c, pb, pc)
        };
        let circle = Tri2::new(pa, pb, pc)
            .circumcircle(&self.cfg)
            .ok_or_else(|| MeshError::degenerate("triangle has no circumcircle"))?;
        let segs = [
            self.ensure_segment(a, b)?,
            self.ensure_segment(b, c)?,
            self.ensure_segment(c, a)?,
        ];
        let t = self.triangles.insert(Triangle {
            verts: [a, b, c],
            segs,
            circle,
        });
        for s in segs {
            self.segment_mut(s)?.faces.push(t);
        }
        Ok(t)
    }

    /// Remove triangle `t`, releasing segments and vertices nobody references
    /// any more. Returns false for a dead key.
    pub fn remove_triangle(&mut self, t: TriangleKey) -> bool {
        let Some(tri) = self.triangles.remove(t) else {
            return false;
        };
        for s in tri.segs {
            self.release_segment(s, t);
        }
        true
    }

    /// Verify the arena invariants.
    ///
    /// - every triangle is CCW and cites the three segments of its edges;
    /// - a segment lists exactly the triangles citing it, and at least one;
    /// - a vertex reference count equals the number of segments using it;
    /// - the coordinate and edge lookups mirror the arenas one-to-one.
    pub fn check_invariants(&self) -> Result<(), MeshError> {
        for (tk, tri) in &self.triangles {
            for i in 0..3 {
                let (a, b) = tri.edge(i);
                let seg = self.segment_ref(tri.segs[i])?;
                if edge_key(seg.a, seg.b) != edge_key(a, b) {
                    return Err(MeshError::invariant(format!(
                        "triangle {tk:?} edge {i} does not match its segment"
                    )));
                }
                if !seg.faces.contains(&tk) {
                    return Err(MeshError::invariant(format!(
                        "segment {:?} does not list triangle {tk:?}",
                        tri.segs[i]
                    )));
                }
            }
            let [a, b, c] = tri.verts;
            if orient2d(self.point(a)?, self.point(b)?, self.point(c)?) <= 0.0 {
                return Err(MeshError::invariant(format!("triangle {tk:?} is not CCW")));
            }
        }

        let mut uses: SecondaryMap<VertexKey, usize> = SecondaryMap::new();
        for (sk, seg) in &self.segments {
            if seg.faces.is_empty() {
                return Err(MeshError::invariant(format!("segment {sk:?} is unreferenced")));
            }
            for &f in &seg.faces {
                if !self.triangle_ref(f)?.segs.contains(&sk) {
                    return Err(MeshError::invariant(format!(
                        "triangle {f:?} does not cite segment {sk:?}"
                    )));
                }
            }
            if self.segment_between(seg.a, seg.b) != Some(sk) {
                return Err(MeshError::invariant(format!("segment {sk:?} missing from edge map")));
            }
            for v in [seg.a, seg.b] {
                self.point(v)?;
                *uses.entry(v).map(|e| e.or_insert(0)).ok_or_else(|| {
                    MeshError::invariant(format!("segment {sk:?} cites dead vertex"))
                })? += 1;
            }
        }

        for (vk, vertex) in &self.vertices {
            let used = uses.get(vk).copied().unwrap_or(0);
            if used == 0 || vertex.refs != used {
                return Err(MeshError::invariant(format!(
                    "vertex {vk:?} has refs {} but {used} segments",
                    vertex.refs
                )));
            }
            if self.vertex_at(vertex.p) != Some(vk) {
                return Err(MeshError::invariant(format!(
                    "vertex {vk:?} missing from coordinate map"
                )));
            }
        }
        if self.by_coord.len() != self.vertices.len() || self.by_edge.len() != self.segments.len()
        {
            return Err(MeshError::invariant("lookup maps out of sync with arenas"));
        }
        Ok(())
    }

    fn add_vertex(&mut self, p: Point2) -> VertexKey {
        if let Some(k) = self.vertex_at(p) {
            return k;
        }
        let k = self.vertices.insert(Vertex { p, refs: 0 });
        self.by_coord.insert(coord_key(p), k);
        k
    }

    fn ensure_segment(&mut self, a: VertexKey, b: VertexKey) -> Result<SegmentKey, MeshError> {
        if let Some(s) = self.segment_between(a, b) {
            return Ok(s);
        }
        let length = (self.point(b)? - self.point(a)?).norm();
        let s = self.segments.insert(Segment {
            a,
            b,
            length,
            faces: Vec::with_capacity(2),
        });
        self.by_edge.insert(edge_key(a, b), s);
        for v in [a, b] {
            self.vertex_mut(v)?.refs += 1;
        }
        Ok(s)
    }

    fn release_segment(&mut self, s: SegmentKey, t: TriangleKey) {
        let Some(seg) = self.segments.get_mut(s) else {
            return;
        };
        seg.faces.retain(|&f| f != t);
        if !seg.faces.is_empty() {
            return;
        }
        let (a, b) = (seg.a, seg.b);
        self.segments.remove(s);
        self.by_edge.remove(&edge_key(a, b));
        self.release_vertex(a);
        self.release_vertex(b);
    }

    fn release_vertex(&mut self, v: VertexKey) {
        let Some(vertex) = self.vertices.get_mut(v) else {
            return;
        };
        vertex.refs = vertex.refs.saturating_sub(1);
        if vertex.refs == 0 {
            let p = vertex.p;
            self.vertices.remove(v);
            self.by_coord.remove(&coord_key(p));
        }
    }

    /// First triangle containing `p`, boundary inclusive. A point on a shared
    /// edge may round to a hair outside both neighbours, so each edge test
    /// allows the same relative slack as `repair_cavity`.
    fn locate(&self, p: Point2) -> Result<Option<TriangleKey>, MeshError> {
        for (tk, tri) in &self.triangles {
            let [a, b, c] = tri.verts;
            let (pa, pb, pc) = (self.point(a)?, self.point(b)?, self.point(c)?);
            if [(pa, pb), (pb, pc), (pc, pa)]
                .into_iter()
                .all(|(x, y)| orient2d(x, y, p) >= -self.edge_slack(x, y, p))
            {
                return Ok(Some(tk));
            }
        }
        Ok(None)
    }

    /// Orientation slack for `p` against the edge `a → b`.
    #[inline]
    fn edge_slack(&self, a: Point2, b: Point2, p: Point2) -> f64 {
        self.cfg.eps_det * (b - a).norm() * (a - p).norm().max((b - p).norm())
    }

    /// Every frontier edge must form a proper triangle with `p`.
    fn check_fan(&self, frontier: &[FrontierEdge], p: Point2) -> Result<(), MeshError> {
        for f in frontier {
            let (pa, pb) = (self.point(f.a)?, self.point(f.b)?);
            if is_degenerate(pa, pb, p, self.cfg.eps_det)
                || Tri2::new(pa, pb, p).circumcircle(&self.cfg).is_none()
            {
                return Err(MeshError::degenerate(format!(
                    "point {p:?} is collinear with cavity edge {pa:?} {pb:?}"
                )));
            }
        }
        Ok(())
    }

    /// Seed plus every triangle reachable through neighbours whose circumcircle
    /// strictly contains `p`.
    fn grow_cavity(&self, seed: TriangleKey, p: Point2) -> Result<Vec<TriangleKey>, MeshError> {
        let mut cavity = vec![seed];
        let mut queue = vec![seed];
        while let Some(t) = queue.pop() {
            for s in self.triangle_ref(t)?.segs {
                for &u in &self.segment_ref(s)?.faces {
                    if !cavity.contains(&u) && self.triangle_ref(u)?.circle.contains(p) {
                        cavity.push(u);
                        queue.push(u);
                    }
                }
            }
        }
        Ok(cavity)
    }

    /// Make the cavity star-shaped from `p`: absorb the neighbour across any
    /// frontier edge `p` lies on, release non-seed triangles whose frontier edge
    /// faces away from `p`.
    fn repair_cavity(
        &self,
        cavity: &mut Vec<TriangleKey>,
        seed: TriangleKey,
        p: Point2,
    ) -> Result<(), MeshError> {
        let rounds = 4 * self.triangles.len() + 16;
        for _ in 0..rounds {
            let mut changed = false;
            for f in self.frontier(cavity)? {
                let (pa, pb) = (self.point(f.a)?, self.point(f.b)?);
                let o = orient2d(pa, pb, p);
                let tol = self.edge_slack(pa, pb, p);
                if o.abs() <= tol {
                    let outer = f.outer.ok_or_else(|| {
                        MeshError::degenerate("point lies on the scaffold boundary")
                    })?;
                    cavity.push(outer);
                    changed = true;
                    break;
                }
                if o < 0.0 && f.inner != seed {
                    cavity.retain(|&t| t != f.inner);
                    changed = true;
                    break;
                }
            }
            if !changed {
                return Ok(());
            }
        }
        Err(MeshError::degenerate("insertion cavity did not settle"))
    }

    fn frontier(&self, cavity: &[TriangleKey]) -> Result<Vec<FrontierEdge>, MeshError> {
        let mut out = Vec::with_capacity(cavity.len() + 2);
        for &t in cavity {
            let tri = self.triangle_ref(t)?;
            for i in 0..3 {
                let (a, b) = tri.edge(i);
                let outer = self
                    .segment_ref(tri.segs[i])?
                    .faces
                    .iter()
                    .copied()
                    .find(|&u| u != t);
                if matches!(outer, Some(o) if cavity.contains(&o)) {
                    continue;
                }
                out.push(FrontierEdge {
                    a,
                    b,
                    inner: t,
                    outer,
                });
            }
        }
        Ok(out)
    }

    /// Restore the Delaunay property around the queued segments by edge flips.
    ///
    /// An edge is flipped only when the far apex lies inside the circumcircle
    /// by more than `eps_det` of its radius, so rounding cannot flip an edge
    /// back and forth.
    pub(super) fn legalize(&mut self, stack: Vec<SegmentKey>) -> Result<(), MeshError> {
        let budget = LEGALIZE_WORK_PER_TRIANGLE * (self.triangles.len() + stack.len()) + 64;
        self.legalize_within(stack, budget)
    }

    pub(super) fn legalize_within(
        &mut self,
        mut stack: Vec<SegmentKey>,
        budget: usize,
    ) -> Result<(), MeshError> {
        let mut work = 0;
        while let Some(s) = stack.pop() {
            work += 1;
            if work > budget {
                return Err(MeshError::invariant(format!(
                    "legalization exceeded {budget} steps with {} edges pending",
                    stack.len() + 1
                )));
            }
            let Some(seg) = self.segments.get(s) else {
                continue;
            };
            if seg.faces.len() < 2 {
                continue;
            }
            let (a, b) = (seg.a, seg.b);
            let (t1, t2) = (seg.faces[0], seg.faces[1]);
            let (tri1, tri2) = (self.triangle_ref(t1)?, self.triangle_ref(t2)?);
            let circle = tri1.circle;
            let c = tri1
                .opposite(a, b)
                .ok_or_else(|| MeshError::invariant("triangle lacks an apex opposite its edge"))?;
            let d = tri2
                .opposite(a, b)
                .ok_or_else(|| MeshError::invariant("triangle lacks an apex opposite its edge"))?;
            let (pa, pb, pc, pd) = (self.point(a)?, self.point(b)?, self.point(c)?, self.point(d)?);
            if !circle.contains_by(pd, self.cfg.eps_det * circle.radius) {
                continue;
            }
            // Flip only when `cd` separates `a` from `b` (convex quad).
            let convex = orient2d(pc, pd, pa) * orient2d(pc, pd, pb) < 0.0;
            let eps = self.cfg.eps_det;
            if !convex || is_degenerate(pa, pc, pd, eps) || is_degenerate(pb, pc, pd, eps) {
                continue;
            }
            self.add_triangle(a, c, d)?;
            self.add_triangle(b, c, d)?;
            self.remove_triangle(t1);
            self.remove_triangle(t2);
            for (x, y) in [(a, c), (c, b), (b, d), (d, a)] {
                if let Some(k) = self.segment_between(x, y) {
                    stack.push(k);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn point(&self, k: VertexKey) -> Result<Point2, MeshError> {
        self.vertices
            .get(k)
            .map(|v| v.p)
            .ok_or_else(|| MeshError::invariant(format!("dead vertex {k:?}")))
    }

    fn vertex_mut(&mut self, k: VertexKey) -> Result<&mut Vertex, MeshError> {
        self.vertices
            .get_mut(k)
            .ok_or_else(|| MeshError::invariant(format!("dead vertex {k:?}")))
    }

    fn segment_ref(&self, k: SegmentKey) -> Result<&Segment, MeshError> {
        self.segments
            .get(k)
            .ok_or_else(|| MeshError::invariant(format!("dead segment {k:?}")))
    }

    fn segment_mut(&mut self, k: SegmentKey) -> Result<&mut Segment, MeshError> {
        self.segments
            .get_mut(k)
            .ok_or_else(|| MeshError::invariant(format!("dead segment {k:?}")))
    }

    pub(crate) fn triangle_ref(&self, k: TriangleKey) -> Result<&Triangle, MeshError> {
        self.triangles
            .get(k)
            .ok_or_else(|| MeshError::invariant(format!("dead triangle {k:?}")))
    }
}
