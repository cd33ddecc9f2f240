//! Arena records for the live triangulation.
//!
//! - `Vertex`: a point plus the number of live segments ending at it.
//! - `Segment`: an unordered vertex pair, its cached length and the triangles
//!   citing it (the reference count is the length of that list).
//! - `Triangle`: three vertices in CCW order, the segments `v0v1, v1v2, v2v0`
//!   in matching order, and the circumcircle computed at creation.

use slotmap::new_key_type;

use crate::geom2::{Circle, Point2};

new_key_type! {
    /// Handle of a live mesh vertex.
    pub struct VertexKey;
    /// Handle of a live mesh segment.
    pub struct SegmentKey;
    /// Handle of a live mesh triangle.
    pub struct TriangleKey;
}

#[derive(Clone, Debug)]
pub struct Vertex {
    pub p: Point2,
    pub(crate) refs: usize,
}

impl Vertex {
    /// Number of live segments using this vertex.
    #[inline]
    pub fn refs(&self) -> usize {
        self.refs
    }
}

#[derive(Clone, Debug)]
pub struct Segment {
    pub a: VertexKey,
    pub b: VertexKey,
    pub length: f64,
    pub(crate) faces: Vec<TriangleKey>,
}

impl Segment {
    /// Number of live triangles citing this segment.
    #[inline]
    pub fn refs(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn faces(&self) -> &[TriangleKey] {
        &self.faces
    }

    #[inline]
    pub fn has_vertex(&self, v: VertexKey) -> bool {
        self.a == v || self.b == v
    }

    /// The other endpoint; `None` if `v` is not an endpoint.
    #[inline]
    pub fn other(&self, v: VertexKey) -> Option<VertexKey> {
        if v == self.a {
            Some(self.b)
        } else if v == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug)]
pub struct Triangle {
    pub verts: [VertexKey; 3],
    pub segs: [SegmentKey; 3],
    pub circle: Circle,
}

impl Triangle {
    #[inline]
    pub fn has_vertex(&self, v: VertexKey) -> bool {
        self.verts.contains(&v)
    }

    /// Vertex opposite to the edge `(a, b)`.
    pub fn opposite(&self, a: VertexKey, b: VertexKey) -> Option<VertexKey> {
        self.verts.iter().copied().find(|&v| v != a && v != b)
    }

    /// Endpoints of edge `i` (`0 ≤ i < 3`), CCW.
    #[inline]
    pub fn edge(&self, i: usize) -> (VertexKey, VertexKey) {
        (self.verts[i], self.verts[(i + 1) % 3])
    }
}

/// Ordered key pair identifying an undirected edge.
#[inline]
pub(crate) fn edge_key(a: VertexKey, b: VertexKey) -> (VertexKey, VertexKey) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Hashable coordinate with `-0.0` folded into `0.0`.
#[inline]
pub(crate) fn coord_key(p: Point2) -> (u64, u64) {
    let norm = |x: f64| if x == 0.0 { 0.0f64 } else { x };
    (norm(p.x).to_bits(), norm(p.y).to_bits())
}
