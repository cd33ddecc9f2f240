//! Index-based half-edge ring used by contour resolution.
//!
//! Every node owns a point and the indices of its neighbours; edge `i` runs
//! from node `i` to `next(i)`. Nodes are never removed, so indices stay valid
//! for the lifetime of the ring.

use crate::error::MeshError;
use crate::geom2::{midpoint, Point2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct HalfEdge {
    pub p: Point2,
    pub prev: usize,
    pub next: usize,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Ring {
    pub nodes: Vec<HalfEdge>,
}

impl Ring {
    /// Closed ring over `points` in input order.
    pub fn from_points(points: &[Point2]) -> Self {
        let n = points.len();
        let nodes = points
            .iter()
            .enumerate()
            .map(|(i, &p)| HalfEdge {
                p,
                prev: if i == 0 { n - 1 } else { i - 1 },
                next: (i + 1) % n,
            })
            .collect();
        Self { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn next(&self, i: usize) -> usize {
        self.nodes[i].next
    }

    #[inline]
    pub fn prev(&self, i: usize) -> usize {
        self.nodes[i].prev
    }

    #[inline]
    pub fn point(&self, i: usize) -> Point2 {
        self.nodes[i].p
    }

    /// End points of edge `i`.
    #[inline]
    pub fn edge(&self, i: usize) -> (Point2, Point2) {
        (self.point(i), self.point(self.next(i)))
    }

    #[inline]
    pub fn edge_length(&self, i: usize) -> f64 {
        let (a, b) = self.edge(i);
        (b - a).norm()
    }

    /// Swap the direction of node `i`.
    #[inline]
    pub fn invert(&mut self, i: usize) {
        let node = &mut self.nodes[i];
        std::mem::swap(&mut node.prev, &mut node.next);
    }

    /// Bisect edge `i`; returns the index of the new midpoint node.
    pub fn split(&mut self, i: usize) -> usize {
        let to = self.next(i);
        let m = self.nodes.len();
        self.nodes.push(HalfEdge {
            p: midpoint(self.point(i), self.point(to)),
            prev: i,
            next: to,
        });
        self.nodes[to].prev = m;
        self.nodes[i].next = m;
        m
    }

    /// Points in walk order starting at `start` (one lap).
    pub fn points_from(&self, start: usize) -> Vec<Point2> {
        let mut out = Vec::with_capacity(self.len());
        let mut cur = start;
        loop {
            out.push(self.point(cur));
            cur = self.next(cur);
            if cur == start || out.len() > self.len() {
                break;
            }
        }
        out
    }
}

/// Invert every node from `first` (inclusive) up to `stop` (exclusive), following
/// the already-inverted links. Returns the number of inverted nodes.
///
/// Bounded by the ring size: a chain that never reaches `stop` is a broken ring.
pub(crate) fn invert_chain(ring: &mut Ring, first: usize, stop: usize) -> Result<usize, MeshError> {
    let mut e = first;
    let mut count = 0;
    while e != stop {
        if count > ring.len() {
            return Err(MeshError::invariant(
                "half-edge chain inversion did not reach its stop node",
            ));
        }
        ring.invert(e);
        e = ring.next(e);
        count += 1;
    }
    Ok(count)
}

/// Untangle the crossing of edge `from → to` with edge `from2 → to2`.
///
/// Afterwards the ring reads `from → from2 → … → to → to2`: the sub-chain between
/// `to` and `from2` is walked in the opposite direction.
pub(crate) fn splice(
    ring: &mut Ring,
    from: usize,
    to: usize,
    from2: usize,
    to2: usize,
) -> Result<(), MeshError> {
    ring.nodes[from].next = from2;
    // Points back to `from` until the chain inversion below flips it.
    ring.nodes[from2].next = from;
    ring.nodes[to].prev = to2;
    ring.invert(to);
    ring.nodes[to2].prev = to;
    invert_chain(ring, from2, to)?;
    Ok(())
}
