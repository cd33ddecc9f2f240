//! Contour resolution: raw closed polyline → simple polygon boundary.
//!
//! Purpose
//! - Accept hand-drawn or generated point loops that may cross themselves and
//!   return a vertex ring suitable as a meshing boundary.
//!
//! Algorithm
//! - Pass 1 (split): any ring edge crossing two or more non-adjacent edges is
//!   bisected until every edge crosses at most one other.
//! - Pass 2 (resolve): walk the ring from node 0. For the current edge, look
//!   ahead for the first edge crossing it; if found, splice the ring so the
//!   loop between the two edges is traversed backwards, and continue from the
//!   crossing edge. The walk ends when it returns to node 0.
//! - Pass 3 (untangle): the input points in walk order, each kept once, form a
//!   new ring. While two of its edges cross properly, splice them (a 2-opt
//!   move). Every such move shortens the perimeter, so the pass terminates.
//!
//! Invariants
//! - Output vertices are input points, pairwise distinct, with no two edges
//!   crossing properly. Split midpoints steer the walk but are not emitted.
//! - An already-simple input comes back unchanged, in the same order.
//!
//! Code cross-refs: `ring::{Ring, splice, invert_chain}`, `pslg::Polygon::contour`

mod ring;

use crate::error::MeshError;
use crate::geom2::{segments_cross, segments_intersect, GeomCfg, Point2};
use crate::pslg::Polygon;

use ring::{splice, Ring};

/// Resolve a closed, possibly self-intersecting point sequence into a polygon.
///
/// Consecutive duplicate points (including an explicit closing point equal to
/// the first) are dropped before the ring is built.
pub fn resolve_contour(points: &[Point2], cfg: &GeomCfg) -> Result<Polygon, MeshError> {
    let vertices = resolve_points(points, cfg)?;
    Ok(Polygon::new(vertices))
}

/// Same as [`resolve_contour`] but returns the bare vertex ring.
pub fn resolve_points(points: &[Point2], cfg: &GeomCfg) -> Result<Vec<Point2>, MeshError> {
    let mut pts: Vec<Point2> = points.to_vec();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(MeshError::degenerate(format!(
            "contour needs at least 3 distinct points, got {}",
            pts.len()
        )));
    }
    let mut ring = Ring::from_points(&pts);
    let splits = split_crossing_edges(&mut ring, cfg);
    let walk = walk_and_splice(&mut ring)?;
    let kept = input_points_in_walk_order(&ring, &walk, pts.len());
    let (out, moves) = untangle(&kept, cfg)?;
    tracing::debug!(
        input = pts.len(),
        splits,
        walked = walk.len(),
        moves,
        output = out.len(),
        "contour resolved"
    );
    if out.len() < 3 {
        return Err(MeshError::degenerate(format!(
            "resolved contour has {} vertices",
            out.len()
        )));
    }
    Ok(out)
}

/// Drop points closer than `min_spacing` to the previously kept one, then trim
/// trailing points that close onto the first.
///
/// A large gap between the last and first point is left as is; the ring closes
/// it with a single edge.
pub fn thin(points: &[Point2], min_spacing: f64) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        match out.last() {
            Some(&last) if (p - last).norm() <= min_spacing => {}
            _ => out.push(p),
        }
    }
    while out.len() > 1 && (out[out.len() - 1] - out[0]).norm() <= min_spacing {
        out.pop();
    }
    out
}

/// Count crossings of edge `e` with the ring edges from `next(next(e))` up to,
/// but excluding, the edge that ends at `prev(e)`. Stops at `limit`.
fn count_crossings(ring: &Ring, e: usize, limit: usize) -> usize {
    let (a, b) = ring.edge(e);
    let stop = ring.prev(e);
    let mut f = ring.next(ring.next(e));
    let mut count = 0;
    let mut guard = 0;
    while f != stop && ring.next(f) != stop && f != e && guard < ring.len() {
        let (c, d) = ring.edge(f);
        if segments_intersect(a, b, c, d) {
            count += 1;
            if count >= limit {
                break;
            }
        }
        f = ring.next(f);
        guard += 1;
    }
    count
}

/// Pass 1: bisect edges that cross more than one other edge. Returns the split count.
fn split_crossing_edges(ring: &mut Ring, cfg: &GeomCfg) -> usize {
    let start = 0;
    let mut cur = start;
    let mut splits = 0;
    let max_splits = 16 * ring.len();
    loop {
        let crowded = count_crossings(ring, cur, 2) >= 2;
        if crowded && ring.edge_length(cur) > cfg.eps_on && splits < max_splits {
            ring.split(cur);
            splits += 1;
            continue;
        }
        cur = ring.next(cur);
        if cur == start {
            break;
        }
    }
    splits
}

/// First edge after `to` (stopping before `start` or the edge ending at `from`)
/// that crosses `from → to`.
fn find_forward_crossing(
    ring: &Ring,
    start: usize,
    from: usize,
    to: usize,
) -> Option<(usize, usize)> {
    let (a, b) = ring.edge(from);
    let mut from2 = ring.next(to);
    let mut guard = 0;
    while from2 != start && from2 != from && guard <= ring.len() {
        let to2 = ring.next(from2);
        if to2 == from {
            break;
        }
        if segments_intersect(a, b, ring.point(from2), ring.point(to2)) {
            return Some((from2, to2));
        }
        from2 = to2;
        guard += 1;
    }
    None
}

/// Pass 2: walk from node 0, splicing at every forward crossing. Returns the
/// visited nodes; a node may be visited more than once.
fn walk_and_splice(ring: &mut Ring) -> Result<Vec<usize>, MeshError> {
    let start = 0;
    let mut out = vec![start];
    let mut current = start;
    let max_steps = 4 * ring.len() * ring.len() + 16;
    let mut steps = 0;
    loop {
        steps += 1;
        if steps > max_steps {
            return Err(MeshError::degenerate(
                "contour walk did not return to its start",
            ));
        }
        let from = current;
        let to = ring.next(from);
        match find_forward_crossing(ring, start, from, to) {
            None => {
                out.push(to);
                current = to;
            }
            Some((from2, to2)) => {
                tracing::trace!(from, to, from2, to2, "splice");
                out.push(from2);
                splice(ring, from, to, from2, to2)?;
                current = from2;
            }
        }
        if current == start {
            break;
        }
    }
    // The walk ends on the start point again.
    out.pop();
    Ok(out)
}

/// First visit of every input node along `walk`, skipping split midpoints
/// (nodes at or past `inputs`) and coordinates already taken.
fn input_points_in_walk_order(ring: &Ring, walk: &[usize], inputs: usize) -> Vec<Point2> {
    let mut seen = vec![false; inputs];
    let mut out: Vec<Point2> = Vec::with_capacity(inputs);
    for &node in walk {
        if node >= inputs || seen[node] {
            continue;
        }
        seen[node] = true;
        let p = ring.point(node);
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

/// First pair of edges, scanning from node 0, that cross properly.
fn find_proper_crossing(ring: &Ring, eps: f64) -> Option<(usize, usize)> {
    let mut e = 0;
    for _ in 0..ring.len() {
        let (a, b) = ring.edge(e);
        let mut f = ring.next(ring.next(e));
        while f != e && ring.next(f) != e {
            let (c, d) = ring.edge(f);
            if segments_cross(a, b, c, d, eps) {
                return Some((e, f));
            }
            f = ring.next(f);
        }
        e = ring.next(e);
        if e == 0 {
            break;
        }
    }
    None
}

/// Pass 3: splice properly crossing edge pairs until none remain. Returns the
/// ring read from its first point and the number of splices.
fn untangle(points: &[Point2], cfg: &GeomCfg) -> Result<(Vec<Point2>, usize), MeshError> {
    if points.len() < 4 {
        return Ok((points.to_vec(), 0));
    }
    let mut ring = Ring::from_points(points);
    let max_moves = 4 * ring.len() * ring.len() + 16;
    let mut moves = 0;
    while let Some((e, f)) = find_proper_crossing(&ring, cfg.eps_det) {
        if moves >= max_moves {
            return Err(MeshError::degenerate(
                "contour untangling did not converge",
            ));
        }
        tracing::trace!(e, f, "untangle");
        let (to, to2) = (ring.next(e), ring.next(f));
        splice(&mut ring, e, to, f, to2)?;
        moves += 1;
    }
    Ok((ring.points_from(0), moves))
}

#[cfg(test)]
mod tests;
