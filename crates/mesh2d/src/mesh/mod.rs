//! Incremental Delaunay triangulation over slot-map arenas.
//!
//! Purpose
//! - Own the live vertices, segments and triangles of the mesh under
//!   refinement, and keep it Delaunay as points are added one at a time.
//!
//! Why this design (short)
//! - Generational keys (`slotmap`) give records identity without shared
//!   ownership; a removed record can never be confused with a later one.
//! - Reference counting ties lifetimes together: a segment lives while a
//!   triangle cites it, a vertex while a segment uses it. Removing triangles is
//!   the only deletion path; segments and vertices follow automatically.
//! - Insertion is Bowyer–Watson with a star-shape repair of the cavity,
//!   followed by flip legalization of the new frontier edges.
//!
//! Conventions
//! - Triangles are stored CCW; `segs[i]` joins `verts[i]` and `verts[i+1]`.
//! - Coordinates are unique: inserting an existing coordinate is a no-op.
//! - Circumcircles are computed once, when a triangle is created.
//!
//! Code cross-refs: `refine::triangulate`, `export::MeshBuffers`

mod build;
mod types;

pub use build::Mesh;
pub use types::{Segment, SegmentKey, Triangle, TriangleKey, Vertex, VertexKey};

#[cfg(test)]
mod tests;
