//! Export of the live mesh as indexed buffers.
//!
//! Positions follow the arena's vertex order; every triangle becomes one index
//! triple, counter-clockwise in the plane. A projection closure lifts 2D
//! points into 3D (default: `z = 0`).

use nalgebra::Vector3;
use slotmap::SecondaryMap;

use crate::geom2::{orient2d, Point2};
use crate::mesh::{Mesh, VertexKey};

/// Indexed triangle buffers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<Vector3<f64>>,
    pub indices: Vec<[usize; 3]>,
}

impl MeshBuffers {
    /// Buffers with vertices embedded in the `z = 0` plane.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        Self::from_mesh_with(mesh, |p| Vector3::new(p.x, p.y, 0.0))
    }

    /// Buffers with positions produced by `project`.
    pub fn from_mesh_with<F>(mesh: &Mesh, mut project: F) -> Self
    where
        F: FnMut(Point2) -> Vector3<f64>,
    {
        let mut slot: SecondaryMap<VertexKey, usize> = SecondaryMap::new();
        let mut points = Vec::with_capacity(mesh.vertex_count());
        let mut positions = Vec::with_capacity(mesh.vertex_count());
        for (k, v) in mesh.vertices() {
            slot.insert(k, positions.len());
            points.push(v.p);
            positions.push(project(v.p));
        }
        let indices = mesh
            .triangles()
            .filter_map(|(_, t)| {
                let [a, b, c] = t.verts;
                let (ia, ib, ic) = (*slot.get(a)?, *slot.get(b)?, *slot.get(c)?);
                if orient2d(points[ia], points[ib], points[ic]) < 0.0 {
                    Some([ia, ic, ib])
                } else {
                    Some([ia, ib, ic])
                }
            })
            .collect();
        Self { positions, indices }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Indices flattened into one `u32` list, as GPU index buffers expect.
    ///
    /// `None` when an index does not fit in `u32`.
    pub fn flat_indices_u32(&self) -> Option<Vec<u32>> {
        self.indices
            .iter()
            .flat_map(|t| t.iter())
            .map(|&i| u32::try_from(i).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::GeomCfg;
    use crate::pslg::Polygon;
    use crate::refine::{triangulate, RefineCfg};
    use nalgebra::vector;

    fn square_triangulation() -> crate::refine::Triangulation {
        let square = Polygon::new(vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ]);
        triangulate(&square, RefineCfg::default(), GeomCfg::default()).unwrap()
    }

    #[test]
    fn square_exports_two_ccw_triangles() {
        let tri = square_triangulation();
        let buf = tri.build();
        assert_eq!(buf.positions.len(), 4);
        assert_eq!(buf.triangle_count(), 2);
        for idx in &buf.indices {
            let [a, b, c] = idx.map(|i| buf.positions[i].xy());
            assert!(orient2d(a, b, c) > 0.0);
        }
        assert!(buf.positions.iter().all(|p| p.z == 0.0));
        let flat = buf.flat_indices_u32().unwrap();
        assert_eq!(flat.len(), 6);
        assert!(flat.iter().all(|&i| (i as usize) < buf.positions.len()));
    }

    #[test]
    fn custom_projection_is_applied() {
        let tri = square_triangulation();
        let buf = tri.build_with(|p| Vector3::new(p.x, 0.0, -p.y));
        assert_eq!(buf.positions.len(), 4);
        assert!(buf.positions.iter().all(|p| p.y == 0.0));
        assert!(buf.positions.iter().any(|p| p.z == -1.0));
        assert_eq!(buf.indices, tri.build().indices);
    }

    #[test]
    fn empty_mesh_exports_nothing() {
        let pts = [vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]];
        let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
        let keys: Vec<_> = mesh.triangles().map(|(k, _)| k).collect();
        for k in keys {
            mesh.remove_triangle(k);
        }
        assert_eq!(MeshBuffers::from_mesh(&mesh), MeshBuffers::default());
    }
}
