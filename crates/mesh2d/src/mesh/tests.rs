use super::*;
use crate::error::MeshError;
use crate::geom2::rand::{draw_scribble, ReplayToken};
use crate::geom2::{midpoint, orient2d, GeomCfg, Point2};
use nalgebra::vector;

fn assert_delaunay(mesh: &Mesh) {
    for (tk, tri) in mesh.triangles() {
        for (vk, v) in mesh.vertices() {
            let d = (v.p - tri.circle.center).norm();
            assert!(
                d >= tri.circle.radius * (1.0 - 1e-9),
                "vertex {vk:?} inside circumcircle of {tk:?}"
            );
        }
    }
}

fn total_area(mesh: &Mesh) -> f64 {
    mesh.triangles()
        .map(|(k, _)| mesh.tri2(k).unwrap().signed_area())
        .sum()
}

#[test]
fn scaffold_contains_bounds() {
    let pts = [vector![0.0, 0.0], vector![3.0, 1.0]];
    let mesh = Mesh::scaffold(&pts, GeomCfg::default()).unwrap();
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(mesh.segment_count(), 3);
    assert_eq!(mesh.vertex_count(), 3);
    let (tk, _) = mesh.triangles().next().unwrap();
    let t = mesh.tri2(tk).unwrap();
    for p in [
        vector![0.0, 0.0],
        vector![3.0, 0.0],
        vector![3.0, 1.0],
        vector![0.0, 1.0],
    ] {
        assert!(orient2d(t.a, t.b, p) > 0.0);
        assert!(orient2d(t.b, t.c, p) > 0.0);
        assert!(orient2d(t.c, t.a, p) > 0.0);
    }
    mesh.check_invariants().unwrap();
}

#[test]
fn scaffold_rejects_zero_extent() {
    let err = Mesh::scaffold(&[vector![1.0, 1.0]], GeomCfg::default()).unwrap_err();
    assert!(matches!(err, MeshError::DegenerateInput { .. }));
    assert!(Mesh::scaffold(&[], GeomCfg::default()).is_err());
}

#[test]
fn random_points_stay_delaunay() {
    let pts = draw_scribble(60, 2.0, ReplayToken { seed: 17, index: 0 });
    let mut mesh = Mesh::scaffold(&pts, GeomCfg::default()).unwrap();
    let scaffold_area = total_area(&mesh);
    for &p in &pts {
        mesh.insert(p).unwrap();
        mesh.check_invariants().unwrap();
    }
    assert_eq!(mesh.vertex_count(), pts.len() + 3);
    // Euler with a triangular hull: T = 2V - 5.
    assert_eq!(mesh.triangle_count(), 2 * mesh.vertex_count() - 5);
    assert!((total_area(&mesh) - scaffold_area).abs() < 1e-9 * scaffold_area);
    assert_delaunay(&mesh);
}

#[test]
fn cocircular_grid_is_handled() {
    let grid: Vec<Point2> = (0..6)
        .flat_map(|i| (0..6).map(move |j| vector![i as f64, j as f64]))
        .collect();
    let mesh = Mesh::delaunay(&grid, GeomCfg::default()).unwrap();
    mesh.check_invariants().unwrap();
    assert_eq!(mesh.vertex_count(), 39);
    assert_eq!(mesh.triangle_count(), 73);
    assert_delaunay(&mesh);
}

#[test]
fn collinear_run_is_handled() {
    let mut pts: Vec<Point2> = (0..8).map(|i| vector![i as f64, 0.0]).collect();
    pts.push(vector![3.5, 2.0]);
    let mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    mesh.check_invariants().unwrap();
    assert_delaunay(&mesh);
    for p in &pts {
        assert!(mesh.vertex_at(*p).is_some());
    }
}

#[test]
fn duplicate_insert_is_noop() {
    let pts = [vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]];
    let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    let before = (mesh.vertex_count(), mesh.segment_count(), mesh.triangle_count());
    let k = mesh.vertex_at(pts[1]).unwrap();
    assert_eq!(mesh.insert(pts[1]).unwrap(), k);
    // Negative zero maps onto the same coordinate.
    assert_eq!(mesh.insert(vector![-0.0, 0.0]).unwrap(), mesh.vertex_at(pts[0]).unwrap());
    assert_eq!(
        before,
        (mesh.vertex_count(), mesh.segment_count(), mesh.triangle_count())
    );
}

#[test]
fn outside_scaffold_is_degenerate() {
    let pts = [vector![0.0, 0.0], vector![1.0, 1.0]];
    let mut mesh = Mesh::scaffold(&pts, GeomCfg::default()).unwrap();
    let err = mesh.insert(vector![100.0, 100.0]).unwrap_err();
    assert!(matches!(err, MeshError::DegenerateInput { .. }));
}

#[test]
fn removing_triangles_collects_segments_and_vertices() {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    let keys: Vec<TriangleKey> = mesh.triangles().map(|(k, _)| k).collect();
    let first = keys[0];
    assert!(mesh.remove_triangle(first));
    assert!(!mesh.remove_triangle(first));
    mesh.check_invariants().unwrap();
    for k in keys.into_iter().skip(1) {
        mesh.remove_triangle(k);
    }
    assert_eq!(mesh.triangle_count(), 0);
    assert_eq!(mesh.segment_count(), 0);
    assert_eq!(mesh.vertex_count(), 0);
    assert!(mesh.vertex_at(pts[0]).is_none());
}

#[test]
fn shared_segment_refcounts() {
    let pts = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    for (sk, seg) in mesh.segments() {
        assert!(seg.refs() == 1 || seg.refs() == 2);
        assert_eq!(mesh.triangles_on(sk).len(), seg.refs());
        let s = mesh.seg2(sk).unwrap();
        assert!((s.length() - seg.length).abs() < 1e-12);
    }
    for (vk, v) in mesh.vertices() {
        let used = mesh.segments().filter(|(_, s)| s.has_vertex(vk)).count();
        assert_eq!(v.refs(), used);
    }
}

#[test]
fn add_triangle_orders_ccw_and_rejects_collinear() {
    let pts = [vector![0.0, 0.0], vector![4.0, 4.0]];
    let mut mesh = Mesh::scaffold(&pts, GeomCfg::default()).unwrap();
    let a = mesh.insert(vector![0.0, 0.0]).unwrap();
    let b = mesh.insert(vector![4.0, 0.0]).unwrap();
    let c = mesh.insert(vector![2.0, 0.0]).unwrap();
    let err = mesh.add_triangle(a, b, c).unwrap_err();
    assert!(matches!(err, MeshError::DegenerateInput { .. }));

    let d = mesh.insert(vector![0.0, 4.0]).unwrap();
    let t = mesh.add_triangle(a, d, b).unwrap();
    let tri = mesh.tri2(t).unwrap();
    assert!(tri.signed_area() > 0.0);
    let stored = mesh.triangle(t).unwrap();
    assert_eq!(stored.verts[0], a);
    assert!(stored.has_vertex(d));
    assert_eq!(stored.opposite(a, b), Some(d));
}

#[test]
fn midpoint_rounded_off_its_edge_is_located() {
    let (a, b) = (vector![0.55, -0.22], vector![-0.09, -0.64]);
    let pts = [a, b, vector![0.65, -1.07], vector![-0.19, 0.21]];
    let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    let (ka, kb) = (mesh.vertex_at(a).unwrap(), mesh.vertex_at(b).unwrap());
    assert!(mesh.segment_between(ka, kb).is_some());

    // The rounded midpoint falls a hair outside both triangles on `ab`.
    let m = midpoint(a, b);
    assert!(orient2d(a, b, m) < 0.0 && orient2d(b, a, m) < 0.0);

    let before = mesh.triangle_count();
    mesh.insert(m).unwrap();
    mesh.check_invariants().unwrap();
    assert_eq!(mesh.triangle_count(), before + 2);
    assert!(mesh.segment_between(ka, kb).is_none());
    assert_delaunay(&mesh);
}

#[test]
fn legalization_flips_until_delaunay_or_fails() {
    let pts = [
        vector![0.0, 0.0],
        vector![4.0, 0.0],
        vector![2.0, 3.0],
        vector![2.0, -0.5],
    ];
    let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    let k: Vec<VertexKey> = pts.iter().map(|&p| mesh.vertex_at(p).unwrap()).collect();
    let diagonal = mesh.segment_between(k[2], k[3]).unwrap();
    for t in mesh.triangles_on(diagonal).to_vec() {
        mesh.remove_triangle(t);
    }
    // Swap in the diagonal whose circumcircles hold the far apex.
    mesh.add_triangle(k[0], k[1], k[2]).unwrap();
    mesh.add_triangle(k[0], k[3], k[1]).unwrap();
    mesh.check_invariants().unwrap();
    let wrong = mesh.segment_between(k[0], k[1]).unwrap();

    let err = mesh.legalize_within(vec![wrong], 0).unwrap_err();
    assert!(matches!(err, MeshError::InvariantViolation { .. }));

    mesh.legalize(vec![wrong]).unwrap();
    mesh.check_invariants().unwrap();
    assert!(mesh.segment_between(k[0], k[1]).is_none());
    assert!(mesh.segment_between(k[2], k[3]).is_some());
    assert_delaunay(&mesh);
}

#[test]
fn failed_insert_leaves_mesh_untouched() {
    let pts = [vector![0.0, 0.0], vector![1.0, 0.0], vector![0.5, 1.0]];
    let mut mesh = Mesh::delaunay(&pts, GeomCfg::default()).unwrap();
    let counts = (mesh.vertex_count(), mesh.segment_count(), mesh.triangle_count());
    let [s0, s1, _] = mesh.scaffold_vertices();
    let on_hull = midpoint(mesh.position(s0).unwrap(), mesh.position(s1).unwrap());
    for p in [on_hull, vector![1e6, 1e6]] {
        let err = mesh.insert(p).unwrap_err();
        assert!(matches!(err, MeshError::DegenerateInput { .. }));
        assert!(mesh.vertex_at(p).is_none());
        assert_eq!(
            counts,
            (mesh.vertex_count(), mesh.segment_count(), mesh.triangle_count())
        );
        mesh.check_invariants().unwrap();
    }
}
