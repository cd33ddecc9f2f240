use super::ring::invert_chain;
use super::*;
use crate::geom2::rand::{draw_scribble, draw_star_polygon, RadialCfg, ReplayToken, VertexCount};
use nalgebra::vector;

fn has_proper_crossing(pts: &[Point2]) -> bool {
    let eps = GeomCfg::default().eps_det;
    let n = pts.len();
    for i in 0..n {
        for j in 0..n {
            let adjacent = j == i || j == (i + 1) % n || i == (j + 1) % n;
            if adjacent {
                continue;
            }
            if segments_cross(pts[i], pts[(i + 1) % n], pts[j], pts[(j + 1) % n], eps) {
                return true;
            }
        }
    }
    false
}

/// Distinct input points, at least three, with no proper edge crossing.
fn assert_simple_subset(out: &[Point2], input: &[Point2]) {
    assert!(out.len() >= 3 && out.len() <= input.len());
    for (i, p) in out.iter().enumerate() {
        assert!(input.contains(p), "{p:?} is not an input point");
        assert!(!out[i + 1..].contains(p), "{p:?} repeats");
    }
    assert!(!has_proper_crossing(out));
}

fn bowtie() -> Vec<Point2> {
    vec![
        vector![0.0, 0.0],
        vector![1.0, 1.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
    ]
}

#[test]
fn simple_polygon_is_unchanged() {
    let cfg = GeomCfg::default();
    let square = vec![
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let out = resolve_points(&square, &cfg).unwrap();
    assert_eq!(out, square);

    let star_cfg = RadialCfg {
        vertex_count: VertexCount::Uniform { min: 5, max: 20 },
        ..RadialCfg::default()
    };
    for index in 0..10 {
        let pts = draw_star_polygon(star_cfg, ReplayToken { seed: 11, index });
        assert_eq!(resolve_points(&pts, &cfg).unwrap(), pts);
    }
}

#[test]
fn closing_and_repeated_points_are_dropped() {
    let cfg = GeomCfg::default();
    let pts = vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 2.0],
        vector![0.0, 0.0],
    ];
    let poly = resolve_contour(&pts, &cfg).unwrap();
    assert_eq!(poly.vertices().len(), 3);
}

#[test]
fn bowtie_resolves_to_simple_quad() {
    let cfg = GeomCfg::default();
    let input = bowtie();
    let out = resolve_points(&input, &cfg).unwrap();
    assert_eq!(
        out,
        vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ]
    );
    assert!(!has_proper_crossing(&out));
    assert!(out.iter().all(|p| input.contains(p)));
}

#[test]
fn splice_reverses_inner_chain() {
    let mut ring = Ring::from_points(&bowtie());
    splice(&mut ring, 0, 1, 2, 3).unwrap();
    let lap = ring.points_from(0);
    assert_eq!(
        lap,
        vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
        ]
    );
    for i in 0..ring.len() {
        assert_eq!(ring.prev(ring.next(i)), i);
    }
}

#[test]
fn invert_chain_is_bounded() {
    let mut ring = Ring::from_points(&bowtie());
    // Reverse the whole lap except node 0.
    let n = invert_chain(&mut ring, 1, 0);
    assert!(n.is_ok());
    // A stop node outside the ring is never reached.
    let mut ring = Ring::from_points(&bowtie());
    let err = invert_chain(&mut ring, 0, 99).unwrap_err();
    assert!(matches!(err, MeshError::InvariantViolation { .. }));
}

#[test]
fn edges_crossing_several_others_are_split() {
    let cfg = GeomCfg::default();
    // Long base edge crossed by a three-stroke zigzag.
    let pts = vec![
        vector![0.0, 0.0],
        vector![10.0, 0.0],
        vector![8.3, 1.0],
        vector![6.1, -1.3],
        vector![3.7, 1.1],
        vector![1.9, -0.9],
    ];
    let mut ring = Ring::from_points(&pts);
    let splits = split_crossing_edges(&mut ring, &cfg);
    assert!(splits > 0);
    assert_eq!(ring.len(), pts.len() + splits);
    assert_eq!(ring.points_from(0).len(), ring.len());

    let out = resolve_points(&pts, &cfg).unwrap();
    assert_eq!(
        out,
        vec![
            vector![0.0, 0.0],
            vector![3.7, 1.1],
            vector![8.3, 1.0],
            vector![10.0, 0.0],
            vector![6.1, -1.3],
            vector![1.9, -0.9],
        ]
    );
    assert_simple_subset(&out, &pts);
}

#[test]
fn crowding_count_skips_the_edge_before_prev() {
    // Pentagram: edge 0 crosses edges 2 and 3; edge 3 ends at prev(0) = 4.
    let pts: Vec<Point2> = (0..5)
        .map(|k| {
            let t = std::f64::consts::TAU * (2 * k) as f64 / 5.0;
            vector![t.cos(), t.sin()]
        })
        .collect();
    let ring = Ring::from_points(&pts);
    assert!(segments_intersect(pts[0], pts[1], pts[3], pts[4]));
    assert_eq!(count_crossings(&ring, 0, 2), 1);
}

#[test]
fn pentagram_resolves_to_its_pentagon() {
    let cfg = GeomCfg::default();
    let pts: Vec<Point2> = (0..5)
        .map(|k| {
            let t = std::f64::consts::TAU * (2 * k) as f64 / 5.0;
            vector![t.cos(), t.sin()]
        })
        .collect();
    let out = resolve_points(&pts, &cfg).unwrap();
    assert_eq!(out.len(), 5);
    assert_simple_subset(&out, &pts);
}

#[test]
fn scribbles_resolve_to_simple_polygons() {
    let cfg = GeomCfg::default();
    for index in 0..30 {
        let pts = draw_scribble(12, 5.0, ReplayToken { seed: 5, index });
        let out = resolve_points(&pts, &cfg).unwrap();
        assert_simple_subset(&out, &pts);
    }
    for n in [5, 8, 16, 24] {
        for index in 0..40 {
            let pts = draw_scribble(n, 3.0, ReplayToken { seed: 15, index });
            let out = resolve_points(&pts, &cfg).unwrap();
            assert_simple_subset(&out, &pts);
        }
    }
}

#[test]
fn five_point_scribble_keeps_each_vertex_once() {
    let cfg = GeomCfg::default();
    let pts = draw_scribble(5, 3.0, ReplayToken { seed: 15, index: 2 });
    let out = resolve_points(&pts, &cfg).unwrap();
    assert_simple_subset(&out, &pts);
    let poly = resolve_contour(&pts, &cfg).unwrap();
    assert!(poly.area() > 0.0);
}

#[test]
fn untangle_removes_a_crossing_left_by_the_walk() {
    let cfg = GeomCfg::default();
    let (out, moves) = untangle(&bowtie(), &cfg).unwrap();
    assert_eq!(moves, 1);
    assert!(!has_proper_crossing(&out));
    let square = [
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let (same, moves) = untangle(&square, &cfg).unwrap();
    assert_eq!(moves, 0);
    assert_eq!(same, square.to_vec());
}

#[test]
fn too_few_points_is_degenerate() {
    let cfg = GeomCfg::default();
    let err = resolve_contour(&[vector![0.0, 0.0], vector![1.0, 0.0]], &cfg).unwrap_err();
    assert!(matches!(err, MeshError::DegenerateInput { .. }));
    let err = resolve_contour(
        &[vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 0.0]],
        &cfg,
    )
    .unwrap_err();
    assert!(matches!(err, MeshError::DegenerateInput { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn thin_drops_close_points() {
    let pts = vec![
        vector![0.0, 0.0],
        vector![0.05, 0.0],
        vector![1.0, 0.0],
        vector![1.0, 1.0],
        vector![0.02, 0.01],
    ];
    let out = thin(&pts, 0.1);
    assert_eq!(
        out,
        vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 1.0]]
    );
    assert!(thin(&[], 0.1).is_empty());

    // A wide closing gap stays a single edge.
    let open = vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![1.0, 5.0]];
    assert_eq!(thin(&open, 0.1), open);
}
