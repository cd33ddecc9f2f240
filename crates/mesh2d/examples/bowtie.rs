//! Resolve a few self-intersecting loops and print the refined mesh sizes.
//!
//! Usage:
//!   cargo run -p mesh2d --example bowtie
//!   cargo run -p mesh2d --example bowtie -- 25
//!
//! The optional argument is the minimum angle in degrees (default 20).

use mesh2d::prelude::*;
use nalgebra::vector;

fn main() {
    let angle = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(20.0);
    let cfg = RefineCfg {
        min_angle_deg: angle,
        ..RefineCfg::default()
    };

    let bowtie = vec![
        vector![0.0, 0.0],
        vector![2.0, 2.0],
        vector![2.0, 0.0],
        vector![0.0, 2.0],
    ];
    show("bowtie", &bowtie, cfg);

    for index in 0..3 {
        let pts = draw_scribble(10, 2.0, ReplayToken { seed: 2025, index });
        show(&format!("scribble {index}"), &pts, cfg);
    }
}

fn show(name: &str, points: &[Point2], cfg: RefineCfg) {
    let geom = GeomCfg::default();
    let poly = match resolve_contour(points, &geom) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{name}: {e}");
            return;
        }
    };
    match triangulate(&poly, cfg, geom) {
        Ok(tri) => {
            let s = tri.stats();
            println!(
                "{name}: boundary={} triangles={} area={:.4} iterations={} steiner={}",
                poly.len(),
                tri.triangles().len(),
                tri.area(),
                s.iterations,
                s.steiner_points
            );
        }
        Err(e) => eprintln!("{name}: {e}"),
    }
}
