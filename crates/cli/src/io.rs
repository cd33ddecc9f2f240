//! JSON input and output shapes for the CLI.

use anyhow::{bail, Context, Result};
use mesh2d::export::MeshBuffers;
use mesh2d::{Point2, Polygon, RefineStats, Triangulation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Read a JSON array of `[x, y]` pairs.
pub fn read_points(path: &Path) -> Result<Vec<Point2>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<[f64; 2]> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {} as [[x, y], ...]", path.display()))?;
    if let Some(bad) = raw.iter().position(|p| !(p[0].is_finite() && p[1].is_finite())) {
        bail!("point {bad} in {} is not finite", path.display());
    }
    Ok(raw.into_iter().map(|[x, y]| Point2::new(x, y)).collect())
}

/// Serialize `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PolygonDoc {
    pub vertices: Vec<[f64; 2]>,
    pub signed_area: f64,
}

impl From<&Polygon> for PolygonDoc {
    fn from(poly: &Polygon) -> Self {
        Self {
            vertices: poly.vertices().iter().map(|p| [p.x, p.y]).collect(),
            signed_area: poly.signed_area(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatsDoc {
    pub iterations: usize,
    pub segment_splits: usize,
    pub steiner_points: usize,
}

impl From<RefineStats> for StatsDoc {
    fn from(s: RefineStats) -> Self {
        Self {
            iterations: s.iterations,
            segment_splits: s.segment_splits,
            steiner_points: s.steiner_points,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MeshDoc {
    pub boundary: PolygonDoc,
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<[usize; 3]>,
    pub area: f64,
    pub stats: StatsDoc,
}

impl From<&Triangulation> for MeshDoc {
    fn from(tri: &Triangulation) -> Self {
        let MeshBuffers { positions, indices } = tri.build();
        Self {
            boundary: PolygonDoc::from(tri.polygon()),
            positions: positions.iter().map(|p| [p.x, p.y, p.z]).collect(),
            indices,
            area: tri.area(),
            stats: tri.stats().into(),
        }
    }
}
