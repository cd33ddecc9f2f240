use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use mesh2d::contour::thin;
use mesh2d::{GeomCfg, Point2, RefineCfg};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use io::{MeshDoc, PolygonDoc};
use provenance::Payload;

#[derive(Parser)]
#[command(name = "mesh2d-cli")]
#[command(about = "Resolve closed point loops into polygons and quality meshes")]
struct Cmd {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Resolve a closed point loop into a simple polygon
    Resolve {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Drop points closer than this to the previous kept point
        #[arg(long)]
        thin: Option<f64>,
        /// On-segment tolerance
        #[arg(long, default_value_t = GeomCfg::default().eps_on)]
        eps_on: f64,
    },
    /// Resolve, triangulate and refine; writes positions + CCW index triples
    Mesh {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Minimum angle in degrees (clamped to [0, 30])
        #[arg(long, default_value_t = RefineCfg::default().min_angle_deg)]
        angle: f64,
        /// Feature size below which segments and triangles are left alone
        #[arg(long, default_value_t = RefineCfg::default().threshold)]
        threshold: f64,
        #[arg(long, default_value_t = RefineCfg::default().max_iterations)]
        max_iterations: usize,
        #[arg(long)]
        thin: Option<f64>,
        #[arg(long, default_value_t = GeomCfg::default().eps_on)]
        eps_on: f64,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Resolve {
            input,
            out,
            thin,
            eps_on,
        } => resolve(&input, &out, thin, geom_cfg(eps_on)),
        Action::Mesh {
            input,
            out,
            angle,
            threshold,
            max_iterations,
            thin,
            eps_on,
        } => {
            let cfg = RefineCfg {
                min_angle_deg: angle,
                threshold,
                max_iterations,
            };
            mesh(&input, &out, thin, cfg, geom_cfg(eps_on))
        }
        Action::Report => {
            println!("{}", serde_json::to_string_pretty(&provenance::report_doc())?);
            Ok(())
        }
    }
}

fn geom_cfg(eps_on: f64) -> GeomCfg {
    GeomCfg {
        eps_on,
        ..GeomCfg::default()
    }
}

fn load(input: &Path, spacing: Option<f64>) -> Result<Vec<Point2>> {
    let raw = io::read_points(input)?;
    let points = match spacing {
        Some(d) => thin(&raw, d),
        None => raw,
    };
    tracing::info!(input = %input.display(), points = points.len(), "loaded points");
    Ok(points)
}

fn resolve(input: &Path, out: &Path, spacing: Option<f64>, geom: GeomCfg) -> Result<()> {
    let points = load(input, spacing)?;
    let poly = mesh2d::resolve_contour(&points, &geom)
        .with_context(|| format!("resolving contour from {}", input.display()))?;
    io::write_json(out, &PolygonDoc::from(&poly))?;
    tracing::info!(out = %out.display(), vertices = poly.len(), "wrote polygon");

    let payload = Payload::new(
        "resolve",
        json!({
            "input": input.to_string_lossy(),
            "thin": spacing,
            "eps_on": geom.eps_on,
        }),
    )
    .with_summary(json!({
        "input_points": points.len(),
        "vertices": poly.len(),
        "signed_area": poly.signed_area(),
    }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn mesh(
    input: &Path,
    out: &Path,
    spacing: Option<f64>,
    cfg: RefineCfg,
    geom: GeomCfg,
) -> Result<()> {
    let points = load(input, spacing)?;
    let poly = mesh2d::resolve_contour(&points, &geom)
        .with_context(|| format!("resolving contour from {}", input.display()))?;
    let tri = mesh2d::triangulate(&poly, cfg, geom).context("triangulating resolved contour")?;
    let doc = MeshDoc::from(&tri);
    io::write_json(out, &doc)?;
    tracing::info!(
        out = %out.display(),
        triangles = doc.indices.len(),
        iterations = doc.stats.iterations,
        "wrote mesh"
    );

    let payload = Payload::new(
        "mesh",
        json!({
            "input": input.to_string_lossy(),
            "thin": spacing,
            "min_angle_deg": cfg.min_angle_deg,
            "threshold": cfg.threshold,
            "max_iterations": cfg.max_iterations,
            "eps_on": geom.eps_on,
        }),
    )
    .with_summary(json!({
        "boundary_vertices": poly.len(),
        "triangles": doc.indices.len(),
        "area": doc.area,
        "stats": doc.stats,
    }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}
