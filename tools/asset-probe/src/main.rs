//! asset-probe: run the content pipeline against an asset directory and
//! print what it produced as JSON.
//!
//! Usage:
//!   cargo run -p asset-probe -- load character knight robot scout
//!   cargo run -p asset-probe -- --root ./assets navmesh scenes/city.glb --from 0,0,0 --to 40,0,12
//!   cargo run -p asset-probe -- clips

use std::path::PathBuf;
use std::sync::Arc;

use anim_runtime::AnimationLibrary;
use anyhow::{Context, Result, bail};
use asset_runtime::{AssetLoader, AssetOrigin, LoaderStats};
use clap::{Parser, Subcommand};
use data_runtime::configs::pipeline::{self, PipelineCfg};
use glam::Vec3;
use nav_core::{NavMeshBuilder, SurfaceCandidate};
use serde::Serialize;

#[derive(Parser)]
#[command(author, version, about = "Probe assets, navmesh and clips", long_about = None)]
struct Cli {
    /// Pipeline config (defaults to data/config/pipeline.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Asset root, overriding the config
    #[arg(long)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load assets given as CATEGORY VARIANT pairs
    Load { pairs: Vec<String> },
    /// Classify a scene file and build its navmesh
    Navmesh {
        scene: String,
        /// Path start as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        from: Option<Vec3>,
        /// Path end as x,y,z
        #[arg(long, value_parser = parse_vec3)]
        to: Option<Vec3>,
    },
    /// Load the animation library
    Clips,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("{p}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected x,y,z, got '{s}'")),
    }
}

#[derive(Serialize)]
struct AssetReport {
    category: String,
    variant: String,
    origin: AssetOrigin,
    nodes: usize,
    meshes: usize,
    triangles: usize,
    clips: Vec<String>,
    skinned: bool,
}

#[derive(Serialize)]
struct LoadReport {
    assets: Vec<AssetReport>,
    stats: LoaderStats,
}

#[derive(Serialize)]
struct CandidateReport {
    name: String,
    score: f32,
    color: f32,
    flatness: f32,
    height: f32,
    name_match: f32,
}

impl From<&SurfaceCandidate> for CandidateReport {
    fn from(c: &SurfaceCandidate) -> Self {
        Self {
            name: c.name.clone(),
            score: c.score,
            color: c.breakdown.color,
            flatness: c.breakdown.flatness,
            height: c.breakdown.height,
            name_match: c.breakdown.name,
        }
    }
}

#[derive(Serialize)]
struct NavReport {
    zone_id: String,
    fallback: bool,
    triangles: usize,
    vertices: usize,
    groups: usize,
    bounds_min: [f32; 3],
    bounds_max: [f32; 3],
    surfaces: Vec<CandidateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<Vec<[f32; 3]>>,
}

#[derive(Serialize)]
struct ClipReport {
    name: String,
    duration: f32,
    tracks: usize,
}

fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();
    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(p) => pipeline::load_from(p).with_context(|| format!("load {}", p.display()))?,
        None => pipeline::load_default().context("load pipeline config")?,
    };
    if let Some(root) = cli.root {
        cfg.assets.root = root;
    }
    let loader = AssetLoader::from_cfg(&cfg.assets);
    let json = match cli.cmd {
        Cmd::Load { pairs } => serde_json::to_string_pretty(&load(&loader, &pairs)?)?,
        Cmd::Navmesh { scene, from, to } => {
            serde_json::to_string_pretty(&navmesh(&cfg, &loader, &scene, from.zip(to))?)?
        }
        Cmd::Clips => serde_json::to_string_pretty(&clips(&cfg, &loader))?,
    };
    println!("{json}");
    Ok(())
}

fn load(loader: &AssetLoader, pairs: &[String]) -> Result<LoadReport> {
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        bail!("expected CATEGORY VARIANT pairs, got {} arguments", pairs.len());
    }
    let mut assets = Vec::new();
    for pair in pairs.chunks(2) {
        let (category, variant) = (&pair[0], &pair[1]);
        let asset = pollster::block_on(loader.load_named(category, variant));
        assets.push(AssetReport {
            category: category.clone(),
            variant: variant.clone(),
            origin: asset.origin,
            nodes: asset.root.node_count(),
            meshes: asset.root.mesh_count(),
            triangles: asset.root.triangle_count(),
            clips: asset.clips.iter().map(|c| c.name.clone()).collect(),
            skinned: asset.skeleton.is_some(),
        });
    }
    Ok(LoadReport {
        assets,
        stats: loader.stats(),
    })
}

fn navmesh(
    cfg: &PipelineCfg,
    loader: &AssetLoader,
    scene: &str,
    route: Option<(Vec3, Vec3)>,
) -> Result<NavReport> {
    let bytes = pollster::block_on(loader.source().fetch(scene))
        .with_context(|| format!("fetch scene {scene}"))?;
    let decoded = loader
        .decoder()
        .decode(scene, &bytes)
        .with_context(|| format!("decode scene {scene}"))?;
    let builder = NavMeshBuilder::from_cfg(cfg);
    let candidates = builder.classifier().classify(&decoded.root);
    let nav = builder.build_from_candidates(&candidates);
    let bounds = nav.bounds();
    Ok(NavReport {
        zone_id: nav.zone_id().to_string(),
        fallback: nav.is_fallback(),
        triangles: nav.triangle_count(),
        vertices: nav.vertex_count(),
        groups: nav.group_count(),
        bounds_min: bounds.min.to_array(),
        bounds_max: bounds.max.to_array(),
        surfaces: candidates.iter().map(CandidateReport::from).collect(),
        path: route.map(|(a, b)| nav.find_path(a, b).iter().map(|p| p.to_array()).collect()),
    })
}

fn clips(cfg: &PipelineCfg, loader: &AssetLoader) -> Vec<ClipReport> {
    let library = AnimationLibrary::new(
        Arc::clone(loader.source()),
        Arc::clone(loader.decoder()),
        cfg.animations.clips.clone(),
    );
    let map = pollster::block_on(library.load_all());
    map.values()
        .map(|c| ClipReport {
            name: c.name.clone(),
            duration: c.duration,
            tracks: c.tracks.len(),
        })
        .collect()
}
