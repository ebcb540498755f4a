//! Content pipeline configuration loaded from data/config/pipeline.toml with env overrides.
//!
//! Every section has defaults, so a missing file or a partial file is fine.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Logical clip names the animation library always tries to load.
pub const DEFAULT_CLIPS: [&str; 11] = [
    "idle", "walk", "run", "jump", "attack", "defend", "victory", "defeat", "wave", "dance",
    "cheer",
];

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PipelineCfg {
    pub assets: AssetsCfg,
    pub classifier: ClassifierCfg,
    pub navmesh: NavMeshCfg,
    pub animations: AnimationsCfg,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsCfg {
    /// Directory that holds `models/` and `animations/`.
    pub root: PathBuf,
    /// File extension of authored models.
    pub extension: String,
    /// Sources smaller than this are treated as placeholders.
    pub min_bytes: u64,
}

impl Default for AssetsCfg {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            extension: "glb".to_string(),
            min_bytes: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeightsCfg {
    pub color: f32,
    pub flatness: f32,
    pub height: f32,
    pub name: f32,
}

impl Default for WeightsCfg {
    fn default() -> Self {
        Self {
            color: 0.4,
            flatness: 0.3,
            height: 0.2,
            name: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierCfg {
    pub weights: WeightsCfg,
    /// Candidates must score strictly above this.
    pub threshold: f32,
    /// Mean RGB below this counts as near-black.
    pub near_black: f32,
    /// Mean RGB below this counts as dark gray.
    pub dark_gray: f32,
    /// Minimum `dot(normal, up)` for a normal to count as upward.
    pub normal_alignment: f32,
    pub flat_strict: f32,
    pub flat_loose: f32,
    pub ground_level: f32,
    pub ground_tolerance: f32,
    pub keywords: Vec<String>,
}

impl Default for ClassifierCfg {
    fn default() -> Self {
        Self {
            weights: WeightsCfg::default(),
            threshold: 0.5,
            near_black: 0.15,
            dark_gray: 0.35,
            normal_alignment: 0.95,
            flat_strict: 0.9,
            flat_loose: 0.7,
            ground_level: 0.0,
            ground_tolerance: 0.5,
            keywords: [
                "road", "street", "path", "lane", "avenue", "asphalt", "pavement",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NavMeshCfg {
    pub zone_id: String,
    /// Half-extent (meters) of the flat fallback plane.
    pub fallback_extent: f32,
    pub fallback_cells: u32,
    /// Path endpoints farther than this from the mesh are unreachable.
    pub snap_distance: f32,
    /// Vertices closer than this are merged when building the zone.
    pub weld_epsilon: f32,
}

impl Default for NavMeshCfg {
    fn default() -> Self {
        Self {
            zone_id: "city".to_string(),
            fallback_extent: 500.0,
            fallback_cells: 16,
            snap_distance: 5.0,
            weld_epsilon: 1e-3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationsCfg {
    /// Logical clip name -> source path relative to the asset root.
    pub clips: BTreeMap<String, String>,
}

impl Default for AnimationsCfg {
    fn default() -> Self {
        Self {
            clips: DEFAULT_CLIPS
                .iter()
                .map(|n| (n.to_string(), format!("animations/{n}.glb")))
                .collect(),
        }
    }
}

impl PipelineCfg {
    /// Reject values that would make downstream components meaningless.
    /// TOML accepts `nan` and `inf`, so every float is checked for finiteness.
    pub fn validate(&self) -> Result<()> {
        let c = &self.classifier;
        let w = c.weights;
        if [w.color, w.flatness, w.height, w.name]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            bail!("classifier weights must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&c.threshold) {
            bail!("classifier threshold {} outside [0, 1]", c.threshold);
        }
        for (name, v) in [
            ("near_black", c.near_black),
            ("dark_gray", c.dark_gray),
            ("normal_alignment", c.normal_alignment),
            ("flat_strict", c.flat_strict),
            ("flat_loose", c.flat_loose),
            ("ground_level", c.ground_level),
        ] {
            if !v.is_finite() {
                bail!("classifier {name} must be finite, got {v}");
            }
        }
        non_negative("classifier ground_tolerance", c.ground_tolerance)?;

        let n = &self.navmesh;
        positive("navmesh fallback_extent", n.fallback_extent)?;
        if !(1..=MAX_FALLBACK_CELLS).contains(&n.fallback_cells) {
            bail!(
                "navmesh fallback_cells {} outside [1, {MAX_FALLBACK_CELLS}]",
                n.fallback_cells
            );
        }
        non_negative("navmesh snap_distance", n.snap_distance)?;
        positive("navmesh weld_epsilon", n.weld_epsilon)?;
        if n.zone_id.trim().is_empty() {
            bail!("navmesh zone_id must not be empty");
        }
        Ok(())
    }
}

/// Upper bound on fallback grid resolution per axis.
pub const MAX_FALLBACK_CELLS: u32 = 1024;

fn positive(name: &str, v: f32) -> Result<()> {
    if !(v.is_finite() && v > 0.0) {
        bail!("{name} must be finite and positive, got {v}");
    }
    Ok(())
}

fn non_negative(name: &str, v: f32) -> Result<()> {
    if !(v.is_finite() && v >= 0.0) {
        bail!("{name} must be finite and non-negative, got {v}");
    }
    Ok(())
}

fn data_root() -> PathBuf {
    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

/// Parse a TOML document (no env overrides).
pub fn load_from_str(txt: &str) -> Result<PipelineCfg> {
    let cfg = toml::from_str::<PipelineCfg>(txt).context("parse pipeline TOML")?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load from `path` if it exists (defaults otherwise), then apply env overrides.
pub fn load_from(path: &Path) -> Result<PipelineCfg> {
    let mut cfg = if path.is_file() {
        let txt =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<PipelineCfg>(&txt).context("parse pipeline TOML")?
    } else {
        PipelineCfg::default()
    };
    apply_env_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_default() -> Result<PipelineCfg> {
    load_from(&data_root().join("config/pipeline.toml"))
}

fn apply_env_overrides(cfg: &mut PipelineCfg) {
    if let Ok(v) = std::env::var("ASSET_ROOT") {
        cfg.assets.root = PathBuf::from(v);
    }
    if let Some(v) = std::env::var("ASSET_MIN_BYTES").ok().and_then(|v| v.parse().ok()) {
        cfg.assets.min_bytes = v;
    }
    if let Ok(v) = std::env::var("ASSET_EXT") {
        cfg.assets.extension = v.trim_start_matches('.').to_string();
    }
    if let Ok(v) = std::env::var("NAV_ZONE_ID") {
        cfg.navmesh.zone_id = v;
    }
    if let Some(v) = std::env::var("NAV_FALLBACK_EXTENT").ok().and_then(|v| v.parse().ok()) {
        cfg.navmesh.fallback_extent = v;
    }
    if let Some(v) = std::env::var("NAV_SNAP_DISTANCE").ok().and_then(|v| v.parse().ok()) {
        cfg.navmesh.snap_distance = v;
    }
    if let Some(v) = std::env::var("CLASSIFIER_THRESHOLD").ok().and_then(|v| v.parse().ok()) {
        cfg.classifier.threshold = v;
    }
}
