//! Logging configuration loaded from data/config/telemetry.toml with env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryCfg {
    /// env_logger filter string, e.g. `info,asset_runtime=debug`.
    pub log_level: String,
    pub timestamps: bool,
}

impl Default for TelemetryCfg {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            timestamps: true,
        }
    }
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

pub fn load_default() -> Result<TelemetryCfg> {
    let path = data_root().join("config/telemetry.toml");
    let mut cfg = if path.is_file() {
        let txt = std::fs::read_to_string(&path)
            .with_context(|| format!("read {}", path.display()))?;
        toml::from_str::<TelemetryCfg>(&txt).context("parse telemetry TOML")?
    } else {
        TelemetryCfg::default()
    };
    if let Ok(lvl) = std::env::var("LOG_LEVEL") {
        cfg.log_level = lvl;
    }
    if let Some(ts) = std::env::var("LOG_TIMESTAMPS").ok().and_then(|v| v.parse().ok()) {
        cfg.timestamps = ts;
    }
    Ok(cfg)
}
