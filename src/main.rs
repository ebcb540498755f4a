use std::path::PathBuf;

use anyhow::{Context, Result};
use asset_runtime::AssetCategory;
use cityforge::{ActorSpec, ClientPipeline, telemetry};
use data_runtime::configs::{pipeline, telemetry as telemetry_cfg};
use glam::Vec3;

/// Usage: `cityforge [CONFIG_TOML] [CITY_SCENE]`. The city path is relative
/// to the configured asset root.
fn main() -> Result<()> {
    let tcfg = telemetry_cfg::load_default().unwrap_or_default();
    telemetry::init_logging(&tcfg);

    let mut args = std::env::args().skip(1);
    let cfg = match args.next() {
        Some(p) => pipeline::load_from(&PathBuf::from(&p))
            .with_context(|| format!("load pipeline config {p}"))?,
        None => pipeline::load_default().context("load pipeline config")?,
    };
    let city_path = args.next();

    let mut client = ClientPipeline::from_cfg(&cfg);
    let city = match &city_path {
        Some(p) => match pollster::block_on(client.load_scene(p)) {
            Ok(node) => Some(node),
            Err(e) => {
                log::warn!("city scene unavailable ({e}); walking on the fallback plane");
                None
            }
        },
        None => None,
    };

    let roster = [
        ActorSpec::new(1, AssetCategory::Character, "knight", Vec3::new(0.0, 0.0, 0.0)),
        ActorSpec::new(2, AssetCategory::Character, "heavy", Vec3::new(3.0, 0.0, 1.0))
            .with_clip("walk"),
        ActorSpec::new(3, AssetCategory::Robot, "scout", Vec3::new(-4.0, 0.0, 2.0)),
        ActorSpec::new(4, AssetCategory::Prop, "lamp", Vec3::new(6.0, 0.0, -2.0)),
    ];
    let report = pollster::block_on(client.setup(city.as_ref(), &roster));

    for _ in 0..60 {
        client.tick(1.0 / 60.0);
    }
    let stats = client.loader().stats();
    log::info!(
        "loader: {} authored, {} procedural, {} hits, {} coalesced",
        stats.authored,
        stats.procedural,
        stats.hits,
        stats.coalesced
    );
    println!("{report:#?}");
    Ok(())
}
