use anim_runtime::ActorId;
use asset_runtime::AssetCategory;
use cityforge::{ActorSpec, ClientPipeline};
use data_runtime::configs::pipeline;
use futures::executor::block_on;
use glam::Vec3;
use serial_test::serial;

fn write_config(dir: &std::path::Path) -> std::path::PathBuf {
    let assets = dir.join("assets");
    std::fs::create_dir_all(assets.join("models/props")).expect("mkdir");
    // Below min_bytes: a placeholder, not a model.
    std::fs::write(assets.join("models/props/crate.glb"), [0u8; 10]).expect("write");
    let cfg = dir.join("pipeline.toml");
    std::fs::write(
        &cfg,
        format!(
            r#"
[assets]
root = '{}'

[navmesh]
zone_id = "harbor"
fallback_extent = 50.0
fallback_cells = 4

[animations.clips]
idle = "animations/idle.glb"
"#,
            assets.display()
        ),
    )
    .expect("write cfg");
    cfg
}

#[test]
#[serial]
fn pipeline_follows_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = pipeline::load_from(&write_config(tmp.path())).expect("config");
    assert_eq!(cfg.animations.clips.len(), 1);

    let mut client = ClientPipeline::from_cfg(&cfg);
    let roster = [ActorSpec::new(9, AssetCategory::Prop, "crate", Vec3::new(1.0, 0.0, 1.0))];
    let report = block_on(client.setup(None, &roster));

    assert_eq!(report.procedural, 1);
    assert_eq!(report.clips, 0);
    assert_eq!(report.animated, 0);
    assert!(report.nav_fallback);
    assert_eq!(report.nav_triangles, 32);
    assert_eq!(client.navmesh().zone_id(), "harbor");
    assert!(client.actor(ActorId(9)).is_some());
}

#[test]
#[serial]
fn asset_root_env_override_wins() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = write_config(tmp.path());
    unsafe { std::env::set_var("ASSET_ROOT", "/srv/city-assets") };
    let cfg = pipeline::load_from(&path);
    unsafe { std::env::remove_var("ASSET_ROOT") };
    let cfg = cfg.expect("config");
    assert_eq!(cfg.assets.root, std::path::PathBuf::from("/srv/city-assets"));
    assert_eq!(cfg.navmesh.zone_id, "harbor");
}
