use std::sync::Arc;

use anim_runtime::{ActorId, AnimationLibrary, Phase};
use asset_runtime::{AssetCategory, AssetLoader, AssetValidator, GltfDecoder, MemoryAssetSource};
use cityforge::{ActorSpec, ClientPipeline};
use futures::executor::block_on;
use glam::Vec3;
use nav_core::NavMeshBuilder;
use scene_core::{AnimationClip, Material, MeshInstance, Node, Track, TrackValues, Transform, shapes};

fn hold(name: &str, hips: Vec3) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track::new(
            "Hips",
            vec![0.0, 1.0],
            TrackValues::Translation(vec![hips, hips]),
        )],
    )
}

fn pipeline() -> ClientPipeline {
    let loader = AssetLoader::new(
        Arc::new(MemoryAssetSource::new()),
        Arc::new(GltfDecoder),
        AssetValidator::new(1024),
        "glb",
    );
    let library = AnimationLibrary::from_clips([
        hold("idle", Vec3::new(0.0, 1.25, 0.0)),
        hold("walk", Vec3::new(0.0, 1.0, 0.0)),
    ]);
    ClientPipeline::new(loader, NavMeshBuilder::default(), Arc::new(library))
}

/// A dark 20 m square street and a light tower block beside it.
fn city() -> Node {
    let road = Node::new("main_street").with_mesh(MeshInstance::new(
        shapes::grid_plane(10.0, 4),
        Material::rgb("asphalt", 0.08, 0.08, 0.08),
    ));
    let tower = Node::new("tower_block")
        .with_transform(Transform::from_xyz(20.0, 5.0, 0.0))
        .with_mesh(MeshInstance::new(
            shapes::cuboid(Vec3::new(4.0, 10.0, 4.0)),
            Material::rgb("concrete", 0.8, 0.8, 0.78),
        ));
    Node::new("city").with_child(road).with_child(tower)
}

fn roster() -> Vec<ActorSpec> {
    vec![
        ActorSpec::new(1, AssetCategory::Character, "knight", Vec3::new(3.0, 4.0, 2.0)),
        ActorSpec::new(2, AssetCategory::Robot, "scout", Vec3::new(30.0, 0.0, 0.0))
            .with_clip("dance"),
    ]
}

#[test]
fn setup_spawns_stand_ins_onto_the_street() {
    let mut client = pipeline();
    let city = city();
    let report = block_on(client.setup(Some(&city), &roster()));

    assert_eq!(report.actors, 2);
    assert_eq!(report.procedural, 2);
    assert_eq!(report.clips, 2);
    assert_eq!(report.animated, 1);
    assert!(!report.nav_fallback);
    assert_eq!(report.nav_triangles, 32);
    assert_eq!(report.nav_groups, 1);

    // Over the street: dropped vertically onto it.
    let knight = client.actor(ActorId(1)).expect("knight");
    assert!((knight.position - Vec3::new(3.0, 0.0, 2.0)).length() < 1e-4);
    assert_eq!(knight.model.root.transform.translation, knight.position);
    // Off the street: pulled to its edge.
    let scout = client.actor(ActorId(2)).expect("scout");
    assert!((scout.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
    assert_eq!(client.animator().phase(ActorId(2)), Phase::Unbound);
}

#[test]
fn no_city_walks_on_the_fallback_plane() {
    let mut client = pipeline();
    let report = block_on(client.setup(None, &roster()));
    assert!(report.nav_fallback);
    let nav = client.navmesh();
    assert!(nav.is_on_mesh(Vec3::ZERO, 0.1));
    let scout = client.actor(ActorId(2)).expect("scout");
    assert!((scout.position - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-4);
}

#[test]
fn tick_poses_named_parts() {
    let mut client = pipeline();
    block_on(client.setup(None, &roster()));
    client.tick(0.1);
    let hips = client
        .actor(ActorId(1))
        .and_then(|a| a.model.root.find("hips"))
        .expect("stand-in has hips");
    assert!((hips.transform.translation - Vec3::new(0.0, 1.25, 0.0)).length() < 1e-5);
}

#[test]
fn paths_start_at_the_actor_and_stay_on_the_street() {
    let mut client = pipeline();
    let city = city();
    block_on(client.setup(Some(&city), &roster()));
    let target = Vec3::new(-8.0, 0.0, -8.0);
    let path = client.path_for(ActorId(1), target).expect("actor exists");
    assert_eq!(path.first().copied(), Some(Vec3::new(3.0, 0.0, 2.0)));
    assert_eq!(path.last().copied(), Some(target));
    let nav = client.navmesh();
    assert!(path.iter().all(|p| nav.is_on_mesh(*p, 0.01)));
    assert!(client.path_for(ActorId(42), target).is_none());

    let moved = client
        .move_actor(ActorId(1), Vec3::new(50.0, 0.0, 1.0))
        .expect("moved");
    assert!((moved - Vec3::new(10.0, 0.0, 1.0)).length() < 1e-3);
}

#[test]
fn despawn_and_teardown_release_state() {
    let mut client = pipeline();
    block_on(client.setup(None, &roster()));
    assert!(client.despawn(ActorId(1)));
    assert!(!client.despawn(ActorId(1)));
    assert_eq!(client.animator().phase(ActorId(1)), Phase::Unbound);
    assert_eq!(client.actor_count(), 1);

    client.teardown();
    assert_eq!(client.actor_count(), 0);
    assert_eq!(client.animator().actor_count(), 0);
    assert!(!client.library().is_loaded());
    assert_eq!(client.loader().cached_count(), 0);
}
