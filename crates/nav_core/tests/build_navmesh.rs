use glam::Vec3;
use nav_core::{NavMeshBuilder, SurfaceClassifier};
use scene_core::{Material, MeshInstance, Node, Transform, shapes};

fn asphalt() -> Material {
    Material::rgb("asphalt", 0.04, 0.04, 0.05)
}

#[test]
fn scene_without_surfaces_gets_fallback_plane() {
    let scene = Node::new("city").with_child(
        Node::new("tower").with_mesh(MeshInstance::new(
            shapes::cuboid(Vec3::new(4.0, 20.0, 4.0)),
            Material::rgb("glass", 0.6, 0.7, 0.9),
        )),
    );
    let nav = NavMeshBuilder::default().build(&scene);
    assert!(nav.is_fallback());
    assert_eq!(nav.zone_id(), "city");
    assert_eq!(nav.group_count(), 1);
    assert_eq!(nav.triangle_count(), 16 * 16 * 2);
    assert!(nav.is_on_mesh(Vec3::ZERO, 0.01));
    assert!((nav.bounds().max.x - 500.0).abs() < 1e-3);
}

#[test]
fn empty_scene_gets_fallback_plane() {
    let nav = NavMeshBuilder::default().build(&Node::new("void"));
    assert!(nav.is_fallback());
    assert!(nav.is_on_mesh(Vec3::ZERO, 0.01));
    let path = nav.find_path(Vec3::new(-10.0, 0.0, 3.0), Vec3::new(40.0, 0.0, -7.0));
    assert_eq!(path.len(), 2);
}

#[test]
fn dark_flat_ground_mesh_is_merged() {
    let slab = shapes::grid_plane(10.0, 2);
    let classifier = SurfaceClassifier::default();
    let score = classifier.score("slab", &slab, &asphalt(), &glam::Mat4::IDENTITY);
    assert!(score >= 0.9 - 1e-5, "score {score}");

    let scene = Node::new("city")
        .with_child(Node::new("slab").with_mesh(MeshInstance::new(slab, asphalt())))
        .with_child(
            Node::new("Billboard")
                .with_transform(Transform::from_xyz(0.0, 6.0, 0.0))
                .with_mesh(MeshInstance::new(
                    shapes::cuboid(Vec3::new(3.0, 2.0, 0.2)),
                    Material::rgb("ad", 0.9, 0.2, 0.2),
                )),
        );
    let nav = NavMeshBuilder::default().build(&scene);
    assert!(!nav.is_fallback());
    assert_eq!(nav.triangle_count(), 8);
    assert!(nav.is_on_mesh(Vec3::new(3.0, 0.0, -3.0), 0.01));
    assert!(!nav.is_on_mesh(Vec3::new(30.0, 0.0, 0.0), 0.5));
}

#[test]
fn world_transforms_are_baked_into_the_mesh() {
    let scene = Node::new("city").with_child(
        Node::new("Harbor Road")
            .with_transform(Transform::from_xyz(100.0, 0.2, 0.0))
            .with_mesh(MeshInstance::new(shapes::grid_plane(5.0, 1), asphalt())),
    );
    let nav = NavMeshBuilder::default().build(&scene);
    assert!(!nav.is_fallback());
    let p = nav.clamp(Vec3::new(102.0, 10.0, 1.0));
    assert!((p - Vec3::new(102.0, 0.2, 1.0)).length() < 1e-4);
}

#[test]
fn disconnected_islands_and_far_endpoints_return_direct_segment() {
    let island = |x: f32| {
        Node::new("street")
            .with_transform(Transform::from_xyz(x, 0.0, 0.0))
            .with_mesh(MeshInstance::new(shapes::grid_plane(2.0, 2), asphalt()))
    };
    let scene = Node::new("city").with_child(island(0.0)).with_child(island(50.0));
    let nav = NavMeshBuilder::default().build(&scene);
    assert_eq!(nav.group_count(), 2);

    let (a, b) = (Vec3::new(0.5, 0.0, 0.5), Vec3::new(50.5, 0.0, 0.5));
    assert_eq!(nav.find_path(a, b), vec![a, b]);

    let far = Vec3::new(0.0, 0.0, 30.0);
    assert_eq!(nav.find_path(a, far), vec![a, far]);

    let near = Vec3::new(-1.5, 0.0, 1.5);
    assert_eq!(nav.find_path(a, near), vec![a, near]);
}
