mod common;

use asset_runtime::{AssetDecoder, GltfDecoder};
use glam::Vec3;

#[test]
fn embedded_gltf_decodes_tree_material_and_clip() {
    let bytes = common::triangle_gltf("Main Road", 1024);
    assert!(bytes.len() > 1024);
    let decoded = GltfDecoder.decode("fixture", &bytes).expect("decode");

    assert_eq!(decoded.root.name, "fixture");
    let road = decoded.root.find("Main Road").expect("node");
    let mi = road.mesh.as_ref().expect("mesh");
    assert_eq!(mi.mesh.vertex_count(), 3);
    assert_eq!(mi.mesh.triangle_count(), 1);
    assert_eq!(mi.material.name, "asphalt");
    assert!((mi.material.base_color[0] - 0.1).abs() < 1e-6);

    assert_eq!(decoded.clips.len(), 1);
    let clip = &decoded.clips[0];
    assert_eq!(clip.name, "Bob");
    assert!((clip.duration - 1.0).abs() < 1e-6);
    let pose = clip.sample(0.5);
    let t = pose.get("mainroad").and_then(|j| j.translation).expect("track");
    assert!((t - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    assert!(decoded.skeleton.is_none());
}
