//! Bytes to scene data. `GltfDecoder` handles `.gltf` with embedded buffers and `.glb`.

use glam::{Mat4, Quat, Vec3};
use gltf::animation::util::ReadOutputs;
use gltf::mesh::util::ReadIndices;
use scene_core::{
    AnimationClip, Material, MeshData, MeshInstance, Node, Skeleton, Track, TrackValues,
    Transform, Vertex, normalize_bone_name,
};

use crate::error::AssetError;

/// Decoder output before it becomes a cached `LoadedAsset`.
#[derive(Clone, Debug, Default)]
pub struct DecodedAsset {
    pub root: Node,
    pub clips: Vec<AnimationClip>,
    pub skeleton: Option<Skeleton>,
}

pub trait AssetDecoder: Send + Sync + 'static {
    /// `label` names the asset in logs and errors.
    fn decode(&self, label: &str, bytes: &[u8]) -> Result<DecodedAsset, AssetError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GltfDecoder;

impl AssetDecoder for GltfDecoder {
    fn decode(&self, label: &str, bytes: &[u8]) -> Result<DecodedAsset, AssetError> {
        let (doc, buffers, _images) = gltf::import_slice(bytes).map_err(|source| AssetError::Gltf {
            label: label.to_string(),
            source,
        })?;

        let mut root = Node::new(label);
        if let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) {
            for n in scene.nodes() {
                root.push(build_node(&n, &buffers));
            }
        }

        let clips: Vec<AnimationClip> = doc
            .animations()
            .map(|anim| read_clip(&anim, &buffers))
            .collect();

        let skeleton = doc.skins().next().map(|skin| {
            let joints: Vec<String> = skin
                .joints()
                .map(|j| normalize_bone_name(&node_name(&j)))
                .collect();
            let rdr = skin.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let inverse_bind = match rdr.read_inverse_bind_matrices() {
                Some(iter) => iter.map(|m| Mat4::from_cols_array_2d(&m)).collect(),
                None => vec![Mat4::IDENTITY; joints.len()],
            };
            Skeleton {
                joints,
                inverse_bind,
            }
        });

        log::debug!(
            "decode {label}: {} nodes, {} meshes, {} clips, skin={}",
            root.node_count(),
            root.mesh_count(),
            clips.len(),
            skeleton.is_some()
        );
        Ok(DecodedAsset {
            root,
            clips,
            skeleton,
        })
    }
}

fn node_name(n: &gltf::Node) -> String {
    n.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", n.index()))
}

fn build_node(n: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Node {
    let name = node_name(n);
    let mut out = Node::new(name.clone()).with_transform(decompose_node(n));
    if let Some(mesh) = n.mesh() {
        let mut prims = mesh.primitives().filter_map(|p| read_primitive(&p, buffers));
        out.mesh = prims.next();
        // Extra primitives (other materials) hang off the node as children.
        for (i, extra) in prims.enumerate() {
            out.push(Node::new(format!("{name}_prim{}", i + 1)).with_mesh(extra));
        }
    }
    for c in n.children() {
        out.push(build_node(&c, buffers));
    }
    out
}

fn read_primitive(p: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<MeshInstance> {
    if p.mode() != gltf::mesh::Mode::Triangles {
        return None;
    }
    let reader = p.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
    let positions: Vec<[f32; 3]> = reader.read_positions()?.collect();
    let normals: Vec<[f32; 3]> = reader.read_normals().map(|it| it.collect()).unwrap_or_default();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ReadIndices::U8(it)) => it.map(u32::from).collect(),
        Some(ReadIndices::U16(it)) => it.map(u32::from).collect(),
        Some(ReadIndices::U32(it)) => it.collect(),
        None => (0..positions.len() as u32).collect(),
    };
    if indices.len() % 3 != 0 || indices.iter().any(|&i| i as usize >= positions.len()) {
        log::warn!("decode: skipping primitive with malformed indices");
        return None;
    }
    let has_normals = normals.len() == positions.len();
    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, p)| Vertex {
            pos: *p,
            nrm: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
        })
        .collect();
    let mut mesh = MeshData::new(vertices, indices);
    if !has_normals {
        mesh.recompute_normals();
    }
    let m = p.material();
    let material = Material::new(
        m.name().unwrap_or("default"),
        m.pbr_metallic_roughness().base_color_factor(),
    );
    Some(MeshInstance::new(mesh, material))
}

fn read_clip(anim: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> AnimationClip {
    let mut tracks = Vec::new();
    for ch in anim.channels() {
        let target = ch.target();
        let rdr = ch.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
        let Some(inputs) = rdr.read_inputs() else {
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        let Some(outs) = rdr.read_outputs() else {
            continue;
        };
        let values = match outs {
            ReadOutputs::Translations(it) => TrackValues::Translation(it.map(Vec3::from).collect()),
            ReadOutputs::Rotations(it) => TrackValues::Rotation(
                it.into_f32()
                    .map(|v| Quat::from_array(v).normalize())
                    .collect(),
            ),
            ReadOutputs::Scales(it) => TrackValues::Scale(it.map(Vec3::from).collect()),
            ReadOutputs::MorphTargetWeights(_) => continue,
        };
        tracks.push(Track::new(&node_name(&target.node()), times, values));
    }
    let name = anim
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("clip_{}", anim.index()));
    AnimationClip::new(name, tracks)
}

fn decompose_node(n: &gltf::Node) -> Transform {
    use gltf::scene::Transform as GTransform;
    match n.transform() {
        GTransform::Matrix { matrix } => Transform::from_matrix(&Mat4::from_cols_array_2d(&matrix)),
        GTransform::Decomposed {
            translation,
            rotation,
            scale,
        } => Transform {
            translation: Vec3::from(translation),
            rotation: Quat::from_array(rotation).normalize(),
            scale: Vec3::from(scale),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_a_decode_error() {
        let err = GltfDecoder.decode("junk", &[0u8; 64]).unwrap_err();
        assert!(matches!(err, AssetError::Gltf { .. }));
        assert!(err.to_string().contains("junk"));
    }
}
