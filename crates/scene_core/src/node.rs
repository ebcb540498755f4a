//! Scene graph nodes.
//!
//! A `Node` owns its children and its local transform. Geometry and materials
//! are referenced through `Arc`, so cloning a tree copies the hierarchy and the
//! transforms but shares the buffers.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use crate::anim::Pose;
use crate::mesh::{Aabb, Material, MeshData};
use crate::util::normalize_bone_name;

/// Local translation/rotation/scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(t: Vec3) -> Self {
        Self {
            translation: t,
            ..Self::IDENTITY
        }
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    pub fn with_scale(mut self, s: Vec3) -> Self {
        self.scale = s;
        self
    }

    pub fn with_rotation(mut self, r: Quat) -> Self {
        self.rotation = r;
        self
    }

    pub fn from_matrix(m: &Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Geometry plus the material it is drawn with.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshInstance {
    pub mesh: Arc<MeshData>,
    pub material: Arc<Material>,
}

impl MeshInstance {
    pub fn new(mesh: MeshData, material: Material) -> Self {
        Self {
            mesh: Arc::new(mesh),
            material: Arc::new(material),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshInstance>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, t: Transform) -> Self {
        self.transform = t;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshInstance) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Independent copy of the hierarchy that shares mesh and material buffers.
    pub fn instantiate(&self) -> Node {
        self.clone()
    }

    /// Depth-first visit of every node with its world matrix.
    pub fn visit_world<F: FnMut(&Node, &Mat4)>(&self, parent: &Mat4, f: &mut F) {
        let world = *parent * self.transform.matrix();
        f(self, &world);
        for c in &self.children {
            c.visit_world(&world, f);
        }
    }

    /// Every node carrying geometry, paired with its world matrix.
    pub fn world_meshes(&self) -> Vec<(&Node, Mat4)> {
        let mut out = Vec::new();
        collect_meshes(self, &Mat4::IDENTITY, &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub fn mesh_count(&self) -> usize {
        usize::from(self.mesh.is_some()) + self.children.iter().map(Node::mesh_count).sum::<usize>()
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.mesh.vertex_count())
            + self.children.iter().map(Node::vertex_count).sum::<usize>()
    }

    pub fn triangle_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.mesh.triangle_count())
            + self.children.iter().map(Node::triangle_count).sum::<usize>()
    }

    /// World-space bounds of all geometry below this node.
    pub fn world_bounds(&self) -> Aabb {
        let mut out = Aabb::EMPTY;
        self.visit_world(&Mat4::IDENTITY, &mut |n, m| {
            if let Some(mi) = &n.mesh {
                out = out.union(&mi.mesh.bounds().transformed(m));
            }
        });
        out
    }

    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    /// Write pose transforms onto nodes whose normalized name matches a pose target.
    /// Returns how many nodes were updated.
    pub fn apply_pose(&mut self, pose: &Pose) -> usize {
        if pose.is_empty() {
            return 0;
        }
        let mut touched = 0;
        if let Some(j) = pose.get(&normalize_bone_name(&self.name)) {
            j.apply_to(&mut self.transform);
            touched += 1;
        }
        for c in &mut self.children {
            touched += c.apply_pose(pose);
        }
        touched
    }
}

fn collect_meshes<'a>(node: &'a Node, parent: &Mat4, out: &mut Vec<(&'a Node, Mat4)>) {
    let world = *parent * node.transform.matrix();
    if node.mesh.is_some() {
        out.push((node, world));
    }
    for c in &node.children {
        collect_meshes(c, &world, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    fn sample() -> Node {
        let body = MeshInstance::new(shapes::cuboid(Vec3::ONE), Material::default());
        Node::new("root").with_child(
            Node::new("body")
                .with_transform(Transform::from_xyz(0.0, 2.0, 0.0))
                .with_mesh(body),
        )
    }

    #[test]
    fn instantiate_shares_buffers_but_not_transforms() {
        let original = sample();
        let mut copy = original.instantiate();
        copy.transform.translation = Vec3::new(10.0, 0.0, 0.0);
        copy.children[0].name = "renamed".into();
        assert_eq!(original.transform.translation, Vec3::ZERO);
        assert_eq!(original.children[0].name, "body");
        let a = original.children[0].mesh.as_ref().map(|m| Arc::as_ptr(&m.mesh));
        let b = copy.children[0].mesh.as_ref().map(|m| Arc::as_ptr(&m.mesh));
        assert_eq!(a, b);
    }

    #[test]
    fn world_bounds_bake_parent_transforms() {
        let root = sample().with_transform(Transform::from_xyz(1.0, 0.0, 0.0));
        let b = root.world_bounds();
        assert!((b.min - Vec3::new(0.5, 1.5, -0.5)).length() < 1e-5, "{:?}", b);
        assert!((b.max - Vec3::new(1.5, 2.5, 0.5)).length() < 1e-5, "{:?}", b);
    }
}
