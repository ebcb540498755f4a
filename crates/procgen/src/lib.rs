//! procgen: deterministic stand-in geometry for every asset category.
//!
//! Generators are pure functions of `(category, variant)`; the same inputs
//! always produce the same hierarchy, vertex counts and tints. Nothing here
//! can fail: unknown variants fall back to the category's default shape.

pub mod building;
pub mod category;
pub mod character;
pub mod prop;
pub mod robot;
mod tint;

use glam::Vec3;
use scene_core::{Material, MeshData, MeshInstance, Node, Transform, shapes};

pub use category::{AssetCategory, UnknownCategory};

/// Build the stand-in for `variant` of `category`.
pub fn generate(category: AssetCategory, variant: &str) -> Node {
    let node = (category.generator())(variant);
    log::debug!(
        "procgen: {}/{} -> {} nodes, {} tris",
        category.dir_name(),
        variant,
        node.node_count(),
        node.triangle_count()
    );
    node
}

/// Minimal renderable used when even the category is unknown.
pub fn default_primitive(name: &str) -> Node {
    Node::new(name).with_mesh(MeshInstance::new(
        shapes::cuboid(Vec3::ONE),
        Material::rgb("default", 0.6, 0.6, 0.6),
    ))
}

/// Named mesh node at `at`.
pub(crate) fn part(name: &str, mesh: MeshData, material: &Material, at: Vec3) -> Node {
    Node::new(name)
        .with_transform(Transform::from_translation(at))
        .with_mesh(MeshInstance::new(mesh, material.clone()))
}
