//! Humanoid stand-ins assembled from capsules and a sphere.
//!
//! Part names match the normalized bone names clips target (`hips`, `torso`,
//! `head`, `arm_l` ...), so name-addressed clips animate the stand-in too.

use glam::Vec3;
use scene_core::{Material, Node, Transform, shapes};

use crate::{part, tint};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyType {
    Default,
    Heavy,
    Slim,
    Child,
}

impl BodyType {
    pub fn from_variant(variant: &str) -> BodyType {
        match variant {
            "heavy" => BodyType::Heavy,
            "slim" => BodyType::Slim,
            "child" => BodyType::Child,
            _ => BodyType::Default,
        }
    }

    /// (torso width factor, uniform scale)
    fn proportions(self) -> (f32, f32) {
        match self {
            BodyType::Default => (1.0, 1.0),
            BodyType::Heavy => (1.45, 1.05),
            BodyType::Slim => (0.75, 1.0),
            BodyType::Child => (1.0, 0.6),
        }
    }
}

pub fn generate(variant: &str) -> Node {
    let body = BodyType::from_variant(variant);
    let (width, scale) = body.proportions();
    let [r, g, b] = tint::from_seed(variant, 0.25, 0.85);
    let cloth = Material::rgb("cloth", r, g, b);
    let skin = Material::rgb("skin", 0.86, 0.68, 0.55);

    let torso_r = 0.22 * width;
    let torso = part("torso", shapes::capsule(torso_r, 0.35, 12, 6), &cloth, Vec3::new(0.0, 0.35, 0.0))
        .with_child(part("head", shapes::uv_sphere(0.16, 12, 8), &skin, Vec3::new(0.0, 0.5, 0.0)))
        .with_child(part(
            "arm_l",
            shapes::capsule(0.06, 0.45, 8, 4),
            &skin,
            Vec3::new(-(torso_r + 0.08), 0.0, 0.0),
        ))
        .with_child(part(
            "arm_r",
            shapes::capsule(0.06, 0.45, 8, 4),
            &skin,
            Vec3::new(torso_r + 0.08, 0.0, 0.0),
        ));

    let leg = shapes::capsule(0.08, 0.6, 8, 4);
    let hips = Node::new("hips")
        .with_transform(Transform::from_xyz(0.0, 0.95, 0.0))
        .with_child(torso)
        .with_child(part("leg_l", leg.clone(), &cloth, Vec3::new(-0.1 * width, -0.45, 0.0)))
        .with_child(part("leg_r", leg, &cloth, Vec3::new(0.1 * width, -0.45, 0.0)));

    Node::new(format!("character_{variant}"))
        .with_transform(Transform::IDENTITY.with_scale(Vec3::splat(scale)))
        .with_child(hips)
}
