//! Small street furniture.

use glam::Vec3;
use scene_core::{Material, Node, shapes};

use crate::{part, tint};

pub fn generate(variant: &str) -> Node {
    let mut root = Node::new(format!("prop_{variant}"));
    match variant {
        "crate" => {
            let wood = Material::rgb("wood", 0.55, 0.38, 0.2);
            root.push(part("box", shapes::cuboid(Vec3::ONE), &wood, Vec3::Y * 0.5));
        }
        "barrel" => {
            let metal = Material::rgb("metal", 0.3, 0.35, 0.4);
            root.push(part("barrel", shapes::cylinder(0.35, 1.0, 16), &metal, Vec3::Y * 0.5));
        }
        "lamp" => {
            let pole = Material::rgb("pole", 0.2, 0.2, 0.22);
            let glow = Material::rgb("glow", 1.0, 0.95, 0.7);
            root.push(part("pole", shapes::cylinder(0.06, 4.0, 8), &pole, Vec3::Y * 2.0));
            root.push(part("light", shapes::uv_sphere(0.25, 10, 6), &glow, Vec3::Y * 4.1));
        }
        "bench" => {
            let wood = Material::rgb("wood", 0.5, 0.33, 0.18);
            let seat = Vec3::new(1.8, 0.1, 0.5);
            root.push(part("seat", shapes::cuboid(seat), &wood, Vec3::Y * 0.45));
            let leg = Vec3::new(0.1, 0.4, 0.4);
            root.push(part("leg_l", shapes::cuboid(leg), &wood, Vec3::new(-0.8, 0.2, 0.0)));
            root.push(part("leg_r", shapes::cuboid(leg), &wood, Vec3::new(0.8, 0.2, 0.0)));
        }
        "tree" => {
            let bark = Material::rgb("bark", 0.4, 0.26, 0.13);
            let leaves = Material::rgb("leaves", 0.2, 0.5, 0.2);
            root.push(part("trunk", shapes::cylinder(0.2, 2.5, 10), &bark, Vec3::Y * 1.25));
            root.push(part("crown", shapes::uv_sphere(1.3, 12, 8), &leaves, Vec3::Y * 3.3));
        }
        "hydrant" => {
            let red = Material::rgb("paint", 0.8, 0.1, 0.1);
            root.push(part("body", shapes::capsule(0.15, 0.5, 10, 4), &red, Vec3::Y * 0.4));
        }
        _ => {
            let [r, g, b] = tint::from_seed(variant, 0.3, 0.9);
            let m = Material::rgb("default", r, g, b);
            root.push(part("cube", shapes::cuboid(Vec3::ONE), &m, Vec3::Y * 0.5));
        }
    }
    root
}
