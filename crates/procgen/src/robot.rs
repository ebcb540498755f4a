//! Robot stand-ins from a small type table.

use glam::Vec3;
use scene_core::{Material, Node, shapes};

use crate::{part, tint};

struct RobotSpec {
    color: [f32; 3],
    body: Vec3,
    legs: bool,
    rotor: bool,
}

fn spec(variant: &str) -> Option<RobotSpec> {
    let s = match variant {
        "scout" => RobotSpec {
            color: [0.3, 0.7, 0.9],
            body: Vec3::new(0.6, 0.8, 0.5),
            legs: true,
            rotor: false,
        },
        "tank" => RobotSpec {
            color: [0.35, 0.4, 0.3],
            body: Vec3::new(1.6, 0.9, 2.0),
            legs: false,
            rotor: false,
        },
        "drone" => RobotSpec {
            color: [0.85, 0.85, 0.9],
            body: Vec3::new(0.5, 0.25, 0.5),
            legs: false,
            rotor: true,
        },
        "worker" => RobotSpec {
            color: [0.95, 0.7, 0.1],
            body: Vec3::new(0.9, 1.1, 0.7),
            legs: true,
            rotor: false,
        },
        _ => return None,
    };
    Some(s)
}

pub fn generate(variant: &str) -> Node {
    let s = spec(variant).unwrap_or_else(|| RobotSpec {
        color: tint::from_seed(variant, 0.4, 0.8),
        body: Vec3::splat(0.8),
        legs: false,
        rotor: false,
    });
    let [r, g, b] = s.color;
    let shell = Material::rgb("shell", r, g, b);
    let joint = Material::rgb("joint", 0.15, 0.15, 0.18);

    let lift = if s.legs { 0.7 } else { s.body.y * 0.5 };
    let mut body = part("body", shapes::cuboid(s.body), &shell, Vec3::new(0.0, lift, 0.0));
    body.push(part(
        "head",
        shapes::uv_sphere(s.body.x * 0.25, 10, 6),
        &joint,
        Vec3::new(0.0, s.body.y * 0.5 + s.body.x * 0.2, 0.0),
    ));
    if s.legs {
        let leg = shapes::cylinder(0.08, 0.7, 8);
        let dx = s.body.x * 0.3;
        body.push(part("leg_l", leg.clone(), &joint, Vec3::new(-dx, -0.35 - s.body.y * 0.5, 0.0)));
        body.push(part("leg_r", leg, &joint, Vec3::new(dx, -0.35 - s.body.y * 0.5, 0.0)));
    }
    if s.rotor {
        body.push(part(
            "rotor",
            shapes::cylinder(s.body.x * 0.9, 0.03, 16),
            &joint,
            Vec3::new(0.0, s.body.y * 0.5 + 0.05, 0.0),
        ));
    }
    Node::new(format!("robot_{variant}")).with_child(body)
}
