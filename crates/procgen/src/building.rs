//! Building stand-ins: blocks with a roof piece.

use glam::Vec3;
use scene_core::{Material, Node, shapes};

use crate::{part, tint};

pub fn generate(variant: &str) -> Node {
    let (size, roof) = match variant {
        "house" => (Vec3::new(8.0, 5.0, 8.0), Some(2.0)),
        "tower" => (Vec3::new(6.0, 30.0, 6.0), None),
        "shop" => (Vec3::new(10.0, 4.0, 7.0), None),
        "warehouse" => (Vec3::new(20.0, 8.0, 14.0), Some(1.0)),
        _ => (Vec3::new(10.0, 10.0, 10.0), None),
    };
    let [r, g, b] = tint::from_seed(variant, 0.45, 0.8);
    let wall = Material::rgb("wall", r, g, b);
    let roof_mat = Material::rgb("roof", 0.45, 0.2, 0.15);

    let mut root = Node::new(format!("building_{variant}"));
    root.push(part("walls", shapes::cuboid(size), &wall, Vec3::new(0.0, size.y * 0.5, 0.0)));
    if let Some(h) = roof {
        let slab = Vec3::new(size.x * 1.1, h, size.z * 1.1);
        root.push(part("roof", shapes::cuboid(slab), &roof_mat, Vec3::new(0.0, size.y + h * 0.5, 0.0)));
    }
    if variant == "shop" {
        let awning = Vec3::new(size.x, 0.2, 1.5);
        root.push(part(
            "awning",
            shapes::cuboid(awning),
            &roof_mat,
            Vec3::new(0.0, size.y * 0.7, size.z * 0.5 + 0.75),
        ));
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buildings_rest_on_ground() {
        for v in ["house", "tower", "shop", "warehouse", "unknown"] {
            let b = generate(v).world_bounds();
            assert!(b.min.y.abs() < 1e-4, "{v} floats at {}", b.min.y);
        }
        assert!(generate("tower").world_bounds().max.y > 25.0);
    }
}
