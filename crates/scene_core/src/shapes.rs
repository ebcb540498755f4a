//! Primitive volume builders used by procedural stand-ins and fallbacks.
//!
//! All shapes are centered at the origin, wound counter-clockwise when seen
//! from outside, and fully deterministic for a given parameter set.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::mesh::{MeshData, Vertex};

fn vtx(p: Vec3, n: Vec3) -> Vertex {
    Vertex {
        pos: p.to_array(),
        nrm: n.to_array(),
    }
}

/// Box with the given full size.
pub fn cuboid(size: Vec3) -> MeshData {
    let h = size * 0.5;
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([1.0, 0.0, 0.0], [[1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]]),
        ([-1.0, 0.0, 0.0], [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0]]),
        ([0.0, 1.0, 0.0], [[-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0]]),
        ([0.0, -1.0, 0.0], [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0]]),
        ([0.0, 0.0, 1.0], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
        ([0.0, 0.0, -1.0], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, corners) in faces {
        let base = vertices.len() as u32;
        for c in corners {
            vertices.push(vtx(Vec3::from(c) * h, Vec3::from(n)));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(vertices, indices)
}

/// Latitude/longitude sphere.
pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            vertices.push(vtx(n * radius, n));
        }
    }
    let indices = lat_long_indices(rings, segments);
    MeshData::new(vertices, indices)
}

/// Y-aligned cylinder with capped ends.
pub fn cylinder(radius: f32, height: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let hy = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side wall: bottom/top pairs around the ring.
    for s in 0..=segments {
        let phi = TAU * s as f32 / segments as f32;
        let dir = Vec3::new(phi.cos(), 0.0, phi.sin());
        vertices.push(vtx(dir * radius - Vec3::Y * hy, dir));
        vertices.push(vtx(dir * radius + Vec3::Y * hy, dir));
    }
    for s in 0..segments {
        let b0 = 2 * s;
        let (t0, b1, t1) = (b0 + 1, b0 + 2, b0 + 3);
        indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
    }

    for (y, n) in [(hy, Vec3::Y), (-hy, Vec3::NEG_Y)] {
        let center = vertices.len() as u32;
        vertices.push(vtx(Vec3::new(0.0, y, 0.0), n));
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            vertices.push(vtx(Vec3::new(phi.cos() * radius, y, phi.sin() * radius), n));
        }
        for s in 0..segments {
            let a = center + 1 + s;
            if n.y > 0.0 {
                indices.extend_from_slice(&[center, a + 1, a]);
            } else {
                indices.extend_from_slice(&[center, a, a + 1]);
            }
        }
    }
    MeshData::new(vertices, indices)
}

/// Y-aligned capsule: a cylinder of `length` with hemispherical ends.
pub fn capsule(radius: f32, length: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    // Even ring count so the equator splits the two hemispheres.
    let rings = (rings.max(2) + 1) & !1;
    let half = rings / 2;
    let hl = length * 0.5;
    let mut vertices = Vec::new();
    for row in 0..=rings + 1 {
        let (r, offset) = if row <= half { (row, hl) } else { (row - 1, -hl) };
        let theta = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            vertices.push(vtx(n * radius + Vec3::Y * offset, n));
        }
    }
    let indices = lat_long_indices(rings + 1, segments);
    MeshData::new(vertices, indices)
}

/// Flat XZ grid at y = 0 facing up, spanning `[-half_extent, half_extent]`.
pub fn grid_plane(half_extent: f32, cells: u32) -> MeshData {
    let cells = cells.max(1);
    let step = 2.0 * half_extent / cells as f32;
    let row = cells + 1;
    let mut vertices = Vec::with_capacity((row * row) as usize);
    for j in 0..row {
        for i in 0..row {
            let p = Vec3::new(-half_extent + i as f32 * step, 0.0, -half_extent + j as f32 * step);
            vertices.push(vtx(p, Vec3::Y));
        }
    }
    let mut indices = Vec::with_capacity((cells * cells * 6) as usize);
    for j in 0..cells {
        for i in 0..cells {
            let a = j * row + i;
            let (b, c, d) = (a + 1, a + row + 1, a + row);
            indices.extend_from_slice(&[a, c, b, a, d, c]);
        }
    }
    MeshData::new(vertices, indices)
}

fn lat_long_indices(rows: u32, segments: u32) -> Vec<u32> {
    let stride = segments + 1;
    let mut indices = Vec::with_capacity((rows * segments * 6) as usize);
    for r in 0..rows {
        for s in 0..segments {
            let i0 = r * stride + s;
            let i1 = i0 + stride;
            indices.extend_from_slice(&[i0, i0 + 1, i1, i0 + 1, i1 + 1, i1]);
        }
    }
    indices
}
