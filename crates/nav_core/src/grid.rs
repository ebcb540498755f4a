//! Uniform XZ grid over triangle bounds. Point queries only look at the
//! triangles registered in nearby cells instead of the whole mesh.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Per-axis cap on the grid resolution.
const MAX_DIM: u32 = 1024;

#[derive(Clone, Debug)]
pub(crate) struct TriGrid {
    origin: Vec2,
    cell: f32,
    dims: [u32; 2],
    cells: Vec<SmallVec<[u32; 8]>>,
}

impl TriGrid {
    pub fn build(vertices: &[Vec3], triangles: &[[u32; 3]]) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for t in triangles {
            for &i in t {
                let v = vertices[i as usize];
                if v.is_finite() {
                    min = min.min(Vec2::new(v.x, v.z));
                    max = max.max(Vec2::new(v.x, v.z));
                }
            }
        }
        if !(min.x <= max.x && min.y <= max.y) {
            return Self {
                origin: Vec2::ZERO,
                cell: 1.0,
                dims: [1, 1],
                cells: vec![SmallVec::new()],
            };
        }
        let size = max - min;
        let area = size.x * size.y;
        let count = triangles.len().max(1) as f32;
        let mut cell = if area > 1e-6 {
            (area / count).sqrt()
        } else {
            size.x.max(size.y).max(1.0) / count
        };
        cell = cell
            .max(size.x / MAX_DIM as f32)
            .max(size.y / MAX_DIM as f32)
            .max(1e-3);
        let dims = [
            ((size.x / cell).ceil() as u32).clamp(1, MAX_DIM),
            ((size.y / cell).ceil() as u32).clamp(1, MAX_DIM),
        ];
        let mut grid = Self {
            origin: min,
            cell,
            dims,
            cells: vec![SmallVec::new(); (dims[0] * dims[1]) as usize],
        };
        // Pad so points sitting on a shared cell border still find the triangle.
        let pad = Vec2::splat(cell * 1e-3);
        for (ti, t) in triangles.iter().enumerate() {
            let xz = t.map(|i| {
                let v = vertices[i as usize];
                Vec2::new(v.x, v.z)
            });
            let lo = grid.cell_of(xz[0].min(xz[1]).min(xz[2]) - pad);
            let hi = grid.cell_of(xz[0].max(xz[1]).max(xz[2]) + pad);
            for z in lo[1]..=hi[1] {
                for x in lo[0]..=hi[0] {
                    let idx = grid.index([x, z]);
                    grid.cells[idx].push(ti as u32);
                }
            }
        }
        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell
    }

    pub fn dims(&self) -> [u32; 2] {
        self.dims
    }

    /// Cell containing `p`, clamped into the grid.
    fn cell_of(&self, p: Vec2) -> [u32; 2] {
        let rel = (p - self.origin) / self.cell;
        let clamp = |v: f32, n: u32| {
            if v.is_finite() {
                (v.floor().max(0.0) as u32).min(n - 1)
            } else {
                0
            }
        };
        [clamp(rel.x, self.dims[0]), clamp(rel.y, self.dims[1])]
    }

    fn index(&self, c: [u32; 2]) -> usize {
        (c[1] * self.dims[0] + c[0]) as usize
    }

    /// Triangles whose bounds cover the cell under `p`.
    pub fn column(&self, p: Vec3) -> &[u32] {
        &self.cells[self.index(self.cell_of(Vec2::new(p.x, p.z)))]
    }

    /// Visit triangles ring by ring outward from the cell nearest `p`.
    /// `visit` gets each ring's triangles and returns the best squared
    /// distance found so far; the walk stops once no farther ring can beat it.
    /// Triangles spanning several cells are visited more than once.
    pub fn walk_rings(&self, p: Vec3, mut visit: impl FnMut(&[u32]) -> f32) {
        let c = self.cell_of(Vec2::new(p.x, p.z));
        let c = [c[0] as i64, c[1] as i64];
        let reach = self.dims[0].max(self.dims[1]) as i64;
        let mut best = f32::INFINITY;
        for r in 0..=reach {
            for dz in -r..=r {
                let edge = dz.abs() == r;
                let mut dx = -r;
                while dx <= r {
                    let (x, z) = (c[0] + dx, c[1] + dz);
                    if x >= 0 && z >= 0 && x < self.dims[0] as i64 && z < self.dims[1] as i64 {
                        best = visit(&self.cells[self.index([x as u32, z as u32])]);
                    }
                    dx += if edge || r == 0 { 1 } else { 2 * r };
                }
            }
            // Anything left lies entirely in ring r + 1 or beyond.
            let bound = r as f32 * self.cell;
            if best.is_finite() && best <= bound * bound {
                return;
            }
        }
    }
}
