//! CPU-side geometry shared by loaded and generated assets.
//!
//! Mesh data is immutable once built and shared through `Arc` between the
//! cached original of an asset and every instance handed to consumers.

use glam::{Mat3, Mat4, Vec3};

/// Minimal vertex with position and normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
}

/// Axis-aligned bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted bounds that any `grow` call replaces.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut out = Self::EMPTY;
        for p in points {
            out.grow(p);
        }
        out
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Squared distance from `p` to the box (0 inside).
    pub fn distance_sq(&self, p: Vec3) -> f32 {
        let d = (self.min - p).max(p - self.max).max(Vec3::ZERO);
        d.length_squared()
    }

    /// Bounds of this box after transforming its eight corners.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let (a, b) = (self.min, self.max);
        Aabb::from_points([
            m.transform_point3(Vec3::new(a.x, a.y, a.z)),
            m.transform_point3(Vec3::new(b.x, a.y, a.z)),
            m.transform_point3(Vec3::new(a.x, b.y, a.z)),
            m.transform_point3(Vec3::new(b.x, b.y, a.z)),
            m.transform_point3(Vec3::new(a.x, a.y, b.z)),
            m.transform_point3(Vec3::new(b.x, a.y, b.z)),
            m.transform_point3(Vec3::new(a.x, b.y, b.z)),
            m.transform_point3(Vec3::new(b.x, b.y, b.z)),
        ])
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Triangle list geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| Vec3::from(v.pos)))
    }

    /// Vertex buffer bytes ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer bytes ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Triangles as index triples; a trailing partial triangle is ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Append `other` transformed by `m`, rebasing its indices.
    pub fn append_transformed(&mut self, other: &MeshData, m: &Mat4) {
        let base = self.vertices.len() as u32;
        let nrm_m = Mat3::from_mat4(*m).inverse().transpose();
        self.vertices.extend(other.vertices.iter().map(|v| Vertex {
            pos: m.transform_point3(Vec3::from(v.pos)).to_array(),
            nrm: (nrm_m * Vec3::from(v.nrm)).normalize_or_zero().to_array(),
        }));
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Replace normals with area-weighted vertex normals from the triangles.
    pub fn recompute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for [a, b, c] in self.triangles().collect::<Vec<_>>() {
            let (ia, ib, ic) = (a as usize, b as usize, c as usize);
            if ia >= acc.len() || ib >= acc.len() || ic >= acc.len() {
                continue;
            }
            let pa = Vec3::from(self.vertices[ia].pos);
            let pb = Vec3::from(self.vertices[ib].pos);
            let pc = Vec3::from(self.vertices[ic].pos);
            let n = (pb - pa).cross(pc - pa);
            acc[ia] += n;
            acc[ib] += n;
            acc[ic] += n;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.nrm = n.try_normalize().unwrap_or(Vec3::Y).to_array();
        }
    }
}

/// Surface appearance. Only the base color is carried on the CPU side.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_color: [f32; 4],
}

impl Material {
    pub fn new(name: impl Into<String>, base_color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            base_color,
        }
    }

    pub fn rgb(name: impl Into<String>, r: f32, g: f32, b: f32) -> Self {
        Self::new(name, [r, g, b, 1.0])
    }

    /// Mean of the RGB channels.
    pub fn luminance_mean(&self) -> f32 {
        let [r, g, b, _] = self.base_color;
        (r + g + b) / 3.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::rgb("default", 0.8, 0.8, 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        let v = |x: f32, z: f32| Vertex {
            pos: [x, 0.0, z],
            nrm: [0.0, 1.0, 0.0],
        };
        MeshData::new(
            vec![v(0.0, 0.0), v(1.0, 0.0), v(1.0, 1.0), v(0.0, 1.0)],
            vec![0, 2, 1, 0, 3, 2],
        )
    }

    #[test]
    fn append_transformed_rebases_indices() {
        let mut merged = quad();
        let m = Mat4::from_translation(Vec3::new(5.0, 1.0, 0.0));
        merged.append_transformed(&quad(), &m);
        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.triangle_count(), 4);
        assert_eq!(&merged.indices[6..9], &[4, 6, 5]);
        assert_eq!(merged.vertices[4].pos, [5.0, 1.0, 0.0]);
    }

    #[test]
    fn recompute_normals_faces_up_for_ccw_from_above() {
        let mut m = quad();
        for v in &mut m.vertices {
            v.nrm = [0.0, 0.0, 0.0];
        }
        m.recompute_normals();
        for v in &m.vertices {
            assert!((Vec3::from(v.nrm) - Vec3::Y).length() < 1e-5, "{:?}", v.nrm);
        }
    }

    #[test]
    fn aabb_distance_is_zero_inside() {
        let b = Aabb {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        assert_eq!(b.distance_sq(Vec3::splat(0.5)), 0.0);
        assert!((b.distance_sq(Vec3::new(3.0, 0.5, 0.5)) - 4.0).abs() < 1e-6);
    }
}
