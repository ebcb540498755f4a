//! Immutable navigation mesh: welded world-space triangles, adjacency,
//! connected groups and the four movement queries.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use scene_core::{Aabb, MeshData};
use smallvec::SmallVec;

use crate::grid::TriGrid;
use crate::path;

/// Edge shared with a neighbouring triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Portal {
    pub to: u32,
    pub a: u32,
    pub b: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct NavNode {
    pub centroid: Vec3,
    pub group: u32,
    pub portals: SmallVec<[Portal; 3]>,
}

#[derive(Clone, Debug)]
pub struct NavMesh {
    zone_id: String,
    pub(crate) vertices: Vec<Vec3>,
    pub(crate) triangles: Vec<[u32; 3]>,
    pub(crate) nodes: Vec<NavNode>,
    group_count: u32,
    bounds: Aabb,
    grid: TriGrid,
    snap_distance: f32,
    fallback: bool,
}

impl NavMesh {
    /// Weld `mesh` (already in world space) and build the zone structure.
    /// Degenerate triangles are dropped.
    pub fn from_mesh(
        zone_id: impl Into<String>,
        mesh: &MeshData,
        weld_epsilon: f32,
        snap_distance: f32,
        fallback: bool,
    ) -> Self {
        let (vertices, triangles) = weld(mesh, weld_epsilon);
        let bounds = Aabb::from_points(vertices.iter().copied());
        let mut nodes: Vec<NavNode> = triangles
            .iter()
            .map(|t| NavNode {
                centroid: (vertices[t[0] as usize] + vertices[t[1] as usize] + vertices[t[2] as usize])
                    / 3.0,
                group: u32::MAX,
                portals: SmallVec::new(),
            })
            .collect();
        link_neighbours(&triangles, &mut nodes);
        let group_count = assign_groups(&mut nodes);
        let grid = TriGrid::build(&vertices, &triangles);
        Self {
            zone_id: zone_id.into(),
            vertices,
            triangles,
            nodes,
            group_count,
            bounds,
            grid,
            snap_distance,
            fallback,
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn group_count(&self) -> usize {
        self.group_count as usize
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn snap_distance(&self) -> f32 {
        self.snap_distance
    }

    pub(crate) fn corners(&self, tri: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[tri];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Nearest triangle and the closest point on it. Ties go to the lower index.
    pub(crate) fn nearest(&self, p: Vec3) -> Option<(usize, Vec3)> {
        let mut best: Option<(usize, Vec3, f32)> = None;
        self.grid.walk_rings(p, |tris| {
            for &i in tris {
                let i = i as usize;
                let [a, b, c] = self.corners(i);
                let q = closest_on_triangle(p, a, b, c);
                let d = q.distance_squared(p);
                if best.is_none_or(|(bi, _, bd)| d < bd || (d == bd && i < bi)) {
                    best = Some((i, q, d));
                }
            }
            best.map_or(f32::INFINITY, |(_, _, d)| d)
        });
        best.map(|(i, q, _)| (i, q))
    }

    /// Triangle under (or over) `p` whose surface height is closest to `p.y`.
    fn vertical_hit(&self, p: Vec3) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for &i in self.grid.column(p) {
            let i = i as usize;
            let [a, b, c] = self.corners(i);
            if let Some(y) = height_at_xz(p, a, b, c)
                && best.is_none_or(|(bi, by)| {
                    let (d, bd) = ((y - p.y).abs(), (by - p.y).abs());
                    d < bd || (d == bd && i < bi)
                })
            {
                best = Some((i, y));
            }
        }
        best
    }

    /// Parameter along `a + t * d` (XZ) where the line leaves triangle `tri`.
    fn exit_param(&self, tri: usize, a: Vec2, d: Vec2) -> f32 {
        let v = self.corners(tri).map(|c| Vec2::new(c.x, c.z));
        let s = (v[1] - v[0]).perp_dot(v[2] - v[0]).signum();
        let mut t_out = f32::INFINITY;
        for k in 0..3 {
            let (vi, vj) = (v[k], v[(k + 1) % 3]);
            let e = vj - vi;
            let fd = s * e.perp_dot(d);
            if fd < 0.0 {
                t_out = t_out.min(-(s * e.perp_dot(a - vi)) / fd);
            }
        }
        t_out
    }

    /// Whether the XZ projection of segment `a..b` stays over the mesh.
    /// Walks triangle to triangle from the surface under `a`, following
    /// neighbours that share a vertex, so separate levels are not mixed.
    pub(crate) fn segment_over_mesh(&self, a: Vec3, b: Vec3) -> bool {
        let Some((start, start_y)) = self.vertical_hit(a) else {
            return false;
        };
        let a2 = Vec2::new(a.x, a.z);
        let d = Vec2::new(b.x - a.x, b.z - a.z);
        if d.length_squared() < 1e-12 {
            return true;
        }
        // `a` on a shared edge or vertex: start in whichever triangle reaches farthest.
        let mut cur = start;
        let mut t = self.exit_param(start, a2, d);
        for &i in self.grid.column(a) {
            let i = i as usize;
            let [p0, p1, p2] = self.corners(i);
            if let Some(y) = height_at_xz(a, p0, p1, p2)
                && (y - start_y).abs() <= LEVEL_TOLERANCE
            {
                let te = self.exit_param(i, a2, d);
                if te > t {
                    cur = i;
                    t = te;
                }
            }
        }
        let mut steps = self.triangles.len();
        while t < 1.0 - 1e-6 {
            if steps == 0 {
                return false;
            }
            steps -= 1;
            let q = a + (b - a) * t;
            let q2 = Vec2::new(q.x, q.z);
            let shared = self.triangles[cur];
            let mut next: Option<(usize, f32)> = None;
            for &i in self.grid.column(q) {
                let i = i as usize;
                let tri = self.triangles[i];
                if i == cur || !tri.iter().any(|v| shared.contains(v)) {
                    continue;
                }
                if !contains_xz(q2, self.corners(i), EDGE_TOLERANCE) {
                    continue;
                }
                let te = self.exit_param(i, a2, d);
                if te > t + 1e-6 && next.is_none_or(|(_, bt)| te > bt) {
                    next = Some((i, te));
                }
            }
            let Some((n, te)) = next else {
                return false;
            };
            cur = n;
            t = te;
        }
        true
    }

    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        self.nearest(p).map_or(p, |(_, q)| q)
    }

    pub fn is_on_mesh(&self, p: Vec3, tolerance: f32) -> bool {
        self.nearest(p)
            .is_some_and(|(_, q)| q.distance(p) <= tolerance.max(0.0))
    }

    /// Project `p` vertically onto the mesh when it lies over it; otherwise
    /// the nearest surface point.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        match self.vertical_hit(p) {
            Some((_, y)) => Vec3::new(p.x, y, p.z),
            None => self.closest_point(p),
        }
    }

    /// `[start, corners.., end]`. Falls back to `[start, end]` when either end
    /// is farther than the snap distance from the mesh or the ends lie in
    /// disconnected groups.
    pub fn find_path(&self, start: Vec3, end: Vec3) -> Vec<Vec3> {
        let direct = vec![start, end];
        let snap = |p: Vec3| {
            self.nearest(p)
                .filter(|(_, q)| q.distance(p) <= self.snap_distance)
                .map(|(i, _)| i)
        };
        let (Some(s), Some(e)) = (snap(start), snap(end)) else {
            log::debug!("navmesh {}: path endpoint off mesh", self.zone_id);
            return direct;
        };
        if self.nodes[s].group != self.nodes[e].group {
            log::debug!("navmesh {}: endpoints in different groups", self.zone_id);
            return direct;
        }
        if s == e {
            return direct;
        }
        match path::astar(self, s, e) {
            Some(corridor) => path::string_pull(self, &corridor, start, end),
            None => direct,
        }
    }
}

fn weld(mesh: &MeshData, eps: f32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let eps = eps.max(1e-6);
    let mut index_of: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut vertices = Vec::new();
    let remap: Vec<u32> = mesh
        .vertices
        .iter()
        .map(|v| {
            let p = Vec3::from(v.pos);
            let key = (
                (p.x / eps).round() as i64,
                (p.y / eps).round() as i64,
                (p.z / eps).round() as i64,
            );
            *index_of.entry(key).or_insert_with(|| {
                vertices.push(p);
                (vertices.len() - 1) as u32
            })
        })
        .collect();
    let triangles = mesh
        .triangles()
        .filter_map(|[a, b, c]| {
            let t = [
                *remap.get(a as usize)?,
                *remap.get(b as usize)?,
                *remap.get(c as usize)?,
            ];
            if t[0] == t[1] || t[1] == t[2] || t[0] == t[2] {
                return None;
            }
            let [pa, pb, pc] = t.map(|i| vertices[i as usize]);
            ((pb - pa).cross(pc - pa).length_squared() > 1e-12).then_some(t)
        })
        .collect();
    (vertices, triangles)
}

fn link_neighbours(triangles: &[[u32; 3]], nodes: &mut [NavNode]) {
    let mut edges: HashMap<(u32, u32), SmallVec<[u32; 2]>> = HashMap::new();
    for (ti, t) in triangles.iter().enumerate() {
        for (u, v) in [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            edges.entry((u.min(v), u.max(v))).or_default().push(ti as u32);
        }
    }
    for ((a, b), tris) in edges {
        for (i, &x) in tris.iter().enumerate() {
            for &y in &tris[i + 1..] {
                nodes[x as usize].portals.push(Portal { to: y, a, b });
                nodes[y as usize].portals.push(Portal { to: x, a, b });
            }
        }
    }
}

fn assign_groups(nodes: &mut [NavNode]) -> u32 {
    let mut group = 0u32;
    let mut stack = Vec::new();
    for seed in 0..nodes.len() {
        if nodes[seed].group != u32::MAX {
            continue;
        }
        nodes[seed].group = group;
        stack.push(seed);
        while let Some(n) = stack.pop() {
            for i in 0..nodes[n].portals.len() {
                let to = nodes[n].portals[i].to as usize;
                if nodes[to].group == u32::MAX {
                    nodes[to].group = group;
                    stack.push(to);
                }
            }
        }
        group += 1;
    }
    group
}

/// Closest point on triangle `abc` to `p` (Voronoi-region walk).
pub(crate) fn closest_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }
    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

/// Height difference still treated as the same walking level.
const LEVEL_TOLERANCE: f32 = 0.05;
/// Meters a point may sit outside a triangle edge and still count as on it.
const EDGE_TOLERANCE: f32 = 1e-4;

fn contains_xz(p: Vec2, tri: [Vec3; 3], tol: f32) -> bool {
    let v = tri.map(|c| Vec2::new(c.x, c.z));
    let s = (v[1] - v[0]).perp_dot(v[2] - v[0]).signum();
    (0..3).all(|k| {
        let e = v[(k + 1) % 3] - v[k];
        let len = e.length();
        len > 0.0 && s * e.perp_dot(p - v[k]) / len >= -tol
    })
}

/// Surface height of `abc` at `p`'s XZ position, if `p` projects inside it.
fn height_at_xz(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let v0 = Vec2::new(b.x - a.x, b.z - a.z);
    let v1 = Vec2::new(c.x - a.x, c.z - a.z);
    let v2 = Vec2::new(p.x - a.x, p.z - a.z);
    let den = v0.perp_dot(v1);
    if den.abs() < 1e-12 {
        return None;
    }
    let v = v2.perp_dot(v1) / den;
    let w = v0.perp_dot(v2) / den;
    let u = 1.0 - v - w;
    const EPS: f32 = -1e-5;
    (u >= EPS && v >= EPS && w >= EPS).then(|| a.y * u + b.y * v + c.y * w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::shapes;

    fn plane() -> NavMesh {
        NavMesh::from_mesh("test", &shapes::grid_plane(10.0, 4), 1e-3, 5.0, false)
    }

    #[test]
    fn welded_grid_is_one_group() {
        let m = plane();
        assert_eq!(m.triangle_count(), 32);
        assert_eq!(m.vertex_count(), 25);
        assert_eq!(m.group_count(), 1);
    }

    #[test]
    fn duplicate_vertices_are_welded_and_degenerates_dropped() {
        // Two triangles authored with separate vertices along the shared edge.
        let v = |x: f32, z: f32| scene_core::Vertex {
            pos: [x, 0.0, z],
            nrm: [0.0, 1.0, 0.0],
        };
        let mesh = MeshData::new(
            vec![v(0.0, 0.0), v(0.0, 1.0), v(1.0, 0.0), v(1.0, 0.0), v(0.0, 1.0), v(1.0, 1.0), v(2.0, 2.0)],
            vec![0, 1, 2, 3, 4, 5, 6, 6, 6],
        );
        let m = NavMesh::from_mesh("w", &mesh, 1e-3, 5.0, false);
        assert_eq!(m.triangle_count(), 2);
        assert_eq!(m.group_count(), 1);
        assert_eq!(m.nodes[0].portals.len(), 1);
    }

    #[test]
    fn closest_point_and_clamp() {
        let m = plane();
        let above = Vec3::new(2.0, 3.0, -1.0);
        assert!((m.clamp(above) - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
        assert!((m.closest_point(above) - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
        let outside = Vec3::new(15.0, 0.0, 0.0);
        assert!((m.clamp(outside) - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
        assert!(m.is_on_mesh(Vec3::new(1.0, 0.05, 1.0), 0.1));
        assert!(!m.is_on_mesh(Vec3::new(1.0, 2.0, 1.0), 0.1));
    }

    #[test]
    fn segment_walk_catches_thin_notches() {
        // 10 m square with a 5 cm wide slot cut from z = 0 up to z = 6.
        let v = |x: f32, z: f32| scene_core::Vertex {
            pos: [x, 0.0, z],
            nrm: [0.0, 1.0, 0.0],
        };
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        for (x0, z0, x1, z1) in [
            (0.0, 0.0, 5.0, 6.0),
            (5.05, 0.0, 10.0, 6.0),
            (0.0, 6.0, 5.0, 10.0),
            (5.0, 6.0, 5.05, 10.0),
            (5.05, 6.0, 10.0, 10.0),
        ] {
            let base = vertices.len() as u32;
            vertices.extend([v(x0, z0), v(x1, z0), v(x1, z1), v(x0, z1)]);
            indices.extend([0, 2, 1, 0, 3, 2].map(|i| base + i));
        }
        let m = NavMesh::from_mesh("slot", &MeshData::new(vertices, indices), 1e-3, 5.0, false);
        assert_eq!(m.group_count(), 1);
        assert!(!m.segment_over_mesh(Vec3::new(1.0, 0.0, 3.0), Vec3::new(9.0, 0.0, 3.0)));
        assert!(m.segment_over_mesh(Vec3::new(1.0, 0.0, 8.0), Vec3::new(9.0, 0.0, 8.0)));
        assert!(!m.segment_over_mesh(Vec3::new(1.0, 0.0, 1.0), Vec3::new(9.0, 0.0, 9.0)));
        assert!(m.segment_over_mesh(Vec3::new(2.0, 0.0, 2.0), Vec3::new(2.0, 0.0, 9.0)));
    }

    #[test]
    fn segment_walk_stays_on_its_level() {
        // Deck 3 m above a ground plane of the same footprint, not connected.
        let ground = shapes::grid_plane(10.0, 2);
        let mut both = MeshData::default();
        both.append_transformed(&ground, &glam::Mat4::IDENTITY);
        let deck = shapes::grid_plane(2.0, 1);
        both.append_transformed(&deck, &glam::Mat4::from_translation(Vec3::Y * 3.0));
        let m = NavMesh::from_mesh("levels", &both, 1e-3, 5.0, false);
        assert_eq!(m.group_count(), 2);
        assert!(m.segment_over_mesh(Vec3::new(-8.0, 0.0, 1.0), Vec3::new(8.0, 0.0, 1.0)));
        assert!(!m.segment_over_mesh(Vec3::new(0.0, 3.0, 0.0), Vec3::new(8.0, 3.0, 0.0)));
    }

    #[test]
    fn nearest_matches_brute_force() {
        let m = NavMesh::from_mesh("big", &shapes::grid_plane(50.0, 20), 1e-3, 5.0, false);
        for p in [
            Vec3::new(3.3, 1.0, -7.1),
            Vec3::new(49.9, -2.0, 49.9),
            Vec3::new(-120.0, 4.0, 17.0),
            Vec3::new(0.0, 0.0, 0.0),
        ] {
            let (_, q) = m.nearest(p).expect("hit");
            let brute = (0..m.triangle_count())
                .map(|i| {
                    let [a, b, c] = m.corners(i);
                    closest_on_triangle(p, a, b, c).distance(p)
                })
                .fold(f32::INFINITY, f32::min);
            assert!((q.distance(p) - brute).abs() < 1e-4, "at {p}");
        }
    }

    #[test]
    fn closest_on_triangle_regions() {
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Z);
        assert_eq!(closest_on_triangle(Vec3::new(-1.0, 0.0, -1.0), a, b, c), a);
        assert_eq!(closest_on_triangle(Vec3::new(2.0, 0.0, 0.0), a, b, c), b);
        let inside = closest_on_triangle(Vec3::new(0.2, 1.0, 0.2), a, b, c);
        assert!((inside - Vec3::new(0.2, 0.0, 0.2)).length() < 1e-6);
        let edge = closest_on_triangle(Vec3::new(0.5, 0.0, -1.0), a, b, c);
        assert!((edge - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
    }
}
