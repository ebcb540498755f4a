//! A* over triangle centroids, then funnel string-pulling through the corridor.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;

use crate::navmesh::NavMesh;

#[derive(Clone, Copy, PartialEq)]
struct Open {
    f: f32,
    node: usize,
}

impl Eq for Open {}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on f.
        other.f.total_cmp(&self.f).then(self.node.cmp(&other.node))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Triangle corridor from `start` to `goal`, both inclusive.
pub(crate) fn astar(mesh: &NavMesh, start: usize, goal: usize) -> Option<Vec<usize>> {
    let n = mesh.nodes.len();
    let goal_c = mesh.nodes[goal].centroid;
    let mut g = vec![f32::INFINITY; n];
    let mut came = vec![usize::MAX; n];
    let mut closed = vec![false; n];
    let mut open = BinaryHeap::new();
    g[start] = 0.0;
    open.push(Open {
        f: mesh.nodes[start].centroid.distance(goal_c),
        node: start,
    });
    while let Some(Open { node, .. }) = open.pop() {
        if node == goal {
            let mut out = vec![goal];
            let mut cur = goal;
            while came[cur] != usize::MAX {
                cur = came[cur];
                out.push(cur);
            }
            out.reverse();
            return Some(out);
        }
        if closed[node] {
            continue;
        }
        closed[node] = true;
        let here = mesh.nodes[node].centroid;
        for p in &mesh.nodes[node].portals {
            let to = p.to as usize;
            if closed[to] {
                continue;
            }
            let there = mesh.nodes[to].centroid;
            let cost = g[node] + here.distance(there);
            if cost < g[to] {
                g[to] = cost;
                came[to] = node;
                open.push(Open {
                    f: cost + there.distance(goal_c),
                    node: to,
                });
            }
        }
    }
    None
}

/// Signed area in the XZ plane; positive when `b` is left of `a`.
fn cross_xz(a: Vec3, b: Vec3) -> f32 {
    a.x * b.z - a.z * b.x
}

fn same(a: Vec3, b: Vec3) -> bool {
    a.distance_squared(b) < 1e-12
}

/// (left, right) edge endpoints for every step of the corridor, bracketed
/// by degenerate start and end portals.
fn portals(mesh: &NavMesh, corridor: &[usize], start: Vec3, end: Vec3) -> Vec<(Vec3, Vec3)> {
    let mut out = Vec::with_capacity(corridor.len() + 1);
    out.push((start, start));
    for w in corridor.windows(2) {
        let (from, to) = (&mesh.nodes[w[0]], &mesh.nodes[w[1]]);
        let Some(p) = from.portals.iter().find(|p| p.to as usize == w[1]) else {
            continue;
        };
        let (a, b) = (mesh.vertices[p.a as usize], mesh.vertices[p.b as usize]);
        let dir = to.centroid - from.centroid;
        let mid = (a + b) * 0.5;
        if cross_xz(dir, a - mid) > 0.0 {
            out.push((a, b));
        } else {
            out.push((b, a));
        }
    }
    out.push((end, end));
    out
}

/// Simple stupid funnel over the corridor portals.
pub(crate) fn string_pull(mesh: &NavMesh, corridor: &[usize], start: Vec3, end: Vec3) -> Vec<Vec3> {
    let portals = portals(mesh, corridor, start, end);
    let mut pts = vec![start];
    let (mut apex, mut left, mut right) = (start, start, start);
    let (mut left_i, mut right_i) = (0usize, 0usize);
    let mut i = 1;
    while i < portals.len() {
        let (pl, pr) = portals[i];
        let (va, vb) = (pl - apex, pr - apex);
        // Apex sits on this portal: it constrains nothing.
        if cross_xz(va, vb).abs() < 1e-9 && va.x * vb.x + va.z * vb.z <= 0.0 && !same(pl, pr) {
            i += 1;
            continue;
        }

        if cross_xz(right - apex, pr - apex) >= 0.0 {
            if same(apex, right) || cross_xz(left - apex, pr - apex) < 0.0 {
                right = pr;
                right_i = i;
            } else {
                pts.push(left);
                apex = left;
                right = apex;
                right_i = left_i;
                i = left_i + 1;
                continue;
            }
        }

        if cross_xz(left - apex, pl - apex) <= 0.0 {
            if same(apex, left) || cross_xz(right - apex, pl - apex) > 0.0 {
                left = pl;
                left_i = i;
            } else {
                pts.push(right);
                apex = right;
                left = apex;
                left_i = right_i;
                i = right_i + 1;
                continue;
            }
        }
        i += 1;
    }
    pts.push(end);
    pts.dedup_by(|a, b| same(*a, *b));
    if pts.len() == 1 {
        pts.push(end);
    }
    shortcut(mesh, &pts)
}

/// Centroid-guided corridors can hug one side of open areas; drop corners
/// whose neighbours see each other across the mesh.
fn shortcut(mesh: &NavMesh, pts: &[Vec3]) -> Vec<Vec3> {
    let mut out = vec![pts[0]];
    let mut i = 0;
    while i + 1 < pts.len() {
        let mut j = pts.len() - 1;
        while j > i + 1 && !mesh.segment_over_mesh(pts[i], pts[j]) {
            j -= 1;
        }
        out.push(pts[j]);
        i = j;
    }
    out
}
