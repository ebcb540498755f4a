//! Road-surface heuristics: color, flatness, elevation and name.

use std::sync::{Arc, Weak};

use data_runtime::configs::pipeline::{ClassifierCfg, WeightsCfg};
use glam::{Mat3, Mat4, Vec3};
use scene_core::{Material, MeshData, Node};

/// Weights, cutoffs and keywords. Defaults mirror `ClassifierCfg::default()`.
#[derive(Clone, Debug)]
pub struct ClassifierPolicy {
    pub weights: WeightsCfg,
    pub threshold: f32,
    pub near_black: f32,
    pub dark_gray: f32,
    pub normal_alignment: f32,
    pub flat_strict: f32,
    pub flat_loose: f32,
    pub ground_level: f32,
    pub ground_tolerance: f32,
    /// Lowercase substrings matched against node names.
    pub keywords: Vec<String>,
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self::from(&ClassifierCfg::default())
    }
}

impl From<&ClassifierCfg> for ClassifierPolicy {
    fn from(c: &ClassifierCfg) -> Self {
        Self {
            weights: c.weights,
            threshold: c.threshold,
            near_black: c.near_black,
            dark_gray: c.dark_gray,
            normal_alignment: c.normal_alignment,
            flat_strict: c.flat_strict,
            flat_loose: c.flat_loose,
            ground_level: c.ground_level,
            ground_tolerance: c.ground_tolerance,
            keywords: c.keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }
}

/// Raw heuristic values, each in `{0, 0.5, 1}`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub color: f32,
    pub flatness: f32,
    pub height: f32,
    pub name: f32,
}

impl ScoreBreakdown {
    pub fn weighted(&self, w: &WeightsCfg) -> f32 {
        let total = w.color + w.flatness + w.height + w.name;
        if total <= 0.0 {
            return 0.0;
        }
        let sum = self.color * w.color
            + self.flatness * w.flatness
            + self.height * w.height
            + self.name * w.name;
        (sum / total).clamp(0.0, 1.0)
    }
}

/// A scene mesh judged to be road surface. Holds the geometry weakly.
#[derive(Clone, Debug)]
pub struct SurfaceCandidate {
    pub name: String,
    pub mesh: Weak<MeshData>,
    pub world: Mat4,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

#[derive(Clone, Debug, Default)]
pub struct SurfaceClassifier {
    policy: ClassifierPolicy,
}

impl SurfaceClassifier {
    pub fn new(policy: ClassifierPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ClassifierPolicy {
        &self.policy
    }

    pub fn breakdown(
        &self,
        name: &str,
        mesh: &MeshData,
        material: &Material,
        world: &Mat4,
    ) -> ScoreBreakdown {
        ScoreBreakdown {
            color: self.color_score(material),
            flatness: self.flatness_score(mesh, world),
            height: self.height_score(mesh, world),
            name: self.name_score(name),
        }
    }

    /// Weighted score in `[0, 1]` of one mesh placed at `world`.
    pub fn score(&self, name: &str, mesh: &MeshData, material: &Material, world: &Mat4) -> f32 {
        self.breakdown(name, mesh, material, world)
            .weighted(&self.policy.weights)
    }

    /// Every mesh node scoring above the threshold, best first.
    pub fn classify(&self, scene: &Node) -> Vec<SurfaceCandidate> {
        let mut out = Vec::new();
        let mut seen = 0usize;
        scene.visit_world(&Mat4::IDENTITY, &mut |node, world| {
            let Some(mi) = &node.mesh else {
                return;
            };
            seen += 1;
            let breakdown = self.breakdown(&node.name, &mi.mesh, &mi.material, world);
            let score = breakdown.weighted(&self.policy.weights);
            log::debug!("classify: {} score {score:.2} {breakdown:?}", node.name);
            if score > self.policy.threshold {
                out.push(SurfaceCandidate {
                    name: node.name.clone(),
                    mesh: Arc::downgrade(&mi.mesh),
                    world: *world,
                    score,
                    breakdown,
                });
            }
        });
        out.sort_by(|a, b| b.score.total_cmp(&a.score));
        if out.is_empty() {
            log::warn!("classify: none of {seen} meshes look like road surface");
        } else {
            log::info!("classify: {} of {seen} meshes accepted as road surface", out.len());
        }
        out
    }

    fn color_score(&self, material: &Material) -> f32 {
        let mean = material.luminance_mean();
        if mean < self.policy.near_black {
            1.0
        } else if mean < self.policy.dark_gray {
            0.5
        } else {
            0.0
        }
    }

    fn flatness_score(&self, mesh: &MeshData, world: &Mat4) -> f32 {
        if mesh.vertices.is_empty() {
            return 0.0;
        }
        let normal_m = Mat3::from_mat4(*world).inverse().transpose();
        let up = mesh
            .vertices
            .iter()
            .filter(|v| {
                let n = (normal_m * Vec3::from(v.nrm)).normalize_or_zero();
                n.dot(Vec3::Y) >= self.policy.normal_alignment
            })
            .count();
        let frac = up as f32 / mesh.vertices.len() as f32;
        if frac > self.policy.flat_strict {
            1.0
        } else if frac > self.policy.flat_loose {
            0.5
        } else {
            0.0
        }
    }

    fn height_score(&self, mesh: &MeshData, world: &Mat4) -> f32 {
        let b = mesh.bounds().transformed(world);
        if b.is_empty() {
            return 0.0;
        }
        let dy = (b.min.y - self.policy.ground_level).abs();
        if dy <= self.policy.ground_tolerance {
            1.0
        } else if dy <= 2.0 * self.policy.ground_tolerance {
            0.5
        } else {
            0.0
        }
    }

    fn name_score(&self, name: &str) -> f32 {
        let lower = name.to_lowercase();
        if self.policy.keywords.iter().any(|k| lower.contains(k.as_str())) {
            1.0
        } else {
            0.0
        }
    }
}
