//! Scene -> NavMesh. Accepted surfaces are baked into one world-space buffer;
//! an empty result becomes a flat fallback plane at ground level.

use data_runtime::configs::pipeline::{MAX_FALLBACK_CELLS, PipelineCfg};
use glam::{Mat4, Vec3};
use scene_core::{MeshData, Node, shapes};

use crate::classify::{ClassifierPolicy, SurfaceCandidate, SurfaceClassifier};
use crate::navmesh::NavMesh;

#[derive(Clone, Debug)]
pub struct NavMeshBuilder {
    classifier: SurfaceClassifier,
    zone_id: String,
    fallback_extent: f32,
    fallback_cells: u32,
    snap_distance: f32,
    weld_epsilon: f32,
}

impl Default for NavMeshBuilder {
    fn default() -> Self {
        Self::from_cfg(&PipelineCfg::default())
    }
}

impl NavMeshBuilder {
    pub fn new(classifier: SurfaceClassifier, zone_id: impl Into<String>) -> Self {
        let nav = PipelineCfg::default().navmesh;
        Self {
            classifier,
            zone_id: zone_id.into(),
            fallback_extent: nav.fallback_extent,
            fallback_cells: nav.fallback_cells,
            snap_distance: nav.snap_distance,
            weld_epsilon: nav.weld_epsilon,
        }
    }

    pub fn from_cfg(cfg: &PipelineCfg) -> Self {
        Self {
            classifier: SurfaceClassifier::new(ClassifierPolicy::from(&cfg.classifier)),
            zone_id: cfg.navmesh.zone_id.clone(),
            fallback_extent: cfg.navmesh.fallback_extent,
            fallback_cells: cfg.navmesh.fallback_cells,
            snap_distance: cfg.navmesh.snap_distance,
            weld_epsilon: cfg.navmesh.weld_epsilon,
        }
    }

    pub fn with_fallback(mut self, half_extent: f32, cells: u32) -> Self {
        self.fallback_extent = half_extent;
        self.fallback_cells = cells;
        self
    }

    pub fn classifier(&self) -> &SurfaceClassifier {
        &self.classifier
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn build(&self, scene: &Node) -> NavMesh {
        let candidates = self.classifier.classify(scene);
        self.build_from_candidates(&candidates)
    }

    /// Candidates whose mesh has been dropped since classification are skipped.
    pub fn build_from_candidates(&self, candidates: &[SurfaceCandidate]) -> NavMesh {
        let mut merged = MeshData::default();
        for c in candidates {
            match c.mesh.upgrade() {
                Some(mesh) => merged.append_transformed(&mesh, &c.world),
                None => log::debug!("navmesh: surface {} no longer alive", c.name),
            }
        }
        if merged.triangle_count() == 0 {
            return self.fallback();
        }
        let mesh = NavMesh::from_mesh(
            self.zone_id.clone(),
            &merged,
            self.weld_epsilon,
            self.snap_distance,
            false,
        );
        if mesh.triangle_count() == 0 {
            return self.fallback();
        }
        log::info!(
            "navmesh {}: {} surfaces -> {} tris in {} groups",
            self.zone_id,
            candidates.len(),
            mesh.triangle_count(),
            mesh.group_count()
        );
        mesh
    }

    /// Flat grid centered on the origin at the policy's ground level.
    /// Settings are re-checked here since a builder can be made from an
    /// unvalidated config; bad values fall back to the defaults.
    pub fn fallback(&self) -> NavMesh {
        let defaults = PipelineCfg::default().navmesh;
        let extent = if self.fallback_extent.is_finite() && self.fallback_extent > 0.0 {
            self.fallback_extent.min(MAX_FALLBACK_EXTENT)
        } else {
            log::warn!(
                "navmesh {}: fallback extent {} invalid, using {}",
                self.zone_id,
                self.fallback_extent,
                defaults.fallback_extent
            );
            defaults.fallback_extent
        };
        let cells = self.fallback_cells.clamp(1, MAX_FALLBACK_CELLS);
        let ground = self.classifier.policy().ground_level;
        let ground = if ground.is_finite() { ground } else { 0.0 };
        // Welding must never merge neighbouring grid corners.
        let step = 2.0 * extent / cells as f32;
        let weld = if self.weld_epsilon.is_finite() && self.weld_epsilon > 0.0 {
            self.weld_epsilon
        } else {
            defaults.weld_epsilon
        };
        let weld = weld.min(step * 0.25);
        let snap = if self.snap_distance.is_finite() && self.snap_distance >= 0.0 {
            self.snap_distance
        } else {
            defaults.snap_distance
        };

        log::warn!(
            "navmesh {}: no walkable surfaces, using {}m fallback plane",
            self.zone_id,
            extent * 2.0
        );
        let mut plane = MeshData::default();
        let lift = Mat4::from_translation(Vec3::Y * ground);
        plane.append_transformed(&shapes::grid_plane(extent, cells), &lift);
        NavMesh::from_mesh(self.zone_id.clone(), &plane, weld, snap, true)
    }
}

const MAX_FALLBACK_EXTENT: f32 = 1.0e6;
