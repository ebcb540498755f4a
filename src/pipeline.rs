//! Scene setup: actor models through the loader, the navmesh from the city
//! scene, and one animation controller fed by the shared clip library.

use std::collections::BTreeMap;
use std::sync::Arc;

use anim_runtime::{ActorAnimationController, ActorId, AnimationLibrary, PlayOptions};
use asset_runtime::{AssetCategory, AssetError, AssetLoader, LoadedAsset};
use data_runtime::configs::pipeline::PipelineCfg;
use glam::Vec3;
use nav_core::{NavMesh, NavMeshBuilder, SharedNavMesh};
use scene_core::Node;

/// One actor requested by scene setup.
#[derive(Clone, Debug)]
pub struct ActorSpec {
    pub id: ActorId,
    pub category: AssetCategory,
    pub variant: String,
    /// Requested spawn point; snapped onto the navmesh.
    pub position: Vec3,
    /// Clip started on spawn, looping.
    pub clip: String,
}

impl ActorSpec {
    pub fn new(id: u64, category: AssetCategory, variant: &str, position: Vec3) -> Self {
        Self {
            id: ActorId(id),
            category,
            variant: variant.to_string(),
            position,
            clip: "idle".to_string(),
        }
    }

    pub fn with_clip(mut self, clip: &str) -> Self {
        self.clip = clip.to_string();
        self
    }
}

#[derive(Debug)]
pub struct SpawnedActor {
    pub id: ActorId,
    pub model: LoadedAsset,
    pub position: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneReport {
    pub actors: usize,
    /// Actors rendered with procedural stand-ins.
    pub procedural: usize,
    /// Actors whose spawn clip was found.
    pub animated: usize,
    pub clips: usize,
    pub nav_triangles: usize,
    pub nav_groups: usize,
    pub nav_fallback: bool,
}

pub struct ClientPipeline {
    loader: AssetLoader,
    builder: NavMeshBuilder,
    navmesh: Arc<SharedNavMesh>,
    library: Arc<AnimationLibrary>,
    animator: ActorAnimationController,
    actors: BTreeMap<ActorId, SpawnedActor>,
}

impl ClientPipeline {
    pub fn new(loader: AssetLoader, builder: NavMeshBuilder, library: Arc<AnimationLibrary>) -> Self {
        let navmesh = Arc::new(SharedNavMesh::with_fallback(&builder));
        let animator = ActorAnimationController::new(Arc::clone(&library));
        Self {
            loader,
            builder,
            navmesh,
            library,
            animator,
            actors: BTreeMap::new(),
        }
    }

    /// Filesystem assets under `cfg.assets.root`; clips from the same root.
    pub fn from_cfg(cfg: &PipelineCfg) -> Self {
        let loader = AssetLoader::from_cfg(&cfg.assets);
        let library = AnimationLibrary::new(
            Arc::clone(loader.source()),
            Arc::clone(loader.decoder()),
            cfg.animations.clips.clone(),
        );
        Self::new(loader, NavMeshBuilder::from_cfg(cfg), Arc::new(library))
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    pub fn animator(&self) -> &ActorAnimationController {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ActorAnimationController {
        &mut self.animator
    }

    /// Handle for movement code; survives later rebuilds.
    pub fn shared_navmesh(&self) -> Arc<SharedNavMesh> {
        Arc::clone(&self.navmesh)
    }

    pub fn navmesh(&self) -> Arc<NavMesh> {
        self.navmesh.current()
    }

    /// Fetch and decode a scene file (e.g. the city) through the asset source.
    pub async fn load_scene(&self, path: &str) -> Result<Node, AssetError> {
        let bytes = self.loader.source().fetch(path).await?;
        let decoded = self.loader.decoder().decode(path, &bytes)?;
        Ok(decoded.root)
    }

    /// Load clips and actor models concurrently, build the navmesh from
    /// `city` when given, then spawn every actor onto the mesh.
    pub async fn setup(&mut self, city: Option<&Node>, roster: &[ActorSpec]) -> SceneReport {
        let (clips, models) = {
            let loader = &self.loader;
            let models = roster.iter().map(|a| loader.load(a.category, &a.variant));
            futures::future::join(
                self.library.load_all(),
                futures::future::join_all(models),
            )
            .await
        };

        if let Some(city) = city {
            self.navmesh.rebuild(&self.builder, city);
        }
        let nav = self.navmesh.current();

        let mut report = SceneReport {
            clips: clips.len(),
            nav_triangles: nav.triangle_count(),
            nav_groups: nav.group_count(),
            nav_fallback: nav.is_fallback(),
            ..SceneReport::default()
        };
        for (spec, model) in roster.iter().zip(models) {
            if model.is_procedural() {
                report.procedural += 1;
            }
            if self.spawn(spec, model, &nav) {
                report.animated += 1;
            }
            report.actors += 1;
        }
        log::info!(
            "scene: {} actors ({} procedural), {} clips, navmesh {} tris{}",
            report.actors,
            report.procedural,
            report.clips,
            report.nav_triangles,
            if report.nav_fallback { " (fallback)" } else { "" }
        );
        report
    }

    /// Returns whether the spawn clip started.
    fn spawn(&mut self, spec: &ActorSpec, mut model: LoadedAsset, nav: &NavMesh) -> bool {
        let position = nav.clamp(spec.position);
        model.root.transform.translation = position;
        let animated = self
            .animator
            .play(spec.id, &spec.clip, PlayOptions::looped())
            .is_some();
        if self.actors.contains_key(&spec.id) {
            log::warn!("scene: actor {} respawned", spec.id.0);
        }
        self.actors.insert(
            spec.id,
            SpawnedActor {
                id: spec.id,
                model,
                position,
            },
        );
        animated
    }

    pub fn actor(&self, id: ActorId) -> Option<&SpawnedActor> {
        self.actors.get(&id)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Advance animation and write each actor's blended pose onto its model.
    pub fn tick(&mut self, dt: f32) {
        self.animator.update(dt);
        for (id, actor) in &mut self.actors {
            let pose = self.animator.sample_pose(*id);
            actor.model.root.apply_pose(&pose);
        }
    }

    /// Waypoints from the actor's position to `target`.
    pub fn path_for(&self, id: ActorId, target: Vec3) -> Option<Vec<Vec3>> {
        let actor = self.actors.get(&id)?;
        Some(self.navmesh.current().find_path(actor.position, target))
    }

    /// Move an actor, keeping it on the navmesh. Returns the clamped position.
    pub fn move_actor(&mut self, id: ActorId, to: Vec3) -> Option<Vec3> {
        let nav = self.navmesh.current();
        let actor = self.actors.get_mut(&id)?;
        actor.position = nav.clamp(to);
        actor.model.root.transform.translation = actor.position;
        Some(actor.position)
    }

    pub fn despawn(&mut self, id: ActorId) -> bool {
        self.animator.remove(id);
        self.actors.remove(&id).is_some()
    }

    /// Drop actors, clips and cached templates. The navmesh stays published.
    pub fn teardown(&mut self) {
        let ids: Vec<ActorId> = self.actors.keys().copied().collect();
        for id in ids {
            self.despawn(id);
        }
        self.library.teardown();
        self.loader.clear();
    }
}
