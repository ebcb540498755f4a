//! Named clip set loaded once from a manifest of per-clip sources.

use std::collections::BTreeMap;
use std::sync::Arc;

use asset_runtime::{AssetDecoder, AssetSource, GltfDecoder, MemoryAssetSource};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use scene_core::AnimationClip;

/// Logical clip name -> clip.
pub type ClipMap = BTreeMap<String, Arc<AnimationClip>>;

type LoadAll = Shared<BoxFuture<'static, Arc<ClipMap>>>;

enum LibState {
    Unloaded,
    Loading(LoadAll),
    Loaded(Arc<ClipMap>),
}

struct Inner {
    state: LibState,
    /// Bumped by teardown so a load started before it cannot publish.
    epoch: u64,
}

pub struct AnimationLibrary {
    source: Arc<dyn AssetSource>,
    decoder: Arc<dyn AssetDecoder>,
    manifest: BTreeMap<String, String>,
    inner: Arc<Mutex<Inner>>,
}

impl AnimationLibrary {
    /// `manifest` maps logical names (`idle`, `walk` ...) to source paths.
    pub fn new(
        source: Arc<dyn AssetSource>,
        decoder: Arc<dyn AssetDecoder>,
        manifest: BTreeMap<String, String>,
    ) -> Self {
        Self {
            source,
            decoder,
            manifest,
            inner: Arc::new(Mutex::new(Inner {
                state: LibState::Unloaded,
                epoch: 0,
            })),
        }
    }

    /// Already-built clips, available without loading. Keyed by clip name.
    pub fn from_clips<I: IntoIterator<Item = AnimationClip>>(clips: I) -> Self {
        let lib = Self::new(
            Arc::new(MemoryAssetSource::new()),
            Arc::new(GltfDecoder),
            BTreeMap::new(),
        );
        let map: ClipMap = clips
            .into_iter()
            .map(|c| (c.name.clone(), Arc::new(c)))
            .collect();
        lib.inner.lock().state = LibState::Loaded(Arc::new(map));
        lib
    }

    pub fn manifest(&self) -> &BTreeMap<String, String> {
        &self.manifest
    }

    /// Idempotent: concurrent callers share one load and later callers get
    /// the stored result until `teardown`.
    pub async fn load_all(&self) -> Arc<ClipMap> {
        let pending = {
            let mut inner = self.inner.lock();
            let existing = match &inner.state {
                LibState::Loaded(map) => return Arc::clone(map),
                LibState::Loading(f) => Some(f.clone()),
                LibState::Unloaded => None,
            };
            match existing {
                Some(f) => f,
                None => {
                    let f = self.load_manifest(inner.epoch).boxed().shared();
                    inner.state = LibState::Loading(f.clone());
                    f
                }
            }
        };
        pending.await
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.inner.lock().state, LibState::Loaded(_))
    }

    pub fn get(&self, name: &str) -> Option<Arc<AnimationClip>> {
        match &self.inner.lock().state {
            LibState::Loaded(map) => map.get(name).cloned(),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<String> {
        match &self.inner.lock().state {
            LibState::Loaded(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Release every clip. Clips already handed out stay alive with their holders.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.state = LibState::Unloaded;
        log::info!("animations: library torn down");
    }

    fn load_manifest(&self, epoch: u64) -> impl Future<Output = Arc<ClipMap>> + Send + 'static {
        let source = Arc::clone(&self.source);
        let decoder = Arc::clone(&self.decoder);
        let manifest = self.manifest.clone();
        let inner = Arc::clone(&self.inner);
        async move {
            let loads = manifest.iter().map(|(name, path)| {
                let (source, decoder) = (Arc::clone(&source), Arc::clone(&decoder));
                async move {
                    load_clip(&*source, &*decoder, name, path)
                        .await
                        .map(|c| (name.clone(), Arc::new(c)))
                }
            });
            let map: ClipMap = futures::future::join_all(loads)
                .await
                .into_iter()
                .flatten()
                .collect();
            log::info!(
                "animations: {} of {} clips loaded",
                map.len(),
                manifest.len()
            );
            let map = Arc::new(map);
            let mut guard = inner.lock();
            if guard.epoch == epoch {
                guard.state = LibState::Loaded(Arc::clone(&map));
            }
            map
        }
    }
}

async fn load_clip(
    source: &dyn AssetSource,
    decoder: &dyn AssetDecoder,
    name: &str,
    path: &str,
) -> Option<AnimationClip> {
    let bytes = match source.fetch(path).await {
        Ok(b) => b,
        Err(e) => {
            log::warn!("animations: {name}: {e}");
            return None;
        }
    };
    let decoded = match decoder.decode(path, &bytes) {
        Ok(d) => d,
        Err(e) => {
            log::warn!("animations: {name}: {e}");
            return None;
        }
    };
    // Prefer a clip carrying the logical name; otherwise the file's first clip.
    let clip = decoded
        .clips
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .or_else(|| decoded.clips.first());
    match clip {
        Some(c) => Some(c.renamed(name)),
        None => {
            log::warn!("animations: {name}: {path} has no animation");
            None
        }
    }
}
