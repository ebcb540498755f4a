//! validate -> fetch/decode -> cache, with procedural fallback and request coalescing.
//!
//! The cache and the in-flight map live under one mutex so a key is never
//! both loading and cached, and at most one load per key runs at a time.
//! A shared load is not cancelled when a caller drops its future; the next
//! awaiter (or the next `load` of that key) drives it to completion.

use std::collections::HashMap;
use std::sync::Arc;

use data_runtime::configs::pipeline::AssetsCfg;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use procgen::AssetCategory;

use crate::cache::{AssetCache, AssetOrigin, LoadedAsset};
use crate::decode::{AssetDecoder, GltfDecoder};
use crate::error::AssetError;
use crate::key::AssetKey;
use crate::source::{AssetSource, FsAssetSource};
use crate::validate::AssetValidator;

type LoadFuture = Shared<BoxFuture<'static, Arc<LoadedAsset>>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct LoaderStats {
    /// Requests answered straight from the cache.
    pub hits: u64,
    /// Requests that joined an in-flight load.
    pub coalesced: u64,
    pub authored: u64,
    pub procedural: u64,
}

#[derive(Default)]
struct LoaderState {
    cache: AssetCache,
    in_flight: HashMap<AssetKey, LoadFuture>,
    stats: LoaderStats,
}

#[derive(Clone)]
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    decoder: Arc<dyn AssetDecoder>,
    validator: AssetValidator,
    extension: String,
    state: Arc<Mutex<LoaderState>>,
}

impl AssetLoader {
    pub fn new(
        source: Arc<dyn AssetSource>,
        decoder: Arc<dyn AssetDecoder>,
        validator: AssetValidator,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            source,
            decoder,
            validator,
            extension: extension.into(),
            state: Arc::new(Mutex::new(LoaderState::default())),
        }
    }

    /// Filesystem source rooted at `cfg.root`, glTF decoding.
    pub fn from_cfg(cfg: &AssetsCfg) -> Self {
        Self::new(
            Arc::new(FsAssetSource::new(&cfg.root)),
            Arc::new(GltfDecoder),
            AssetValidator::new(cfg.min_bytes),
            cfg.extension.clone(),
        )
    }

    pub fn source(&self) -> &Arc<dyn AssetSource> {
        &self.source
    }

    pub fn decoder(&self) -> &Arc<dyn AssetDecoder> {
        &self.decoder
    }

    /// Always resolves to a renderable instance.
    pub async fn load(&self, category: AssetCategory, variant: &str) -> LoadedAsset {
        let key = AssetKey::new(category, variant);
        let pending = {
            let mut st = self.state.lock();
            if let Some(asset) = st.cache.get(&key) {
                st.stats.hits += 1;
                log::debug!("loader: cache hit {key}");
                return asset.instance();
            }
            let joined = st.in_flight.get(&key).cloned();
            match joined {
                Some(f) => {
                    st.stats.coalesced += 1;
                    log::debug!("loader: joining in-flight load of {key}");
                    f
                }
                None => {
                    let f = self.resolve(key.clone()).boxed().shared();
                    st.in_flight.insert(key, f.clone());
                    f
                }
            }
        };
        pending.await.instance()
    }

    /// String-typed entry point; an unknown category yields a default cube (not cached).
    pub async fn load_named(&self, category: &str, variant: &str) -> LoadedAsset {
        match category.parse::<AssetCategory>() {
            Ok(cat) => self.load(cat, variant).await,
            Err(e) => {
                log::warn!("loader: {e}; using default primitive for '{variant}'");
                LoadedAsset::procedural(procgen::default_primitive(variant))
            }
        }
    }

    /// Warm the cache for several assets concurrently. Returns how many are now cached.
    pub async fn preload(&self, items: &[(AssetCategory, &str)]) -> usize {
        let loads = items.iter().map(|(c, v)| self.load(*c, v));
        futures::future::join_all(loads).await;
        items
            .iter()
            .filter(|(c, v)| self.is_cached(*c, v))
            .count()
    }

    pub fn is_cached(&self, category: AssetCategory, variant: &str) -> bool {
        self.state.lock().cache.contains(&AssetKey::new(category, variant))
    }

    /// Drop the cached template; live instances are unaffected.
    pub fn evict(&self, category: AssetCategory, variant: &str) -> bool {
        let key = AssetKey::new(category, variant);
        let removed = self.state.lock().cache.remove(&key).is_some();
        if removed {
            log::info!("loader: evicted {key}");
        }
        removed
    }

    pub fn clear(&self) {
        let n = self.state.lock().cache.clear();
        log::info!("loader: cleared {n} cached assets");
    }

    pub fn cached_count(&self) -> usize {
        self.state.lock().cache.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.state.lock().in_flight.len()
    }

    pub fn stats(&self) -> LoaderStats {
        self.state.lock().stats
    }

    fn resolve(&self, key: AssetKey) -> impl Future<Output = Arc<LoadedAsset>> + Send + 'static {
        let source = Arc::clone(&self.source);
        let decoder = Arc::clone(&self.decoder);
        let validator = self.validator;
        let path = key.path(&self.extension);
        let state = Arc::clone(&self.state);
        async move {
            let asset = match load_authored(&*source, &*decoder, validator, &path).await {
                Ok(asset) => asset,
                Err(e) => {
                    log::warn!("loader: {e}; substituting procedural {key}");
                    LoadedAsset::procedural(procgen::generate(key.category(), key.variant()))
                }
            };
            let asset = Arc::new(asset);
            let mut st = state.lock();
            st.in_flight.remove(&key);
            match asset.origin {
                AssetOrigin::Authored => st.stats.authored += 1,
                AssetOrigin::Procedural => st.stats.procedural += 1,
            }
            st.cache.insert(key, Arc::clone(&asset));
            asset
        }
    }
}

async fn load_authored(
    source: &dyn AssetSource,
    decoder: &dyn AssetDecoder,
    validator: AssetValidator,
    path: &str,
) -> Result<LoadedAsset, AssetError> {
    if !validator.validate(source, path).await {
        return Err(AssetError::Invalid(path.to_string()));
    }
    let bytes = source.fetch(path).await?;
    let decoded = decoder.decode(path, &bytes)?;
    if decoded.root.mesh_count() == 0 {
        return Err(AssetError::Empty(path.to_string()));
    }
    log::info!(
        "loader: {path} decoded ({} meshes, {} clips)",
        decoded.root.mesh_count(),
        decoded.clips.len()
    );
    Ok(LoadedAsset::authored(decoded))
}
