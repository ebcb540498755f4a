//! Loaded assets keyed by `AssetKey`. Disposal is explicit: nothing is evicted implicitly.

use std::collections::HashMap;
use std::sync::Arc;

use scene_core::{AnimationClip, Node, Skeleton};

use crate::decode::DecodedAsset;
use crate::key::AssetKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetOrigin {
    /// Decoded from a real source file.
    Authored,
    /// Substituted by the procedural generator.
    Procedural,
}

/// Cached template; consumers get instances via [`LoadedAsset::instance`].
#[derive(Clone, Debug)]
pub struct LoadedAsset {
    pub root: Node,
    pub clips: Vec<Arc<AnimationClip>>,
    pub skeleton: Option<Skeleton>,
    pub origin: AssetOrigin,
}

impl LoadedAsset {
    pub fn authored(decoded: DecodedAsset) -> Self {
        Self {
            root: decoded.root,
            clips: decoded.clips.into_iter().map(Arc::new).collect(),
            skeleton: decoded.skeleton,
            origin: AssetOrigin::Authored,
        }
    }

    pub fn procedural(root: Node) -> Self {
        Self {
            root,
            clips: Vec::new(),
            skeleton: None,
            origin: AssetOrigin::Procedural,
        }
    }

    /// Independent hierarchy and transforms; geometry, materials and clips stay shared.
    pub fn instance(&self) -> LoadedAsset {
        LoadedAsset {
            root: self.root.instantiate(),
            clips: self.clips.clone(),
            skeleton: self.skeleton.clone(),
            origin: self.origin,
        }
    }

    pub fn is_procedural(&self) -> bool {
        self.origin == AssetOrigin::Procedural
    }

    pub fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }
}

#[derive(Default)]
pub struct AssetCache {
    entries: HashMap<AssetKey, Arc<LoadedAsset>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &AssetKey) -> Option<Arc<LoadedAsset>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Replaces any previous entry; one asset per key.
    pub fn insert(&mut self, key: AssetKey, asset: Arc<LoadedAsset>) {
        if self.entries.insert(key.clone(), asset).is_some() {
            log::debug!("cache: replaced {key}");
        }
    }

    pub fn remove(&mut self, key: &AssetKey) -> Option<Arc<LoadedAsset>> {
        let out = self.entries.remove(key);
        if out.is_some() {
            log::debug!("cache: disposed {key}");
        }
        out
    }

    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.entries.keys()
    }
}
