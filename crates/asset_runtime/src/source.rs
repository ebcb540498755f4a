//! Byte sources for authored assets.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::RwLock;

use crate::error::SourceError;

/// Where asset bytes come from. Paths are `/`-separated and relative to the source root.
pub trait AssetSource: Send + Sync + 'static {
    /// Byte length without reading the content.
    fn probe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<u64, SourceError>>;

    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, SourceError>>;
}

/// Files under a root directory.
///
/// Reads use blocking `std::fs` and finish within the first poll, so the
/// calling task does not suspend while a file is read. Drive loads from a
/// loading task (or keep files small) when frame time matters.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|seg| !seg.is_empty() && *seg != "..")
            .fold(self.root.clone(), |acc, seg| acc.join(seg))
    }
}

impl AssetSource for FsAssetSource {
    fn probe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<u64, SourceError>> {
        async move {
            let meta =
                std::fs::metadata(self.resolve(path)).map_err(|e| SourceError::from_io(path, e))?;
            if !meta.is_file() {
                return Err(SourceError::NotFound(path.to_string()));
            }
            Ok(meta.len())
        }
        .boxed()
    }

    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, SourceError>> {
        async move { std::fs::read(self.resolve(path)).map_err(|e| SourceError::from_io(path, e)) }
            .boxed()
    }
}

/// In-memory map of path to bytes; useful for bundled content and tests.
#[derive(Default)]
pub struct MemoryAssetSource {
    files: RwLock<HashMap<String, Arc<[u8]>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.write().insert(path.into(), bytes.into());
    }

    pub fn remove(&self, path: &str) -> bool {
        self.files.write().remove(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }

    fn get(&self, path: &str) -> Result<Arc<[u8]>, SourceError> {
        self.files
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

impl AssetSource for MemoryAssetSource {
    fn probe<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<u64, SourceError>> {
        let res = self.get(path).map(|b| b.len() as u64);
        futures::future::ready(res).boxed()
    }

    fn fetch<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Vec<u8>, SourceError>> {
        let res = self.get(path).map(|b| b.to_vec());
        futures::future::ready(res).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn memory_source_probe_and_fetch() {
        let src = MemoryAssetSource::new();
        src.insert("models/props/crate.glb", vec![7u8; 16]);
        assert_eq!(block_on(src.probe("models/props/crate.glb")).ok(), Some(16));
        assert_eq!(block_on(src.fetch("models/props/crate.glb")).map(|b| b.len()).ok(), Some(16));
        assert!(matches!(
            block_on(src.probe("missing.glb")),
            Err(SourceError::NotFound(_))
        ));
    }

    #[test]
    fn fs_source_reports_length_and_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("models/props")).expect("mkdir");
        std::fs::write(dir.path().join("models/props/barrel.glb"), [1u8; 42]).expect("write");
        let src = FsAssetSource::new(dir.path());
        assert_eq!(block_on(src.probe("models/props/barrel.glb")).ok(), Some(42));
        assert!(matches!(
            block_on(src.probe("models/props/none.glb")),
            Err(SourceError::NotFound(_))
        ));
        // directories are not assets
        assert!(block_on(src.probe("models/props")).is_err());
    }

    #[test]
    fn fs_reads_complete_on_first_poll() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("crate.glb"), [3u8; 8]).expect("write");
        let src = FsAssetSource::new(dir.path());
        let bytes = src.fetch("crate.glb").now_or_never().expect("ready on first poll");
        assert_eq!(bytes.ok(), Some(vec![3u8; 8]));
        let len = src.probe("crate.glb").now_or_never().expect("ready on first poll");
        assert_eq!(len.ok(), Some(8));
    }
}
