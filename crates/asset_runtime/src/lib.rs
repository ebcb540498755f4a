//! asset_runtime: asset sources, validation, decoding, caching and the
//! coalescing loader that ties them together.
//!
//! `AssetLoader::load` is the single entry point for consumers. It never
//! fails: missing or broken sources degrade to `procgen` stand-ins, and the
//! returned `LoadedAsset` records which path produced it.

pub mod cache;
pub mod decode;
pub mod error;
pub mod key;
pub mod loader;
pub mod source;
#[cfg(feature = "test-util")]
pub mod testing;
pub mod validate;

pub use cache::{AssetCache, AssetOrigin, LoadedAsset};
pub use decode::{AssetDecoder, DecodedAsset, GltfDecoder};
pub use error::{AssetError, SourceError};
pub use key::AssetKey;
pub use loader::{AssetLoader, LoaderStats};
pub use procgen::AssetCategory;
pub use source::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use validate::AssetValidator;
