//! Cheap pre-parse check: does the source exist and is it big enough to be real?

use crate::source::AssetSource;

/// Size threshold below which a file is treated as a placeholder.
pub const DEFAULT_MIN_BYTES: u64 = 1024;

#[derive(Clone, Copy, Debug)]
pub struct AssetValidator {
    min_bytes: u64,
}

impl Default for AssetValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BYTES)
    }
}

impl AssetValidator {
    pub fn new(min_bytes: u64) -> Self {
        Self { min_bytes }
    }

    pub fn min_bytes(&self) -> u64 {
        self.min_bytes
    }

    pub fn accepts_len(&self, len: u64) -> bool {
        len >= self.min_bytes
    }

    /// Metadata-only probe. Any probe failure or an undersized file is invalid.
    pub async fn validate(&self, source: &dyn AssetSource, path: &str) -> bool {
        match source.probe(path).await {
            Ok(len) if self.accepts_len(len) => true,
            Ok(len) => {
                log::debug!("validate: {path} is {len} B (< {} B), placeholder", self.min_bytes);
                false
            }
            Err(e) => {
                log::debug!("validate: {path}: {e}");
                false
            }
        }
    }
}
