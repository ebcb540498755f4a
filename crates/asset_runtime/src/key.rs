use std::fmt;

use procgen::AssetCategory;

/// Cache identity of an asset: category plus normalized variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetKey {
    category: AssetCategory,
    variant: String,
}

impl AssetKey {
    pub fn new(category: AssetCategory, variant: &str) -> Self {
        Self {
            category,
            variant: normalize_variant(variant),
        }
    }

    pub fn category(&self) -> AssetCategory {
        self.category
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Source path relative to the asset root, e.g. `models/robots/scout.glb`.
    pub fn path(&self, extension: &str) -> String {
        format!("{self}.{}", extension.trim_start_matches('.'))
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "models/{}/{}", self.category.dir_name(), self.variant)
    }
}

/// Lowercase, whitespace to `_`, no path separators or parent refs; empty is `default`.
pub fn normalize_variant(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace("..", "");
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        match ch {
            '/' | '\\' | ':' => {}
            c if c.is_whitespace() => out.push('_'),
            c => out.push(c),
        }
    }
    let out = out.trim_matches(|c| c == '_' || c == '.').to_string();
    if out.is_empty() { "default".to_string() } else { out }
}
