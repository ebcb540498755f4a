use thiserror::Error;

/// Transport-level failures; the asset may exist elsewhere.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    pub fn from_io(path: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.to_string())
        } else {
            SourceError::Io {
                path: path.to_string(),
                source,
            }
        }
    }
}

/// Why an authored asset could not be used.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{0} failed validation (missing or below size threshold)")]
    Invalid(String),
    #[error("decode {label}: {source}")]
    Gltf {
        label: String,
        #[source]
        source: gltf::Error,
    },
    #[error("{0} contains no renderable geometry")]
    Empty(String),
}
