//! data_runtime: configuration schemas and loaders for the content pipeline.
//!
//! Files live under `data/config/`; every loader falls back to defaults when
//! its file is absent and then applies environment overrides.

pub mod configs {
    pub mod pipeline;
    pub mod telemetry;
}
