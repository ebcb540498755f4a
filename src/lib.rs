//! cityforge: client-side content pipeline for the city scene.
//!
//! Library crates do the work (`asset_runtime`, `procgen`, `nav_core`,
//! `anim_runtime`); this crate wires them together from configuration.

pub mod pipeline;
pub mod telemetry;

pub use pipeline::{ActorSpec, ClientPipeline, SceneReport, SpawnedActor};
