//! anim_runtime: shared clip library and per-actor playback with cross-fades.
//!
//! The library is an explicitly constructed value handed to controllers as
//! `Arc<AnimationLibrary>`; clips are loaded once and shared by every actor.

pub mod controller;
pub mod library;

pub use controller::{
    ActorAnimationController, ActorId, Phase, PlayOptions, PlaybackHandle, PlaybackInfo,
};
pub use library::{AnimationLibrary, ClipMap};
