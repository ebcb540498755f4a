//! Per-actor playback state keyed by actor id.
//!
//! Per actor: Unbound -> Playing(clip) -> CrossFading(old, new) -> Playing(new),
//! and `remove` returns any state to Unbound. The controller never owns
//! actors; owners call `remove` when an actor goes away.

use std::collections::HashMap;
use std::sync::Arc;

use scene_core::{AnimationClip, Pose};

use crate::library::AnimationLibrary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

impl From<u64> for ActorId {
    fn from(v: u64) -> Self {
        ActorId(v)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayOptions {
    /// Repeat forever vs play once.
    pub looping: bool,
    /// Seconds for the new clip to reach full weight.
    pub fade_in: f32,
    /// Seconds for the clip being replaced to reach zero weight.
    pub fade_out: f32,
    pub time_scale: f32,
    /// Play-once only: hold the last frame at full weight instead of finishing.
    pub clamp_at_end: bool,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            looping: true,
            fade_in: 0.2,
            fade_out: 0.2,
            time_scale: 1.0,
            clamp_at_end: false,
        }
    }
}

impl PlayOptions {
    pub fn looped() -> Self {
        Self::default()
    }

    pub fn once() -> Self {
        Self {
            looping: false,
            ..Self::default()
        }
    }

    pub fn with_fade(mut self, secs: f32) -> Self {
        self.fade_in = secs;
        self.fade_out = secs;
        self
    }

    pub fn clamped(mut self) -> Self {
        self.clamp_at_end = true;
        self
    }

    pub fn with_time_scale(mut self, s: f32) -> Self {
        self.time_scale = s;
        self
    }
}

/// Identifies one `play` call; query through the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackHandle {
    pub actor: ActorId,
    serial: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackInfo {
    pub clip: String,
    pub time: f32,
    pub weight: f32,
    pub looping: bool,
    pub paused: bool,
    pub finished: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Unbound,
    /// Bound but nothing playing (stopped or finished).
    Idle,
    Playing,
    CrossFading,
}

#[derive(Clone, Debug)]
struct Playback {
    serial: u64,
    clip: Arc<AnimationClip>,
    time: f32,
    weight: f32,
    /// Weight change per second; sign gives direction.
    fade_rate: f32,
    looping: bool,
    clamp_at_end: bool,
    time_scale: f32,
    paused: bool,
    finished: bool,
}

impl Playback {
    fn is_running(&self) -> bool {
        !self.paused && !self.finished
    }

    fn matches(&self, opts: &PlayOptions) -> bool {
        self.looping == opts.looping
            && self.clamp_at_end == opts.clamp_at_end
            && self.time_scale == opts.time_scale
    }

    fn fade_out(&mut self, secs: f32) {
        if secs > 0.0 {
            self.fade_rate = -(self.weight.max(f32::EPSILON) / secs);
        } else {
            self.weight = 0.0;
            self.fade_rate = 0.0;
        }
    }

    fn advance(&mut self, dt: f32, actor_scale: f32) {
        if self.fade_rate != 0.0 {
            self.weight = (self.weight + self.fade_rate * dt).clamp(0.0, 1.0);
            if self.weight == 0.0 || self.weight == 1.0 {
                self.fade_rate = 0.0;
            }
        }
        if self.paused || self.finished {
            return;
        }
        self.time += dt * self.time_scale * actor_scale;
        let dur = self.clip.duration;
        if self.time < dur {
            return;
        }
        if self.looping {
            self.time = if dur > 0.0 { self.time % dur } else { 0.0 };
        } else if self.clamp_at_end {
            self.time = dur;
            self.paused = true;
        } else {
            self.time = dur;
            self.finished = true;
            self.weight = 0.0;
            self.fade_rate = 0.0;
        }
    }

    fn info(&self) -> PlaybackInfo {
        PlaybackInfo {
            clip: self.clip.name.clone(),
            time: self.time,
            weight: self.weight,
            looping: self.looping,
            paused: self.paused,
            finished: self.finished,
        }
    }
}

#[derive(Debug)]
struct ActorState {
    active: Option<Playback>,
    fading: Vec<Playback>,
    time_scale: f32,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            active: None,
            fading: Vec::new(),
            time_scale: 1.0,
        }
    }
}

impl ActorState {
    fn playbacks(&self) -> impl Iterator<Item = &Playback> {
        self.active.iter().chain(self.fading.iter())
    }
}

pub struct ActorAnimationController {
    library: Arc<AnimationLibrary>,
    actors: HashMap<ActorId, ActorState>,
    next_serial: u64,
}

impl ActorAnimationController {
    pub fn new(library: Arc<AnimationLibrary>) -> Self {
        Self {
            library,
            actors: HashMap::new(),
            next_serial: 1,
        }
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    /// Start `name` on `actor`, cross-fading from whatever is active.
    /// Unknown clips return `None` and leave the actor untouched. Replaying
    /// the active clip while it is still running with the same looping,
    /// clamp and speed settings returns its existing handle; a held
    /// (clamped) or finished clip, or new settings, start a fresh playback.
    pub fn play(&mut self, actor: ActorId, name: &str, opts: PlayOptions) -> Option<PlaybackHandle> {
        let Some(clip) = self.library.get(name) else {
            log::warn!("animations: actor {}: no clip named '{name}'", actor.0);
            return None;
        };
        let state = self.actors.entry(actor).or_default();
        if let Some(cur) = &state.active
            && cur.clip.name == clip.name
            && cur.is_running()
            && cur.matches(&opts)
        {
            return Some(PlaybackHandle {
                actor,
                serial: cur.serial,
            });
        }
        if let Some(mut old) = state.active.take() {
            old.fade_out(opts.fade_out);
            if old.weight > 0.0 {
                state.fading.push(old);
            }
        }
        let serial = self.next_serial;
        self.next_serial += 1;
        let fading_in = opts.fade_in > 0.0;
        state.active = Some(Playback {
            serial,
            clip,
            time: 0.0,
            weight: if fading_in { 0.0 } else { 1.0 },
            fade_rate: if fading_in { 1.0 / opts.fade_in } else { 0.0 },
            looping: opts.looping,
            clamp_at_end: opts.clamp_at_end,
            time_scale: opts.time_scale,
            paused: false,
            finished: false,
        });
        log::debug!("animations: actor {} plays '{name}'", actor.0);
        Some(PlaybackHandle { actor, serial })
    }

    /// Advance every actor's playbacks; fully faded-out playbacks are dropped.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for state in self.actors.values_mut() {
            let scale = state.time_scale;
            if let Some(p) = state.active.as_mut() {
                p.advance(dt, scale);
            }
            for p in &mut state.fading {
                p.advance(dt, scale);
            }
            state.fading.retain(|p| p.weight > 0.0);
        }
    }

    /// Fade out the active playback; the actor stays bound.
    pub fn stop(&mut self, actor: ActorId, fade_out: f32) -> bool {
        let Some(state) = self.actors.get_mut(&actor) else {
            return false;
        };
        let Some(mut p) = state.active.take() else {
            return false;
        };
        p.fade_out(fade_out);
        if p.weight > 0.0 {
            state.fading.push(p);
        }
        true
    }

    /// Stop playback and release the actor's state.
    pub fn remove(&mut self, actor: ActorId) -> bool {
        self.actors.remove(&actor).is_some()
    }

    pub fn set_time_scale(&mut self, actor: ActorId, scale: f32) -> bool {
        match self.actors.get_mut(&actor) {
            Some(s) => {
                s.time_scale = scale.max(0.0);
                true
            }
            None => false,
        }
    }

    pub fn active(&self, actor: ActorId) -> Option<PlaybackHandle> {
        let p = self.actors.get(&actor)?.active.as_ref()?;
        Some(PlaybackHandle {
            actor,
            serial: p.serial,
        })
    }

    pub fn playback(&self, handle: PlaybackHandle) -> Option<PlaybackInfo> {
        self.actors
            .get(&handle.actor)?
            .playbacks()
            .find(|p| p.serial == handle.serial)
            .map(Playback::info)
    }

    pub fn phase(&self, actor: ActorId) -> Phase {
        let Some(state) = self.actors.get(&actor) else {
            return Phase::Unbound;
        };
        let live_active = state.active.as_ref().is_some_and(|p| !p.finished);
        match (live_active, state.fading.is_empty()) {
            (true, true) => Phase::Playing,
            (true, false) => Phase::CrossFading,
            (false, _) => Phase::Idle,
        }
    }

    /// Weight-blended pose of everything the actor is playing.
    pub fn sample_pose(&self, actor: ActorId) -> Pose {
        let Some(state) = self.actors.get(&actor) else {
            return Pose::default();
        };
        let inputs: Vec<(Pose, f32)> = state
            .playbacks()
            .filter(|p| p.weight > 0.0)
            .map(|p| (p.clip.sample(p.time), p.weight))
            .collect();
        Pose::blend(&inputs)
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }
}
