use std::sync::Arc;

use anim_runtime::{ActorAnimationController, ActorId, AnimationLibrary, Phase, PlayOptions};
use glam::Vec3;
use scene_core::{AnimationClip, Track, TrackValues};

fn lift(name: &str, duration: f32, height: f32) -> AnimationClip {
    AnimationClip::new(
        name,
        vec![Track::new(
            "Hips",
            vec![0.0, duration],
            TrackValues::Translation(vec![Vec3::Y * height, Vec3::Y * height]),
        )],
    )
}

fn controller() -> ActorAnimationController {
    let lib = AnimationLibrary::from_clips([
        lift("idle", 2.0, 0.0),
        lift("walk", 1.0, 1.0),
        lift("run", 0.8, 3.0),
        lift("attack", 0.6, 5.0),
    ]);
    ActorAnimationController::new(Arc::new(lib))
}

#[test]
fn walk_to_run_crossfade_converges() {
    let mut c = controller();
    let actor = ActorId(7);
    let walk = c
        .play(actor, "walk", PlayOptions::looped().with_fade(0.0))
        .expect("walk");
    let run = c
        .play(actor, "run", PlayOptions::looped().with_fade(0.3))
        .expect("run");
    assert_eq!(c.phase(actor), Phase::CrossFading);

    c.update(0.15);
    let w = c.playback(walk).expect("walk fading").weight;
    let r = c.playback(run).expect("run").weight;
    assert!((w - 0.5).abs() < 1e-4, "walk weight {w}");
    assert!((r - 0.5).abs() < 1e-4, "run weight {r}");
    let mid = c.sample_pose(actor);
    let y = mid.get("hips").and_then(|j| j.translation).expect("hips").y;
    assert!((y - 2.0).abs() < 1e-3, "blended height {y}");

    for _ in 0..10 {
        c.update(0.05);
    }
    assert!(c.playback(walk).is_none());
    assert_eq!(c.playback(run).expect("run").weight, 1.0);
    assert_eq!(c.phase(actor), Phase::Playing);
    assert_eq!(c.active(actor), Some(run));
}

#[test]
fn unknown_clip_leaves_current_playback() {
    let mut c = controller();
    let actor = ActorId(1);
    let idle = c.play(actor, "idle", PlayOptions::looped()).expect("idle");
    assert!(c.play(actor, "moonwalk", PlayOptions::once()).is_none());
    assert_eq!(c.active(actor), Some(idle));
    assert_eq!(c.phase(actor), Phase::Playing);
    assert!(c.play(ActorId(2), "moonwalk", PlayOptions::once()).is_none());
    assert_eq!(c.phase(ActorId(2)), Phase::Unbound);
}

#[test]
fn clamped_one_shot_holds_last_frame() {
    let mut c = controller();
    let actor = ActorId(3);
    c.play(actor, "idle", PlayOptions::looped().with_fade(0.0));
    let attack = c
        .play(actor, "attack", PlayOptions::once().with_fade(0.1).clamped())
        .expect("attack");
    for _ in 0..20 {
        c.update(0.05);
    }
    let info = c.playback(attack).expect("attack");
    assert!(info.paused);
    assert!(!info.finished);
    assert_eq!(info.weight, 1.0);
    assert!((info.time - 0.6).abs() < 1e-5);
    let y = c
        .sample_pose(actor)
        .get("hips")
        .and_then(|j| j.translation)
        .expect("hips")
        .y;
    assert!((y - 5.0).abs() < 1e-4);
}

#[test]
fn replaying_a_clamped_one_shot_restarts_it() {
    let mut c = controller();
    let actor = ActorId(4);
    let first = c
        .play(actor, "attack", PlayOptions::once().with_fade(0.0).clamped())
        .expect("attack");
    for _ in 0..20 {
        c.update(0.05);
    }
    assert!(c.playback(first).expect("held").paused);

    let again = c
        .play(actor, "attack", PlayOptions::once().with_fade(0.0).clamped())
        .expect("attack again");
    assert_ne!(again, first);
    c.update(0.05);
    let info = c.playback(again).expect("restarted");
    assert!(!info.paused);
    assert!((info.time - 0.05).abs() < 1e-5, "time {}", info.time);
}

#[test]
fn same_clip_with_new_options_starts_a_new_playback() {
    let mut c = controller();
    let actor = ActorId(5);
    let looped = c
        .play(actor, "idle", PlayOptions::looped().with_fade(0.0))
        .expect("idle");
    assert_eq!(
        c.play(actor, "idle", PlayOptions::looped().with_fade(0.0)),
        Some(looped)
    );
    let once = c
        .play(actor, "idle", PlayOptions::once().with_fade(0.0))
        .expect("idle once");
    assert_ne!(once, looped);
    assert!(!c.playback(once).expect("once").looping);
    assert_eq!(c.active(actor), Some(once));
}

#[test]
fn actors_are_independent() {
    let mut c = controller();
    let a = ActorId(10);
    let b = ActorId(11);
    let ha = c.play(a, "walk", PlayOptions::looped()).expect("walk");
    let hb = c.play(b, "walk", PlayOptions::looped()).expect("walk");
    c.set_time_scale(b, 0.0);
    c.update(0.5);
    assert!((c.playback(ha).expect("a").time - 0.5).abs() < 1e-5);
    assert_eq!(c.playback(hb).expect("b").time, 0.0);
    assert!(c.remove(a));
    assert_eq!(c.actor_count(), 1);
    assert!(c.playback(ha).is_none());
}
