//! Animation clip data and CPU-side sampling.
//!
//! Tracks address their target node by (normalized) name rather than by node
//! index so one clip can drive every actor whose hierarchy uses the same bone
//! names, independent of the file the clip came from.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::node::{Node, Transform};
use crate::util::normalize_bone_name;

#[derive(Clone, Debug, PartialEq)]
pub enum TrackValues {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl TrackValues {
    fn len(&self) -> usize {
        match self {
            TrackValues::Translation(v) | TrackValues::Scale(v) => v.len(),
            TrackValues::Rotation(v) => v.len(),
        }
    }
}

/// Keyframes for one channel of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Normalized target node name.
    pub target: String,
    pub times: Vec<f32>,
    pub values: TrackValues,
}

impl Track {
    pub fn new(target: &str, times: Vec<f32>, values: TrackValues) -> Self {
        Self {
            target: normalize_bone_name(target),
            times,
            values,
        }
    }

    fn is_well_formed(&self) -> bool {
        !self.times.is_empty() && self.times.len() == self.values.len()
    }
}

/// Named, immutable keyframe data.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Build a clip; malformed tracks are dropped and the duration is the
    /// last key time across the remaining tracks.
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let tracks: Vec<Track> = tracks.into_iter().filter(Track::is_well_formed).collect();
        let duration = tracks
            .iter()
            .filter_map(|t| t.times.last().copied())
            .fold(0.0f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Same keyframes under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: self.duration,
            tracks: self.tracks.clone(),
        }
    }

    /// Sample every track at `t` seconds (clamped to the clip range).
    pub fn sample(&self, t: f32) -> Pose {
        let time = t.clamp(0.0, self.duration.max(0.0));
        let mut pose = Pose::default();
        for track in &self.tracks {
            let joint = pose.joints.entry(track.target.clone()).or_default();
            match &track.values {
                TrackValues::Translation(v) => {
                    joint.translation = Some(sample_vec3(&track.times, v, time));
                }
                TrackValues::Rotation(v) => {
                    joint.rotation = Some(sample_quat(&track.times, v, time));
                }
                TrackValues::Scale(v) => joint.scale = Some(sample_vec3(&track.times, v, time)),
            }
        }
        pose
    }
}

/// Partial local transform for one target; absent channels leave the node as is.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JointPose {
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl JointPose {
    pub fn apply_to(&self, t: &mut Transform) {
        if let Some(v) = self.translation {
            t.translation = v;
        }
        if let Some(r) = self.rotation {
            t.rotation = r;
        }
        if let Some(s) = self.scale {
            t.scale = s;
        }
    }
}

/// Sampled transforms keyed by normalized node name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pose {
    pub joints: HashMap<String, JointPose>,
}

impl Pose {
    pub fn get(&self, normalized_name: &str) -> Option<&JointPose> {
        self.joints.get(normalized_name)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Weighted average of several poses. Channels are averaged only over the
    /// poses that animate them; zero-weight inputs are ignored.
    pub fn blend(inputs: &[(Pose, f32)]) -> Pose {
        #[derive(Default)]
        struct Acc {
            t: Vec3,
            tw: f32,
            r: Option<Quat>,
            rw: f32,
            s: Vec3,
            sw: f32,
        }
        let mut acc: HashMap<&str, Acc> = HashMap::new();
        for (pose, w) in inputs {
            if *w <= 0.0 {
                continue;
            }
            for (name, j) in &pose.joints {
                let a = acc.entry(name.as_str()).or_default();
                if let Some(t) = j.translation {
                    a.t += t * *w;
                    a.tw += *w;
                }
                if let Some(s) = j.scale {
                    a.s += s * *w;
                    a.sw += *w;
                }
                if let Some(r) = j.rotation {
                    // Incremental nlerp keeps quaternions in one hemisphere.
                    a.rw += *w;
                    a.r = Some(match a.r {
                        None => r,
                        Some(prev) => {
                            let r = if prev.dot(r) < 0.0 { -r } else { r };
                            prev.lerp(r, *w / a.rw).normalize()
                        }
                    });
                }
            }
        }
        let joints = acc
            .into_iter()
            .map(|(name, a)| {
                let joint = JointPose {
                    translation: (a.tw > 0.0).then(|| a.t / a.tw),
                    rotation: a.r,
                    scale: (a.sw > 0.0).then(|| a.s / a.sw),
                };
                (name.to_string(), joint)
            })
            .collect();
        Pose { joints }
    }
}

/// Joint list of a skinned asset; the skeleton-update handle for its instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    /// Normalized joint node names in skin order.
    pub joints: Vec<String>,
    pub inverse_bind: Vec<Mat4>,
}

impl Skeleton {
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Joint palette (world * inverse bind) for the current transforms of `root`.
    /// Joints not present in the hierarchy resolve to identity.
    pub fn palette(&self, root: &Node) -> Vec<Mat4> {
        let mut world: HashMap<String, Mat4> = HashMap::new();
        root.visit_world(&Mat4::IDENTITY, &mut |n, m| {
            world.entry(normalize_bone_name(&n.name)).or_insert(*m);
        });
        self.joints
            .iter()
            .enumerate()
            .map(|(i, j)| {
                let g = world.get(j).copied().unwrap_or(Mat4::IDENTITY);
                let ibm = self.inverse_bind.get(i).copied().unwrap_or(Mat4::IDENTITY);
                g * ibm
            })
            .collect()
    }
}

fn key_span(times: &[f32], t: f32) -> Option<(usize, f32)> {
    let last = *times.last()?;
    if t <= times[0] || times.len() == 1 {
        return None;
    }
    if t >= last {
        return None;
    }
    let i = times.partition_point(|&k| k <= t).saturating_sub(1);
    let (t0, t1) = (times[i], times[i + 1]);
    let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
    Some((i, f))
}

fn sample_vec3(times: &[f32], values: &[Vec3], t: f32) -> Vec3 {
    match key_span(times, t) {
        Some((i, f)) => values[i].lerp(values[i + 1], f),
        None if t <= times[0] => values[0],
        None => values[values.len() - 1],
    }
}

fn sample_quat(times: &[f32], values: &[Quat], t: f32) -> Quat {
    match key_span(times, t) {
        Some((i, f)) => values[i].slerp(values[i + 1], f),
        None if t <= times[0] => values[0],
        None => values[values.len() - 1],
    }
}
