use glam::{Vec2, Vec3};
use tracing::debug;

use crate::game::{horizontal, lerp, sanitize_dt};

pub const STABILITY_CHECK_DELAY: f32 = 0.1;
pub const STABILITY_THRESHOLD: f32 = 0.001;
pub const STABLE_FRAMES_REQUIRED: u32 = 5;
pub const MAX_ANIMATION_DURATION: f32 = 20.0;

pub const MAX_LIFT_DISTANCE: f32 = 1.5;
pub const MAX_LIFT_HEIGHT: f32 = 0.15;
pub const LIFT_LERP_SPEED: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettleStatus {
    Waiting,
    Settled,
}

#[derive(Clone, Debug, Default)]
pub struct SettleWatcher {
    last: Option<Vec<Vec3>>,
    stable_frames: u32,
    elapsed: f32,
    settled: Option<Vec<Vec3>>,
}

fn moved(a: Vec3, b: Vec3) -> bool {
    let delta = (a - b).abs();
    delta.x > STABILITY_THRESHOLD || delta.y > STABILITY_THRESHOLD || delta.z > STABILITY_THRESHOLD
}

impl SettleWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_settled(&self) -> bool {
        self.settled.is_some()
    }

    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }

    pub fn settled_positions(&self) -> Option<&[Vec3]> {
        self.settled.as_deref()
    }

    /// The first frame after the check delay only records a baseline.
    pub fn observe(&mut self, positions: &[Vec3], dt: f32) -> SettleStatus {
        if self.settled.is_some() {
            return SettleStatus::Settled;
        }
        self.elapsed += sanitize_dt(dt);
        if self.elapsed >= MAX_ANIMATION_DURATION {
            debug!(elapsed = self.elapsed, "settle forced after max animation duration");
            return self.settle(positions);
        }
        if self.elapsed < STABILITY_CHECK_DELAY {
            return SettleStatus::Waiting;
        }
        let stable = match &self.last {
            Some(last) if last.len() == positions.len() => last
                .iter()
                .zip(positions)
                .all(|(previous, current)| !moved(*previous, *current)),
            Some(_) => false,
            None => positions.is_empty(),
        };
        self.last = Some(positions.to_vec());
        if !stable {
            self.stable_frames = 0;
            return SettleStatus::Waiting;
        }
        self.stable_frames += 1;
        if self.stable_frames >= STABLE_FRAMES_REQUIRED {
            debug!(frames = self.stable_frames, "pieces settled");
            return self.settle(positions);
        }
        SettleStatus::Waiting
    }

    pub fn force_settle(&mut self, positions: &[Vec3]) -> SettleStatus {
        if self.settled.is_some() {
            return SettleStatus::Settled;
        }
        self.settle(positions)
    }

    fn settle(&mut self, positions: &[Vec3]) -> SettleStatus {
        self.settled = Some(positions.to_vec());
        SettleStatus::Settled
    }
}

pub fn cubic(t: f32) -> f32 {
    t * t * t
}

pub fn lift_factor(distance: f32, max_distance: f32) -> f32 {
    if !(distance < max_distance) || max_distance <= 0.0 {
        return 0.0;
    }
    1.0 - distance / max_distance
}

#[derive(Clone, Debug)]
pub struct HoverLift {
    rest: Vec<Vec3>,
    lifts: Vec<f32>,
}

impl HoverLift {
    pub fn new(rest: Vec<Vec3>) -> Self {
        let lifts = vec![0.0; rest.len()];
        Self { rest, lifts }
    }

    pub fn from_watcher(watcher: &SettleWatcher) -> Option<Self> {
        watcher
            .settled_positions()
            .map(|positions| Self::new(positions.to_vec()))
    }

    /// Distances are taken from resting positions, never lifted ones.
    pub fn update(&mut self, pointer: Option<Vec2>, lerp_speed: f32) {
        for (rest, lift) in self.rest.iter().zip(self.lifts.iter_mut()) {
            let target = match pointer {
                Some(pointer) => {
                    let distance = horizontal(*rest).distance(pointer);
                    MAX_LIFT_HEIGHT * cubic(lift_factor(distance, MAX_LIFT_DISTANCE))
                }
                None => 0.0,
            };
            *lift = lerp(*lift, target, lerp_speed.clamp(0.0, 1.0));
        }
    }

    pub fn lift(&self, index: usize) -> f32 {
        self.lifts.get(index).copied().unwrap_or(0.0)
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.rest
            .iter()
            .zip(&self.lifts)
            .map(|(rest, lift)| Vec3::new(rest.x, rest.y + lift, rest.z))
            .collect()
    }
}
