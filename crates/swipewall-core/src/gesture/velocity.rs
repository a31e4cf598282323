//! Per-pointer velocity estimation for fling detection

use std::collections::{HashMap, VecDeque};

use super::event::{TouchAction, TouchEvent};

/// Samples kept per pointer
const MAX_SAMPLES: usize = 20;

/// Velocity in px/s
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn dot(self, other: Velocity) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    time_ms: u64,
    x: f32,
    y: f32,
}

/// Tracks recent pointer positions of one gesture
///
/// Velocity is the displacement between the oldest and newest sample inside
/// the horizon window, divided by their time distance, clamped to
/// `±max_velocity`.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    horizon_ms: u64,
    max_velocity: f32,
    tracks: HashMap<u32, VecDeque<Sample>>,
}

impl VelocityTracker {
    pub fn new(horizon_ms: u64, max_velocity: f32) -> Self {
        Self {
            horizon_ms,
            max_velocity,
            tracks: HashMap::new(),
        }
    }

    /// Record every pointer of the event. A `Down` starts a fresh gesture.
    pub fn add_movement(&mut self, event: &TouchEvent) {
        if event.action == TouchAction::Down {
            self.clear();
        }
        for pointer in &event.pointers {
            let track = self.tracks.entry(pointer.id).or_default();
            if track.len() == MAX_SAMPLES {
                track.pop_front();
            }
            track.push_back(Sample {
                time_ms: event.event_time_ms,
                x: pointer.x,
                y: pointer.y,
            });
        }
    }

    /// Drop the whole history, e.g. to suppress a false fling
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Current velocity of a pointer; zero when unknown or too few samples
    pub fn velocity(&self, pointer_id: u32) -> Velocity {
        let Some(track) = self.tracks.get(&pointer_id) else {
            return Velocity::default();
        };
        let Some(newest) = track.back() else {
            return Velocity::default();
        };
        let oldest = track
            .iter()
            .find(|s| newest.time_ms.saturating_sub(s.time_ms) <= self.horizon_ms)
            .unwrap_or(newest);

        let dt_ms = newest.time_ms.saturating_sub(oldest.time_ms);
        if dt_ms == 0 {
            return Velocity::default();
        }
        let dt = dt_ms as f32 / 1000.0;
        Velocity {
            x: self.clamp((newest.x - oldest.x) / dt),
            y: self.clamp((newest.y - oldest.y) / dt),
        }
    }

    fn clamp(&self, v: f32) -> f32 {
        v.clamp(-self.max_velocity, self.max_velocity)
    }
}
