//! Fling classification and page-boundary arithmetic
//!
//! Pure functions, no state. "Advance" moves the offset toward higher page
//! indices (finger travelling left), "retreat" toward lower ones.

use crate::config::GestureConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingThresholds {
    pub vertical_deviation_limit: f32,
    pub distance: f32,
    pub velocity: f32,
    pub fraction: f32,
}

impl Default for FlingThresholds {
    fn default() -> Self {
        Self::from(&GestureConfig::default())
    }
}

impl From<&GestureConfig> for FlingThresholds {
    fn from(config: &GestureConfig) -> Self {
        Self {
            vertical_deviation_limit: config.fling_vertical_deviation_limit,
            distance: config.fling_distance_threshold,
            velocity: config.fling_velocity_threshold,
            fraction: config.fling_fraction_threshold,
        }
    }
}

/// Which rule accepted the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlingTrigger {
    /// Travel above the distance threshold and speed above the velocity threshold
    Velocity,
    /// Travel above a fraction of the screen width
    Distance,
    /// Any travel at all
    Displacement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlingDecision {
    /// Too much vertical travel to be a horizontal swipe
    NotHorizontal,
    /// Finger came up where it went down
    Stationary,
    Advance(FlingTrigger),
    Retreat(FlingTrigger),
}

/// End-of-gesture geometry fed to [`classify_fling`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub down_x: f32,
    pub down_y: f32,
    pub up_x: f32,
    pub up_y: f32,
    /// Horizontal velocity at lift-off, px/s
    pub velocity_x: f32,
}

/// Decide what a finished gesture means. The rules are tried strictly in
/// order; the first match wins.
pub fn classify_fling(
    gesture: &Gesture,
    screen_width: f32,
    touch_offset: f32,
    thresholds: &FlingThresholds,
) -> FlingDecision {
    if (gesture.down_y - gesture.up_y).abs() > thresholds.vertical_deviation_limit {
        return FlingDecision::NotHorizontal;
    }

    let leftward_travel = gesture.down_x - gesture.up_x;
    let rightward_travel = gesture.up_x - gesture.down_x;
    let fast = gesture.velocity_x.abs() > thresholds.velocity;
    let page_drag = screen_width * thresholds.fraction;

    if leftward_travel > thresholds.distance && fast {
        FlingDecision::Advance(FlingTrigger::Velocity)
    } else if leftward_travel > page_drag {
        FlingDecision::Advance(FlingTrigger::Distance)
    } else if leftward_travel > 0.0 {
        FlingDecision::Advance(FlingTrigger::Displacement)
    } else if rightward_travel > thresholds.distance && fast && touch_offset > 0.0 {
        FlingDecision::Retreat(FlingTrigger::Velocity)
    } else if rightward_travel > page_drag {
        FlingDecision::Retreat(FlingTrigger::Distance)
    } else if rightward_travel > 0.0 {
        FlingDecision::Retreat(FlingTrigger::Displacement)
    } else {
        FlingDecision::Stationary
    }
}

/// Page geometry of the scrollable strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub screen_width: f32,
    pub page_count: u32,
}

impl PageLayout {
    pub fn new(screen_width: f32, page_count: u32) -> Self {
        Self {
            screen_width,
            page_count,
        }
    }

    pub fn total_width(&self) -> f32 {
        self.screen_width * self.page_count as f32
    }

    pub fn boundary(&self, page_index: u32) -> f32 {
        self.screen_width * page_index as f32
    }

    /// Page index `n` such that `boundary(n - 1) < offset <= boundary(n)`,
    /// scanning down from the last page
    fn bracket(&self, offset: f32) -> Option<u32> {
        (0..=self.page_count).rev().find(|&n| {
            let upper = self.boundary(n);
            let lower = self.screen_width * (n as f32 - 1.0);
            offset <= upper && offset > lower
        })
    }

    /// Smallest boundary strictly greater than `offset`
    pub fn next_boundary(&self, offset: f32) -> Option<f32> {
        if offset >= self.total_width() {
            return None;
        }
        let n = self.bracket(offset)?;
        if offset < self.boundary(n) {
            Some(self.boundary(n))
        } else {
            Some(self.boundary(n + 1))
        }
    }

    /// Largest boundary strictly less than `offset`
    pub fn previous_boundary(&self, offset: f32) -> Option<f32> {
        if offset <= 0.0 {
            return None;
        }
        match self.bracket(offset) {
            Some(n) => Some(self.screen_width * (n as f32 - 1.0)),
            None if offset > self.total_width() => Some(self.total_width()),
            None => None,
        }
    }
}
