//! Touch gesture handling
//!
//! - `event` - decoded touch input
//! - `velocity` - per-pointer velocity estimation
//! - `fling` - gesture classification and page boundaries
//! - `animate` - linear settle animation
//! - `tracker` - the touch state machine producing offsets
//! - `gesture_loop` - fixed-rate driver for the settle animation

pub mod animate;
pub mod event;
pub mod fling;
pub mod gesture_loop;
pub mod tracker;
pub mod velocity;

pub use animate::{AnimationEvent, EasingAnimator};
pub use event::{PointerSample, TouchAction, TouchEvent};
pub use fling::{classify_fling, FlingDecision, FlingThresholds, FlingTrigger, Gesture, PageLayout};
pub use gesture_loop::GestureLoop;
pub use tracker::{OffsetsListener, SharedTracker, TouchOffsetTracker};
pub use velocity::{Velocity, VelocityTracker};
