//! Touch-driven horizontal offset tracking
//!
//! [`TouchOffsetTracker`] turns a stream of [`TouchEvent`]s into a normalized
//! horizontal offset. Drags move the offset directly; when the finger lifts
//! the gesture is classified and, for a fling, an [`EasingAnimator`] settles
//! the offset on the neighbouring page boundary. The animator is advanced by
//! the gesture loop through [`TouchOffsetTracker::advance_animation`].
//!
//! All mutation happens behind one mutex ([`SharedTracker`]); the offset
//! listener is called with that mutex held and must not block or call back
//! into the tracker.

use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use super::animate::{AnimationEvent, EasingAnimator};
use super::event::{PointerSample, TouchAction, TouchEvent};
use super::fling::{classify_fling, FlingDecision, FlingThresholds, Gesture, PageLayout};
use super::velocity::VelocityTracker;
use crate::config::GestureConfig;

/// Receiver of offset notifications
pub trait OffsetsListener: Send + Sync {
    fn on_offsets_changed(&self, x_offset: f32, y_offset: f32, x_offset_step: f32, y_offset_step: f32);
}

impl<F> OffsetsListener for F
where
    F: Fn(f32, f32, f32, f32) + Send + Sync,
{
    fn on_offsets_changed(&self, x_offset: f32, y_offset: f32, x_offset_step: f32, y_offset_step: f32) {
        self(x_offset, y_offset, x_offset_step, y_offset_step)
    }
}

pub type SharedTracker = Arc<Mutex<TouchOffsetTracker>>;

pub struct TouchOffsetTracker {
    listener: Arc<dyn OffsetsListener>,
    thresholds: FlingThresholds,
    easing_step: f32,
    velocity: VelocityTracker,

    /// Absolute offset in px; clamped whenever it is read for a listener
    touch_offset_px: f32,
    offset_initialized: bool,
    screen_width: u32,
    page_count: u32,

    x_offset_default: f32,
    y_offset_default: f32,
    x_offset_step: f32,
    y_offset_step: f32,

    down: Option<PointerSample>,
    delta_reference_x: Option<f32>,
    swipe_animation: Option<EasingAnimator>,
    last_decision: Option<FlingDecision>,
}

impl TouchOffsetTracker {
    pub fn new(config: &GestureConfig, listener: Arc<dyn OffsetsListener>) -> Self {
        let page_count = config.page_count.max(1);
        Self {
            listener,
            thresholds: FlingThresholds::from(config),
            easing_step: config.easing_step,
            velocity: VelocityTracker::new(config.velocity_horizon_ms, config.max_fling_velocity),
            touch_offset_px: 0.0,
            offset_initialized: false,
            screen_width: 0,
            page_count,
            x_offset_default: 0.5,
            y_offset_default: 0.5,
            x_offset_step: 1.0 / page_count as f32,
            y_offset_step: 1.0,
            down: None,
            delta_reference_x: None,
            swipe_animation: None,
            last_decision: None,
        }
    }

    /// Wrap in the mutex shared with the gesture loop
    pub fn into_shared(self) -> SharedTracker {
        Arc::new(Mutex::new(self))
    }

    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn x_offset_step(&self) -> f32 {
        self.x_offset_step
    }

    pub fn touch_offset_px(&self) -> f32 {
        self.touch_offset_px
    }

    /// The in-flight (or most recently finished) settle animation
    pub fn swipe_animation(&self) -> Option<&EasingAnimator> {
        self.swipe_animation.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.swipe_animation.as_ref().is_some_and(|a| a.is_active())
    }

    /// Outcome of the last completed gesture
    pub fn last_decision(&self) -> Option<FlingDecision> {
        self.last_decision
    }

    fn layout(&self) -> PageLayout {
        PageLayout::new(self.screen_width as f32, self.page_count)
    }

    /// Normalized offset in `[0, 1]` without touching the stored value
    pub fn normalized_offset(&self) -> f32 {
        let total = self.layout().total_width();
        if total <= 0.0 {
            return 0.0;
        }
        self.touch_offset_px.clamp(0.0, total) / total
    }

    /// Clamp the stored offset into the strip and normalize it
    fn view_offset(&mut self) -> f32 {
        let total = self.layout().total_width();
        self.touch_offset_px = self.touch_offset_px.clamp(0.0, total.max(0.0));
        if total <= 0.0 {
            return 0.0;
        }
        self.touch_offset_px / total
    }

    fn emit_current(&mut self) {
        let x_offset = self.view_offset();
        trace!(x_offset, touch_offset_px = self.touch_offset_px, "Offset changed");
        self.listener
            .on_offsets_changed(x_offset, self.y_offset_default, self.x_offset_step, self.y_offset_step);
    }

    fn emit_defaults(&self) {
        self.listener.on_offsets_changed(
            self.x_offset_default,
            self.y_offset_default,
            self.x_offset_step,
            self.y_offset_step,
        );
    }

    /// The first width supplied also centres the offset in the strip
    pub fn set_screen_width(&mut self, width: u32) {
        self.screen_width = width;
        if !self.offset_initialized {
            self.touch_offset_px = width as f32 * self.page_count as f32 / 2.0;
            self.offset_initialized = true;
        }
        debug!(width, touch_offset_px = self.touch_offset_px, "Screen width set");
        self.emit_defaults();
    }

    /// Change the number of pages. A running settle keeps its target.
    ///
    /// # Panics
    /// If `page_count` is zero.
    pub fn set_page_count(&mut self, page_count: u32) {
        assert!(page_count >= 1, "page_count must be at least 1");
        self.page_count = page_count;
        self.x_offset_step = 1.0 / page_count as f32;
        debug!(page_count, "Page count set");
        self.emit_defaults();
    }

    /// Jump to an absolute offset, dropping any settle in progress
    pub fn set_touch_offset(&mut self, offset_px: f32) {
        self.end_swipe_animation();
        self.touch_offset_px = offset_px;
        self.offset_initialized = true;
        self.emit_current();
    }

    pub fn on_touch_event(&mut self, event: &TouchEvent) {
        self.velocity.add_movement(event);

        match event.action {
            TouchAction::Down => {
                self.down = event.pointers.first().copied();
                self.delta_reference_x = Some(event.x());
            }
            TouchAction::Move => self.on_move(event),
            TouchAction::PointerUp => self.on_pointer_up(event),
            TouchAction::Up => self.on_up(event),
            TouchAction::Cancel => {
                self.down = None;
                self.delta_reference_x = None;
                self.velocity.clear();
            }
            TouchAction::PointerDown => {}
        }
    }

    fn on_move(&mut self, event: &TouchEvent) {
        let x = event.x();
        let Some(reference) = self.delta_reference_x.replace(x) else {
            return;
        };
        self.touch_offset_px += reference - x;
        self.emit_current();
    }

    /// Opposing pointer velocities mean a pinch or rotate, not a pan
    fn on_pointer_up(&mut self, event: &TouchEvent) {
        let up_index = event.action_index;
        let Some(lifting_id) = event.pointer_id(up_index) else {
            return;
        };
        let lifting = self.velocity.velocity(lifting_id);

        let opposed = event
            .pointers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != up_index)
            .any(|(_, p)| lifting.dot(self.velocity.velocity(p.id)) < 0.0);
        if opposed {
            debug!("Pointers moving apart, discarding velocity history");
            self.velocity.clear();
        }
    }

    fn on_up(&mut self, event: &TouchEvent) {
        let Some(down) = self.down.take() else {
            return;
        };
        self.delta_reference_x = None;

        let pointer_id = event.pointer_id(0).unwrap_or(down.id);
        let velocity = self.velocity.velocity(pointer_id);
        self.velocity.clear();

        let gesture = Gesture {
            down_x: down.x,
            down_y: down.y,
            up_x: event.x(),
            up_y: event.y(),
            velocity_x: velocity.x,
        };
        let decision = classify_fling(
            &gesture,
            self.screen_width as f32,
            self.touch_offset_px,
            &self.thresholds,
        );
        debug!(?decision, velocity_x = velocity.x, touch_offset_px = self.touch_offset_px, "Gesture finished");
        self.last_decision = Some(decision);

        let layout = self.layout();
        let target = match decision {
            FlingDecision::Advance(_) => layout.next_boundary(self.touch_offset_px),
            FlingDecision::Retreat(_) => layout.previous_boundary(self.touch_offset_px),
            FlingDecision::NotHorizontal | FlingDecision::Stationary => None,
        };
        if let Some(target) = target {
            self.start_swipe_animation(target);
        }
    }

    fn end_swipe_animation(&mut self) {
        if let Some(animation) = self.swipe_animation.as_mut().filter(|a| a.is_active()) {
            // The snapped value is ignored; touch_offset_px already holds
            // the last value this animation reported
            animation.end(|_| {});
        }
    }

    fn start_swipe_animation(&mut self, target: f32) {
        self.end_swipe_animation();

        let mut animation = EasingAnimator::new(self.touch_offset_px, target, self.easing_step);
        debug!(from = self.touch_offset_px, target_px = target, "Settling on page boundary");
        animation.start(|event| self.on_animation_event(event));
        self.swipe_animation = Some(animation);
    }

    fn on_animation_event(&mut self, event: AnimationEvent) {
        match event {
            AnimationEvent::Updated(value) => {
                self.touch_offset_px = value;
                self.emit_current();
            }
            AnimationEvent::Ended(value) => {
                trace!(touch_offset_px = value, "Settle finished");
            }
            AnimationEvent::Started(_) => {}
        }
    }

    /// Advance the settle animation by one tick. Returns whether it moved.
    pub fn advance_animation(&mut self) -> bool {
        let Some(mut animation) = self.swipe_animation.take() else {
            return false;
        };
        let active = animation.is_active();
        animation.update(|event| self.on_animation_event(event));
        self.swipe_animation = Some(animation);
        active
    }
}
