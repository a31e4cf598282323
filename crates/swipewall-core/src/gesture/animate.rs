//! Linear easing from one offset to another, one fixed step per tick
//!
//! The animator is driven from outside: the gesture loop calls
//! [`EasingAnimator::update`] once per tick. Every lifecycle call takes a
//! notification callback, so the owner decides what an update means
//! without the animator holding a reference back to it.

/// Lifecycle notification, carrying the animator's value at that moment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    Started(f32),
    Updated(f32),
    Ended(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EasingAnimator {
    from: f32,
    to: f32,
    step: f32,
    current: f32,
    active: bool,
}

impl EasingAnimator {
    /// Create an idle animator. `step` is the magnitude moved per update.
    pub fn new(from: f32, to: f32, step: f32) -> Self {
        Self {
            from,
            to,
            step: step.abs(),
            current: from,
            active: false,
        }
    }

    pub fn from_value(&self) -> f32 {
        self.from
    }

    pub fn to_value(&self) -> f32 {
        self.to
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, mut notify: impl FnMut(AnimationEvent)) {
        self.current = self.from;
        self.active = true;
        notify(AnimationEvent::Started(self.current));
    }

    /// Advance one step toward the target.
    ///
    /// The step that would reach or pass the target ends the animation
    /// first (snapping to the target, `Ended`) and then reports `Updated`
    /// with the target value.
    pub fn update(&mut self, mut notify: impl FnMut(AnimationEvent)) {
        if !self.active {
            return;
        }

        let next = if self.from < self.to {
            self.current + self.step
        } else {
            self.current - self.step
        };
        let arrived = if self.from < self.to {
            next >= self.to
        } else if self.from > self.to {
            next <= self.to
        } else {
            true
        };

        if arrived {
            self.end(&mut notify);
        } else {
            self.current = next;
        }
        notify(AnimationEvent::Updated(self.current));
    }

    /// Force-terminate, snapping to the target
    pub fn end(&mut self, mut notify: impl FnMut(AnimationEvent)) {
        self.current = self.to;
        self.active = false;
        notify(AnimationEvent::Ended(self.current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_end(animator: &mut EasingAnimator) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        animator.start(|e| events.push(e));
        for _ in 0..1000 {
            if !animator.is_active() {
                break;
            }
            animator.update(|e| events.push(e));
        }
        events
    }

    fn updated_values(events: &[AnimationEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                AnimationEvent::Updated(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_forward_reaches_target_exactly() {
        let mut animator = EasingAnimator::new(30.0, 1000.0, 100.0);
        let events = run_to_end(&mut animator);

        assert_eq!(events.first(), Some(&AnimationEvent::Started(30.0)));
        let values = updated_values(&events);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*values.last().unwrap(), 1000.0);
        assert_eq!(animator.current(), 1000.0);
        assert!(!animator.is_active());
    }

    #[test]
    fn test_backward_reaches_target_exactly() {
        let mut animator = EasingAnimator::new(970.0, 0.0, 100.0);
        let events = run_to_end(&mut animator);

        let values = updated_values(&events);
        assert!(values.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(values, vec![870.0, 770.0, 670.0, 570.0, 470.0, 370.0, 270.0, 170.0, 70.0, 0.0]);
        assert_eq!(animator.current(), 0.0);
    }

    #[test]
    fn test_monotonic_for_assorted_steps() {
        for (from, to, step) in [(0.0, 1.0, 0.3), (-50.0, 75.5, 7.0), (4000.0, 3000.0, 99.9), (10.0, 10.5, 100.0)] {
            let mut animator = EasingAnimator::new(from, to, step);
            let events = run_to_end(&mut animator);
            let values = updated_values(&events);
            let mut prev = from;
            for v in &values {
                assert!((to - v).abs() <= (to - prev).abs(), "{} moved away from {}", v, to);
                prev = *v;
            }
            assert_eq!(animator.current(), to);
            assert!(!animator.is_active());
        }
    }

    #[test]
    fn test_ended_precedes_final_update() {
        let mut animator = EasingAnimator::new(0.0, 150.0, 100.0);
        let events = run_to_end(&mut animator);
        assert_eq!(
            events,
            vec![
                AnimationEvent::Started(0.0),
                AnimationEvent::Updated(100.0),
                AnimationEvent::Ended(150.0),
                AnimationEvent::Updated(150.0),
            ]
        );
    }

    #[test]
    fn test_update_when_inactive_is_noop() {
        let mut animator = EasingAnimator::new(0.0, 100.0, 10.0);
        let mut count = 0;
        animator.update(|_| count += 1);
        assert_eq!(count, 0);
        assert_eq!(animator.current(), 0.0);
    }

    #[test]
    fn test_end_snaps_to_target() {
        let mut animator = EasingAnimator::new(0.0, 1000.0, 100.0);
        animator.start(|_| {});
        animator.update(|_| {});
        assert_eq!(animator.current(), 100.0);

        let mut ended = None;
        animator.end(|e| ended = Some(e));
        assert_eq!(ended, Some(AnimationEvent::Ended(1000.0)));
        assert_eq!(animator.current(), 1000.0);
        assert!(!animator.is_active());
    }

    #[test]
    fn test_zero_length_ends_on_first_update() {
        let mut animator = EasingAnimator::new(500.0, 500.0, 100.0);
        animator.start(|_| {});
        animator.update(|_| {});
        assert!(!animator.is_active());
        assert_eq!(animator.current(), 500.0);
    }
}
