//! Touch input as consumed by the offset tracker

/// What happened to the pointer(s) in this event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    /// First pointer went down
    Down,
    /// One or more pointers moved
    Move,
    /// Last pointer went up
    Up,
    /// An additional pointer went down
    PointerDown,
    /// A non-last pointer went up
    PointerUp,
    /// The host aborted the gesture
    Cancel,
}

/// Position of one pointer at the time of the event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A decoded touch event
///
/// `pointers[0]` is the primary pointer. For `PointerDown`/`PointerUp`,
/// `action_index` names the pointer that changed state.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    pub action_index: usize,
    pub pointers: Vec<PointerSample>,
    /// Milliseconds on a monotonic clock chosen by the host
    pub event_time_ms: u64,
}

impl TouchEvent {
    /// Single-pointer event, the common case
    pub fn single(action: TouchAction, x: f32, y: f32, event_time_ms: u64) -> Self {
        Self {
            action,
            action_index: 0,
            pointers: vec![PointerSample { id: 0, x, y }],
            event_time_ms,
        }
    }

    pub fn down(x: f32, y: f32, event_time_ms: u64) -> Self {
        Self::single(TouchAction::Down, x, y, event_time_ms)
    }

    pub fn moved(x: f32, y: f32, event_time_ms: u64) -> Self {
        Self::single(TouchAction::Move, x, y, event_time_ms)
    }

    pub fn up(x: f32, y: f32, event_time_ms: u64) -> Self {
        Self::single(TouchAction::Up, x, y, event_time_ms)
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    /// Primary pointer x, 0 when the event carries no pointers
    pub fn x(&self) -> f32 {
        self.pointers.first().map_or(0.0, |p| p.x)
    }

    pub fn y(&self) -> f32 {
        self.pointers.first().map_or(0.0, |p| p.y)
    }

    pub fn pointer_id(&self, index: usize) -> Option<u32> {
        self.pointers.get(index).map(|p| p.id)
    }
}
