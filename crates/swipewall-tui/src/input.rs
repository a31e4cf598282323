use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use swipewall_core::gesture::{TouchAction, TouchEvent};

use crate::surface::{CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Space: pause or resume both loops
    ToggleVisibility,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char(' '), _) => Action::ToggleVisibility,
        _ => Action::None,
    }
}

/// Turns left-button mouse drags into single-pointer touch events
///
/// Cells map to the centre of their virtual pixel block, so a drag across
/// one column moves `CELL_WIDTH_PX` pixels.
pub struct TouchMapper {
    origin: Instant,
    pressed: bool,
}

impl Default for TouchMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchMapper {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            pressed: false,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn map(&mut self, mouse: MouseEvent) -> Option<TouchEvent> {
        let event_time_ms = self.origin.elapsed().as_millis() as u64;
        self.map_at(mouse, event_time_ms)
    }

    /// Like [`TouchMapper::map`] with an explicit timestamp
    pub fn map_at(&mut self, mouse: MouseEvent, event_time_ms: u64) -> Option<TouchEvent> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed = true;
                TouchAction::Down
            }
            MouseEventKind::Drag(MouseButton::Left) if self.pressed => TouchAction::Move,
            MouseEventKind::Up(MouseButton::Left) if self.pressed => {
                self.pressed = false;
                TouchAction::Up
            }
            _ => return None,
        };

        let x = (mouse.column as u32 * CELL_WIDTH_PX + CELL_WIDTH_PX / 2) as f32;
        let y = (mouse.row as u32 * CELL_HEIGHT_PX + CELL_HEIGHT_PX / 2) as f32;
        Some(TouchEvent::single(action, x, y, event_time_ms))
    }
}
