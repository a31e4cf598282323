use anyhow::Result;
use tracing::debug;

use swipewall_core::Engine;

use crate::event::{AppEvent, EventHandler};
use crate::input::{handle_key_event, Action, TouchMapper};
use crate::surface::virtual_size;

/// Terminal-side state around an [`Engine`]
pub struct App {
    pub should_quit: bool,
    touch: TouchMapper,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            touch: TouchMapper::new(),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent, engine: &Engine) {
        match event {
            AppEvent::Key(key) => match handle_key_event(key) {
                Action::Quit => self.should_quit = true,
                Action::ToggleVisibility => engine.on_visibility_changed(!engine.is_visible()),
                Action::None => {}
            },
            AppEvent::Mouse(mouse) => {
                if let Some(touch) = self.touch.map(mouse) {
                    engine.on_touch_event(&touch);
                }
            }
            AppEvent::Resize(cols, rows) => {
                let (width, height) = virtual_size(cols, rows);
                debug!(cols, rows, width, height, "Terminal resized");
                engine.on_surface_changed(width, height);
            }
            AppEvent::Tick => {}
        }
    }

    /// Blocking input loop; returns once the user quits
    pub fn run(&mut self, engine: &Engine, events: &EventHandler) -> Result<()> {
        while !self.should_quit {
            if let Some(event) = events.next()? {
                self.handle_event(event, engine);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use swipewall_core::sync::lock;
    use swipewall_core::{AppConfig, RecordingSurface};

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_events_drive_engine() {
        let engine = Engine::create(&AppConfig::default(), RecordingSurface::new(640, 384));
        let mut app = App::new();

        app.handle_event(AppEvent::Resize(80, 24), &engine);
        assert_eq!(lock(&engine.tracker()).screen_width(), 640);
        assert_eq!(lock(&engine.scene()).center(), (320, 192));

        app.handle_event(key(KeyCode::Char(' ')), &engine);
        assert!(engine.is_visible());
        app.handle_event(key(KeyCode::Char(' ')), &engine);
        assert!(!engine.is_visible());

        app.handle_event(AppEvent::Tick, &engine);
        assert!(!app.should_quit);
        app.handle_event(key(KeyCode::Char('q')), &engine);
        assert!(app.should_quit);

        engine.destroy().await.unwrap();
    }
}
