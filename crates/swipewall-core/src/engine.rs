//! Host glue: owns the scene, the touch tracker and both loops
//!
//! The host drives an [`Engine`] through lifecycle callbacks (visibility,
//! surface size, touch input, host-scrolled offsets) and tears it down with
//! [`Engine::destroy`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::gesture::{GestureLoop, OffsetsListener, SharedTracker, TouchEvent, TouchOffsetTracker};
use crate::render::{RenderLoop, Surface};
use crate::scene::{Scene, SharedScene};
use crate::sync::lock;
use crate::Result;

/// Offset reported while nothing has moved the strip
const CENTERED: f32 = 0.5;

pub struct Engine {
    preview: bool,
    scene: SharedScene,
    tracker: SharedTracker,
    offsets: Arc<watch::Sender<f32>>,
    render_loop: RenderLoop,
    gesture_loop: GestureLoop,
    visible: AtomicBool,
    /// Set once the host scrolls offsets itself; touch tracking is off from then on
    scrolling_working: AtomicBool,
}

impl Engine {
    /// Build the scene and tracker and spawn both loops, paused.
    ///
    /// Must be called from within a tokio runtime.
    pub fn create<S: Surface>(config: &AppConfig, surface: S) -> Self {
        let preview = config.general.preview;
        let scene = Scene::new(&config.scene).into_shared();

        let offsets = Arc::new(watch::Sender::new(CENTERED));

        let listener_scene = scene.clone();
        let listener_offsets = offsets.clone();
        let listener: Arc<dyn OffsetsListener> = Arc::new(move |x: f32, y: f32, x_step: f32, y_step: f32| {
            let x = if preview { CENTERED } else { x };
            lock(&listener_scene).on_offsets_changed(x, y, x_step, y_step);
            listener_offsets.send_replace(x);
        });
        let tracker = TouchOffsetTracker::new(&config.gesture, listener).into_shared();

        let period = config.loops.period();
        let render_loop = RenderLoop::start(surface, scene.clone(), period);
        let gesture_loop = GestureLoop::start(tracker.clone(), period);

        info!(
            fps = config.loops.fps,
            page_count = config.gesture.page_count,
            preview,
            "Engine created"
        );

        Self {
            preview,
            scene,
            tracker,
            offsets,
            render_loop,
            gesture_loop,
            visible: AtomicBool::new(false),
            scrolling_working: AtomicBool::new(false),
        }
    }

    pub fn scene(&self) -> SharedScene {
        self.scene.clone()
    }

    pub fn tracker(&self) -> SharedTracker {
        self.tracker.clone()
    }

    /// Horizontal offsets as delivered to the scene
    pub fn subscribe_offsets(&self) -> watch::Receiver<f32> {
        self.offsets.subscribe()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn is_scrolling_working(&self) -> bool {
        self.scrolling_working.load(Ordering::SeqCst)
    }

    /// Whether the render loop is alive; it stops itself on a surface error
    pub fn is_rendering(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.render_loop.frames_drawn()
    }

    /// The tracker's normalized offset
    pub fn current_offset(&self) -> f32 {
        lock(&self.tracker).normalized_offset()
    }

    pub fn on_visibility_changed(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
        if visible {
            self.gesture_loop.resume();
            self.render_loop.resume();
        } else {
            self.gesture_loop.pause();
            self.render_loop.pause();
        }
        debug!(visible, "Visibility changed");
    }

    pub fn on_surface_changed(&self, width: u32, height: u32) {
        // Tracker lock is released before the scene is taken directly
        lock(&self.tracker).set_screen_width(width);
        lock(&self.scene).update_size(width, height);
        debug!(width, height, "Surface changed");
    }

    pub fn on_touch_event(&self, event: &TouchEvent) {
        if self.scrolling_working.load(Ordering::SeqCst) {
            return;
        }
        lock(&self.tracker).on_touch_event(event);
    }

    /// Offsets scrolled by the host itself
    pub fn on_host_offsets_changed(&self, x_offset: f32, y_offset: f32, x_offset_step: f32, y_offset_step: f32) {
        let mut x_offset = if self.preview { CENTERED } else { x_offset };

        let tracked = {
            let mut tracker = lock(&self.tracker);
            if x_offset_step > 0.0 {
                let page_count = ((1.0 / x_offset_step).round() as u32).max(1);
                if page_count != tracker.page_count() {
                    tracker.set_page_count(page_count);
                }
            }
            tracker.normalized_offset()
        };

        if x_offset != CENTERED && !self.scrolling_working.swap(true, Ordering::SeqCst) {
            info!(x_offset, "Host scrolls offsets, touch tracking disabled");
        }
        if !self.preview && tracked != CENTERED && tracked != x_offset {
            x_offset = tracked;
        }

        lock(&self.scene).on_offsets_changed(x_offset, y_offset, x_offset_step, y_offset_step);
        self.offsets.send_replace(x_offset);
    }

    /// Stop both loops and wait for their tasks to finish
    pub async fn destroy(self) -> Result<()> {
        let Self {
            mut render_loop,
            mut gesture_loop,
            ..
        } = self;

        gesture_loop.stop();
        render_loop.stop();
        gesture_loop.join().await?;
        render_loop.join().await?;

        info!("Engine destroyed");
        Ok(())
    }
}
