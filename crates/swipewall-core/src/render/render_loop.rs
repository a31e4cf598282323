use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{error, trace};

use super::surface::{with_canvas, Surface};
use super::Renderer;
use crate::scheduler::{LoopControl, LoopController};
use crate::sync::lock;
use crate::Result;

#[derive(Debug, Default)]
struct RenderStats {
    frames: AtomicU64,
    skipped: AtomicU64,
}

/// Fixed-rate loop that advances and redraws the scene
///
/// A tick without a canvas is skipped quietly. Any surface error stops the
/// loop for good; the gesture loop and touch handling are unaffected.
pub struct RenderLoop {
    controller: LoopController,
    stats: Arc<RenderStats>,
}

impl RenderLoop {
    /// Spawn the loop (paused) on the current tokio runtime
    pub fn start<S, R>(mut surface: S, scene: Arc<Mutex<R>>, period: Duration) -> Self
    where
        S: Surface,
        R: Renderer + Send + 'static,
    {
        let stats = Arc::new(RenderStats::default());
        let tick_stats = stats.clone();
        let mut controller = LoopController::new("render", period);

        controller.start(move |control: &LoopControl| {
            let drawn = with_canvas(&mut surface, |canvas| {
                let mut scene = lock(&scene);
                scene.update();
                scene.draw(canvas);
                Ok(())
            });
            match drawn {
                Ok(Some(())) => {
                    tick_stats.frames.fetch_add(1, Ordering::Relaxed);
                }
                Ok(None) => {
                    tick_stats.skipped.fetch_add(1, Ordering::Relaxed);
                    trace!("No canvas available, skipping frame");
                }
                Err(e) => {
                    error!(error = %e, "Rendering failed, stopping render loop");
                    control.stop();
                }
            }
        });

        Self { controller, stats }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.stats.frames.load(Ordering::Relaxed)
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.stats.skipped.load(Ordering::Relaxed)
    }

    pub fn control(&self) -> LoopControl {
        self.controller.control()
    }

    pub fn pause(&self) {
        self.controller.pause();
    }

    pub fn resume(&self) {
        self.controller.resume();
    }

    pub fn stop(&self) {
        self.controller.stop();
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    pub async fn join(&mut self) -> Result<()> {
        self.controller.join().await
    }
}
