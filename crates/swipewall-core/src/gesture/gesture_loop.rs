use std::time::Duration;

use super::tracker::SharedTracker;
use crate::scheduler::{LoopControl, LoopController};
use crate::sync::lock;
use crate::Result;

/// Fixed-rate loop that advances the tracker's settle animation
///
/// Runs on its own schedule, separate from rendering; the host pauses and
/// resumes it together with the render loop.
pub struct GestureLoop {
    controller: LoopController,
}

impl GestureLoop {
    /// Spawn the loop (paused) on the current tokio runtime
    pub fn start(tracker: SharedTracker, period: Duration) -> Self {
        let mut controller = LoopController::new("gesture", period);
        controller.start(move |_| {
            lock(&tracker).advance_animation();
        });
        Self { controller }
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
