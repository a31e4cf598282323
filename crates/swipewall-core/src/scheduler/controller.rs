//! Pausable fixed-rate task runner
//!
//! A [`LoopController`] owns one background task that repeatedly runs an
//! action and then sleeps for whatever is left of the frame period. The task
//! starts paused. Pause state lives in a `watch` cell so that `resume()` and
//! `stop()` wake a task blocked on pause.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::Result;

/// Lifecycle flags of a loop. `running == false` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    pub running: bool,
    pub paused: bool,
}

impl Default for LoopState {
    fn default() -> Self {
        Self {
            running: true,
            paused: true,
        }
    }
}

/// Cloneable handle used to pause, resume and stop a loop from any thread
///
/// The periodic action receives one as well, so a loop can stop itself.
#[derive(Debug, Clone)]
pub struct LoopControl {
    name: Arc<str>,
    state: Arc<watch::Sender<LoopState>>,
}

impl LoopControl {
    fn new(name: &str) -> Self {
        let (tx, _rx) = watch::channel(LoopState::default());
        Self {
            name: Arc::from(name),
            state: Arc::new(tx),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pause without stopping. No-op when already paused or stopped.
    pub fn pause(&self) {
        let changed = self.state.send_if_modified(|s| {
            if s.running && !s.paused {
                s.paused = true;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(loop_name = %self.name, "Loop paused");
        }
    }

    /// Clear the pause flag and wake the task. No-op when stopped.
    pub fn resume(&self) {
        let changed = self.state.send_if_modified(|s| {
            if s.running && s.paused {
                s.paused = false;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(loop_name = %self.name, "Loop resumed");
        }
    }

    /// Stop for good. Releases a task blocked on pause.
    pub fn stop(&self) {
        let changed = self.state.send_if_modified(|s| {
            if s.running || s.paused {
                s.running = false;
                s.paused = false;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(loop_name = %self.name, "Loop stop requested");
        }
    }

    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state().running
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn subscribe(&self) -> watch::Receiver<LoopState> {
        self.state.subscribe()
    }
}

/// Owner of one periodic background task
pub struct LoopController {
    control: LoopControl,
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl LoopController {
    pub fn new(name: &str, period: Duration) -> Self {
        Self {
            control: LoopControl::new(name),
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Get a handle that can drive this loop from elsewhere
    pub fn control(&self) -> LoopControl {
        self.control.clone()
    }

    /// Spawn the periodic task on the current tokio runtime, paused.
    ///
    /// Must be called from within a runtime. Calling it twice is ignored.
    pub fn start<F>(&mut self, action: F)
    where
        F: FnMut(&LoopControl) + Send + 'static,
    {
        if self.handle.is_some() {
            warn!(loop_name = %self.control.name, "Loop already started");
            return;
        }
        let control = self.control.clone();
        let period = self.period;
        self.handle = Some(tokio::spawn(run_loop(control, period, action)));
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    pub fn stop(&self) {
        self.control.stop();
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// Whether the task has exited (or was never started)
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait until the task has fully exited. Does not stop it by itself.
    pub async fn join(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.await?;
        }
        Ok(())
    }
}

impl Drop for LoopController {
    fn drop(&mut self) {
        // A detached task would otherwise keep ticking forever
        self.control.stop();
    }
}

async fn run_loop<F>(control: LoopControl, period: Duration, mut action: F)
where
    F: FnMut(&LoopControl) + Send + 'static,
{
    let mut rx = control.subscribe();
    info!(
        loop_name = %control.name,
        period_ms = period.as_millis() as u64,
        "Loop started (paused)"
    );

    loop {
        let running = match rx.wait_for(|s| !s.paused || !s.running).await {
            Ok(state) => state.running,
            // Every handle is gone, nobody can resume us
            Err(_) => false,
        };
        if !running {
            break;
        }

        let started = Instant::now();
        action(&control);
        let elapsed = started.elapsed();

        if elapsed < period {
            // Only stop cuts the frame sleep short
            tokio::select! {
                _ = tokio::time::sleep(period - elapsed) => {}
                _ = rx.wait_for(|s| !s.running) => {}
            }
        } else {
            trace!(
                loop_name = %control.name,
                elapsed_ms = elapsed.as_millis() as u64,
                "Tick overran its period, dropping frame"
            );
            tokio::task::yield_now().await;
        }
    }

    info!(loop_name = %control.name, "Loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::{sleep, timeout};

    fn counting_loop(period: Duration) -> (LoopController, Arc<AtomicUsize>) {
        let ticks = Arc::new(AtomicUsize::new(0));
        let mut controller = LoopController::new("test", period);
        let counter = ticks.clone();
        controller.start(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (controller, ticks)
    }

    #[tokio::test]
    async fn test_starts_paused() {
        let (mut controller, ticks) = counting_loop(Duration::from_millis(5));
        sleep(Duration::from_millis(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
        assert!(controller.is_paused());

        controller.resume();
        sleep(Duration::from_millis(60)).await;
        assert!(ticks.load(Ordering::SeqCst) > 0);

        controller.stop();
        timeout(Duration::from_secs(1), controller.join())
            .await
            .expect("loop did not exit")
            .unwrap();
    }

    #[tokio::test]
    async fn test_pause_holds_ticks() {
        let (mut controller, ticks) = counting_loop(Duration::from_millis(5));
        controller.resume();
        sleep(Duration::from_millis(40)).await;
        controller.pause();
        // Let a tick that was already underway finish
        sleep(Duration::from_millis(20)).await;
        let paused_at = ticks.load(Ordering::SeqCst);
        sleep(Duration::from_millis(60)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), paused_at);

        controller.stop();
        controller.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_while_paused_releases_task() {
        let (mut controller, ticks) = counting_loop(Duration::from_millis(5));
        controller.resume();
        sleep(Duration::from_millis(20)).await;
        controller.pause();
        sleep(Duration::from_millis(20)).await;

        controller.stop();
        let joined = timeout(Duration::from_secs(1), controller.join()).await;
        assert!(joined.is_ok(), "stop while paused must not deadlock");
        assert!(controller.is_finished());

        let after_stop = ticks.load(Ordering::SeqCst);
        sleep(Duration::from_millis(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_stop_never_started_pause_is_released() {
        // Task never resumed at all
        let (mut controller, ticks) = counting_loop(Duration::from_millis(5));
        controller.pause();
        controller.stop();
        timeout(Duration::from_secs(1), controller.join())
            .await
            .expect("loop did not exit")
            .unwrap();
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transitions_are_idempotent() {
        let (mut controller, _ticks) = counting_loop(Duration::from_millis(5));
        let control = controller.control();

        control.pause();
        control.pause();
        assert_eq!(control.state(), LoopState { running: true, paused: true });

        control.resume();
        control.resume();
        assert_eq!(control.state(), LoopState { running: true, paused: false });

        control.stop();
        control.stop();
        assert_eq!(control.state(), LoopState { running: false, paused: false });

        // Stopped is terminal
        control.pause();
        control.resume();
        assert_eq!(control.state(), LoopState { running: false, paused: false });

        controller.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_action_can_stop_its_loop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let mut controller = LoopController::new("self-stop", Duration::from_millis(5));
        controller.start(move |control| {
            if counter.fetch_add(1, Ordering::SeqCst) == 2 {
                control.stop();
            }
        });
        controller.resume();

        timeout(Duration::from_secs(1), controller.join())
            .await
            .expect("loop did not exit")
            .unwrap();
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert!(!controller.is_running());
    }

    #[tokio::test]
    async fn test_stop_cuts_frame_sleep_short() {
        let (mut controller, ticks) = counting_loop(Duration::from_secs(30));
        controller.resume();
        sleep(Duration::from_millis(30)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        controller.stop();
        timeout(Duration::from_secs(1), controller.join())
            .await
            .expect("stop must interrupt the frame sleep")
            .unwrap();
    }

    fn timed_loop(period: Duration, work: Duration) -> (LoopController, Arc<Mutex<Vec<Instant>>>) {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let recorded = starts.clone();
        let mut controller = LoopController::new("timed", period);
        controller.start(move |_| {
            recorded.lock().unwrap().push(Instant::now());
            std::thread::sleep(work);
        });
        (controller, starts)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_short_tick_sleeps_remaining_period() {
        let period = Duration::from_millis(60);
        let (mut controller, starts) = timed_loop(period, Duration::from_millis(20));
        controller.resume();
        sleep(Duration::from_millis(400)).await;
        controller.stop();
        controller.join().await.unwrap();

        let starts = starts.lock().unwrap();
        assert!(starts.len() >= 3, "only {} ticks", starts.len());
        for pair in starts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(55), "gap {:?} shorter than period", gap);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_long_tick_has_no_backlog() {
        let work = Duration::from_millis(50);
        let (mut controller, starts) = timed_loop(Duration::from_millis(10), work);
        controller.resume();
        sleep(Duration::from_millis(300)).await;
        controller.stop();
        controller.join().await.unwrap();

        let starts = starts.lock().unwrap();
        // 300ms of 50ms ticks, plus the one that may straddle the stop
        assert!(starts.len() <= 8, "{} ticks means frames were queued", starts.len());
        for pair in starts.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(45), "burst tick after {:?}", gap);
        }
    }
}
