use std::sync::{Arc, Mutex};

use tracing::warn;

use super::canvas::{Canvas, DisplayList};
use crate::sync::lock;
use crate::Result;

/// Something frames can be drawn onto
///
/// `lock_canvas` returning `Ok(None)` means the surface is transiently not
/// ready; errors from either call are fatal for the render loop.
pub trait Surface: Send + 'static {
    type Canvas: Canvas;

    fn lock_canvas(&mut self) -> Result<Option<Self::Canvas>>;
    fn unlock_canvas_and_post(&mut self, canvas: Self::Canvas) -> Result<()>;
}

/// Run `draw` against a freshly locked canvas and always post it back.
///
/// Returns `Ok(None)` when no canvas was available. A drawing error wins
/// over a posting error; the latter is still logged.
pub fn with_canvas<S, R, F>(surface: &mut S, draw: F) -> Result<Option<R>>
where
    S: Surface,
    F: FnOnce(&mut S::Canvas) -> Result<R>,
{
    let Some(mut canvas) = surface.lock_canvas()? else {
        return Ok(None);
    };
    let drawn = draw(&mut canvas);
    let posted = surface.unlock_canvas_and_post(canvas);

    match (drawn, posted) {
        (Ok(value), Ok(())) => Ok(Some(value)),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(post_error)) => {
            warn!(error = %post_error, "Posting canvas failed after a drawing error");
            Err(e)
        }
    }
}

/// Frames posted to a [`RecordingSurface`]
#[derive(Debug, Default)]
pub struct FrameLog {
    pub posted: usize,
    pub last: Option<DisplayList>,
}

/// Headless surface keeping the most recent frame
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    log: Arc<Mutex<FrameLog>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            log: Arc::new(Mutex::new(FrameLog::default())),
        }
    }

    /// Shared view of what has been posted so far
    pub fn log(&self) -> Arc<Mutex<FrameLog>> {
        self.log.clone()
    }

    pub fn frames_posted(&self) -> usize {
        lock(&self.log).posted
    }
}

impl Surface for RecordingSurface {
    type Canvas = DisplayList;

    fn lock_canvas(&mut self) -> Result<Option<DisplayList>> {
        Ok(Some(DisplayList::new(self.width, self.height)))
    }

    fn unlock_canvas_and_post(&mut self, canvas: DisplayList) -> Result<()> {
        let mut log = lock(&self.log);
        log.posted += 1;
        log.last = Some(canvas);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::Paint;
    use crate::Error;

    /// Surface whose calls fail on demand
    struct FlakySurface {
        available: bool,
        fail_lock: bool,
        fail_post: bool,
        posted: usize,
    }

    impl FlakySurface {
        fn healthy() -> Self {
            Self {
                available: true,
                fail_lock: false,
                fail_post: false,
                posted: 0,
            }
        }
    }

    impl Surface for FlakySurface {
        type Canvas = DisplayList;

        fn lock_canvas(&mut self) -> Result<Option<DisplayList>> {
            if self.fail_lock {
                return Err(Error::Surface("lock".into()));
            }
            Ok(self.available.then(|| DisplayList::new(10, 10)))
        }

        fn unlock_canvas_and_post(&mut self, _canvas: DisplayList) -> Result<()> {
            self.posted += 1;
            if self.fail_post {
                return Err(Error::Surface("post".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_draws_and_posts() {
        let mut surface = FlakySurface::healthy();
        let ops = with_canvas(&mut surface, |canvas| {
            canvas.draw_paint(&Paint::fill(0));
            Ok(canvas.ops().len())
        })
        .unwrap();
        assert_eq!(ops, Some(1));
        assert_eq!(surface.posted, 1);
    }

    #[test]
    fn test_unavailable_canvas_skips() {
        let mut surface = FlakySurface {
            available: false,
            ..FlakySurface::healthy()
        };
        let mut called = false;
        let result = with_canvas(&mut surface, |_| {
            called = true;
            Ok(())
        })
        .unwrap();
        assert!(result.is_none());
        assert!(!called);
        assert_eq!(surface.posted, 0);
    }

    #[test]
    fn test_canvas_posted_after_draw_error() {
        let mut surface = FlakySurface::healthy();
        let result: Result<Option<()>> =
            with_canvas(&mut surface, |_| Err(Error::Surface("invalid".into())));
        assert!(matches!(result, Err(Error::Surface(msg)) if msg == "invalid"));
        assert_eq!(surface.posted, 1);
    }

    #[test]
    fn test_post_and_lock_errors_propagate() {
        let mut surface = FlakySurface {
            fail_post: true,
            ..FlakySurface::healthy()
        };
        assert!(with_canvas(&mut surface, |_| Ok(())).is_err());

        let mut surface = FlakySurface {
            fail_lock: true,
            ..FlakySurface::healthy()
        };
        assert!(with_canvas(&mut surface, |_| Ok(())).is_err());
        assert_eq!(surface.posted, 0);
    }

    #[test]
    fn test_recording_surface_keeps_last_frame() {
        let mut surface = RecordingSurface::new(320, 240);
        for _ in 0..3 {
            with_canvas(&mut surface, |canvas| {
                canvas.draw_paint(&Paint::fill(0xff00_00ff));
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(surface.frames_posted(), 3);
        let log = surface.log();
        let log = lock(&log);
        assert_eq!(log.last.as_ref().map(|f| f.ops().len()), Some(1));
    }
}
