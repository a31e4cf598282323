//! Rendering side: canvas abstraction, surfaces and the render loop

pub mod canvas;
pub mod render_loop;
pub mod surface;

pub use canvas::{Canvas, DisplayList, DrawOp, Paint, PaintStyle};
pub use render_loop::RenderLoop;
pub use surface::{with_canvas, FrameLog, RecordingSurface, Surface};

/// A scene the render loop can drive. Both calls come from the render
/// loop only, back to back, once per tick.
pub trait Renderer {
    /// Advance one animation step
    fn update(&mut self);
    /// Paint the current state
    fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C);
}
