//! A [`Surface`] that paints display lists onto the terminal with braille

use ratatui::backend::Backend;
use ratatui::style::Color;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas as CanvasWidget, Circle, Context};
use ratatui::Terminal;

use swipewall_core::render::{DisplayList, DrawOp, Paint, PaintStyle};
use swipewall_core::{Error, Result, Surface};

/// Virtual pixels per terminal column
pub const CELL_WIDTH_PX: u32 = 8;
/// Virtual pixels per terminal row
pub const CELL_HEIGHT_PX: u32 = 16;

/// Spacing between the rings used to fill a circle
const FILL_SPACING_PX: f64 = (CELL_WIDTH_PX / 2) as f64;

/// Scene size in virtual pixels for a terminal of `cols` x `rows`
pub fn virtual_size(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32 * CELL_WIDTH_PX, rows as u32 * CELL_HEIGHT_PX)
}

fn color(paint: &Paint) -> Color {
    let (r, g, b) = paint.rgb();
    Color::Rgb(r, g, b)
}

pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
}

impl<B: Backend> TerminalSurface<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self { terminal }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B> Surface for TerminalSurface<B>
where
    B: Backend + Send + 'static,
{
    type Canvas = DisplayList;

    fn lock_canvas(&mut self) -> Result<Option<DisplayList>> {
        let size = self
            .terminal
            .size()
            .map_err(|e| Error::Surface(format!("terminal size: {e}")))?;
        if size.width == 0 || size.height == 0 {
            return Ok(None);
        }
        let (width, height) = virtual_size(size.width, size.height);
        Ok(Some(DisplayList::new(width, height)))
    }

    fn unlock_canvas_and_post(&mut self, canvas: DisplayList) -> Result<()> {
        use swipewall_core::Canvas as _;

        let width = canvas.width() as f64;
        let height = canvas.height() as f64;
        let background = canvas.ops().iter().rev().find_map(|op| match op {
            DrawOp::Paint(paint) => Some(color(paint)),
            DrawOp::Circle { .. } => None,
        });

        self.terminal
            .draw(|frame| {
                let mut widget = CanvasWidget::default()
                    .marker(Marker::Braille)
                    .x_bounds([0.0, width])
                    .y_bounds([0.0, height])
                    .paint(|ctx| paint_ops(ctx, canvas.ops(), height));
                if let Some(background) = background {
                    widget = widget.background_color(background);
                }
                frame.render_widget(widget, frame.area());
            })
            .map_err(|e| Error::Surface(format!("terminal draw: {e}")))?;
        Ok(())
    }
}

/// Replay circles onto a ratatui canvas; its y axis points up
fn paint_ops(ctx: &mut Context<'_>, ops: &[DrawOp], height: f64) {
    for op in ops {
        let DrawOp::Circle { cx, cy, radius, paint } = op else {
            continue;
        };
        let x = *cx as f64;
        let y = height - *cy as f64;
        let radius = *radius as f64;
        let color = color(paint);

        match paint.style {
            PaintStyle::Stroke => ctx.draw(&Circle { x, y, radius, color }),
            PaintStyle::Fill => {
                let mut r = radius;
                while r > 0.0 {
                    ctx.draw(&Circle { x, y, radius: r, color });
                    r -= FILL_SPACING_PX;
                }
            }
        }
    }
}
