//! Drawing interface between the scene and whatever hosts it

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintStyle {
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    /// 0xAARRGGBB
    pub color: u32,
    pub style: PaintStyle,
    pub stroke_width: f32,
    pub anti_alias: bool,
}

impl Paint {
    pub fn fill(color: u32) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
            stroke_width: 0.0,
            anti_alias: true,
        }
    }

    pub fn stroke(color: u32, stroke_width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke,
            stroke_width,
            anti_alias: true,
        }
    }

    /// Split into (r, g, b), ignoring alpha
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.color >> 16) & 0xff) as u8,
            ((self.color >> 8) & 0xff) as u8,
            (self.color & 0xff) as u8,
        )
    }
}

/// Drawing target handed out by a surface for one frame
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Fill the whole canvas
    fn draw_paint(&mut self, paint: &Paint);
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Paint(Paint),
    Circle { cx: f32, cy: f32, radius: f32, paint: Paint },
}

/// Canvas that records operations instead of rasterizing them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

impl Canvas for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_paint(&mut self, paint: &Paint) {
        self.ops.push(DrawOp::Paint(*paint));
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::Circle {
            cx,
            cy,
            radius,
            paint: *paint,
        });
    }
}
