//! The animated scene: a ring, its centre dot and a circle orbiting it
//!
//! The ring's horizontal centre follows the paging offset, so swiping
//! between pages slides the whole drawing across the surface.

use std::sync::{Arc, Mutex};

use crate::config::SceneConfig;
use crate::render::{Canvas, Paint, Renderer};

/// Radius of the dot marking the ring's centre
const CENTER_DOT_RADIUS: f32 = 5.0;
const RING_STROKE_WIDTH: f32 = 3.0;

pub type SharedScene = Arc<Mutex<Scene>>;

#[derive(Debug, Clone)]
pub struct Scene {
    background: Paint,
    ring: Paint,
    accent: Paint,
    rotation_step: f32,

    width: u32,
    height: u32,
    center_x: i32,
    center_y: i32,
    outer_radius: f32,
    inner_radius: f32,
    circle_x: i32,
    circle_y: i32,
    /// Degrees, kept in `[0, 360)`
    angle: f32,
    paging_offset_x: f32,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            background: Paint::fill(config.background_color),
            ring: Paint::stroke(config.ring_color, RING_STROKE_WIDTH),
            accent: Paint::fill(config.accent_color),
            rotation_step: config.rotation_step_deg,
            width: 0,
            height: 0,
            center_x: 0,
            center_y: 0,
            outer_radius: 0.0,
            inner_radius: 0.0,
            circle_x: 0,
            circle_y: 0,
            angle: 0.0,
            paging_offset_x: 0.5,
        }
    }

    pub fn into_shared(self) -> SharedScene {
        Arc::new(Mutex::new(self))
    }

    pub fn update_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.center_x = (width as f32 * self.paging_offset_x) as i32;
        self.center_y = (height / 2) as i32;

        let size = width.min(height);
        self.outer_radius = (size / 3) as f32;
        self.inner_radius = self.outer_radius * 0.2;

        self.update();
    }

    /// Follow the horizontal paging offset
    pub fn on_offsets_changed(&mut self, x_offset: f32, _y_offset: f32, _x_offset_step: f32, _y_offset_step: f32) {
        self.paging_offset_x = x_offset;
        self.center_x = (self.width as f32 * x_offset) as i32;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn paging_offset_x(&self) -> f32 {
        self.paging_offset_x
    }

    pub fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }

    pub fn orbit_position(&self) -> (i32, i32) {
        (self.circle_x, self.circle_y)
    }

    pub fn radii(&self) -> (f32, f32) {
        (self.outer_radius, self.inner_radius)
    }
}

impl Renderer for Scene {
    fn update(&mut self) {
        self.angle = (self.angle + self.rotation_step).rem_euclid(360.0);
        // rem_euclid can round up to the modulus for tiny negative inputs
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }

        let radians = self.angle.to_radians();
        self.circle_x = (self.center_x as f32 - self.outer_radius * radians.cos()) as i32;
        self.circle_y = (self.center_y as f32 - self.outer_radius * radians.sin()) as i32;
    }

    fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw_paint(&self.background);

        let (cx, cy) = (self.center_x as f32, self.center_y as f32);
        canvas.draw_circle(cx, cy, self.outer_radius, &self.ring);
        canvas.draw_circle(cx, cy, CENTER_DOT_RADIUS, &self.accent);
        canvas.draw_circle(self.circle_x as f32, self.circle_y as f32, self.inner_radius, &self.accent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DisplayList, DrawOp, PaintStyle};

    fn sized_scene() -> Scene {
        let mut scene = Scene::new(&SceneConfig::default());
        scene.update_size(1080, 1920);
        scene
    }

    #[test]
    fn test_geometry_from_size() {
        let scene = sized_scene();
        assert_eq!(scene.center(), (540, 960));
        assert_eq!(scene.radii(), (360.0, 72.0));
        // update_size takes the first rotation step
        assert_eq!(scene.angle(), 1.0);
    }

    #[test]
    fn test_angle_wraps_below_360() {
        let mut scene = sized_scene();
        for _ in 0..720 {
            scene.update();
            assert!((0.0..360.0).contains(&scene.angle()));
        }
    }

    #[test]
    fn test_angle_wraps_for_any_step() {
        for step in [-1.0, -359.5, -1000.0, 720.0, 725.0, 10_000.0] {
            let mut scene = Scene::new(&SceneConfig {
                rotation_step_deg: step,
                ..Default::default()
            });
            scene.update_size(100, 100);
            for _ in 0..50 {
                scene.update();
                assert!((0.0..360.0).contains(&scene.angle()), "angle {} for step {}", scene.angle(), step);
            }
        }

        let mut scene = Scene::new(&SceneConfig {
            rotation_step_deg: -1.0,
            ..Default::default()
        });
        scene.update_size(100, 100);
        assert_eq!(scene.angle(), 359.0);
        scene.update();
        assert_eq!(scene.angle(), 358.0);
    }

    #[test]
    fn test_orbit_at_quarter_turn() {
        let mut scene = Scene::new(&SceneConfig {
            rotation_step_deg: 90.0,
            ..Default::default()
        });
        scene.update_size(900, 900);
        // 90 degrees: directly above the centre
        assert_eq!(scene.orbit_position(), (450, 150));
    }

    #[test]
    fn test_offset_moves_centre() {
        let mut scene = sized_scene();
        scene.on_offsets_changed(0.25, 0.5, 0.25, 1.0);
        assert_eq!(scene.center().0, 270);
        assert_eq!(scene.paging_offset_x(), 0.25);

        // A resize keeps the offset
        scene.update_size(2000, 1000);
        assert_eq!(scene.center(), (500, 500));
    }

    #[test]
    fn test_draw_order() {
        let scene = sized_scene();
        let mut canvas = DisplayList::new(1080, 1920);
        scene.draw(&mut canvas);

        let ops = canvas.into_ops();
        assert_eq!(ops.len(), 4);
        assert!(matches!(ops[0], DrawOp::Paint(p) if p.color == 0xff8a_a8a0));
        assert!(matches!(ops[1], DrawOp::Circle { radius, paint, .. }
            if radius == 360.0 && paint.style == PaintStyle::Stroke));
        assert!(matches!(ops[2], DrawOp::Circle { radius, .. } if radius == 5.0));
        assert!(matches!(ops[3], DrawOp::Circle { radius, .. } if radius == 72.0));
    }
}
