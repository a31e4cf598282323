pub mod config;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod sync;

pub use config::{AppConfig, GestureConfig, LoopConfig, SceneConfig};
pub use engine::Engine;
pub use error::{Error, Result};
pub use gesture::{FlingDecision, TouchAction, TouchEvent, TouchOffsetTracker};
pub use render::{Canvas, DisplayList, DrawOp, Paint, RecordingSurface, Renderer, Surface};
pub use scene::Scene;
