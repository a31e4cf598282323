pub mod app;
pub mod event;
pub mod input;
pub mod surface;

pub use app::App;
pub use surface::{virtual_size, TerminalSurface};
