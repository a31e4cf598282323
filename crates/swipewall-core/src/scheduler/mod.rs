mod controller;

pub use controller::{LoopControl, LoopController, LoopState};
