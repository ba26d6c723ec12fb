//! Platform abstraction layer
//!
//! Host-side plumbing between the window system and the game:
//! - Input events
//! - Frame timing and debouncing

pub mod input;
pub mod time;

pub use input::InputEvent;
pub use time::{Debouncer, FrameClock};
