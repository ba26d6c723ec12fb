//! Input events delivered by the host

use glam::Vec2;

use crate::Viewport;

/// Something the player or the window did
///
/// Pointer positions are applied as given; positions off the canvas are
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer or touch moved to a canvas position
    PointerMoved(Vec2),
    /// Start button / key
    Start,
    /// Window regained focus
    Focus,
    /// Window lost focus
    Blur,
    /// Canvas changed size
    Resize(Viewport),
}
