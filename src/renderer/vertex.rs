//! Instance types for circle rendering

use bytemuck::{Pod, Zeroable};

/// Linear RGBA colour
pub type Color = [f32; 4];

/// One filled circle as uploaded to the GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: Color) -> Self {
        Self {
            center: [x, y],
            radius,
            _pad: 0.0,
            color,
        }
    }
}

/// Convert HSL (hue in degrees, saturation/lightness in 0-1) to RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, alpha]
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const PLAYER: Color = [0.0, 0.0, 1.0, 1.0];
    pub const PLAYER_PROJECTILE: Color = [1.0, 0.0, 1.0, 1.0];
    /// #f17479
    pub const RADIAL_TURRET: Color = [0.945, 0.455, 0.475, 1.0];
    /// #7d0c10
    pub const RADIAL_BARREL: Color = [0.490, 0.047, 0.063, 1.0];
    /// #4caf50
    pub const AIMED_TURRET: Color = [0.298, 0.686, 0.314, 1.0];
    pub const STAR: Color = [1.0, 1.0, 1.0, 1.0];
}
