//! Bullet Hell - survive the turrets for as long as you can
//!
//! Core modules:
//! - `sim`: Simulation engine (entities, fire patterns, spawning, collisions)
//! - `game`: Controller wiring input, frames, resize and high scores together
//! - `renderer`: Draw sink abstraction and a GPU-ready draw list
//! - `platform`: Input events and frame timing
//! - `persistence`: Score storage collaborators
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Milliseconds on the game clock
pub type Millis = u64;

/// Game configuration constants
///
/// Spatial values are fractions of the viewport so play feels the same on
/// every screen size.
pub mod consts {
    /// Turret radius (fraction of viewport height)
    pub const TURRET_RADIUS: f32 = 0.01;
    /// Turrets wrap to the top once this many radii below the bottom edge
    pub const TURRET_WRAP_RADII: f32 = 6.0;
    /// Enemy projectile radius (fraction of viewport height)
    pub const PROJECTILE_RADIUS: f32 = 0.003;
    /// Player projectile radius (fraction of viewport height)
    pub const PLAYER_PROJECTILE_RADIUS: f32 = 0.002;
    /// Player radius (fraction of viewport height)
    pub const PLAYER_RADIUS: f32 = 0.01;
    /// Player spawn point (fractions of viewport width and height)
    pub const PLAYER_SPAWN_X: f32 = 0.5;
    pub const PLAYER_SPAWN_Y: f32 = 0.8;
    /// Player shots travel straight up at this (unscaled) speed
    pub const PLAYER_PROJECTILE_SPEED: f32 = 3.0;

    /// Radial turret base speed range (fraction of height per frame)
    pub const RADIAL_SPEED_MIN: f32 = 0.00025;
    pub const RADIAL_SPEED_SPREAD: f32 = 0.00025;
    /// Hard-mode fast radial turret speed range
    pub const RADIAL_FAST_SPEED_MIN: f32 = 0.005;
    pub const RADIAL_FAST_SPEED_SPREAD: f32 = 0.005;
    /// Chance that a hard-mode radial turret gets the fast speed
    pub const RADIAL_FAST_CHANCE: f32 = 0.5;
    /// Aimed turret speed range
    pub const AIMED_SPEED_MIN: f32 = 0.0005;
    pub const AIMED_SPEED_SPREAD: f32 = 0.0005;

    /// Particle opacity decay per frame
    pub const PARTICLE_FADE: f32 = 0.97;
    /// Particle radius decay per frame
    pub const PARTICLE_SHRINK: f32 = 0.98;
    /// Particles below this opacity are pruned
    pub const PARTICLE_MIN_OPACITY: f32 = 0.1;
    /// Smallest explosion particle radius (fraction of viewport height); the
    /// largest is twice this
    pub const PARTICLE_RADIUS: f32 = 0.002;
    /// Particle speed (fraction of height per frame, before random scaling)
    pub const PARTICLE_SPEED: f32 = 0.002;

    /// Background star count
    pub const STAR_COUNT: usize = 120;
}

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fraction of the viewport height in pixels
    #[inline]
    pub fn vh(&self, fraction: f32) -> f32 {
        self.height * fraction
    }

    /// Fraction of the viewport width in pixels
    #[inline]
    pub fn vw(&self, fraction: f32) -> f32 {
        self.width * fraction
    }

    /// Multiplier turning a unit direction into a per-frame projectile velocity
    #[inline]
    pub fn speed_scale(&self) -> f32 {
        (self.width + self.height) * 0.0005
    }

    /// Whether a circle is still inside the viewport, allowing a radius margin
    /// on every edge
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x >= -radius
            && pos.x <= self.width + radius
            && pos.y >= -radius
            && pos.y <= self.height + radius
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Angle (radians, screen coordinates) pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
