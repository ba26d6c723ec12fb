//! Simulation module
//!
//! All gameplay logic lives here:
//! - Motion is fixed-step, one update per rendered frame
//! - Timers run on an integer millisecond clock through [`Scheduler`]
//! - All randomness comes from the state's seeded RNG
//! - No platform dependencies; drawing goes through the `Renderer` trait

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod pattern;
pub mod schedule;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{bodies_collide, circles_overlap};
pub use difficulty::{DifficultyChange, GameSettings};
pub use entity::{
    Body, Entity, Particle, Player, Projectile, ProjectileKind, RadialHue, Star, Turret,
    TurretClass,
};
pub use pattern::{PatternKind, ScheduledVolley, Volley};
pub use schedule::{Scheduler, TaskSet, TimerId};
pub use spawner::Spawner;
pub use state::{
    GameEvent, GameObjects, GameOverReason, GamePhase, GameState, Task, TurretRef,
};
pub use tick::{frame, resolve_frame};
