//! Moving, drawable game entities
//!
//! Every entity is a circle with a constant per-frame velocity. Motion is
//! fixed-step: one `update()` call advances exactly one frame.

use glam::Vec2;
use rand::Rng;

use super::pattern::PatternKind;
use super::schedule::{Scheduler, TaskSet, TimerId};
use crate::Viewport;
use crate::consts::*;
use crate::renderer::vertex::colors;
use crate::renderer::{Color, Renderer, hsl};

/// Position, velocity and size shared by every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }
}

/// Update-and-draw contract shared by turrets, projectiles and particles
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Advance one frame
    fn update(&mut self) {
        let body = self.body_mut();
        body.pos += body.vel;
    }

    /// Emit draw calls; must not change state
    fn draw(&self, renderer: &mut dyn Renderer);
}

/// Turret families, each with its own pattern catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurretClass {
    /// Fires rings and spirals around itself
    Radial,
    /// Fires at the player
    Aimed,
}

impl TurretClass {
    pub const ALL: [TurretClass; 2] = [TurretClass::Radial, TurretClass::Aimed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TurretClass::Radial => "radial",
            TurretClass::Aimed => "aimed",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            TurretClass::Radial => colors::RADIAL_TURRET,
            TurretClass::Aimed => colors::AIMED_TURRET,
        }
    }
}

/// Colour families for radial projectiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialHue {
    Red,
    Magenta,
    DarkPink,
}

impl RadialHue {
    pub const ALL: [RadialHue; 3] = [RadialHue::Red, RadialHue::Magenta, RadialHue::DarkPink];

    pub fn degrees(&self) -> f32 {
        match self {
            RadialHue::Red => 0.0,
            RadialHue::Magenta => 320.0,
            RadialHue::DarkPink => 340.0,
        }
    }
}

/// Frames each lightness shade of a radial projectile is shown
const RADIAL_SHADE_FRAMES: u32 = 20;
/// Number of lightness shades radial projectiles cycle through
const RADIAL_SHADES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    /// Radial turret shot, cycles through lightness shades of its hue
    Radial { hue: RadialHue, frames: u32 },
    /// Aimed turret shot with a fixed colour
    Aimed { color: Color },
    /// Player shot
    Player,
}

/// A straight-line projectile. Velocity never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Body,
    pub kind: ProjectileKind,
}

impl Projectile {
    /// Radial shot travelling along `dir` (unit vector) at unit speed
    pub fn radial(pos: Vec2, dir: Vec2, hue: RadialHue, viewport: &Viewport) -> Self {
        Self {
            body: Body::new(
                pos,
                dir * viewport.speed_scale(),
                viewport.vh(PROJECTILE_RADIUS),
            ),
            kind: ProjectileKind::Radial { hue, frames: 0 },
        }
    }

    /// Aimed shot; `vel` is the unscaled velocity (direction times magnitude)
    pub fn aimed(pos: Vec2, vel: Vec2, color: Color, viewport: &Viewport) -> Self {
        Self {
            body: Body::new(
                pos,
                vel * viewport.speed_scale(),
                viewport.vh(PROJECTILE_RADIUS),
            ),
            kind: ProjectileKind::Aimed { color },
        }
    }

    /// Player shot heading straight up
    pub fn player(pos: Vec2, viewport: &Viewport) -> Self {
        Self {
            body: Body::new(
                pos,
                Vec2::new(0.0, -PLAYER_PROJECTILE_SPEED) * viewport.speed_scale(),
                viewport.vh(PLAYER_PROJECTILE_RADIUS),
            ),
            kind: ProjectileKind::Player,
        }
    }

    pub fn color(&self) -> Color {
        match self.kind {
            ProjectileKind::Radial { hue, frames } => {
                let shade = (frames / RADIAL_SHADE_FRAMES) % RADIAL_SHADES;
                hsl(hue.degrees(), 1.0, 0.4 + 0.1 * shade as f32, 1.0)
            }
            ProjectileKind::Aimed { color } => color,
            ProjectileKind::Player => colors::PLAYER_PROJECTILE,
        }
    }
}

impl Entity for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        self.body.pos += self.body.vel;
        if let ProjectileKind::Radial { frames, .. } = &mut self.kind {
            *frames = frames.wrapping_add(1);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.circle(self.body.pos, self.body.radius, self.color());
    }
}

/// A hostile turret drifting down the screen
#[derive(Debug, Clone)]
pub struct Turret {
    pub id: u32,
    pub class: TurretClass,
    pub body: Body,
    /// Fire patterns this turret picks from
    pub patterns: Vec<PatternKind>,
    /// Angular offset accumulated by windmill, flower and spiral rings
    pub offset: f32,
    /// Outstanding pattern volleys
    pub pending: TaskSet,
    /// Outstanding debounced dispatch
    pub dispatch: Option<TimerId>,
    glow_frame: u32,
}

impl Turret {
    /// Create a turret just above the top edge with its diameter fully on
    /// screen horizontally
    pub fn spawn(
        id: u32,
        class: TurretClass,
        viewport: &Viewport,
        hard_mode: bool,
        rng: &mut impl Rng,
    ) -> Self {
        let radius = viewport.vh(TURRET_RADIUS);
        let x = radius + rng.random::<f32>() * (viewport.width - 2.0 * radius).max(0.0);
        let speed = match class {
            TurretClass::Radial => {
                if hard_mode && rng.random::<f32>() < RADIAL_FAST_CHANCE {
                    viewport.vh(
                        rng.random::<f32>() * RADIAL_FAST_SPEED_SPREAD + RADIAL_FAST_SPEED_MIN,
                    )
                } else {
                    viewport.vh(rng.random::<f32>() * RADIAL_SPEED_SPREAD + RADIAL_SPEED_MIN)
                }
            }
            TurretClass::Aimed => {
                viewport.vh(rng.random::<f32>() * AIMED_SPEED_SPREAD + AIMED_SPEED_MIN)
            }
        };

        Self {
            id,
            class,
            body: Body::new(Vec2::new(x, -radius), Vec2::new(0.0, speed), radius),
            patterns: PatternKind::catalogue(class, hard_mode),
            offset: 0.0,
            pending: TaskSet::new(),
            dispatch: None,
            glow_frame: 0,
        }
    }

    /// Advance one frame, respawning at the top after leaving the bottom
    pub fn advance(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        self.update();
        if self.body.pos.y > viewport.height + self.body.radius * TURRET_WRAP_RADII {
            self.body.pos.x = rng.random::<f32>() * viewport.width;
            self.body.pos.y = -self.body.radius;
        }
    }

    /// Cancel the pending dispatch and every tracked volley. Returns the
    /// number of callbacks that were still pending.
    pub fn stop_firing<T>(&mut self, scheduler: &mut Scheduler<T>) -> usize {
        let mut cancelled = self.pending.cancel_all(scheduler);
        if let Some(id) = self.dispatch.take() {
            if scheduler.cancel(id) {
                cancelled += 1;
            }
        }
        cancelled
    }

    pub fn color(&self) -> Color {
        self.class.color()
    }
}

impl Entity for Turret {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        self.body.pos += self.body.vel;
        self.glow_frame = self.glow_frame.wrapping_add(1);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        // Pulsing halo
        let pulse = 1.5 + 0.25 * ((self.glow_frame / 10) % 4) as f32;
        let mut halo = self.color();
        halo[3] = 0.25;
        renderer.circle(self.body.pos, self.body.radius * pulse, halo);
        renderer.circle(self.body.pos, self.body.radius, self.color());
        if self.class == TurretClass::Radial {
            renderer.circle(self.body.pos, self.body.radius * 0.45, colors::RADIAL_BARREL);
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    /// The recurring self-fire timer
    pub fire_timer: TaskSet,
}

impl Player {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            body: Body::new(
                Self::spawn_point(viewport),
                Vec2::ZERO,
                viewport.vh(PLAYER_RADIUS),
            ),
            fire_timer: TaskSet::with_capacity(1),
        }
    }

    /// Where every run begins: centred, near the bottom
    pub fn spawn_point(viewport: &Viewport) -> Vec2 {
        Vec2::new(viewport.vw(PLAYER_SPAWN_X), viewport.vh(PLAYER_SPAWN_Y))
    }

    /// Back to the spawn point, sized for the viewport
    pub fn reset(&mut self, viewport: &Viewport) {
        self.body.pos = Self::spawn_point(viewport);
        self.resize(viewport);
    }

    /// Move to a pointer position. Off-screen positions are accepted.
    pub fn move_to(&mut self, pos: Vec2) {
        self.body.pos = pos;
    }

    /// Rescale after a viewport change
    pub fn resize(&mut self, viewport: &Viewport) {
        self.body.radius = viewport.vh(PLAYER_RADIUS);
    }

    /// The pair of shots fired from the left and right edges
    pub fn volley(&self, viewport: &Viewport) -> [Projectile; 2] {
        let offset = Vec2::new(self.body.radius, 0.0);
        [
            Projectile::player(self.body.pos - offset, viewport),
            Projectile::player(self.body.pos + offset, viewport),
        ]
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    // Moved by input only
    fn update(&mut self) {}

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.circle(self.body.pos, self.body.radius, colors::PLAYER);
    }
}

/// A fading explosion fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub body: Body,
    pub color: Color,
    pub opacity: f32,
}

impl Particle {
    pub fn burst(pos: Vec2, color: Color, viewport: &Viewport, rng: &mut impl Rng) -> Self {
        let speed = viewport.vh(PARTICLE_SPEED);
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * rng.random::<f32>() * speed,
            (rng.random::<f32>() - 0.5) * rng.random::<f32>() * speed,
        );
        let radius = viewport.vh(PARTICLE_RADIUS)
            + rng.random::<f32>() * viewport.vh(PARTICLE_RADIUS);
        Self {
            body: Body::new(pos, vel, radius),
            color,
            opacity: 1.0,
        }
    }

    pub fn is_faded(&self) -> bool {
        self.opacity < PARTICLE_MIN_OPACITY
    }
}

impl Entity for Particle {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self) {
        self.body.pos += self.body.vel;
        self.opacity *= PARTICLE_FADE;
        if self.body.radius > 0.0 {
            self.body.radius *= PARTICLE_SHRINK;
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        let mut color = self.color;
        color[3] *= self.opacity;
        renderer.circle(self.body.pos, self.body.radius, color);
    }
}

/// Background star, purely decorative
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub body: Body,
}

impl Star {
    pub fn scattered(viewport: &Viewport, rng: &mut impl Rng) -> Self {
        let pos = Vec2::new(
            rng.random::<f32>() * viewport.width,
            rng.random::<f32>() * viewport.height,
        );
        let vel = Vec2::new(0.0, viewport.vh(rng.random::<f32>() * 0.0005 + 0.0005));
        let radius = viewport.vh(rng.random::<f32>() * 0.0009 + 0.0001);
        Self {
            body: Body::new(pos, vel, radius),
        }
    }

    pub fn advance(&mut self, viewport: &Viewport, rng: &mut impl Rng) {
        self.update();
        if self.body.pos.y > viewport.height + self.body.radius {
            self.body.pos.x = rng.random::<f32>() * viewport.width;
            self.body.pos.y = -self.body.radius;
        }
    }
}

impl Entity for Star {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.circle(self.body.pos, self.body.radius * 3.0, [1.0, 1.0, 1.0, 0.1]);
        renderer.circle(self.body.pos, self.body.radius, colors::STAR);
    }
}
