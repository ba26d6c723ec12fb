//! Weapon pattern engine
//!
//! A pattern is split in two halves:
//! - [`plan`] decides, when the turret fires, how many volleys go out and when
//! - [`fire`] turns one volley into projectiles at the moment it is due, using
//!   the turret's and the player's positions at that moment
//!
//! Aiming at fire time rather than plan time is what lets the player dodge a
//! volley that is already on its way.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::difficulty::GameSettings;
use super::entity::{Projectile, RadialHue, Turret, TurretClass};
use crate::renderer::{Color, hsl};
use crate::{Millis, Viewport, angle_to, direction};

/// Gap between windmill rings
pub const WINDMILL_RING_DELAY: Millis = 120;
/// Gap between flower rings
pub const FLOWER_RING_DELAY: Millis = 20;
/// Gap between spiral shots
pub const SPIRAL_SHOT_DELAY: Millis = 10;
/// Gap between line shots and between cone rows
pub const AIMED_ROW_DELAY: Millis = 200;
/// Gap between shotgun and overtake volleys
pub const AIMED_WAVE_DELAY: Millis = 100;

/// Offset added after each windmill or flower ring
const RING_STEP: f32 = PI * 0.22;
/// Offset added after each spiral shot
const SPIRAL_STEP: f32 = PI * 0.33;
/// Half-width of the burst gap, relative to the gap angle
const BURST_GAP: f32 = 0.05;

const LINE_SPEED: f32 = 3.0;
const CONE_SPEED: f32 = 1.5;
const CONE_SPACING: f32 = PI * 0.01;
const SHOTGUN_SPEED: f32 = 1.5;
const SHOTGUN_JITTER: f32 = PI * 0.0625;
const WAVE_SHOTS: u32 = 5;
const WAVE_SPACING: f32 = PI * 0.1;
const WAVE_DRIFT: f32 = PI * 0.02;
const ARROW_SPACING: f32 = PI * 0.05;

/// Aimed projectile colour ramp
const AIMED_HUE_MIN: f32 = 80.0;
const AIMED_HUE_RANGE: f32 = 100.0;
const AIMED_SATURATION: f32 = 0.82;
const AIMED_LIGHTNESS: f32 = 0.73;

/// Below this squared distance a turret is treated as sitting on the player
const MIN_AIM_DIST_SQ: f32 = 1e-6;

/// Named fire patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// One ring with a small random gap
    Burst,
    /// A fixed ring and a rotating ring, repeated
    Windmill,
    /// Two mirrored shots per ring, rotating
    Flower,
    /// One shot per tick, rotating
    Spiral,
    /// Single shots at the player
    Line,
    /// Shrinking rows centred on the player
    Cone,
    /// Jittered waves at the player
    Shotgun,
    /// Two wings of ever faster shots closing on the player
    OvertakeArrow,
    /// Faster and faster fans that sweep past each other
    OvertakeWave,
}

impl PatternKind {
    pub const RADIAL: [PatternKind; 4] = [
        PatternKind::Burst,
        PatternKind::Windmill,
        PatternKind::Flower,
        PatternKind::Spiral,
    ];
    pub const AIMED: [PatternKind; 3] =
        [PatternKind::Line, PatternKind::Cone, PatternKind::Shotgun];
    /// Added to aimed turrets created once hard mode is on
    pub const AIMED_HARD: [PatternKind; 2] =
        [PatternKind::OvertakeArrow, PatternKind::OvertakeWave];

    /// Pattern list for a new turret
    pub fn catalogue(class: TurretClass, hard_mode: bool) -> Vec<PatternKind> {
        match class {
            TurretClass::Radial => Self::RADIAL.to_vec(),
            TurretClass::Aimed => {
                let mut list = Self::AIMED.to_vec();
                if hard_mode {
                    list.extend_from_slice(&Self::AIMED_HARD);
                }
                list
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Burst => "burst",
            PatternKind::Windmill => "windmill",
            PatternKind::Flower => "flower",
            PatternKind::Spiral => "spiral",
            PatternKind::Line => "line",
            PatternKind::Cone => "cone",
            PatternKind::Shotgun => "shotgun",
            PatternKind::OvertakeArrow => "overtake-arrow",
            PatternKind::OvertakeWave => "overtake-wave",
        }
    }
}

/// One deferred step of a pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volley {
    Burst { count: u32, gap: f32, hue: RadialHue },
    WindmillRing { count: u32, hue: RadialHue },
    FlowerRing { hue: RadialHue },
    SpiralShot { hue: RadialHue },
    LineShot { color: Color },
    ConeRow { len: u32, color: Color },
    ShotgunWave { count: u32, color: Color },
    OvertakeFan { speed: f32, drift: f32, color: Color },
    ArrowShot { offset: f32, speed: f32, color: Color },
}

/// A volley and its delay from the moment the pattern fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledVolley {
    pub delay: Millis,
    pub volley: Volley,
}

impl ScheduledVolley {
    fn new(delay: Millis, volley: Volley) -> Self {
        Self { delay, volley }
    }
}

/// Pick a pattern uniformly from a turret's list
pub fn choose(patterns: &[PatternKind], rng: &mut impl Rng) -> Option<PatternKind> {
    if patterns.is_empty() {
        return None;
    }
    Some(patterns[rng.random_range(0..patterns.len())])
}

/// Colour of step `i` out of `steps` along the aimed hue ramp
fn aimed_color(i: u32, steps: u32) -> Color {
    let inc = AIMED_HUE_RANGE / steps.max(1) as f32;
    hsl(
        AIMED_HUE_MIN + inc * i as f32,
        AIMED_SATURATION,
        AIMED_LIGHTNESS,
        1.0,
    )
}

/// Radial patterns come in three lengths
fn length(rng: &mut impl Rng) -> u32 {
    rng.random_range(0..3u32)
}

/// Schedule every volley of one pattern
pub fn plan(kind: PatternKind, settings: &GameSettings, rng: &mut impl Rng) -> Vec<ScheduledVolley> {
    let n = settings.num_radial_projectiles;
    let m = settings.num_aimed_projectiles;
    match kind {
        PatternKind::Burst => {
            let hue = RadialHue::ALL[rng.random_range(0..RadialHue::ALL.len())];
            let gap = rng.random::<f32>() * PI + PI;
            vec![ScheduledVolley::new(
                0,
                Volley::Burst {
                    count: n * 5,
                    gap,
                    hue,
                },
            )]
        }
        PatternKind::Windmill => {
            let rings = (n as f32 * (0.5 + 0.5 * length(rng) as f32)).ceil() as u32;
            let hue = RadialHue::ALL[rng.random_range(0..RadialHue::ALL.len())];
            (0..rings)
                .map(|i| {
                    ScheduledVolley::new(
                        i as Millis * WINDMILL_RING_DELAY,
                        Volley::WindmillRing { count: n, hue },
                    )
                })
                .collect()
        }
        PatternKind::Flower => {
            let rings = (n as f32 * 2.5 * (1 + length(rng)) as f32).ceil() as u32;
            let hue = RadialHue::ALL[rng.random_range(0..RadialHue::ALL.len())];
            (0..rings)
                .map(|i| {
                    ScheduledVolley::new(i as Millis * FLOWER_RING_DELAY, Volley::FlowerRing { hue })
                })
                .collect()
        }
        PatternKind::Spiral => {
            let shots = n * 5 * (1 + length(rng));
            let hue = RadialHue::ALL[rng.random_range(0..RadialHue::ALL.len())];
            (0..shots)
                .map(|i| {
                    ScheduledVolley::new(i as Millis * SPIRAL_SHOT_DELAY, Volley::SpiralShot { hue })
                })
                .collect()
        }
        PatternKind::Line => (0..m)
            .map(|i| {
                ScheduledVolley::new(
                    i as Millis * AIMED_ROW_DELAY,
                    Volley::LineShot {
                        color: aimed_color(i, m),
                    },
                )
            })
            .collect(),
        PatternKind::Cone => (0..m)
            .map(|i| {
                ScheduledVolley::new(
                    i as Millis * AIMED_ROW_DELAY,
                    Volley::ConeRow {
                        len: m - i,
                        color: aimed_color(i, m),
                    },
                )
            })
            .collect(),
        PatternKind::Shotgun => (0..m)
            .map(|i| {
                ScheduledVolley::new(
                    i as Millis * AIMED_WAVE_DELAY,
                    Volley::ShotgunWave {
                        count: m,
                        color: aimed_color(i, m),
                    },
                )
            })
            .collect(),
        PatternKind::OvertakeWave => {
            let waves = m * 3;
            (0..waves)
                .map(|i| {
                    let step = (i + 1) as f32;
                    ScheduledVolley::new(
                        i as Millis * AIMED_WAVE_DELAY,
                        Volley::OvertakeFan {
                            speed: 0.3 + step * 0.3,
                            drift: step * WAVE_DRIFT,
                            color: aimed_color(i, waves),
                        },
                    )
                })
                .collect()
        }
        PatternKind::OvertakeArrow => {
            let mut volleys = Vec::with_capacity(m as usize * 2);
            // Mirrored wings: the innermost shots sit one step either side of
            // the aim, leaving a two-step gap centred on the player
            for side in [-1.0f32, 1.0] {
                for i in 0..m {
                    volleys.push(ScheduledVolley::new(
                        i as Millis * AIMED_WAVE_DELAY,
                        Volley::ArrowShot {
                            offset: side * (m - i) as f32 * ARROW_SPACING,
                            speed: (i + 1) as f32,
                            color: aimed_color(i, m),
                        },
                    ));
                }
            }
            volleys
        }
    }
}

/// Direction from the turret to the player, or `None` when they coincide
fn aim_angle(from: Vec2, to: Vec2) -> Option<f32> {
    if from.distance_squared(to) < MIN_AIM_DIST_SQ {
        log::trace!("Turret on top of player, skipping aimed volley");
        return None;
    }
    Some(angle_to(from, to))
}

/// Emit the projectiles of one volley
///
/// Ring patterns advance the turret's accumulated offset.
pub fn fire(
    volley: &Volley,
    turret: &mut Turret,
    target: Vec2,
    viewport: &Viewport,
    rng: &mut impl Rng,
) -> Vec<Projectile> {
    let origin = turret.body.pos;
    let radial = |dir: Vec2, hue: RadialHue| Projectile::radial(origin, dir, hue, viewport);
    let aimed =
        |angle: f32, speed: f32, color: Color| Projectile::aimed(origin, direction(angle) * speed, color, viewport);

    match *volley {
        Volley::Burst { count, gap, hue } => {
            let slice = TAU / count.max(1) as f32;
            (0..count)
                .map(|i| slice * i as f32)
                .filter(|&a| !(a > gap * (1.0 - BURST_GAP) && a < gap * (1.0 + BURST_GAP)))
                // Flip y so the gap opens on the lower half of the screen
                .map(|a| radial(Vec2::new(a.cos(), -a.sin()), hue))
                .collect()
        }
        Volley::WindmillRing { count, hue } => {
            let slice = TAU / count.max(1) as f32;
            let offset = turret.offset;
            let fixed = (0..count).map(|j| slice * j as f32);
            let turning = (0..count).map(|j| offset + slice * j as f32);
            let shots = fixed.chain(turning).map(|a| radial(direction(a), hue)).collect();
            turret.offset += RING_STEP;
            shots
        }
        Volley::FlowerRing { hue } => {
            let a = turret.offset;
            turret.offset += RING_STEP;
            vec![radial(direction(a), hue), radial(direction(-a), hue)]
        }
        Volley::SpiralShot { hue } => {
            let a = turret.offset;
            turret.offset += SPIRAL_STEP;
            vec![radial(direction(a), hue)]
        }
        Volley::LineShot { color } => match (target - origin).try_normalize() {
            Some(dir) => vec![Projectile::aimed(origin, dir * LINE_SPEED, color, viewport)],
            None => {
                log::trace!("Turret {} on top of player, line shot skipped", turret.id);
                Vec::new()
            }
        },
        Volley::ConeRow { len, color } => {
            let Some(aim) = aim_angle(origin, target) else {
                return Vec::new();
            };
            let start = aim - CONE_SPACING * (len.saturating_sub(1)) as f32 * 0.5;
            (0..len)
                .map(|i| aimed(start + CONE_SPACING * i as f32, CONE_SPEED, color))
                .collect()
        }
        Volley::ShotgunWave { count, color } => {
            let Some(aim) = aim_angle(origin, target) else {
                return Vec::new();
            };
            (0..count)
                .map(|_| {
                    let jitter = (rng.random::<f32>() - 0.5) * SHOTGUN_JITTER;
                    aimed(aim + jitter, SHOTGUN_SPEED, color)
                })
                .collect()
        }
        Volley::OvertakeFan {
            speed,
            drift,
            color,
        } => {
            let Some(aim) = aim_angle(origin, target) else {
                return Vec::new();
            };
            let start = aim - WAVE_SPACING * 2.5;
            (0..WAVE_SHOTS)
                .map(|i| aimed(start + WAVE_SPACING * i as f32 + drift, speed, color))
                .collect()
        }
        Volley::ArrowShot {
            offset,
            speed,
            color,
        } => match aim_angle(origin, target) {
            Some(aim) => vec![aimed(aim + offset, speed, color)],
            None => Vec::new(),
        },
    }
}
