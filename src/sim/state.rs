//! Game state and the deferred tasks that act on it
//!
//! `GameState` owns everything a session touches: tunables, live entities,
//! the task scheduler and the RNG. Nothing lives in globals, so several games
//! can run side by side (handy for tests).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::{DifficultyChange, GameSettings};
use super::entity::{Particle, Player, Projectile, Star, Turret, TurretClass};
use super::pattern::{self, PatternKind, Volley};
use super::schedule::{Scheduler, TimerId};
use super::spawner::Spawner;
use crate::consts::STAR_COUNT;
use crate::{Millis, Tuning, Viewport};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the start input
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended, score available in `last_score`
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// An enemy projectile reached the player
    PlayerHit,
    /// The viewport changed size mid-game
    Resize,
}

/// Stable reference to a turret that survives collection reshuffles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurretRef {
    pub class: TurretClass,
    pub id: u32,
}

/// Deferred work queued on the game scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Create one turret
    Spawn(TurretClass),
    /// Debounced pattern pick for a turret
    Dispatch(TurretRef),
    /// One step of a running pattern
    Volley(TurretRef, Volley),
    /// The player's recurring shot
    PlayerFire,
}

/// Notable things that happened, drained by the host each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    TurretSpawned(TurretRef),
    PatternFired { turret: TurretRef, pattern: PatternKind },
    TurretDestroyed { turret: TurretRef, pos: Vec2 },
    Difficulty(DifficultyChange),
    GameOver { score: u64, reason: GameOverReason },
}

/// Live entity collections. Every entity sits in exactly one of them.
#[derive(Debug, Clone, Default)]
pub struct GameObjects {
    pub radial_turrets: Vec<Turret>,
    pub aimed_turrets: Vec<Turret>,
    pub radial_projectiles: Vec<Projectile>,
    pub aimed_projectiles: Vec<Projectile>,
    pub player_projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
}

impl GameObjects {
    pub fn turrets(&self, class: TurretClass) -> &Vec<Turret> {
        match class {
            TurretClass::Radial => &self.radial_turrets,
            TurretClass::Aimed => &self.aimed_turrets,
        }
    }

    pub fn turrets_mut(&mut self, class: TurretClass) -> &mut Vec<Turret> {
        match class {
            TurretClass::Radial => &mut self.radial_turrets,
            TurretClass::Aimed => &mut self.aimed_turrets,
        }
    }

    /// Enemy projectiles fired by a turret class
    pub fn projectiles_mut(&mut self, class: TurretClass) -> &mut Vec<Projectile> {
        match class {
            TurretClass::Radial => &mut self.radial_projectiles,
            TurretClass::Aimed => &mut self.aimed_projectiles,
        }
    }

    pub fn turret_mut(&mut self, turret: TurretRef) -> Option<&mut Turret> {
        self.turrets_mut(turret.class)
            .iter_mut()
            .find(|t| t.id == turret.id)
    }

    pub fn enemy_projectile_count(&self) -> usize {
        self.radial_projectiles.len() + self.aimed_projectiles.len()
    }

    pub fn clear(&mut self) {
        self.radial_turrets.clear();
        self.aimed_turrets.clear();
        self.radial_projectiles.clear();
        self.aimed_projectiles.clear();
        self.player_projectiles.clear();
        self.particles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.radial_turrets.is_empty()
            && self.aimed_turrets.is_empty()
            && self.radial_projectiles.is_empty()
            && self.aimed_projectiles.is_empty()
            && self.player_projectiles.is_empty()
            && self.particles.is_empty()
    }
}

/// Complete state of one game instance
#[derive(Debug)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub settings: GameSettings,
    pub objects: GameObjects,
    pub player: Player,
    /// Background stars (kept across games)
    pub stars: Vec<Star>,
    pub scheduler: Scheduler<Task>,
    pub spawner: Spawner,
    pub rng: Pcg32,
    /// Game clock; advanced by frames and while running tasks
    pub now: Millis,
    /// Timestamp of the previous frame while playing
    pub last_frame: Option<Millis>,
    /// Window unfocused: score stops accumulating, everything else runs
    pub paused: bool,
    /// Particles emitted per destroyed turret
    pub explosion_particles: u32,
    /// Draw the background starfield
    pub starfield: bool,
    /// Score of the last finished run
    pub last_score: Option<u64>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(viewport: Viewport, seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star::scattered(&viewport, &mut rng))
            .collect();
        Self {
            seed,
            viewport,
            phase: GamePhase::Menu,
            tuning,
            settings: GameSettings::default(),
            objects: GameObjects::default(),
            player: Player::new(&viewport),
            stars,
            scheduler: Scheduler::new(),
            spawner: Spawner::new(),
            rng,
            now: 0,
            last_frame: None,
            paused: false,
            explosion_particles: 15,
            starfield: true,
            last_score: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Menu -> Playing
    pub fn start(&mut self, now: Millis) {
        if self.phase == GamePhase::Playing {
            return;
        }
        self.teardown();
        self.now = now;
        self.last_frame = Some(now);
        self.phase = GamePhase::Playing;
        self.player.reset(&self.viewport);

        let interval = self.tuning.player_fire_interval_ms;
        let id = self.scheduler.schedule(now, interval, Task::PlayerFire);
        self.player.fire_timer.track(id);

        let capacity = self.settings.total_max_turrets();
        for class in TurretClass::ALL {
            let max = self.settings.max(class);
            self.spawner.create_turret(
                max,
                self.tuning.initial_spawn_delay_ms,
                class,
                capacity,
                &mut self.scheduler,
                now,
                &mut self.rng,
            );
            *self.settings.current_mut(class) = max;
        }
        log::info!("Game started at {}ms", now);
    }

    /// Playing -> GameOver. Returns the score.
    pub fn end_game(&mut self, reason: GameOverReason) -> u64 {
        let score = self.settings.score();
        self.teardown();
        self.phase = GamePhase::GameOver;
        self.last_score = Some(score);
        self.push_event(GameEvent::GameOver { score, reason });
        log::info!("Game over ({:?}), survived {}s", reason, score);
        score
    }

    /// GameOver -> Menu
    pub fn return_to_menu(&mut self) {
        if self.phase == GamePhase::GameOver {
            self.phase = GamePhase::Menu;
        }
    }

    /// Cancel every callback, clear the collections and restore defaults
    fn teardown(&mut self) {
        let mut cancelled = 0;
        for class in TurretClass::ALL {
            for turret in self.objects.turrets_mut(class).iter_mut() {
                cancelled += turret.stop_firing(&mut self.scheduler);
            }
        }
        cancelled += self.spawner.cancel_all(&mut self.scheduler);
        cancelled += self.player.fire_timer.cancel_all(&mut self.scheduler);
        // Handles evicted from bounded sets are only reachable from here
        let leftover = self.scheduler.len();
        self.scheduler.clear();
        if cancelled + leftover > 0 {
            log::debug!("Teardown cancelled {} tracked and {} untracked callbacks", cancelled, leftover);
        }

        self.objects.clear();
        self.settings = GameSettings::default();
        self.last_frame = None;
        self.paused = false;
    }

    /// Apply a new viewport size (stars and player are rescaled)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.resize(&viewport);
        self.stars = (0..STAR_COUNT)
            .map(|_| Star::scattered(&viewport, &mut self.rng))
            .collect();
    }

    /// Run every task due at or before `now`, in order
    pub fn run_due(&mut self, now: Millis) {
        while let Some((id, due, task)) = self.scheduler.pop_due(now) {
            // Chained tasks are timed from when their parent was due
            self.now = due.max(self.now);
            self.execute(id, task);
        }
        self.now = now.max(self.now);
    }

    fn execute(&mut self, id: TimerId, task: Task) {
        match task {
            Task::Spawn(class) => {
                self.spawner.landed(id);
                if self.phase != GamePhase::Playing {
                    return;
                }
                let turret_id = self.next_entity_id();
                let turret = Turret::spawn(
                    turret_id,
                    class,
                    &self.viewport,
                    self.settings.hard_mode,
                    &mut self.rng,
                );
                self.objects.turrets_mut(class).push(turret);
                let turret = TurretRef { class, id: turret_id };
                log::debug!("Spawned {} turret {}", class.as_str(), turret_id);
                self.push_event(GameEvent::TurretSpawned(turret));
            }
            Task::Dispatch(turret) => self.dispatch(turret),
            Task::Volley(turret, volley) => {
                let target = self.player.body.pos;
                let Some(t) = self.objects.turret_mut(turret) else {
                    log::trace!("Volley for vanished turret {} dropped", turret.id);
                    return;
                };
                let shots = pattern::fire(&volley, t, target, &self.viewport, &mut self.rng);
                self.objects.projectiles_mut(turret.class).extend(shots);
            }
            Task::PlayerFire => {
                if self.phase != GamePhase::Playing {
                    return;
                }
                if !self.paused {
                    let shots = self.player.volley(&self.viewport);
                    self.objects.player_projectiles.extend(shots);
                }
                let interval = self.tuning.player_fire_interval_ms;
                let next = self.scheduler.schedule(self.now, interval, Task::PlayerFire);
                self.player.fire_timer.track(next);
            }
        }
    }

    /// Pick and schedule a random pattern for a turret
    fn dispatch(&mut self, turret: TurretRef) {
        let Some(t) = self.objects.turret_mut(turret) else {
            log::trace!("Dispatch for vanished turret {} dropped", turret.id);
            return;
        };
        t.dispatch = None;
        let Some(kind) = pattern::choose(&t.patterns, &mut self.rng) else {
            return;
        };
        let volleys = pattern::plan(kind, &self.settings, &mut self.rng);
        t.pending.set_capacity(volleys.len());
        for v in volleys {
            let id = self
                .scheduler
                .schedule(self.now, v.delay, Task::Volley(turret, v.volley));
            t.pending.track(id);
        }
        log::debug!("Turret {} fires {}", turret.id, kind.as_str());
        self.push_event(GameEvent::PatternFired {
            turret,
            pattern: kind,
        });
    }

    /// Debounced fire request: replaces any dispatch still waiting
    pub fn request_fire(&mut self, turret: TurretRef) -> bool {
        let Some(t) = self.objects.turret_mut(turret) else {
            return false;
        };
        if let Some(previous) = t.dispatch.take() {
            self.scheduler.cancel(previous);
        }
        let id = self.scheduler.schedule(
            self.now,
            self.tuning.fire_debounce_ms,
            Task::Dispatch(turret),
        );
        t.dispatch = Some(id);
        true
    }

    /// Cancel a turret's pending dispatch and volleys
    pub fn stop_firing(&mut self, turret: TurretRef) -> usize {
        match self.objects.turret_mut(turret) {
            Some(t) => t.stop_firing(&mut self.scheduler),
            None => 0,
        }
    }

    /// Remove a turret hit by the player, leaving an explosion behind
    pub fn destroy_turret(&mut self, turret: TurretRef, impact: Vec2) -> bool {
        let list = self.objects.turrets_mut(turret.class);
        let Some(index) = list.iter().position(|t| t.id == turret.id) else {
            return false;
        };
        let mut removed = list.remove(index);
        removed.stop_firing(&mut self.scheduler);

        let current = self.settings.current_mut(turret.class);
        *current = current.saturating_sub(1);

        let color = removed.color();
        for _ in 0..self.explosion_particles {
            let particle = Particle::burst(impact, color, &self.viewport, &mut self.rng);
            self.objects.particles.push(particle);
        }
        log::debug!("Turret {} destroyed", turret.id);
        self.push_event(GameEvent::TurretDestroyed {
            turret,
            pos: impact,
        });
        true
    }

    /// Move the player to a pointer position
    pub fn move_player(&mut self, pos: Vec2) {
        self.player.move_to(pos);
    }

    /// Window focus changes pause score accumulation only
    pub fn set_focus(&mut self, focused: bool) {
        self.paused = !focused;
    }

    /// Raise difficulty to match the survival time
    pub fn escalate(&mut self) {
        let changes = self.settings.advance(&self.tuning);
        for change in changes {
            match change {
                DifficultyChange::HardMode => log::info!("Hard mode unlocked"),
                DifficultyChange::Level(level) => log::info!("Difficulty level {}", level),
                other => log::debug!("Difficulty: {:?}", other),
            }
            self.push_event(GameEvent::Difficulty(change));
        }
    }

    /// References to every live turret of both classes
    pub fn turret_refs(&self) -> Vec<TurretRef> {
        TurretClass::ALL
            .iter()
            .flat_map(|&class| {
                self.objects
                    .turrets(class)
                    .iter()
                    .map(move |t| TurretRef { class, id: t.id })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn playing() -> GameState {
        let mut state = GameState::new(VP, 1234, Tuning::default());
        state.start(0);
        state
    }

    #[test]
    fn test_start_schedules_initial_population() {
        let state = playing();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.settings.current_radial_turrets, 2);
        assert_eq!(state.settings.current_aimed_turrets, 2);
        assert_eq!(state.spawner.pending(), 4);
        // Four spawns plus the player's fire timer
        assert_eq!(state.scheduler.len(), 5);
    }

    #[test]
    fn test_initial_spawns_land_in_window() {
        let mut state = playing();
        state.run_due(1999);
        assert!(state.objects.radial_turrets.is_empty());
        state.run_due(3000);
        assert_eq!(state.objects.radial_turrets.len(), 2);
        assert_eq!(state.objects.aimed_turrets.len(), 2);
        assert_eq!(state.spawner.pending(), 0);
    }

    #[test]
    fn test_player_fires_pairs_unless_paused() {
        let mut state = playing();
        state.run_due(500);
        assert_eq!(state.objects.player_projectiles.len(), 2);
        state.set_focus(false);
        state.run_due(1000);
        assert_eq!(state.objects.player_projectiles.len(), 2);
        state.set_focus(true);
        state.run_due(1500);
        assert_eq!(state.objects.player_projectiles.len(), 4);
    }

    #[test]
    fn test_debounce_keeps_only_last_request() {
        let mut state = playing();
        state.run_due(3000);
        let turret = state.turret_refs()[0];
        state.drain_events();

        state.now = 3000;
        assert!(state.request_fire(turret));
        state.run_due(3010);
        assert!(state.request_fire(turret));
        // First request would have dispatched at 3020
        state.run_due(3025);
        assert!(state.drain_events().is_empty());

        state.run_due(3030);
        let fired: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::PatternFired { .. }))
            .collect();
        assert_eq!(fired.len(), 1);
    }

    #[test]
    fn test_destroy_turret_cancels_and_explodes() {
        let mut state = playing();
        state.run_due(3000);
        let turret = TurretRef {
            class: TurretClass::Radial,
            id: state.objects.radial_turrets[0].id,
        };
        state.request_fire(turret);
        state.run_due(3020);
        let pending = state.objects.radial_turrets[0].pending.len();
        assert!(pending > 0);

        assert!(state.destroy_turret(turret, Vec2::new(10.0, 10.0)));
        let leftover = state.scheduler.tasks().any(|task| match task {
            Task::Volley(t, _) | Task::Dispatch(t) => *t == turret,
            _ => false,
        });
        assert!(!leftover);
        assert_eq!(state.settings.current_radial_turrets, 1);
        assert_eq!(state.objects.particles.len(), 15);
        assert!(!state.destroy_turret(turret, Vec2::ZERO));
    }

    #[test]
    fn test_end_game_resets_everything() {
        let mut state = playing();
        state.run_due(4000);
        for t in state.turret_refs() {
            state.request_fire(t);
        }
        state.run_due(4100);
        state.settings.total_time = 42_000;

        let score = state.end_game(GameOverReason::PlayerHit);
        assert_eq!(score, 42);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.scheduler.is_empty());
        assert!(state.objects.is_empty());
        assert_eq!(state.settings, GameSettings::default());
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            score: 42,
            reason: GameOverReason::PlayerHit
        }));

        state.return_to_menu();
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_start_puts_player_back_at_spawn() {
        let mut state = playing();
        state.move_player(Vec2::new(790.0, 590.0));
        state.end_game(GameOverReason::Resize);
        let small = Viewport::new(320.0, 240.0);
        state.set_viewport(small);
        state.return_to_menu();

        state.start(1000);
        assert_eq!(state.player.body.pos, Vec2::new(160.0, 192.0));
        assert_eq!(state.player.body.pos, Player::spawn_point(&small));
        assert_eq!(state.player.body.radius, small.vh(crate::consts::PLAYER_RADIUS));
    }

    #[test]
    fn test_spawns_after_teardown_are_ignored() {
        let mut state = playing();
        state.end_game(GameOverReason::Resize);
        state.return_to_menu();
        // A stray spawn task that escaped bookkeeping
        state.scheduler.schedule(state.now, 100, Task::Spawn(TurretClass::Aimed));
        state.run_due(10_000);
        assert!(state.objects.aimed_turrets.is_empty());
    }
}
