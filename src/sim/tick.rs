//! Per-frame update
//!
//! One call to [`frame`] is one rendered frame: it advances the clock, runs
//! every deferred task that came due, then moves, draws, collides and prunes
//! every entity in a fixed order.

use super::collision::bodies_collide;
use super::entity::{Entity, TurretClass};
use super::state::{GameOverReason, GamePhase, GameState, TurretRef};
use crate::Millis;
use crate::renderer::Renderer;

/// Advance the game to `now` and draw the frame
pub fn frame(state: &mut GameState, now: Millis, renderer: &mut dyn Renderer) {
    if state.phase != GamePhase::Playing {
        draw_background(state, renderer);
        return;
    }

    let prev_total = state.settings.total_time;
    // Deltas are taken even while paused so focus returning does not add a jump
    let delta = now.saturating_sub(state.last_frame.unwrap_or(now));
    state.last_frame = Some(now);
    if !state.paused {
        state.settings.total_time += delta;
    }

    state.run_due(now);
    state.escalate();
    resolve_frame(state, prev_total, renderer);
}

/// Run every resolver step. Returns true if the game ended this frame.
pub fn resolve_frame(
    state: &mut GameState,
    prev_total: Millis,
    renderer: &mut dyn Renderer,
) -> bool {
    draw_background(state, renderer);
    resolve_player_projectiles(state, renderer);
    update_particles(state, renderer);
    replenish_turrets(state);
    fire_turrets(state, prev_total);
    update_turrets(state, renderer);
    resolve_enemy_projectiles(state, renderer)
}

/// Stars, player and score. No gameplay effect.
pub fn draw_background(state: &mut GameState, renderer: &mut dyn Renderer) {
    renderer.clear(state.viewport);
    if state.starfield {
        for star in state.stars.iter_mut() {
            star.advance(&state.viewport, &mut state.rng);
            star.draw(renderer);
        }
    }
    if state.phase == GamePhase::Playing {
        state.player.draw(renderer);
        renderer.score(state.settings.score());
    }
}

/// Move player shots, drop those past the top edge and destroy the turrets
/// they hit
///
/// A shot is spent on its first hit and a turret can only be destroyed once
/// per frame.
pub fn resolve_player_projectiles(state: &mut GameState, renderer: &mut dyn Renderer) {
    let mut targets: Vec<_> = TurretClass::ALL
        .iter()
        .flat_map(|&class| {
            state
                .objects
                .turrets(class)
                .iter()
                .map(move |t| (TurretRef { class, id: t.id }, t.body))
        })
        .collect();
    let mut hits = Vec::new();

    state.objects.player_projectiles.retain_mut(|shot| {
        shot.update();
        if shot.body.pos.y < -shot.body.radius {
            return false;
        }
        if let Some(i) = targets.iter().position(|(_, body)| bodies_collide(&shot.body, body)) {
            let (turret, _) = targets.swap_remove(i);
            hits.push((turret, shot.body.pos));
            return false;
        }
        shot.draw(renderer);
        true
    });

    for (turret, impact) in hits {
        state.destroy_turret(turret, impact);
    }
}

pub fn update_particles(state: &mut GameState, renderer: &mut dyn Renderer) {
    state.objects.particles.retain_mut(|p| {
        p.update();
        if p.is_faded() {
            return false;
        }
        p.draw(renderer);
        true
    });
}

/// Schedule replacements for every class below its target
pub fn replenish_turrets(state: &mut GameState) {
    let requested = state.spawner.replenish(
        &mut state.settings,
        state.tuning.replacement_spawn_delay_ms,
        &mut state.scheduler,
        state.now,
        &mut state.rng,
    );
    for (class, count) in requested {
        log::debug!("Replacing {} {} turret(s)", count, class.as_str());
    }
}

/// Ask every turret to fire when survival time crosses a fire-interval
/// boundary this frame
pub fn fire_turrets(state: &mut GameState, prev_total: Millis) {
    let interval = state.tuning.fire_interval_ms.max(1);
    if state.settings.total_time / interval <= prev_total / interval {
        return;
    }
    for turret in state.turret_refs() {
        state.request_fire(turret);
    }
}

/// Move, wrap and draw every turret
pub fn update_turrets(state: &mut GameState, renderer: &mut dyn Renderer) {
    for class in TurretClass::ALL {
        for turret in state.objects.turrets_mut(class).iter_mut() {
            turret.advance(&state.viewport, &mut state.rng);
            turret.draw(renderer);
        }
    }
}

/// Move enemy shots and check them against the player
///
/// Returns true when the player was hit; the game is over and the rest of the
/// frame is skipped.
pub fn resolve_enemy_projectiles(state: &mut GameState, renderer: &mut dyn Renderer) -> bool {
    let player = state.player.body;
    let viewport = state.viewport;

    for class in TurretClass::ALL {
        let shots = state.objects.projectiles_mut(class);
        let mut hit = false;
        for shot in shots.iter_mut() {
            shot.update();
            if bodies_collide(&shot.body, &player) {
                hit = true;
                break;
            }
            shot.draw(renderer);
        }
        if hit {
            state.end_game(GameOverReason::PlayerHit);
            return true;
        }
        shots.retain(|s| viewport.contains_circle(s.body.pos, s.body.radius));
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawList, NullRenderer};
    use crate::sim::entity::{Projectile, RadialHue, Turret};
    use crate::sim::state::GameEvent;
    use crate::{Tuning, Viewport};
    use glam::Vec2;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(VP, seed, Tuning::default());
        state.start(0);
        state
    }

    fn add_turret(state: &mut GameState, class: TurretClass, pos: Vec2) -> TurretRef {
        let id = state.next_entity_id();
        let mut turret = Turret::spawn(id, class, &state.viewport, false, &mut state.rng);
        turret.body.pos = pos;
        state.objects.turrets_mut(class).push(turret);
        TurretRef { class, id }
    }

    #[test]
    fn test_frame_accumulates_survival_time() {
        let mut state = playing(1);
        frame(&mut state, 16, &mut NullRenderer);
        frame(&mut state, 33, &mut NullRenderer);
        assert_eq!(state.settings.total_time, 33);
    }

    #[test]
    fn test_pause_freezes_score_not_motion() {
        let mut state = playing(2);
        let turret = add_turret(&mut state, TurretClass::Aimed, Vec2::new(100.0, 100.0));
        state.set_focus(false);
        frame(&mut state, 500, &mut NullRenderer);
        assert_eq!(state.settings.total_time, 0);
        let t = state.objects.turret_mut(turret).unwrap();
        assert!(t.body.pos.y > 100.0);

        // No jump when focus returns
        state.set_focus(true);
        frame(&mut state, 516, &mut NullRenderer);
        assert_eq!(state.settings.total_time, 16);
    }

    #[test]
    fn test_menu_draws_background_only() {
        let mut state = GameState::new(VP, 3, Tuning::default());
        let mut list = DrawList::new();
        frame(&mut state, 16, &mut list);
        // Each star draws a halo and a core
        assert_eq!(list.len(), state.stars.len() * 2);
        assert_eq!(list.score, None);

        state.starfield = false;
        frame(&mut state, 32, &mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_out_of_bounds_shots_pruned_same_frame() {
        let mut state = playing(4);
        let inside = Projectile::radial(Vec2::new(100.0, 100.0), Vec2::ZERO, RadialHue::Red, &VP);
        let outside = Projectile::radial(Vec2::new(-50.0, 300.0), Vec2::ZERO, RadialHue::Red, &VP);
        state.objects.radial_projectiles.extend([inside, outside]);
        let below = Projectile::aimed(Vec2::new(300.0, 650.0), Vec2::ZERO, [1.0; 4], &VP);
        state.objects.aimed_projectiles.push(below);

        assert!(!resolve_enemy_projectiles(&mut state, &mut NullRenderer));
        assert_eq!(state.objects.radial_projectiles.len(), 1);
        assert!(state.objects.aimed_projectiles.is_empty());
    }

    #[test]
    fn test_enemy_hit_ends_game() {
        let mut state = playing(5);
        state.settings.total_time = 7_500;
        let pos = state.player.body.pos;
        state
            .objects
            .aimed_projectiles
            .push(Projectile::aimed(pos, Vec2::ZERO, [1.0; 4], &VP));

        assert!(resolve_enemy_projectiles(&mut state, &mut NullRenderer));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.last_score, Some(7));
        assert!(state.objects.is_empty());
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_player_shot_destroys_turret() {
        let mut state = playing(6);
        let turret = add_turret(&mut state, TurretClass::Radial, Vec2::new(400.0, 100.0));
        state.objects.player_projectiles.clear();
        state
            .objects
            .player_projectiles
            .push(Projectile::player(Vec2::new(400.0, 102.0), &VP));

        resolve_player_projectiles(&mut state, &mut NullRenderer);
        assert!(state.objects.turret_mut(turret).is_none());
        assert!(state.objects.player_projectiles.is_empty());
        assert_eq!(state.settings.current_radial_turrets, 1);
        assert_eq!(state.objects.particles.len(), 15);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::TurretDestroyed { turret: t, .. } if *t == turret
        )));
    }

    #[test]
    fn test_player_shot_leaves_top() {
        let mut state = playing(7);
        state
            .objects
            .player_projectiles
            .push(Projectile::player(Vec2::new(400.0, 0.0), &VP));
        resolve_player_projectiles(&mut state, &mut NullRenderer);
        assert!(state.objects.player_projectiles.is_empty());
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = playing(8);
        let turret = add_turret(&mut state, TurretClass::Aimed, Vec2::new(200.0, 200.0));
        state.destroy_turret(turret, Vec2::new(200.0, 200.0));
        assert_eq!(state.objects.particles.len(), 15);
        // 0.97^76 < 0.1
        for _ in 0..80 {
            update_particles(&mut state, &mut NullRenderer);
        }
        assert!(state.objects.particles.is_empty());
    }

    #[test]
    fn test_fire_request_on_interval_boundary() {
        let mut state = playing(9);
        state.run_due(3000);
        assert_eq!(state.turret_refs().len(), 4);

        state.settings.total_time = 1999;
        fire_turrets(&mut state, 1990);
        assert!(state.objects.radial_turrets.iter().all(|t| t.dispatch.is_none()));

        state.settings.total_time = 2005;
        fire_turrets(&mut state, 1999);
        assert!(state.objects.radial_turrets.iter().all(|t| t.dispatch.is_some()));
        assert!(state.objects.aimed_turrets.iter().all(|t| t.dispatch.is_some()));
    }

    #[test]
    fn test_replenish_after_loss() {
        let mut state = playing(10);
        state.run_due(3000);
        let turret = state.turret_refs()[0];
        state.destroy_turret(turret, Vec2::ZERO);
        let queued = state.scheduler.len();

        replenish_turrets(&mut state);
        assert_eq!(state.scheduler.len(), queued + 1);
        assert_eq!(state.settings.current(turret.class), 2);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99);
        let mut b = playing(99);
        for i in 1..=600 {
            frame(&mut a, i * 16, &mut NullRenderer);
            frame(&mut b, i * 16, &mut NullRenderer);
        }
        let positions = |s: &GameState| -> Vec<Vec2> {
            s.objects
                .radial_turrets
                .iter()
                .chain(&s.objects.aimed_turrets)
                .map(|t| t.body.pos)
                .collect()
        };
        assert_eq!(positions(&a), positions(&b));
        assert_eq!(
            a.objects.enemy_projectile_count(),
            b.objects.enemy_projectile_count()
        );
        assert_eq!(a.phase, b.phase);
    }
}
