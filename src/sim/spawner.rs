//! Turret population manager
//!
//! Keeps each turret class at its target count by scheduling staggered,
//! delayed spawns.

use rand::Rng;

use super::difficulty::GameSettings;
use super::entity::TurretClass;
use super::schedule::{Scheduler, TaskSet, TimerId};
use super::state::Task;
use crate::Millis;

#[derive(Debug, Clone, Default)]
pub struct Spawner {
    /// Handles of spawns not yet landed. Bounded by the sum of the turret
    /// targets; the oldest handle is forgotten (not cancelled) past that.
    pending: TaskSet,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay for one spawn: `base` plus up to half of `base` again
    pub fn spawn_delay(base_delay: Millis, rng: &mut impl Rng) -> Millis {
        base_delay + (rng.random::<f64>() * 0.5 * base_delay as f64) as Millis
    }

    /// Schedule `count` independent spawns of `class`
    #[allow(clippy::too_many_arguments)]
    pub fn create_turret(
        &mut self,
        count: u32,
        base_delay: Millis,
        class: TurretClass,
        capacity: u32,
        scheduler: &mut Scheduler<Task>,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Vec<TimerId> {
        self.pending.set_capacity(capacity as usize);
        (0..count)
            .map(|_| {
                let delay = Self::spawn_delay(base_delay, rng);
                let id = scheduler.schedule(now, delay, Task::Spawn(class));
                self.pending.track(id);
                log::debug!("Scheduled {} turret in {}ms", class.as_str(), delay);
                id
            })
            .collect()
    }

    /// Top up every class that is below its target
    ///
    /// The current counter jumps to the target immediately so the next frame
    /// does not schedule the same replacements again.
    pub fn replenish(
        &mut self,
        settings: &mut GameSettings,
        base_delay: Millis,
        scheduler: &mut Scheduler<Task>,
        now: Millis,
        rng: &mut impl Rng,
    ) -> Vec<(TurretClass, u32)> {
        let mut requested = Vec::new();
        for class in TurretClass::ALL {
            let max = settings.max(class);
            let deficit = max.saturating_sub(settings.current(class));
            if deficit == 0 {
                continue;
            }
            let capacity = settings.total_max_turrets();
            self.create_turret(deficit, base_delay, class, capacity, scheduler, now, rng);
            *settings.current_mut(class) = max;
            requested.push((class, deficit));
        }
        requested
    }

    /// Forget a spawn that has landed
    pub fn landed(&mut self, id: TimerId) {
        self.pending.forget(id);
    }

    /// Cancel every tracked spawn
    pub fn cancel_all(&mut self, scheduler: &mut Scheduler<Task>) -> usize {
        self.pending.cancel_all(scheduler)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_delays_are_staggered_within_window() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..500 {
            let d = Spawner::spawn_delay(2000, &mut rng);
            assert!((2000..3000).contains(&d));
        }
    }

    #[test]
    fn test_replenish_sets_current_to_max_once() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut sched = Scheduler::new();
        let mut spawner = Spawner::new();
        let mut settings = GameSettings {
            current_radial_turrets: 1,
            ..Default::default()
        };

        let requested = spawner.replenish(&mut settings, 5000, &mut sched, 0, &mut rng);
        assert_eq!(
            requested,
            vec![(TurretClass::Radial, 1), (TurretClass::Aimed, 2)]
        );
        assert_eq!(settings.current_radial_turrets, 2);
        assert_eq!(settings.current_aimed_turrets, 2);
        assert_eq!(sched.len(), 3);

        // Nothing new on the next frame
        assert!(spawner.replenish(&mut settings, 5000, &mut sched, 16, &mut rng).is_empty());
        assert_eq!(sched.len(), 3);
    }

    #[test]
    fn test_backlog_is_bounded_but_evicted_spawns_still_fire() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut sched = Scheduler::new();
        let mut spawner = Spawner::new();
        spawner.create_turret(6, 100, TurretClass::Radial, 4, &mut sched, 0, &mut rng);
        assert_eq!(spawner.pending(), 4);
        assert_eq!(sched.len(), 6);

        assert_eq!(spawner.cancel_all(&mut sched), 4);
        assert_eq!(sched.len(), 2);
    }
}
