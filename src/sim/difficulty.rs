//! Tunable game parameters and difficulty escalation
//!
//! `GameSettings` is the shared knob set read by the spawner and the pattern
//! engine. Only [`GameSettings::advance`] raises it, and a reset replaces it
//! with the defaults.

use serde::{Deserialize, Serialize};

use super::entity::TurretClass;
use crate::{Millis, Tuning};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Radial turrets alive or already on their way
    pub current_radial_turrets: u32,
    pub max_radial_turrets: u32,
    /// Aimed turrets alive or already on their way
    pub current_aimed_turrets: u32,
    pub max_aimed_turrets: u32,
    /// Projectile multiplier for radial patterns
    pub num_radial_projectiles: u32,
    /// Projectile multiplier for aimed patterns
    pub num_aimed_projectiles: u32,
    /// Difficulty level reached this game
    pub difficulty: u32,
    /// Once set, stays set until the game ends
    pub hard_mode: bool,
    /// Survival time (excludes time spent unfocused)
    pub total_time: Millis,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            current_radial_turrets: 0,
            max_radial_turrets: 2,
            current_aimed_turrets: 0,
            max_aimed_turrets: 2,
            num_radial_projectiles: 5,
            num_aimed_projectiles: 5,
            difficulty: 0,
            hard_mode: false,
            total_time: 0,
        }
    }
}

/// One step of escalation, reported for logging and the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifficultyChange {
    Level(u32),
    MaxTurrets { class: TurretClass, max: u32 },
    Projectiles { radial: u32, aimed: u32 },
    HardMode,
}

impl GameSettings {
    pub fn current(&self, class: TurretClass) -> u32 {
        match class {
            TurretClass::Radial => self.current_radial_turrets,
            TurretClass::Aimed => self.current_aimed_turrets,
        }
    }

    pub fn current_mut(&mut self, class: TurretClass) -> &mut u32 {
        match class {
            TurretClass::Radial => &mut self.current_radial_turrets,
            TurretClass::Aimed => &mut self.current_aimed_turrets,
        }
    }

    pub fn max(&self, class: TurretClass) -> u32 {
        match class {
            TurretClass::Radial => self.max_radial_turrets,
            TurretClass::Aimed => self.max_aimed_turrets,
        }
    }

    fn max_mut(&mut self, class: TurretClass) -> &mut u32 {
        match class {
            TurretClass::Radial => &mut self.max_radial_turrets,
            TurretClass::Aimed => &mut self.max_aimed_turrets,
        }
    }

    /// Sum of the turret targets over both classes
    pub fn total_max_turrets(&self) -> u32 {
        self.max_radial_turrets + self.max_aimed_turrets
    }

    /// Whole seconds survived
    pub fn score(&self) -> u64 {
        self.total_time / 1000
    }

    /// Level the current survival time entitles the player to
    pub fn target_level(total_time: Millis, tuning: &Tuning) -> u32 {
        let past_warmup = total_time.saturating_sub(tuning.difficulty_warmup_ms);
        past_warmup.div_ceil(tuning.difficulty_step_ms.max(1)) as u32
    }

    /// Raise the difficulty to match the survival time
    pub fn advance(&mut self, tuning: &Tuning) -> Vec<DifficultyChange> {
        let target = Self::target_level(self.total_time, tuning);
        let mut changes = Vec::new();
        while self.difficulty < target {
            self.difficulty += 1;
            changes.push(DifficultyChange::Level(self.difficulty));
            self.apply_level(self.difficulty, tuning, &mut changes);
        }
        changes
    }

    // Odd levels add a radial turret, even levels an aimed one, every third
    // level adds projectiles.
    fn apply_level(&mut self, level: u32, tuning: &Tuning, changes: &mut Vec<DifficultyChange>) {
        let class = if level % 2 == 1 {
            TurretClass::Radial
        } else {
            TurretClass::Aimed
        };
        let max = self.max_mut(class);
        if *max < tuning.max_turrets_cap {
            *max += 1;
            let max = *max;
            changes.push(DifficultyChange::MaxTurrets { class, max });
        }

        if level % 3 == 0 {
            let before = (self.num_radial_projectiles, self.num_aimed_projectiles);
            self.num_radial_projectiles = (self.num_radial_projectiles + 1).min(tuning.projectiles_cap);
            self.num_aimed_projectiles = (self.num_aimed_projectiles + 1).min(tuning.projectiles_cap);
            if before != (self.num_radial_projectiles, self.num_aimed_projectiles) {
                changes.push(DifficultyChange::Projectiles {
                    radial: self.num_radial_projectiles,
                    aimed: self.num_aimed_projectiles,
                });
            }
        }

        if level == tuning.hard_mode_level && !self.hard_mode {
            self.hard_mode = true;
            changes.push(DifficultyChange::HardMode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_escalation_during_warmup() {
        let tuning = Tuning::default();
        let mut s = GameSettings::default();
        s.total_time = tuning.difficulty_warmup_ms;
        assert!(s.advance(&tuning).is_empty());
        assert_eq!(s.difficulty, 0);

        s.total_time += 1;
        let changes = s.advance(&tuning);
        assert_eq!(changes[0], DifficultyChange::Level(1));
        assert_eq!(s.max_radial_turrets, 3);
        assert_eq!(s.max_aimed_turrets, 2);
    }

    #[test]
    fn test_hard_mode_unlocks_at_level() {
        let tuning = Tuning::default();
        let mut s = GameSettings::default();
        s.total_time = tuning.difficulty_warmup_ms + 5 * tuning.difficulty_step_ms;
        s.advance(&tuning);
        assert_eq!(s.difficulty, 5);
        assert!(!s.hard_mode);

        s.total_time += tuning.difficulty_step_ms;
        let changes = s.advance(&tuning);
        assert!(changes.contains(&DifficultyChange::HardMode));
        assert!(s.hard_mode);
        // Levels 3 and 6 raised the multipliers
        assert_eq!(s.num_radial_projectiles, 7);
        assert_eq!(s.num_aimed_projectiles, 7);
    }

    #[test]
    fn test_caps_hold() {
        let tuning = Tuning::default();
        let mut s = GameSettings::default();
        s.total_time = tuning.difficulty_warmup_ms + 1000 * tuning.difficulty_step_ms;
        s.advance(&tuning);
        assert_eq!(s.max_radial_turrets, tuning.max_turrets_cap);
        assert_eq!(s.max_aimed_turrets, tuning.max_turrets_cap);
        assert_eq!(s.num_radial_projectiles, tuning.projectiles_cap);
    }

    #[test]
    fn test_score_is_whole_seconds() {
        let s = GameSettings {
            total_time: 42_999,
            ..Default::default()
        };
        assert_eq!(s.score(), 42);
    }

    proptest! {
        #[test]
        fn prop_difficulty_is_monotonic(steps in proptest::collection::vec(0u64..7_000, 1..80)) {
            let tuning = Tuning::default();
            let mut s = GameSettings::default();
            let mut prev = s.clone();
            for dt in steps {
                s.total_time += dt;
                s.advance(&tuning);
                prop_assert!(s.max_radial_turrets >= prev.max_radial_turrets);
                prop_assert!(s.max_aimed_turrets >= prev.max_aimed_turrets);
                prop_assert!(s.num_radial_projectiles >= prev.num_radial_projectiles);
                prop_assert!(s.num_aimed_projectiles >= prev.num_aimed_projectiles);
                prop_assert!(s.hard_mode || !prev.hard_mode);
                prev = s.clone();
            }
        }
    }
}
