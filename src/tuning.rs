//! Data-driven game balance
//!
//! Every timing and escalation constant lives here so balance can be tweaked
//! from a JSON file without a rebuild. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::persistence::PersistError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Delay between a fire request and the pattern dispatch
    pub fire_debounce_ms: Millis,
    /// Survival time between turret fire requests
    pub fire_interval_ms: Millis,
    /// Base delay before the first turrets of a game appear
    pub initial_spawn_delay_ms: Millis,
    /// Base delay before a destroyed turret is replaced
    pub replacement_spawn_delay_ms: Millis,
    /// Interval of the player's automatic fire
    pub player_fire_interval_ms: Millis,
    /// Quiet period after the last resize before the game is rebuilt
    pub resize_quiet_ms: Millis,
    /// Survival time before difficulty starts rising
    pub difficulty_warmup_ms: Millis,
    /// Survival time per difficulty level after the warm-up
    pub difficulty_step_ms: Millis,
    /// Difficulty level that unlocks hard mode
    pub hard_mode_level: u32,
    /// Upper bound for max turrets of each class
    pub max_turrets_cap: u32,
    /// Upper bound for the projectile multipliers
    pub projectiles_cap: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fire_debounce_ms: 20,
            fire_interval_ms: 2000,
            initial_spawn_delay_ms: 2000,
            replacement_spawn_delay_ms: 5000,
            player_fire_interval_ms: 500,
            resize_quiet_ms: 200,
            difficulty_warmup_ms: 10_000,
            difficulty_step_ms: 10_000,
            hard_mode_level: 6,
            max_turrets_cap: 8,
            projectiles_cap: 10,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t: Tuning = serde_json::from_str(r#"{ "fire_interval_ms": 1500 }"#).unwrap();
        assert_eq!(t.fire_interval_ms, 1500);
        assert_eq!(t.fire_debounce_ms, 20);
        assert_eq!(t.hard_mode_level, 6);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Tuning::load("/nonexistent/bullet-hell/tuning.json").unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }
}
