//! Player preferences
//!
//! Persisted separately from the leaderboard as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particles emitted per destroyed turret
    pub fn explosion_particles(&self) -> u32 {
        match self {
            QualityPreset::Low => 6,
            QualityPreset::Medium => 15,
            QualityPreset::High => 30,
        }
    }

    /// Whether the starfield background is drawn by default
    pub fn starfield_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Explosion particles
    pub particles: bool,
    /// Background starfield
    pub starfield: bool,
    /// Overrides the preset's particle count
    pub explosion_particles: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            starfield: true,
            explosion_particles: None,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        self.starfield = preset.starfield_enabled();
    }

    /// Effective particles per explosion
    pub fn explosion_particles(&self) -> u32 {
        if !self.particles {
            0
        } else {
            self.explosion_particles
                .unwrap_or_else(|| self.quality.explosion_particles())
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Could not load settings from {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_particle_budget() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).explosion_particles(), 6);
        assert_eq!(Settings::default().explosion_particles(), 15);
        assert_eq!(Settings::from_preset(QualityPreset::High).explosion_particles(), 30);
        assert!(!Settings::from_preset(QualityPreset::Low).starfield);
    }

    #[test]
    fn test_override_and_disable() {
        let mut s = Settings {
            explosion_particles: Some(3),
            ..Default::default()
        };
        assert_eq!(s.explosion_particles(), 3);
        s.particles = false;
        assert_eq!(s.explosion_particles(), 0);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let s = Settings::from_preset(QualityPreset::High);
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
        assert_eq!(Settings::load_or_default(dir.path().join("missing.json")), Settings::default());
    }
}
