//! Game settings and preferences
//!
//! Stored as JSON next to the meta-progression save.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;

/// Visual density tier; controls how many particles the pool can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Case-insensitive name lookup ("med" is accepted)
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|preset| preset.pool_name() == name || (name == "med" && *preset == Self::Medium))
    }

    fn pool_name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Particle pool capacity for this tier
    pub fn pool_capacity(self) -> usize {
        match self {
            Self::Low => 96,
            Self::Medium => 256,
            Self::High => crate::consts::MAX_PARTICLES,
        }
    }
}

/// Player-facing presentation toggles. None of these change gameplay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub quality: QualityPreset,
    /// Shake on hits, kills and boss deaths
    pub screen_shake: bool,
    /// Hit and death bursts
    pub particles: bool,
    /// Floating damage numbers and reward text
    pub damage_numbers: bool,
    /// Accessibility: suppresses all shake
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::default(),
            screen_shake: true,
            particles: true,
            damage_numbers: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    pub fn with_quality(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Shake hooks fire only when enabled and reduced motion is off
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Pool capacity after the particle toggle
    pub fn max_particles(&self) -> usize {
        self.particles
            .then(|| self.quality.pool_capacity())
            .unwrap_or(0)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());
    }

    #[test]
    fn test_particles_off_means_empty_pool() {
        let mut settings = Settings::with_quality(QualityPreset::High);
        assert_eq!(settings.max_particles(), crate::consts::MAX_PARTICLES);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"quality":"low"}"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.damage_numbers);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            quality: QualityPreset::High,
            screen_shake: false,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
    }
}
