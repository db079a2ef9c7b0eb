//! Experience settings
//!
//! Supplied by the host page as JSON (`data-settings` on the canvas) or, when
//! running natively, from a file. Nothing is written back.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
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

    /// Multiplier applied to each level's particle cap
    pub fn cap_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.0,
        }
    }

    /// Multiplier applied to glow radius (shadow blur is the expensive part of canvas drawing)
    pub fn glow_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.0,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }
}

/// Experience settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Play the interaction chime
    pub sound: bool,
    /// Sound effect volume (0.0 - 1.0)
    pub volume: f32,
    /// Show the encouragement messages
    pub messages: bool,
    /// Name offered in the end-of-run prompt
    pub default_name: String,
    /// Fixed RNG seed (a clock-derived seed is used when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            sound: true,
            volume: 0.6,
            messages: true,
            default_name: "Viajero".to_string(),
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "default_name",
                reason: "must not be blank".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::Invalid {
                field: "volume",
                reason: format!("{} is outside 0.0 - 1.0", self.volume),
            });
        }
        Ok(())
    }

    /// Parse settings, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings (quality {})", settings.quality.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }
}
