//! Game configuration and player preferences
//!
//! Persisted as JSON in LocalStorage on the web.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the target word is chosen each round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetPolicy {
    /// Fixed words for the listed rounds (1-based), random unused targets afterwards
    Scripted(Vec<(u32, String)>),
    /// Uniform random target every round
    Random,
}

impl Default for TargetPolicy {
    fn default() -> Self {
        TargetPolicy::Scripted(vec![
            (1, "sun".to_string()),
            (2, "snake".to_string()),
            (3, "star".to_string()),
        ])
    }
}

/// How many distractors are drawn each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistractorCount {
    Fixed(usize),
    /// Uniform in the closed range
    Between(usize, usize),
}

impl Default for DistractorCount {
    fn default() -> Self {
        DistractorCount::Between(MIN_DISTRACTORS, MAX_DISTRACTORS)
    }
}

/// Word selection tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub target_policy: TargetPolicy,
    pub distractors: DistractorCount,
}

/// Balloon placement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Smallest initial balloon size
    pub min_size: f32,
    /// Largest initial balloon size
    pub max_size: f32,
    /// Shrink applied on the single retry pass
    pub shrink_delta: f32,
    /// Shrunken balloons never go below this
    pub size_floor: f32,
    /// Extra spacing between balloon centres beyond their half-sizes
    pub padding: f32,
    /// Position draws per size
    pub max_attempts: u32,
    /// Gap kept at the bottom of the region
    pub bottom_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_size: BALLOON_MIN_SIZE,
            max_size: BALLOON_MAX_SIZE,
            shrink_delta: BALLOON_SHRINK_DELTA,
            size_floor: BALLOON_SIZE_FLOOR,
            padding: BALLOON_PADDING,
            max_attempts: PLACEMENT_ATTEMPTS,
            bottom_margin: BOTTOM_MARGIN,
        }
    }
}

/// Delays for deferred transitions (milliseconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub pop_ms: u64,
    pub round_transition_ms: u64,
    pub incorrect_flash_ms: u64,
    pub restart_reveal_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pop_ms: POP_DURATION_MS,
            round_transition_ms: ROUND_TRANSITION_MS,
            incorrect_flash_ms: INCORRECT_FLASH_MS,
            restart_reveal_ms: RESTART_REVEAL_MS,
        }
    }
}

/// Player-facing toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Play the pop sound on a correct pick
    pub sound: bool,
    /// Confetti burst on a correct pick
    pub confetti: bool,
    /// Pop sound volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound: true,
            confetti: true,
            volume: 0.8,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rounds per session
    pub total_rounds: u32,
    /// Fraction of region height where the placeable band starts
    pub band_start: f32,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_rounds: TOTAL_ROUNDS,
            band_start: BAND_START,
            selection: SelectionConfig::default(),
            layout: LayoutConfig::default(),
            timing: TimingConfig::default(),
            preferences: Preferences::default(),
        }
    }
}

impl GameConfig {
    /// Check that every value is usable by the selector and layout engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_rounds == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        if !(0.0..1.0).contains(&self.band_start) {
            return Err(ConfigError::InvalidBandStart(self.band_start));
        }
        self.layout.validate()?;
        if !(0.0..=1.0).contains(&self.preferences.volume) {
            return Err(ConfigError::InvalidVolume(self.preferences.volume));
        }
        if let DistractorCount::Between(min, max) = self.selection.distractors {
            if min > max {
                return Err(ConfigError::InvalidDistractorRange { min, max });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "phonics_pop_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(err) => log::warn!("Ignoring stored config: {}", err),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_size > 0.0 && self.min_size <= self.max_size && self.max_size.is_finite()) {
            return Err(ConfigError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if !(self.size_floor > 0.0 && self.size_floor <= self.min_size) {
            return Err(ConfigError::InvalidSizeFloor(self.size_floor));
        }
        for (field, value) in [
            ("shrink_delta", self.shrink_delta),
            ("padding", self.padding),
            ("bottom_margin", self.bottom_margin),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidLength { field, value });
            }
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_sizes() {
        let mut config = GameConfig::default();
        config.layout.min_size = 200.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeRange { .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_sizes() {
        let mut config = GameConfig::default();
        config.layout.max_size = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeRange { .. })
        ));

        let mut config = GameConfig::default();
        config.layout.min_size = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeRange { .. })
        ));

        let mut config = GameConfig::default();
        config.layout.size_floor = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSizeFloor(_))
        ));

        let mut config = GameConfig::default();
        config.band_start = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBandStart(_))
        ));
    }

    #[test]
    fn test_rejects_negative_lengths() {
        let cases: [(&str, fn(&mut LayoutConfig)); 3] = [
            ("shrink_delta", |l| l.shrink_delta = -500.0),
            ("padding", |l| l.padding = -200.0),
            ("bottom_margin", |l| l.bottom_margin = -300.0),
        ];
        for (name, set) in cases {
            let mut config = GameConfig::default();
            set(&mut config.layout);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidLength { field, .. }) if field == name
            ));
        }

        let mut config = GameConfig::default();
        config.layout.padding = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidLength { field: "padding", .. })
        ));
    }

    #[test]
    fn test_rejects_volume_out_of_range() {
        let mut config = GameConfig::default();
        config.preferences.volume = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidVolume(1.5)));
    }

    #[test]
    fn test_stored_config_with_negative_margin_is_rejected() {
        let json = r#"{
            "total_rounds": 10,
            "band_start": 0.4,
            "layout": {
                "min_size": 120.0, "max_size": 160.0, "shrink_delta": -500.0,
                "size_floor": 80.0, "padding": -200.0, "max_attempts": 150,
                "bottom_margin": -300.0
            }
        }"#;
        assert!(matches!(
            GameConfig::from_json(json),
            Err(ConfigError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_rejects_band_start_out_of_range() {
        let mut config = GameConfig::default();
        config.band_start = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidBandStart(1.0)));
    }

    #[test]
    fn test_rejects_inverted_distractor_range() {
        let mut config = GameConfig::default();
        config.selection.distractors = DistractorCount::Between(7, 5);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidDistractorRange { min: 7, max: 5 })
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_policy() {
        let mut config = GameConfig::default();
        config.selection.target_policy = TargetPolicy::Random;
        config.selection.distractors = DistractorCount::Fixed(3);
        let json = serde_json::to_string(&config).unwrap();
        let loaded = GameConfig::from_json(&json).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded = GameConfig::from_json(r#"{"total_rounds": 3, "band_start": 0.5}"#).unwrap();
        assert_eq!(loaded.total_rounds, 3);
        assert_eq!(loaded.layout, LayoutConfig::default());
        assert!(loaded.preferences.sound);
    }

    #[test]
    fn test_invalid_json_config_is_rejected() {
        assert_eq!(
            GameConfig::from_json(r#"{"total_rounds": 0, "band_start": 0.5}"#),
            Err(ConfigError::ZeroRounds)
        );
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(ConfigError::Malformed(_))
        ));
    }
}
