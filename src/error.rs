//! Errors and non-fatal warnings raised by the round core
//!
//! Errors stop a round from starting. Warnings describe a degraded round that
//! is still playable and are logged as well as returned to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The word dataset cannot produce a valid round
#[derive(Debug)]
pub enum DatasetError {
    /// No entry in the bank is tagged as a target
    NoTargets,
    /// The dataset JSON could not be parsed
    Malformed(serde_json::Error),
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::NoTargets => write!(f, "dataset has no target words"),
            DatasetError::Malformed(err) => write!(f, "malformed dataset: {}", err),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Malformed(err) => Some(err),
            DatasetError::NoTargets => None,
        }
    }
}

impl From<serde_json::Error> for DatasetError {
    fn from(err: serde_json::Error) -> Self {
        DatasetError::Malformed(err)
    }
}

/// A configuration value is out of range
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Size range is empty, inverted or not positive
    InvalidSizeRange { min: f32, max: f32 },
    /// Shrunken size floor is not positive or exceeds the minimum size
    InvalidSizeFloor(f32),
    /// Band start must be a fraction in [0, 1)
    InvalidBandStart(f32),
    /// Distractor range is inverted
    InvalidDistractorRange { min: usize, max: usize },
    /// A spacing or margin length is negative or not finite
    InvalidLength { field: &'static str, value: f32 },
    /// Volume must lie in [0, 1]
    InvalidVolume(f32),
    /// At least one placement attempt is required
    ZeroAttempts,
    /// At least one round is required
    ZeroRounds,
    /// Region dimensions must be positive
    InvalidRegion { width: f32, height: f32 },
    /// The config JSON could not be parsed
    Malformed(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidSizeRange { min, max } => {
                write!(f, "invalid balloon size range [{}, {}]", min, max)
            }
            ConfigError::InvalidSizeFloor(floor) => {
                write!(f, "invalid balloon size floor {}", floor)
            }
            ConfigError::InvalidBandStart(start) => {
                write!(f, "band start {} is not in [0, 1)", start)
            }
            ConfigError::InvalidDistractorRange { min, max } => {
                write!(f, "invalid distractor range [{}, {}]", min, max)
            }
            ConfigError::InvalidLength { field, value } => {
                write!(f, "{} must be a finite length >= 0, got {}", field, value)
            }
            ConfigError::InvalidVolume(volume) => write!(f, "volume {} is not in [0, 1]", volume),
            ConfigError::ZeroAttempts => write!(f, "placement attempts must be at least 1"),
            ConfigError::ZeroRounds => write!(f, "total rounds must be at least 1"),
            ConfigError::InvalidRegion { width, height } => {
                write!(f, "invalid play region {}x{}", width, height)
            }
            ConfigError::Malformed(msg) => write!(f, "malformed config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Anything that stops a game session from being created or a round from starting
#[derive(Debug)]
pub enum GameError {
    Dataset(DatasetError),
    Config(ConfigError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Dataset(err) => write!(f, "{}", err),
            GameError::Config(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Dataset(err) => Some(err),
            GameError::Config(err) => Some(err),
        }
    }
}

impl From<DatasetError> for GameError {
    fn from(err: DatasetError) -> Self {
        GameError::Dataset(err)
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

/// Non-fatal conditions that leave a round playable but degraded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RoundWarning {
    /// Fewer distractors were available than requested
    ShortDistractorPool { wanted: usize, available: usize },
    /// A distractor could not be placed after retries and was dropped
    PlacementDegraded { word: String },
    /// The target was placed ignoring overlap so the round stays solvable
    TargetPlacementForced { word: String },
}

impl RoundWarning {
    /// Emit this warning through the log facade
    pub fn log(&self, round_index: u32) {
        log::warn!("Round {}: {}", round_index, self);
    }
}

impl fmt::Display for RoundWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundWarning::ShortDistractorPool { wanted, available } => write!(
                f,
                "wanted {} distractors but only {} available",
                wanted, available
            ),
            RoundWarning::PlacementDegraded { word } => {
                write!(f, "dropped distractor '{}' (no room)", word)
            }
            RoundWarning::TargetPlacementForced { word } => {
                write!(f, "forced placement of target '{}' (may overlap)", word)
            }
        }
    }
}
