//! Phonics Pop - A balloon-popping phonics game
//!
//! Core modules:
//! - `sim`: Deterministic round logic (word selection, balloon layout, session state)
//! - `settings`: Data-driven game configuration
//! - `error`: Error and warning types surfaced by the core

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, DatasetError, GameError, RoundWarning};
pub use settings::{
    DistractorCount, GameConfig, LayoutConfig, Preferences, SelectionConfig, TargetPolicy,
    TimingConfig,
};

/// Game configuration constants
pub mod consts {
    /// Points awarded for each correct pop
    pub const SCORE_PER_TARGET: u32 = 10;
    /// Number of rounds in a full session
    pub const TOTAL_ROUNDS: u32 = 10;
    /// Correct pops needed to clear a round (one target per round)
    pub const TARGETS_PER_ROUND: u32 = 1;

    /// Balloon edge length range (pixels)
    pub const BALLOON_MIN_SIZE: f32 = 120.0;
    pub const BALLOON_MAX_SIZE: f32 = 160.0;
    /// How much a balloon shrinks on the retry pass
    pub const BALLOON_SHRINK_DELTA: f32 = 30.0;
    /// Balloons never shrink below this
    pub const BALLOON_SIZE_FLOOR: f32 = 80.0;
    /// Extra gap required between neighbouring balloons
    pub const BALLOON_PADDING: f32 = 10.0;
    /// Random position draws per size before giving up
    pub const PLACEMENT_ATTEMPTS: u32 = 150;

    /// Fraction of the play area height above which balloons never spawn
    pub const BAND_START: f32 = 0.4;
    /// Gap kept between the lowest balloon and the bottom edge
    pub const BOTTOM_MARGIN: f32 = 0.0;

    /// Distractor count range (inclusive)
    pub const MIN_DISTRACTORS: usize = 5;
    pub const MAX_DISTRACTORS: usize = 7;

    /// Pop animation length before the balloon is removed
    pub const POP_DURATION_MS: u64 = 800;
    /// Pause between a cleared round and the next one
    pub const ROUND_TRANSITION_MS: u64 = 1500;
    /// How long the "try again" message stays up
    pub const INCORRECT_FLASH_MS: u64 = 1000;
    /// Delay before the restart control reappears after game over
    pub const RESTART_REVEAL_MS: u64 = 2000;

    /// Confetti pieces per correct pop
    pub const CONFETTI_PIECES: usize = 20;
    /// Max confetti animation delay (seconds)
    pub const CONFETTI_MAX_DELAY: f32 = 0.5;
}
