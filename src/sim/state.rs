//! Session state and its transitions
//!
//! `SessionState` is a small immutable value; every change goes through
//! `reduce`, which returns the next state.

use serde::{Deserialize, Serialize};

use crate::consts::{SCORE_PER_TARGET, TARGETS_PER_ROUND};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing started yet
    #[default]
    Idle,
    /// Balloons are up, waiting for picks
    Playing,
    /// Round target found. Holds through the pop and the transition until
    /// the next round is laid out.
    Cleared,
    /// All rounds done
    Ended,
}

/// Something that happened to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Begin (or restart) a session
    Start { total_rounds: u32 },
    /// Player popped a target balloon
    CorrectPick,
    /// Player clicked a distractor
    IncorrectPick,
    /// Move on from a cleared round
    AdvanceRound,
}

/// Score and progress for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub score: u32,
    /// 1-based current round
    pub round: u32,
    /// Targets found in the current round
    pub found: u32,
    pub total_rounds: u32,
    /// Targets needed to clear a round
    pub targets_per_round: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            round: 1,
            found: 0,
            total_rounds: crate::consts::TOTAL_ROUNDS,
            targets_per_round: TARGETS_PER_ROUND,
        }
    }
}

impl SessionState {
    /// Session started and not yet over
    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Cleared)
    }

    /// Accepting picks right now
    pub fn accepts_picks(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn rounds_completed(&self) -> u32 {
        match self.phase {
            GamePhase::Idle => 0,
            GamePhase::Cleared => self.round,
            GamePhase::Playing | GamePhase::Ended => self.round - 1,
        }
    }
}

/// Apply `action` to `state`
pub fn reduce(state: &SessionState, action: Action) -> SessionState {
    match action {
        Action::Start { total_rounds } => SessionState {
            phase: GamePhase::Playing,
            score: 0,
            round: 1,
            found: 0,
            total_rounds: total_rounds.max(1),
            targets_per_round: state.targets_per_round,
        },
        Action::CorrectPick if state.accepts_picks() => {
            let found = state.found + 1;
            SessionState {
                score: state.score + SCORE_PER_TARGET,
                found,
                phase: if found >= state.targets_per_round {
                    GamePhase::Cleared
                } else {
                    GamePhase::Playing
                },
                ..*state
            }
        }
        Action::AdvanceRound if state.phase == GamePhase::Cleared => {
            let round = state.round + 1;
            SessionState {
                round,
                found: 0,
                phase: if round > state.total_rounds {
                    GamePhase::Ended
                } else {
                    GamePhase::Playing
                },
                ..*state
            }
        }
        // Wrong picks only flash a message; out-of-phase actions are ignored
        Action::IncorrectPick | Action::CorrectPick | Action::AdvanceRound => *state,
    }
}
