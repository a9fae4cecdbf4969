//! Deterministic round logic
//!
//! All gameplay decisions live here. This module must stay pure and deterministic:
//! - One injectable random source per session
//! - Virtual time only (no timers, no clocks)
//! - No rendering or platform dependencies

pub mod game;
pub mod layout;
pub mod overlap;
pub mod rng;
pub mod schedule;
pub mod selector;
pub mod state;
pub mod words;

pub use game::{Balloon, ConfettiPiece, Game, GameEvent, PickOutcome, Task};
pub use layout::{BalloonColor, LayoutOutcome, PlacedItem, Region, layout};
pub use overlap::{Bounds, clear_of, clear_of_all, min_spacing};
pub use rng::{RandomSource, ScriptedRandom, sample, seeded, shuffle};
pub use schedule::{RoundKey, Scheduled, Scheduler, TaskId};
pub use selector::{RoundSelector, RoundSpec, Selection};
pub use state::{Action, GamePhase, SessionState, reduce};
pub use words::{WordBank, WordEntry};
