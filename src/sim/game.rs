//! Headless game driver
//!
//! Owns the word bank, the single random source, the session state and the
//! task queue. The presentation layer feeds it picks and elapsed time and
//! renders the `GameEvent`s it emits; nothing in here touches the DOM.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{PlacedItem, Region, layout};
use super::rng::{RandomSource, seeded};
use super::schedule::{RoundKey, Scheduled, Scheduler, TaskId};
use super::selector::{RoundSelector, RoundSpec};
use super::state::{Action, GamePhase, SessionState, reduce};
use super::words::WordBank;
use crate::consts::*;
use crate::error::{ConfigError, GameError, RoundWarning};
use crate::settings::{GameConfig, Preferences};

/// Default play area until the presentation layer reports its real size
pub const DEFAULT_REGION_WIDTH: f32 = 800.0;
pub const DEFAULT_REGION_HEIGHT: f32 = 600.0;

/// Deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Pop animation done, remove the balloon
    PopFinished { balloon: usize },
    /// Lay out the next round
    BeginRound,
    /// Take down the "try again" message
    HideIncorrect,
    /// Show the restart control after game over
    RevealRestart,
}

/// One confetti piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Horizontal position, percent of the container width
    pub left_percent: f32,
    /// Animation delay in seconds
    pub delay_secs: f32,
}

/// Output for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Clear the play area and show these balloons
    RoundStarted { round: u32, balloons: Vec<PlacedItem> },
    /// Start the pop animation
    BalloonPopping { id: usize },
    /// Pop animation done
    BalloonRemoved { id: usize },
    PopSound { volume: f32 },
    Confetti(Vec<ConfettiPiece>),
    IncorrectShown,
    IncorrectHidden,
    /// Score / round / found counters changed
    Hud(SessionState),
    /// Round is playable but degraded
    Warning(RoundWarning),
    GameOver { rounds_completed: u32, score: u32 },
    RestartAvailable,
}

/// Result of a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Not running, round already cleared, unknown or popping balloon
    Ignored,
    Correct,
    Incorrect,
}

/// A balloon on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub item: PlacedItem,
    pub popping: bool,
}

/// A game session
pub struct Game<R: RandomSource = Pcg32> {
    config: GameConfig,
    bank: WordBank,
    rng: R,
    selector: RoundSelector,
    region: Region,
    state: SessionState,
    /// Bumped on every start so old tasks can be told apart
    session: u32,
    scheduler: Scheduler<Task>,
    round: Option<RoundSpec>,
    balloons: Vec<Balloon>,
    /// "Try again" message is up
    incorrect: bool,
    hide_incorrect: Option<TaskId>,
    events: Vec<GameEvent>,
}

impl Game<Pcg32> {
    /// Game with a seeded PCG random source
    pub fn with_seed(config: GameConfig, bank: WordBank, seed: u64) -> Result<Self, GameError> {
        Self::new(config, bank, seeded(seed))
    }
}

impl<R: RandomSource> Game<R> {
    pub fn new(config: GameConfig, bank: WordBank, rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let region = Region::new(DEFAULT_REGION_WIDTH, DEFAULT_REGION_HEIGHT, config.band_start)?;
        Ok(Self {
            selector: RoundSelector::new(config.selection.clone()),
            config,
            bank,
            rng,
            region,
            state: SessionState::default(),
            session: 0,
            scheduler: Scheduler::new(),
            round: None,
            balloons: Vec::new(),
            incorrect: false,
            hide_incorrect: None,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn current_round(&self) -> Option<&RoundSpec> {
        self.round.as_ref()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Resize the play area; takes effect from the next round
    pub fn set_region(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.region = Region::new(width, height, self.config.band_start)?;
        Ok(())
    }

    /// Swap sound/confetti preferences; used from the next effect on
    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.preferences = preferences;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn key(&self) -> RoundKey {
        RoundKey::new(self.session, self.state.round)
    }

    /// Start a fresh session. Any pending task from an earlier session is
    /// cancelled and would be ignored even if it fired.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.session += 1;
        let dropped = self.scheduler.cancel_other_sessions(self.session);
        if dropped > 0 {
            log::debug!("Cancelled {} pending tasks from previous session", dropped);
        }
        self.hide_incorrect = None;
        if self.incorrect {
            self.events.push(GameEvent::IncorrectHidden);
        }
        self.incorrect = false;

        self.selector.reset();
        self.state = reduce(
            &self.state,
            Action::Start {
                total_rounds: self.config.total_rounds,
            },
        );
        log::info!(
            "Session {} started ({} rounds)",
            self.session,
            self.state.total_rounds
        );
        self.events.push(GameEvent::Hud(self.state));

        if let Err(err) = self.begin_round() {
            log::error!("Cannot start round: {}", err);
            self.state = SessionState::default();
            self.round = None;
            self.balloons.clear();
            return Err(err);
        }
        Ok(())
    }

    /// Restart mid-game (same as start)
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.start()
    }

    fn begin_round(&mut self) -> Result<(), GameError> {
        let round_index = self.state.round;
        let selection = self.selector.select(round_index, &self.bank, &mut self.rng)?;
        let outcome = layout(
            &selection.round.lineup,
            &self.region,
            &self.config.layout,
            &mut self.rng,
        );
        debug_assert!(outcome.target().is_some(), "target must always be placed");

        for warning in selection.warnings.into_iter().chain(outcome.warnings) {
            self.events.push(GameEvent::Warning(warning));
        }

        self.balloons = outcome
            .placed
            .iter()
            .cloned()
            .map(|item| Balloon {
                item,
                popping: false,
            })
            .collect();
        self.round = Some(selection.round);
        self.events.push(GameEvent::RoundStarted {
            round: round_index,
            balloons: outcome.placed,
        });
        self.events.push(GameEvent::Hud(self.state));
        Ok(())
    }

    /// Player clicked balloon `id`
    pub fn pick(&mut self, id: usize) -> PickOutcome {
        if !self.state.accepts_picks() {
            return PickOutcome::Ignored;
        }
        let Some(balloon) = self
            .balloons
            .iter_mut()
            .find(|b| b.item.id == id && !b.popping)
        else {
            return PickOutcome::Ignored;
        };

        if !balloon.item.entry.is_target {
            log::debug!("Wrong pick '{}'", balloon.item.entry.text);
            self.show_incorrect();
            return PickOutcome::Incorrect;
        }

        balloon.popping = true;
        log::info!("Popped '{}'", balloon.item.entry.text);
        self.state = reduce(&self.state, Action::CorrectPick);
        self.events.push(GameEvent::BalloonPopping { id });
        if self.config.preferences.sound {
            self.events.push(GameEvent::PopSound {
                volume: self.config.preferences.volume,
            });
        }
        if self.config.preferences.confetti {
            let pieces = self.confetti();
            self.events.push(GameEvent::Confetti(pieces));
        }
        self.events.push(GameEvent::Hud(self.state));

        let key = self.key();
        self.scheduler
            .schedule(key, self.config.timing.pop_ms, Task::PopFinished { balloon: id });
        PickOutcome::Correct
    }

    /// Player clicked at `point` (region coordinates); the topmost balloon wins
    pub fn pick_at(&mut self, point: Vec2) -> PickOutcome {
        let hit = self
            .balloons
            .iter()
            .rev()
            .find(|b| !b.popping && b.item.contains_point(point))
            .map(|b| b.item.id);
        match hit {
            Some(id) => self.pick(id),
            None => PickOutcome::Ignored,
        }
    }

    fn show_incorrect(&mut self) {
        if let Some(id) = self.hide_incorrect.take() {
            self.scheduler.cancel(id);
        }
        if !self.incorrect {
            self.events.push(GameEvent::IncorrectShown);
        }
        self.incorrect = true;
        let key = self.key();
        self.hide_incorrect = Some(self.scheduler.schedule(
            key,
            self.config.timing.incorrect_flash_ms,
            Task::HideIncorrect,
        ));
    }

    fn confetti(&mut self) -> Vec<ConfettiPiece> {
        (0..CONFETTI_PIECES)
            .map(|_| ConfettiPiece {
                left_percent: self.rng.range(0.0, 100.0),
                delay_secs: self.rng.range(0.0, CONFETTI_MAX_DELAY),
            })
            .collect()
    }

    /// Advance the virtual clock, running every task that falls due
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<(), GameError> {
        let until = self.scheduler.now_ms() + elapsed_ms;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run(task)?;
        }
        self.scheduler.set_now(until);
        Ok(())
    }

    fn run(&mut self, scheduled: Scheduled<Task>) -> Result<(), GameError> {
        let current = self.key();
        match scheduled.task {
            // Transient effects only care about the session
            Task::HideIncorrect if scheduled.key.session == current.session => {
                self.hide_incorrect = None;
                self.incorrect = false;
                self.events.push(GameEvent::IncorrectHidden);
            }
            _ if scheduled.key != current => {
                log::debug!(
                    "Discarding stale {:?} for {:?} (now {:?})",
                    scheduled.task,
                    scheduled.key,
                    current
                );
            }
            Task::PopFinished { balloon } => {
                self.balloons.retain(|b| b.item.id != balloon);
                self.events.push(GameEvent::BalloonRemoved { id: balloon });
                let popping = self.balloons.iter().any(|b| b.popping);
                if self.state.phase == GamePhase::Cleared && !popping {
                    self.finish_round();
                }
            }
            Task::BeginRound => {
                self.state = reduce(&self.state, Action::AdvanceRound);
                self.begin_round()?;
            }
            Task::HideIncorrect => {}
            Task::RevealRestart => self.events.push(GameEvent::RestartAvailable),
        }
        Ok(())
    }

    /// The cleared round's last pop is over. The session stays `Cleared`
    /// until the next round is laid out, so picks stay locked meanwhile.
    fn finish_round(&mut self) {
        let key = self.key();
        if self.state.round < self.state.total_rounds {
            self.scheduler
                .schedule(key, self.config.timing.round_transition_ms, Task::BeginRound);
            return;
        }

        self.state = reduce(&self.state, Action::AdvanceRound);
        self.events.push(GameEvent::Hud(self.state));
        if self.state.phase == GamePhase::Ended {
            let rounds_completed = self.state.rounds_completed();
            log::info!(
                "Game over: {} rounds, score {}",
                rounds_completed,
                self.state.score
            );
            self.balloons.clear();
            self.round = None;
            self.events.push(GameEvent::GameOver {
                rounds_completed,
                score: self.state.score,
            });
            self.scheduler
                .schedule(key, self.config.timing.restart_reveal_ms, Task::RevealRestart);
        }
    }
}
