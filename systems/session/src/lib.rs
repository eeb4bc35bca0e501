#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation state machine coordinating setup, play, and results.
//!
//! The session reacts to world events and player requests, and expresses
//! its enter/exit effects as [`Directive`] values the host forwards to the
//! movement controller and the input layer.

use tilewalk_core::{BoardChangeCause, Event};
use tracing::{debug, info};

/// Phases of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The player arranges tiles before starting the run.
    Setup,
    /// The character walks on its own.
    Playing,
    /// The character is crossing to another board.
    Transitioning,
    /// The character reached a goal.
    Win,
    /// The run failed.
    Fail,
}

/// Effect requested when the session changes phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Spawn the character at the level start.
    SpawnCharacter,
    /// Start the movement loop.
    StartMoving,
    /// Stop the movement loop.
    StopMoving,
    /// Enable or disable player tile input.
    SetInputEnabled(bool),
}

/// Coordinating state machine for one level attempt.
#[derive(Debug)]
pub struct Session {
    phase: GamePhase,
    paused: bool,
    input_enabled: bool,
}

impl Session {
    /// Creates a session in setup and emits the setup entry directives.
    #[must_use]
    pub fn new(out: &mut Vec<Directive>) -> Self {
        let mut session = Self {
            phase: GamePhase::Setup,
            paused: false,
            input_enabled: false,
        };
        session.enter(GamePhase::Setup, None, out);
        session
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether the player may slide tiles.
    #[must_use]
    pub const fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// Whether the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reacts to world events.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Directive>) {
        for event in events {
            match event {
                Event::LevelLoaded { .. } => self.transition(GamePhase::Setup, out),
                Event::GoalReached { .. } => self.transition(GamePhase::Win, out),
                Event::MoveFailed { .. } => self.transition(GamePhase::Fail, out),
                Event::ActiveBoardChanged {
                    cause: BoardChangeCause::Player,
                    ..
                } if matches!(self.phase, GamePhase::Playing | GamePhase::Transitioning) => {
                    self.transition(GamePhase::Setup, out);
                }
                Event::CrossingStarted { .. } if self.phase == GamePhase::Playing => {
                    self.transition(GamePhase::Transitioning, out);
                }
                Event::CharacterMoved { from, to }
                    if self.phase == GamePhase::Transitioning && from.board != to.board =>
                {
                    self.transition(GamePhase::Playing, out);
                }
                _ => {}
            }
        }
    }

    /// Starts the run from setup. Returns `false` in any other phase.
    pub fn play(&mut self, out: &mut Vec<Directive>) -> bool {
        if self.phase != GamePhase::Setup {
            return false;
        }
        self.transition(GamePhase::Playing, out);
        true
    }

    /// Returns to setup from any phase other than setup.
    pub fn restart(&mut self, out: &mut Vec<Directive>) -> bool {
        if self.phase == GamePhase::Setup {
            return false;
        }
        self.transition(GamePhase::Setup, out);
        true
    }

    /// Toggles pause. Only setup and play can be paused.
    ///
    /// Returns the resulting pause state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.paused {
            self.paused = false;
        } else if matches!(self.phase, GamePhase::Setup | GamePhase::Playing) {
            self.paused = true;
        } else {
            debug!(phase = ?self.phase, "pause refused");
        }
        self.paused
    }

    fn transition(&mut self, next: GamePhase, out: &mut Vec<Directive>) {
        let previous = self.phase;
        if previous == next && next != GamePhase::Setup {
            return;
        }
        self.exit(previous, next, out);
        self.phase = next;
        info!(from = ?previous, to = ?next, "session phase changed");
        self.enter(next, Some(previous), out);
    }

    fn exit(&self, phase: GamePhase, next: GamePhase, out: &mut Vec<Directive>) {
        match (phase, next) {
            (GamePhase::Playing, GamePhase::Transitioning)
            | (GamePhase::Transitioning, GamePhase::Playing) => {}
            (GamePhase::Playing | GamePhase::Transitioning, _) => out.push(Directive::StopMoving),
            _ => {}
        }
    }

    fn enter(&mut self, phase: GamePhase, previous: Option<GamePhase>, out: &mut Vec<Directive>) {
        match phase {
            GamePhase::Setup => {
                out.push(Directive::SpawnCharacter);
                self.set_input(true, out);
            }
            GamePhase::Playing => {
                if previous != Some(GamePhase::Transitioning) {
                    self.set_input(false, out);
                    out.push(Directive::StartMoving);
                }
            }
            GamePhase::Transitioning => {}
            GamePhase::Win | GamePhase::Fail => {
                self.paused = false;
                self.set_input(false, out);
            }
        }
    }

    fn set_input(&mut self, enabled: bool, out: &mut Vec<Directive>) {
        self.input_enabled = enabled;
        out.push(Directive::SetInputEnabled(enabled));
    }
}
