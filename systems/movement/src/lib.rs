#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement controller that walks the character across boards.
//!
//! The controller advances one cell per step in the character's heading,
//! chains tile effects on arrival, and commits every finished hop to the
//! world through [`Command::CommitCharacter`]. A hop onto another board is
//! announced with [`Command::BeginCrossing`] when its playback starts. Time
//! only passes through [`Event::TimeAdvanced`]; every visual is a timed phase
//! that completes on a later tick.

mod chain;

use std::{collections::VecDeque, time::Duration};

use tilewalk_core::{
    BoardCell, BoardIndex, BoardsView, CellCoord, CharacterStart, Command, Direction, Event,
    RunOutcome, VisualHint,
};
use tilewalk_system_effects::{EffectResult, ResolutionContext};
use tracing::{debug, error, info, warn};

pub use chain::{resolve_chain, Chain, ChainHop};

/// Configuration parameters required to construct the movement controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    step_duration: Duration,
    teleport_duration: Duration,
    jump_duration: Duration,
    step_pause: Duration,
    max_chain_hops: usize,
}

impl Config {
    /// Creates a configuration from the step cadence.
    ///
    /// Teleports take 80% of a step and jumps take a full step.
    #[must_use]
    pub fn new(step_duration: Duration, step_pause: Duration) -> Self {
        Self {
            step_duration,
            teleport_duration: step_duration * 4 / 5,
            jump_duration: step_duration,
            step_pause,
            max_chain_hops: 64,
        }
    }

    /// Returns the configuration with a different limit on chained hops.
    #[must_use]
    pub const fn with_max_chain_hops(mut self, max_chain_hops: usize) -> Self {
        self.max_chain_hops = max_chain_hops;
        self
    }

    /// Duration of a single cell-to-cell move.
    #[must_use]
    pub const fn step_duration(&self) -> Duration {
        self.step_duration
    }

    /// Pause inserted between two steps.
    #[must_use]
    pub const fn step_pause(&self) -> Duration {
        self.step_pause
    }

    /// Playback time of a hop with the provided visual.
    #[must_use]
    pub const fn visual_duration(&self, visual: VisualHint) -> Duration {
        match visual {
            VisualHint::Default => self.step_duration,
            VisualHint::Jump => self.jump_duration,
            VisualHint::Teleport => self.teleport_duration,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), Duration::from_millis(50))
    }
}

/// Snapshot of the character as tracked by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveState {
    board: BoardIndex,
    cell: CellCoord,
    direction: Direction,
}

impl MoveState {
    /// Board the character occupies.
    #[must_use]
    pub const fn board(&self) -> BoardIndex {
        self.board
    }

    /// Cell the character occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Heading of the character.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    const fn location(&self) -> BoardCell {
        BoardCell::new(self.board, self.cell)
    }
}

/// Hop currently being played back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HopVisual {
    /// Location the character is leaving.
    pub from: BoardCell,
    /// Location the character is heading to.
    pub to: BoardCell,
    /// Presentation hint for the hop.
    pub visual: VisualHint,
    /// Normalised playback progress in `[0, 1]`.
    pub progress: f32,
}

#[derive(Clone, Copy, Debug)]
struct Playback {
    from: BoardCell,
    hop: ChainHop,
    elapsed: Duration,
    total: Duration,
    entering: bool,
}

impl Playback {
    fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.elapsed)
    }

    fn progress(&self) -> f32 {
        if self.total.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.total.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    Ready,
    Playing(Playback),
    Pausing { remaining: Duration },
}

#[derive(Clone, Copy, Debug)]
struct Settlement {
    direction: Direction,
    result: EffectResult,
}

/// Controller that owns the character's move state and step loop.
#[derive(Debug)]
pub struct Movement {
    config: Config,
    character: Option<MoveState>,
    phase: Phase,
    pending: VecDeque<ChainHop>,
    settlement: Option<Settlement>,
}

impl Movement {
    /// Creates a new movement controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            character: None,
            phase: Phase::Idle,
            pending: VecDeque::new(),
            settlement: None,
        }
    }

    /// Places the character at `start`, replacing any previous character.
    ///
    /// Stops a running step loop. Logs and does nothing when the level has no
    /// start or the start names a board that is not loaded.
    pub fn spawn_character(
        &mut self,
        start: Option<CharacterStart>,
        boards: BoardsView<'_>,
        out: &mut Vec<Command>,
    ) {
        self.stop_moving();
        let Some(start) = start else {
            error!("level provides no character start");
            return;
        };
        if !boards.contains_board(start.board) {
            error!(board = %start.board, "character start names a missing board");
            return;
        }
        if boards.tile(start.board, start.cell).is_none() {
            warn!(at = %start.location(), "character spawned on a vacant cell");
        }
        self.character = Some(MoveState {
            board: start.board,
            cell: start.cell,
            direction: start.direction,
        });
        out.push(Command::PlaceCharacter { start });
    }

    /// Removes the character and stops the step loop.
    pub fn despawn_character(&mut self, out: &mut Vec<Command>) {
        self.stop_moving();
        if self.character.take().is_some() {
            out.push(Command::RemoveCharacter);
        }
    }

    /// Starts the step loop. Does nothing while stepping or without a character.
    pub fn start_moving(&mut self) {
        if self.character.is_none() {
            warn!("start requested without a character");
            return;
        }
        if self.is_moving() {
            return;
        }
        info!("character started moving");
        self.phase = Phase::Ready;
    }

    /// Stops the step loop, discarding any hop that has not been committed.
    pub fn stop_moving(&mut self) {
        if self.is_moving() {
            info!("character stopped moving");
        }
        self.phase = Phase::Idle;
        self.pending.clear();
        self.settlement = None;
    }

    /// Overrides the character heading.
    pub fn set_direction(&mut self, direction: Direction) {
        let moving = self.is_moving();
        if let Some(character) = self.character.as_mut() {
            if moving {
                debug!(?direction, "heading overridden while stepping");
            }
            character.direction = direction;
        }
    }

    /// Whether the step loop is running.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Tracked character state.
    #[must_use]
    pub const fn state(&self) -> Option<MoveState> {
        self.character
    }

    /// Cell the character last committed.
    #[must_use]
    pub fn position(&self) -> Option<CellCoord> {
        self.character.map(|character| character.cell)
    }

    /// Board the character last committed.
    #[must_use]
    pub fn board_index(&self) -> Option<BoardIndex> {
        self.character.map(|character| character.board)
    }

    /// Current heading of the character.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.character.map(|character| character.direction)
    }

    /// Hop currently in playback, if any.
    #[must_use]
    pub fn visual(&self) -> Option<HopVisual> {
        match self.phase {
            Phase::Playing(playback) => Some(HopVisual {
                from: playback.from,
                to: playback.hop.to,
                visual: playback.hop.visual,
                progress: playback.progress(),
            }),
            _ => None,
        }
    }

    /// Consumes world events and the board view to emit movement commands.
    pub fn handle(&mut self, events: &[Event], boards: BoardsView<'_>, out: &mut Vec<Command>) {
        let mut elapsed = None;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    elapsed = Some(elapsed.unwrap_or(Duration::ZERO).saturating_add(*dt));
                }
                Event::LevelLoaded { .. } | Event::LevelUnloaded => {
                    self.stop_moving();
                    self.character = None;
                    elapsed = None;
                }
                _ => {}
            }
        }

        if let Some(elapsed) = elapsed {
            self.advance(elapsed, boards, out);
        }
    }

    fn advance(&mut self, mut budget: Duration, boards: BoardsView<'_>, out: &mut Vec<Command>) {
        let mut last_step_budget = None;
        loop {
            match self.phase {
                Phase::Idle => return,
                Phase::Ready => {
                    // A step that consumed no time would repeat forever.
                    if last_step_budget == Some(budget) {
                        return;
                    }
                    last_step_budget = Some(budget);
                    self.begin_step(boards, out);
                }
                Phase::Playing(mut playback) => {
                    let remaining = playback.remaining();
                    if budget < remaining {
                        playback.elapsed += budget;
                        self.phase = Phase::Playing(playback);
                        return;
                    }
                    budget -= remaining;
                    self.complete_playback(playback, boards, out);
                }
                Phase::Pausing { remaining } => {
                    if budget < remaining {
                        self.phase = Phase::Pausing {
                            remaining: remaining - budget,
                        };
                        return;
                    }
                    budget -= remaining;
                    self.phase = Phase::Ready;
                }
            }
        }
    }

    fn begin_step(&mut self, boards: BoardsView<'_>, out: &mut Vec<Command>) {
        let Some(character) = self.character else {
            self.phase = Phase::Idle;
            return;
        };
        let target = character.cell.step(character.direction);
        match boards.tile(character.board, target) {
            Some(tile) if tile.is_walkable() => {
                self.phase = Phase::Playing(Playback {
                    from: character.location(),
                    hop: ChainHop {
                        to: BoardCell::new(character.board, target),
                        direction: character.direction,
                        visual: VisualHint::Default,
                    },
                    elapsed: Duration::ZERO,
                    total: self.config.step_duration,
                    entering: true,
                });
            }
            _ => {
                debug!(cell = %target, "next cell is missing or not walkable");
                self.conclude(RunOutcome::MoveFailed, out);
            }
        }
    }

    fn complete_playback(
        &mut self,
        playback: Playback,
        boards: BoardsView<'_>,
        out: &mut Vec<Command>,
    ) {
        if self.character.is_none() {
            self.stop_moving();
            return;
        }
        let arrived = MoveState {
            board: playback.hop.to.board,
            cell: playback.hop.to.cell,
            direction: playback.hop.direction,
        };
        self.character = Some(arrived);
        out.push(Command::CommitCharacter {
            at: playback.hop.to,
        });

        if playback.entering {
            let chain = resolve_chain(
                ResolutionContext::new(arrived.board, arrived.cell, arrived.direction),
                boards,
                self.config.max_chain_hops,
            );
            self.pending = chain.hops.into_iter().collect();
            self.settlement = Some(Settlement {
                direction: chain.settled.direction,
                result: chain.result,
            });
        }
        self.play_next_hop(out);
    }

    fn play_next_hop(&mut self, out: &mut Vec<Command>) {
        let Some(from) = self.character.map(|character| character.location()) else {
            self.stop_moving();
            return;
        };
        if let Some(hop) = self.pending.pop_front() {
            if hop.to.board != from.board {
                out.push(Command::BeginCrossing { to: hop.to });
            }
            self.phase = Phase::Playing(Playback {
                from,
                hop,
                elapsed: Duration::ZERO,
                total: self.config.visual_duration(hop.visual),
                entering: false,
            });
            return;
        }

        let result = match self.settlement.take() {
            Some(settlement) => {
                if let Some(character) = self.character.as_mut() {
                    character.direction = settlement.direction;
                }
                settlement.result
            }
            None => EffectResult::Continue,
        };
        match result {
            EffectResult::Continue => {
                self.phase = Phase::Pausing {
                    remaining: self.config.step_pause,
                };
            }
            EffectResult::Win => self.conclude(RunOutcome::GoalReached, out),
            EffectResult::Fail => self.conclude(RunOutcome::MoveFailed, out),
        }
    }

    fn conclude(&mut self, outcome: RunOutcome, out: &mut Vec<Command>) {
        self.stop_moving();
        out.push(Command::ConcludeRun { outcome });
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
