#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares levels for play.
//!
//! [`Bootstrap`] resolves where the character starts and turns a level into
//! the command that loads it. [`LevelProgression`] walks an ordered list of
//! levels.

use thiserror::Error;
use tilewalk_core::{CharacterStart, Command, LevelDefinition};
use tilewalk_world::{query, World};
use tracing::{info, warn};

/// Derives start locations and load commands from level data.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Resolves the character start of a level.
    ///
    /// An explicit start wins; otherwise the first starting tile in board
    /// order is used with the level's start direction.
    #[must_use]
    pub fn character_start(&self, level: &LevelDefinition) -> Option<CharacterStart> {
        if let Some(start) = level.start {
            return Some(start);
        }
        let found = level.first_starting_tile();
        if found.is_none() {
            warn!(level = %level.id, "level has no starting tile");
        }
        found.map(|at| CharacterStart::new(at.board, at.cell, level.start_direction))
    }

    /// Builds the command that loads `level` with its resolved start.
    #[must_use]
    pub fn load_command(&self, level: LevelDefinition) -> Command {
        let start = self.character_start(&level);
        Command::LoadLevel { level, start }
    }

    /// Start recorded for the level currently loaded in the world.
    #[must_use]
    pub fn spawn_point(&self, world: &World) -> Option<CharacterStart> {
        query::character_start(world)
    }
}

/// Reasons a level cannot be selected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    /// No levels were supplied.
    #[error("no levels are available")]
    Empty,
    /// The requested index is past the end of the list.
    #[error("level {index} is out of range for {count} levels")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of levels available.
        count: usize,
    },
}

/// Ordered list of levels with a cursor on the current one.
#[derive(Debug)]
pub struct LevelProgression {
    bootstrap: Bootstrap,
    levels: Vec<LevelDefinition>,
    current: Option<usize>,
}

impl LevelProgression {
    /// Creates a progression over `levels` with nothing loaded yet.
    #[must_use]
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self {
            bootstrap: Bootstrap,
            levels,
            current: None,
        }
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the progression holds no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Index of the level most recently loaded.
    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Level most recently loaded.
    #[must_use]
    pub fn current(&self) -> Option<&LevelDefinition> {
        self.current.and_then(|index| self.levels.get(index))
    }

    /// Whether a level follows the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current
            .map_or(!self.levels.is_empty(), |index| index + 1 < self.levels.len())
    }

    /// Queues the command loading level `index`.
    pub fn load(&mut self, index: usize, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        if self.levels.is_empty() {
            return Err(ProgressionError::Empty);
        }
        let level = self
            .levels
            .get(index)
            .cloned()
            .ok_or(ProgressionError::OutOfRange {
                index,
                count: self.levels.len(),
            })?;
        info!(index, level = %level.id, "loading level");
        self.current = Some(index);
        out.push(self.bootstrap.load_command(level));
        Ok(())
    }

    /// Loads the level after the current one, or the first if none is loaded.
    pub fn load_next(&mut self, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        let index = self.current.map_or(0, |index| index + 1);
        self.load(index, out)
    }

    /// Loads the level before the current one.
    pub fn load_previous(&mut self, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        let index = self.current.map_or(0, |index| index.saturating_sub(1));
        self.load(index, out)
    }

    /// Reloads the current level, or the first if none is loaded.
    pub fn reload(&mut self, out: &mut Vec<Command>) -> Result<(), ProgressionError> {
        self.load(self.current.unwrap_or(0), out)
    }
}
