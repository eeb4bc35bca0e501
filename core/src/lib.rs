#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilewalk engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! board snapshots through [`BoardsView`], and respond with new command
//! batches.

mod grid;
mod level;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{BoardsView, Grid, LinkScope, LinkTarget};
pub use level::{BoardDefinition, CharacterStart, LevelDefinition, LevelError, TilePlacement};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces every loaded board with the boards described by the level.
    LoadLevel {
        /// Level whose boards should populate the registry.
        level: LevelDefinition,
        /// Start location resolved for the level, if one exists.
        start: Option<CharacterStart>,
    },
    /// Discards every loaded board and the character.
    UnloadLevel,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the registry activate the provided board.
    SetActiveBoard {
        /// Board that should become active.
        board: BoardIndex,
        /// Origin of the request.
        cause: BoardChangeCause,
    },
    /// Requests that the registry cycle to a neighbouring board.
    CycleActiveBoard {
        /// Direction in which the board list is walked.
        cycle: BoardCycle,
    },
    /// Places the character at the provided start, replacing any existing one.
    PlaceCharacter {
        /// Board, cell, and heading assigned to the character.
        start: CharacterStart,
    },
    /// Removes the character from the world.
    RemoveCharacter,
    /// Commits a finished character move to the authoritative state.
    CommitCharacter {
        /// Board and cell the character now occupies.
        at: BoardCell,
    },
    /// Announces that the character started a hop onto another board.
    BeginCrossing {
        /// Board and cell the character will occupy once the hop commits.
        to: BoardCell,
    },
    /// Records that the current run ended.
    ConcludeRun {
        /// Outcome reached by the character.
        outcome: RunOutcome,
    },
    /// Exchanges the tiles stored at two cells of a board.
    SwapTiles {
        /// Board that owns both cells.
        board: BoardIndex,
        /// Cell holding the tile being moved.
        from: CellCoord,
        /// Cell the tile moves into.
        to: CellCoord,
        /// Whether the swap is a player slide or an undo.
        origin: SlideOrigin,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Indicates that simulated time advanced by the provided delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// Announces that a level replaced the registry contents.
    LevelLoaded {
        /// Identifier of the loaded level.
        level: String,
        /// Number of boards now registered.
        board_count: usize,
        /// Board that became active as part of the load.
        active: BoardIndex,
    },
    /// Announces that every board was discarded.
    LevelUnloaded,
    /// Reports that the active board changed.
    ActiveBoardChanged {
        /// Previously active board, if any.
        previous: Option<BoardIndex>,
        /// Board that is now active.
        next: BoardIndex,
        /// Origin of the change.
        cause: BoardChangeCause,
    },
    /// Reports that a board activation request was refused.
    BoardActivationRejected {
        /// Board the request attempted to activate.
        board: BoardIndex,
        /// Specific reason the request failed.
        reason: RegistryError,
    },
    /// Confirms that the character was placed.
    CharacterSpawned {
        /// Board and cell the character occupies.
        at: BoardCell,
        /// Heading assigned at spawn.
        direction: Direction,
    },
    /// Confirms that the character was removed.
    CharacterDespawned,
    /// Reports that a character move was committed.
    CharacterMoved {
        /// Location the character left.
        from: BoardCell,
        /// Location the character now occupies.
        to: BoardCell,
    },
    /// Reports that the character started a hop onto another board.
    ///
    /// The hop commits later through [`Event::CharacterMoved`].
    CrossingStarted {
        /// Location the character is leaving.
        from: BoardCell,
        /// Location the character is heading to.
        to: BoardCell,
    },
    /// Reports that the character reached a goal tile.
    GoalReached {
        /// Location of the goal tile.
        at: BoardCell,
    },
    /// Reports that the character's run failed.
    MoveFailed {
        /// Location where the run ended.
        at: BoardCell,
    },
    /// Reports that a player slide moved a tile.
    TileMoved {
        /// Board that owns the tiles.
        board: BoardIndex,
        /// Cell the tile left.
        from: CellCoord,
        /// Cell the tile now occupies.
        to: CellCoord,
    },
    /// Reports that an undo moved a tile back.
    TileMoveUndone {
        /// Board that owns the tiles.
        board: BoardIndex,
        /// Cell the tile left.
        from: CellCoord,
        /// Cell the tile now occupies.
        to: CellCoord,
    },
}

/// Reasons a board activation can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryError {
    /// The requested index does not name a registered board.
    #[error("board {index} is out of range for {count} registered boards")]
    OutOfRange {
        /// Index that was requested.
        index: BoardIndex,
        /// Number of boards registered at the time of the request.
        count: usize,
    },
}

/// Origin of an active-board change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardChangeCause {
    /// The change happened while a level was loading.
    Level,
    /// The player switched boards.
    Player,
    /// The character crossed a portal or was spawned elsewhere.
    Character,
}

/// Direction in which the board list is cycled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardCycle {
    /// Moves to the following board, wrapping to the first.
    Next,
    /// Moves to the preceding board, wrapping to the last.
    Previous,
}

/// Marks whether a tile swap was a player slide or an undo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideOrigin {
    /// The swap came from a player slide and is recorded in the history.
    Player,
    /// The swap reverses a previous slide.
    Undo,
}

/// Terminal outcome of a character run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The character stopped on a goal tile.
    GoalReached,
    /// The character hit a failing condition.
    MoveFailed,
}

/// Presentation hint attached to a character hop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualHint {
    /// Straight interpolation between two cells.
    Default,
    /// Parabolic arc over the skipped cells.
    Jump,
    /// Shrink at the source and grow at the destination.
    Teleport,
}

/// Index of a board inside the registry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BoardIndex(usize);

impl BoardIndex {
    /// Creates a new board index.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric position of the board.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BoardIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier pairing teleport or portal tiles.
///
/// The value zero means the tile is unpaired.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LinkId(u32);

impl LinkId {
    /// Link identifier carried by unpaired tiles.
    pub const UNPAIRED: Self = Self(0);

    /// Creates a new link identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier can pair two tiles.
    #[must_use]
    pub const fn is_paired(&self) -> bool {
        self.0 != 0
    }
}

/// Cardinal headings in the grid plane. North points toward increasing `y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward increasing `x`.
    East,
    /// Movement toward increasing `y`.
    North,
    /// Movement toward decreasing `x`.
    West,
    /// Movement toward decreasing `y`.
    South,
}

impl Direction {
    /// Every direction in counter-clockwise order starting east.
    pub const ALL: [Self; 4] = [Self::East, Self::North, Self::West, Self::South];

    /// Unit vector of the direction as `(dx, dy)`.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::North => (0, 1),
            Self::West => (-1, 0),
            Self::South => (0, -1),
        }
    }

    /// Maps a unit vector back to its direction.
    #[must_use]
    pub const fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (1, 0) => Some(Self::East),
            (0, 1) => Some(Self::North),
            (-1, 0) => Some(Self::West),
            (0, -1) => Some(Self::South),
            _ => None,
        }
    }

    /// Rotates the heading a quarter turn counter-clockwise: `(x, y) -> (-y, x)`.
    #[must_use]
    pub const fn rotated_left(self) -> Self {
        match self {
            Self::East => Self::North,
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
        }
    }

    /// Rotates the heading a quarter turn clockwise: `(x, y) -> (y, -x)`.
    #[must_use]
    pub const fn rotated_right(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::North => Self::East,
        }
    }

    /// Turns the heading around: `(x, y) -> (-x, -y)`.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::North => Self::South,
            Self::West => Self::East,
            Self::South => Self::North,
        }
    }
}

/// Location of a single grid cell in integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        self.offset(direction, 1)
    }

    /// Returns the cell `distance` steps away in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction, distance: i32) -> Self {
        let (dx, dy) = direction.vector();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(distance)),
            y: self.y.saturating_add(dy.saturating_mul(distance)),
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cell qualified by the board that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardCell {
    /// Board that owns the cell.
    pub board: BoardIndex,
    /// Cell within the board.
    pub cell: CellCoord,
}

impl BoardCell {
    /// Creates a new board-qualified cell.
    #[must_use]
    pub const fn new(board: BoardIndex, cell: CellCoord) -> Self {
        Self { board, cell }
    }
}

impl fmt::Display for BoardCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board {} {}", self.board, self.cell)
    }
}

/// Behaviour variants a tile can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    /// Walkable hole that fails a run landing on it.
    Empty,
    /// Plain walkable tile.
    Normal,
    /// Walkable tile that never slides.
    Locked,
    /// Transfers the character to the paired portal on another board.
    Portal,
    /// Transfers the character to the paired teleport on the same board.
    Teleport,
    /// Turns the character a quarter turn counter-clockwise.
    RotateLeft90,
    /// Turns the character a quarter turn clockwise.
    RotateRight90,
    /// Turns the character around.
    Rotate180,
    /// Launches the character over a number of cells.
    JumpForward,
    /// Reserved vertical jump. Behaves like a normal tile.
    JumpVertical,
    /// Reserved speed change. Behaves like a normal tile.
    SpeedUp,
    /// Impassable tile that fails a run landing on it.
    Block,
    /// Reserved switch. Behaves like a normal tile.
    Trigger,
    /// Reserved door. Behaves like a normal tile.
    Door,
    /// Marks where the character spawns.
    StartingTile,
    /// Ends the run with a win.
    GoalTile,
}

impl TileKind {
    /// Reports whether the kind pairs with another tile through a [`LinkId`].
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Portal | Self::Teleport)
    }

    /// Reports whether the kind is reserved and resolves like a normal tile.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::JumpVertical | Self::SpeedUp | Self::Trigger | Self::Door
        )
    }

    /// Reports whether tiles of this kind can never slide regardless of flags.
    #[must_use]
    pub const fn is_anchored(self) -> bool {
        matches!(self, Self::StartingTile | Self::GoalTile)
    }
}

/// Per-cell tile data stored in a [`Grid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileInstance {
    kind: TileKind,
    walkable: bool,
    locked: bool,
    link: LinkId,
    exit_direction: Option<Direction>,
    jump_distance: u32,
    rotation: i32,
}

impl TileInstance {
    /// Creates a walkable, unlocked, unpaired tile of the provided kind.
    #[must_use]
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            walkable: true,
            locked: false,
            link: LinkId::UNPAIRED,
            exit_direction: None,
            jump_distance: 0,
            rotation: 0,
        }
    }

    /// Returns the tile with the walkable flag replaced.
    #[must_use]
    pub const fn with_walkable(mut self, walkable: bool) -> Self {
        self.walkable = walkable;
        self
    }

    /// Returns the tile with the locked flag replaced.
    #[must_use]
    pub const fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Returns the tile paired through the provided link.
    #[must_use]
    pub const fn with_link(mut self, link: LinkId) -> Self {
        self.link = link;
        self
    }

    /// Returns the tile with an explicit exit direction.
    #[must_use]
    pub const fn with_exit_direction(mut self, direction: Direction) -> Self {
        self.exit_direction = Some(direction);
        self
    }

    /// Returns the tile with the provided jump distance.
    #[must_use]
    pub const fn with_jump_distance(mut self, distance: u32) -> Self {
        self.jump_distance = distance;
        self
    }

    /// Returns the tile with the provided visual rotation in degrees.
    #[must_use]
    pub const fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation = degrees;
        self
    }

    /// Behaviour of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Whether the character may land on the tile.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Whether the player pinned the tile in place.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Link pairing the tile with its counterpart.
    #[must_use]
    pub const fn link(&self) -> LinkId {
        self.link
    }

    /// Heading given to a character leaving through this tile. Defaults east.
    #[must_use]
    pub const fn exit_direction(&self) -> Direction {
        match self.exit_direction {
            Some(direction) => direction,
            None => Direction::East,
        }
    }

    /// Number of cells skipped by a jump tile.
    #[must_use]
    pub const fn jump_distance(&self) -> u32 {
        self.jump_distance
    }

    /// Visual rotation of the tile in degrees. Carries no rule semantics.
    #[must_use]
    pub const fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Reports whether the sliding puzzle may move this tile.
    #[must_use]
    pub const fn is_movable(&self) -> bool {
        !self.locked && !self.kind.is_anchored()
    }
}
