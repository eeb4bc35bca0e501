//! Serialisable level descriptions consumed by the world on load.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BoardCell, BoardIndex, CellCoord, Direction, Grid, LinkId, TileInstance, TileKind};

/// Complete description of a playable level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Human readable identifier of the level.
    pub id: String,
    /// Heading given to a character spawned on a discovered starting tile.
    #[serde(default = "default_direction")]
    pub start_direction: Direction,
    /// Explicit start overriding starting-tile discovery.
    #[serde(default)]
    pub start: Option<CharacterStart>,
    /// Boards in registry order.
    pub boards: Vec<BoardDefinition>,
}

impl LevelDefinition {
    /// Checks the level for structural problems before it is loaded.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.boards.is_empty() {
            return Err(LevelError::NoBoards {
                level: self.id.clone(),
            });
        }
        if let Some(start) = self.start {
            if start.board.get() >= self.boards.len() {
                return Err(LevelError::StartOutOfRange {
                    level: self.id.clone(),
                    board: start.board,
                    count: self.boards.len(),
                });
            }
        }
        for (index, board) in self.boards.iter().enumerate() {
            let mut seen = std::collections::BTreeSet::new();
            for placement in &board.tiles {
                if !seen.insert(placement.cell) {
                    return Err(LevelError::DuplicateTile {
                        level: self.id.clone(),
                        board: BoardIndex::new(index),
                        cell: placement.cell,
                    });
                }
            }
        }
        Ok(())
    }

    /// Builds one grid per board in registry order.
    #[must_use]
    pub fn build_grids(&self) -> Vec<Grid> {
        self.boards.iter().map(BoardDefinition::build_grid).collect()
    }

    /// First starting tile in board order, then ascending cell order.
    #[must_use]
    pub fn first_starting_tile(&self) -> Option<BoardCell> {
        self.boards.iter().enumerate().find_map(|(index, board)| {
            board
                .tiles
                .iter()
                .filter(|placement| placement.kind == TileKind::StartingTile)
                .map(|placement| placement.cell)
                .min()
                .map(|cell| BoardCell::new(BoardIndex::new(index), cell))
        })
    }
}

/// Tiles making up one board of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    /// Optional label shown by adapters.
    #[serde(default)]
    pub name: String,
    /// Tile placements on the board.
    #[serde(default)]
    pub tiles: Vec<TilePlacement>,
}

impl BoardDefinition {
    /// Converts the placements into a grid.
    #[must_use]
    pub fn build_grid(&self) -> Grid {
        Grid::from_tiles(
            self.tiles
                .iter()
                .map(|placement| (placement.cell, placement.instance())),
        )
    }
}

/// Single tile placed on a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Cell occupied by the tile.
    pub cell: CellCoord,
    /// Behaviour of the tile.
    pub kind: TileKind,
    /// Visual rotation in degrees.
    #[serde(default)]
    pub rotation: i32,
    /// Link pairing teleports and portals.
    #[serde(default)]
    pub link: LinkId,
    /// Heading assigned when leaving through the tile.
    #[serde(default)]
    pub exit: Option<Direction>,
    /// Cells skipped by a jump tile.
    #[serde(default)]
    pub jump: u32,
    /// Whether the character may land on the tile.
    #[serde(default = "default_walkable")]
    pub walkable: bool,
    /// Whether the sliding puzzle must leave the tile in place.
    #[serde(default)]
    pub locked: bool,
}

impl TilePlacement {
    /// Creates a default placement of the provided kind.
    #[must_use]
    pub const fn new(cell: CellCoord, kind: TileKind) -> Self {
        Self {
            cell,
            kind,
            rotation: 0,
            link: LinkId::UNPAIRED,
            exit: None,
            jump: 0,
            walkable: true,
            locked: false,
        }
    }

    /// Tile instance described by the placement.
    #[must_use]
    pub const fn instance(&self) -> TileInstance {
        let tile = TileInstance::new(self.kind)
            .with_walkable(self.walkable)
            .with_locked(self.locked)
            .with_link(self.link)
            .with_jump_distance(self.jump)
            .with_rotation(self.rotation);
        match self.exit {
            Some(direction) => tile.with_exit_direction(direction),
            None => tile,
        }
    }
}

/// Location and heading assigned to a freshly spawned character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterStart {
    /// Board the character spawns on.
    pub board: BoardIndex,
    /// Cell the character spawns on.
    pub cell: CellCoord,
    /// Initial heading.
    #[serde(default = "default_direction")]
    pub direction: Direction,
}

impl CharacterStart {
    /// Creates a new start description.
    #[must_use]
    pub const fn new(board: BoardIndex, cell: CellCoord, direction: Direction) -> Self {
        Self {
            board,
            cell,
            direction,
        }
    }

    /// Board-qualified start cell.
    #[must_use]
    pub const fn location(&self) -> BoardCell {
        BoardCell::new(self.board, self.cell)
    }
}

/// Structural problems detected in a level description.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    /// The level lists no boards.
    #[error("level `{level}` defines no boards")]
    NoBoards {
        /// Identifier of the offending level.
        level: String,
    },
    /// The explicit start names a board that does not exist.
    #[error("level `{level}` starts on board {board} but defines only {count} boards")]
    StartOutOfRange {
        /// Identifier of the offending level.
        level: String,
        /// Board named by the start.
        board: BoardIndex,
        /// Number of boards defined.
        count: usize,
    },
    /// Two placements on one board share a cell.
    #[error("board {board} of level `{level}` places more than one tile at {cell}")]
    DuplicateTile {
        /// Identifier of the offending level.
        level: String,
        /// Board holding the duplicate.
        board: BoardIndex,
        /// Cell placed twice.
        cell: CellCoord,
    },
}

const fn default_direction() -> Direction {
    Direction::East
}

const fn default_walkable() -> bool {
    true
}
