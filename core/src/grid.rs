//! Sparse tile grids and the read-only view over every loaded board.

use std::collections::BTreeMap;

use crate::{BoardIndex, CellCoord, Direction, LinkId, TileInstance, TileKind};

/// Sparse mapping from cell coordinates to tiles.
///
/// Iteration visits cells in ascending `(x, y)` order so that every scan
/// performed by the rules is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    tiles: BTreeMap<CellCoord, TileInstance>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from placements. Later placements replace earlier ones.
    #[must_use]
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (CellCoord, TileInstance)>,
    {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Stores a tile, returning the tile it replaced.
    pub fn insert(&mut self, cell: CellCoord, tile: TileInstance) -> Option<TileInstance> {
        self.tiles.insert(cell, tile)
    }

    /// Tile stored at the cell, if any.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<&TileInstance> {
        self.tiles.get(&cell)
    }

    /// Reports whether the cell holds a tile.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.tiles.contains_key(&cell)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterates over every occupied cell in ascending coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &TileInstance)> + '_ {
        self.tiles.iter().map(|(cell, tile)| (*cell, tile))
    }

    /// Iterates over the cells whose tile has the provided kind.
    pub fn cells_of_kind(&self, kind: TileKind) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(move |(_, tile)| tile.kind() == kind)
            .map(|(cell, _)| cell)
    }

    /// Exchanges the tiles stored at two distinct occupied cells.
    ///
    /// Returns `false` and leaves the grid untouched when either cell is
    /// vacant or both coordinates are equal.
    pub fn swap(&mut self, first: CellCoord, second: CellCoord) -> bool {
        if first == second {
            return false;
        }
        let (Some(a), Some(b)) = (self.tile(first).copied(), self.tile(second).copied()) else {
            return false;
        };
        let _ = self.tiles.insert(first, b);
        let _ = self.tiles.insert(second, a);
        true
    }
}

/// Search domain used when following a teleport or portal link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkScope {
    /// Searches only the given board.
    SameBoard(BoardIndex),
    /// Searches every board except the given one.
    OtherBoards(BoardIndex),
}

/// Destination located by [`BoardsView::find_linked_tile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkTarget {
    /// Board owning the paired tile.
    pub board: BoardIndex,
    /// Cell of the paired tile.
    pub cell: CellCoord,
    /// Heading the paired tile assigns on exit.
    pub exit_direction: Direction,
}

/// Read-only snapshot over every loaded board.
#[derive(Clone, Copy, Debug)]
pub struct BoardsView<'a> {
    grids: &'a [Grid],
    active: Option<BoardIndex>,
}

impl<'a> BoardsView<'a> {
    /// Creates a view over the provided boards.
    #[must_use]
    pub const fn new(grids: &'a [Grid], active: Option<BoardIndex>) -> Self {
        Self { grids, active }
    }

    /// View with no boards loaded.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grids: &[],
            active: None,
        }
    }

    /// Number of loaded boards.
    #[must_use]
    pub const fn board_count(&self) -> usize {
        self.grids.len()
    }

    /// Currently active board, if any board is loaded.
    #[must_use]
    pub const fn active(&self) -> Option<BoardIndex> {
        self.active
    }

    /// Reports whether the index names a loaded board.
    #[must_use]
    pub const fn contains_board(&self, board: BoardIndex) -> bool {
        board.get() < self.grids.len()
    }

    /// Grid of the provided board.
    #[must_use]
    pub fn grid(&self, board: BoardIndex) -> Option<&'a Grid> {
        self.grids.get(board.get())
    }

    /// Grid of the active board.
    #[must_use]
    pub fn active_grid(&self) -> Option<&'a Grid> {
        self.active.and_then(|board| self.grid(board))
    }

    /// Tile at a cell of the provided board.
    #[must_use]
    pub fn tile(&self, board: BoardIndex, cell: CellCoord) -> Option<&'a TileInstance> {
        self.grid(board).and_then(|grid| grid.tile(cell))
    }

    /// Iterates over every board with its index.
    pub fn iter(&self) -> impl Iterator<Item = (BoardIndex, &'a Grid)> + 'a {
        self.grids
            .iter()
            .enumerate()
            .map(|(index, grid)| (BoardIndex::new(index), grid))
    }

    /// Finds the first tile that pairs with `link`.
    ///
    /// Boards are visited in index order and cells in ascending coordinate
    /// order. Within [`LinkScope::SameBoard`] the cell `exclude` is skipped.
    /// An unpaired link or a kind that does not link never matches.
    #[must_use]
    pub fn find_linked_tile(
        &self,
        scope: LinkScope,
        kind: TileKind,
        link: LinkId,
        exclude: CellCoord,
    ) -> Option<LinkTarget> {
        if !kind.is_link() || !link.is_paired() {
            return None;
        }
        let pairs = |tile: &TileInstance| tile.kind() == kind && tile.link() == link;
        match scope {
            LinkScope::SameBoard(board) => self
                .grid(board)?
                .iter()
                .find(|(cell, tile)| *cell != exclude && pairs(*tile))
                .map(|(cell, tile)| LinkTarget {
                    board,
                    cell,
                    exit_direction: tile.exit_direction(),
                }),
            LinkScope::OtherBoards(origin) => self
                .iter()
                .filter(|(board, _)| *board != origin)
                .find_map(|(board, grid)| {
                    grid.iter()
                        .find(|(_, tile)| pairs(*tile))
                        .map(|(cell, tile)| LinkTarget {
                            board,
                            cell,
                            exit_direction: tile.exit_direction(),
                        })
                }),
        }
    }
}
