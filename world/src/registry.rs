//! Ordered board storage and active-board tracking.

use tilewalk_core::{BoardCycle, BoardIndex, BoardsView, CellCoord, Grid, RegistryError};

/// Transition reported when the active board changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoardChange {
    /// Board that was active before the change.
    pub(crate) previous: Option<BoardIndex>,
    /// Board that is active after the change.
    pub(crate) next: BoardIndex,
}

/// Registry owning every loaded board.
#[derive(Debug, Default)]
pub(crate) struct BoardRegistry {
    grids: Vec<Grid>,
    active: Option<BoardIndex>,
}

impl BoardRegistry {
    /// Creates a registry with no boards.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces every board and activates `active` without reporting a change.
    ///
    /// An out-of-range `active` falls back to the first board.
    pub(crate) fn load(&mut self, grids: Vec<Grid>, active: BoardIndex) -> Option<BoardIndex> {
        self.grids = grids;
        self.active = if self.grids.is_empty() {
            None
        } else if active.get() < self.grids.len() {
            Some(active)
        } else {
            Some(BoardIndex::new(0))
        };
        self.active
    }

    /// Discards every board.
    pub(crate) fn clear(&mut self) {
        self.grids.clear();
        self.active = None;
    }

    pub(crate) fn len(&self) -> usize {
        self.grids.len()
    }

    pub(crate) fn active(&self) -> Option<BoardIndex> {
        self.active
    }

    pub(crate) fn contains(&self, board: BoardIndex) -> bool {
        board.get() < self.grids.len()
    }

    /// Activates `board`, reporting the transition when the board changed.
    pub(crate) fn set_active(
        &mut self,
        board: BoardIndex,
    ) -> Result<Option<BoardChange>, RegistryError> {
        if !self.contains(board) {
            return Err(RegistryError::OutOfRange {
                index: board,
                count: self.grids.len(),
            });
        }
        if self.active == Some(board) {
            return Ok(None);
        }
        let previous = self.active.replace(board);
        Ok(Some(BoardChange {
            previous,
            next: board,
        }))
    }

    /// Moves the active board one step, wrapping at both ends.
    ///
    /// Does nothing when fewer than two boards are loaded.
    pub(crate) fn cycle(&mut self, cycle: BoardCycle) -> Option<BoardChange> {
        let count = self.grids.len();
        if count <= 1 {
            return None;
        }
        let current = self.active.map_or(0, |board| board.get());
        let next = match cycle {
            BoardCycle::Next => (current + 1) % count,
            BoardCycle::Previous => (current + count - 1) % count,
        };
        self.set_active(BoardIndex::new(next)).ok().flatten()
    }

    /// Swaps two tiles of a board. Returns `false` if the swap was refused.
    pub(crate) fn swap_tiles(&mut self, board: BoardIndex, from: CellCoord, to: CellCoord) -> bool {
        self.grids
            .get_mut(board.get())
            .map_or(false, |grid| grid.swap(from, to))
    }

    pub(crate) fn view(&self) -> BoardsView<'_> {
        BoardsView::new(&self.grids, self.active)
    }
}
