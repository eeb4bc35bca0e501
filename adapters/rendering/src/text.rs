//! Plain-text board frames for terminals and logs.

use std::{collections::BTreeSet, fmt};
use tilewalk_core::{BoardIndex, CellCoord, Grid, TileKind};

/// Plain-text snapshot of one board.
///
/// Rows run from the highest `y` at the top to the lowest at the bottom so
/// that north points up. Only rows and columns holding a tile or the
/// character are drawn, so gaps between distant tiles collapse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFrame {
    board: BoardIndex,
    rows: Vec<String>,
}

impl TextFrame {
    /// Renders `grid` with the character drawn at `character` when present.
    #[must_use]
    pub fn render(board: BoardIndex, grid: &Grid, character: Option<CellCoord>) -> Self {
        let occupied: Vec<CellCoord> = grid.iter().map(|(cell, _)| cell).chain(character).collect();
        let columns: BTreeSet<i32> = occupied.iter().map(|cell| cell.x()).collect();
        let lines: BTreeSet<i32> = occupied.iter().map(|cell| cell.y()).collect();

        let rows = lines
            .iter()
            .rev()
            .map(|&y| {
                columns
                    .iter()
                    .map(|&x| {
                        let cell = CellCoord::new(x, y);
                        if character == Some(cell) {
                            '@'
                        } else {
                            grid.tile(cell).map_or(' ', |tile| {
                                if tile.is_locked() && tile.kind() == TileKind::Normal {
                                    glyph(TileKind::Locked)
                                } else {
                                    glyph(tile.kind())
                                }
                            })
                        }
                    })
                    .collect()
            })
            .collect();
        Self { board, rows }
    }

    /// Board the frame depicts.
    #[must_use]
    pub const fn board(&self) -> BoardIndex {
        self.board
    }

    /// Rendered rows, top first.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

impl fmt::Display for TextFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "board {}", self.board)?;
        for row in &self.rows {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Single-character glyph used for a tile kind.
#[must_use]
pub const fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '_',
        TileKind::Normal => '.',
        TileKind::Locked => '=',
        TileKind::Portal => 'P',
        TileKind::Teleport => 'T',
        TileKind::RotateLeft90 => 'L',
        TileKind::RotateRight90 => 'R',
        TileKind::Rotate180 => 'U',
        TileKind::JumpForward => 'J',
        TileKind::JumpVertical => 'V',
        TileKind::SpeedUp => '+',
        TileKind::Block => '#',
        TileKind::Trigger => '!',
        TileKind::Door => 'D',
        TileKind::StartingTile => 'S',
        TileKind::GoalTile => 'G',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilewalk_core::TileInstance;

    #[test]
    fn rows_put_north_on_top_and_leave_vacant_cells_blank() {
        let grid = Grid::from_tiles([
            (CellCoord::new(0, 0), TileInstance::new(TileKind::StartingTile)),
            (CellCoord::new(1, 0), TileInstance::new(TileKind::Empty)),
            (CellCoord::new(1, 1), TileInstance::new(TileKind::GoalTile)),
            (
                CellCoord::new(2, 0),
                TileInstance::new(TileKind::Normal).with_locked(true),
            ),
        ]);

        let frame = TextFrame::render(BoardIndex::new(0), &grid, None);

        assert_eq!(
            frame.rows().to_vec(),
            vec![" G ".to_owned(), "S_=".to_owned()]
        );
    }

    #[test]
    fn character_overlays_the_tile() {
        let grid = Grid::from_tiles([
            (CellCoord::new(0, 0), TileInstance::new(TileKind::Normal)),
            (CellCoord::new(1, 0), TileInstance::new(TileKind::Normal)),
        ]);

        let frame = TextFrame::render(BoardIndex::new(2), &grid, Some(CellCoord::new(1, 0)));

        assert_eq!(frame.to_string(), "board 2\n.@\n");
    }

    #[test]
    fn distant_tiles_collapse_the_gap_between_them() {
        let grid = Grid::from_tiles([
            (CellCoord::new(0, 0), TileInstance::new(TileKind::StartingTile)),
            (CellCoord::new(4000, 4000), TileInstance::new(TileKind::GoalTile)),
        ]);

        let character = Some(CellCoord::new(-9000, 0));
        let frame = TextFrame::render(BoardIndex::new(0), &grid, character);

        assert_eq!(
            frame.rows().to_vec(),
            vec!["  G".to_owned(), "@S ".to_owned()]
        );
    }

    #[test]
    fn empty_grid_renders_no_rows() {
        let frame = TextFrame::render(BoardIndex::new(0), &Grid::new(), None);
        assert!(frame.rows().is_empty());
    }
}
