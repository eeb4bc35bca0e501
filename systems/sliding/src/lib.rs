#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sliding-puzzle controller for the active board.
//!
//! The controller tracks which cells of the active board hold
//! [`TileKind::Empty`] tiles, animates a movable tile into an adjacent empty
//! cell, and asks the world to swap the two cells once the animation ends.
//! Every slide is recorded in a bounded undo history.

mod history;

use std::{collections::BTreeSet, time::Duration};

use tilewalk_core::{
    BoardIndex, BoardsView, CellCoord, Command, Direction, Event, SlideOrigin, TileKind,
};
use tracing::{debug, info};

use history::UndoHistory;
pub use history::UndoRecord;

/// Probe order used by [`Sliding::try_slide`].
const PROBE_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Configuration parameters required to construct the sliding controller.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    slide_duration: Duration,
    max_undo_steps: usize,
}

impl Config {
    /// Creates a configuration with the provided animation length and undo depth.
    #[must_use]
    pub const fn new(slide_duration: Duration, max_undo_steps: usize) -> Self {
        Self {
            slide_duration,
            max_undo_steps,
        }
    }

    /// Length of the slide animation.
    #[must_use]
    pub const fn slide_duration(&self) -> Duration {
        self.slide_duration
    }

    /// Number of slides that can be undone.
    #[must_use]
    pub const fn max_undo_steps(&self) -> usize {
        self.max_undo_steps
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(150), 20)
    }
}

/// Slide currently being animated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlideVisual {
    /// Board owning the tile.
    pub board: BoardIndex,
    /// Cell the tile is leaving.
    pub from: CellCoord,
    /// Cell the tile is moving into.
    pub to: CellCoord,
    /// Normalised animation progress in `[0, 1]`.
    pub progress: f32,
}

#[derive(Clone, Copy, Debug)]
struct Animation {
    board: BoardIndex,
    from: CellCoord,
    to: CellCoord,
    origin: SlideOrigin,
    elapsed: Duration,
}

/// Controller owning the empty-cell set and the undo history.
#[derive(Debug)]
pub struct Sliding {
    config: Config,
    board: Option<BoardIndex>,
    empty: BTreeSet<CellCoord>,
    history: UndoHistory,
    animation: Option<Animation>,
}

impl Sliding {
    /// Creates a new sliding controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            board: None,
            empty: BTreeSet::new(),
            history: UndoHistory::new(config.max_undo_steps),
            animation: None,
        }
    }

    /// Consumes world events and the board view, emitting tile swaps.
    pub fn handle(&mut self, events: &[Event], boards: BoardsView<'_>, out: &mut Vec<Command>) {
        let mut elapsed = None;
        let mut board_changed = false;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    elapsed = Some(elapsed.unwrap_or(Duration::ZERO).saturating_add(*dt));
                }
                Event::LevelLoaded { .. }
                | Event::LevelUnloaded
                | Event::ActiveBoardChanged { .. } => board_changed = true,
                _ => {}
            }
        }

        if board_changed {
            self.rescan(boards);
        }
        if let Some(elapsed) = elapsed {
            self.advance(elapsed, out);
        }
    }

    /// Slides `tile` into the first adjacent empty cell, probing north,
    /// south, west, then east.
    pub fn try_slide(&mut self, boards: BoardsView<'_>, tile: CellCoord) -> bool {
        self.sync(boards);
        let Some(direction) = PROBE_ORDER
            .into_iter()
            .find(|direction| self.empty.contains(&tile.step(*direction)))
        else {
            debug!(%tile, "no empty neighbour to slide into");
            return false;
        };
        self.try_slide_in_direction(boards, tile, direction)
    }

    /// Slides `tile` one cell in `direction` if that cell is empty.
    ///
    /// Returns `false` without changing anything when a slide is already in
    /// flight, no board is active, the tile is missing, empty or not movable,
    /// or the destination is not an empty cell.
    pub fn try_slide_in_direction(
        &mut self,
        boards: BoardsView<'_>,
        tile: CellCoord,
        direction: Direction,
    ) -> bool {
        if self.animation.is_some() {
            debug!(%tile, "slide refused while another slide is animating");
            return false;
        }
        self.sync(boards);
        let Some(board) = self.board else {
            debug!("slide refused without an active board");
            return false;
        };
        let Some(instance) = boards.tile(board, tile) else {
            debug!(%tile, "slide refused for a vacant cell");
            return false;
        };
        if !instance.is_movable() || instance.kind() == TileKind::Empty {
            debug!(%tile, kind = ?instance.kind(), "tile cannot slide");
            return false;
        }
        let destination = tile.step(direction);
        if !self.empty.contains(&destination) {
            debug!(%tile, %destination, "destination is not empty");
            return false;
        }

        self.history.push(UndoRecord {
            origin: tile,
            destination,
        });
        self.begin(board, tile, destination, SlideOrigin::Player);
        true
    }

    /// Reverses the most recent slide. Returns `false` if nothing was undone.
    pub fn undo(&mut self, boards: BoardsView<'_>) -> bool {
        if self.animation.is_some() {
            return false;
        }
        self.sync(boards);
        let Some(board) = self.board else {
            return false;
        };
        let Some(record) = self.history.pop() else {
            return false;
        };
        self.begin(board, record.destination, record.origin, SlideOrigin::Undo);
        true
    }

    /// Empty cells of the active board in ascending coordinate order.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<CellCoord> {
        self.empty.iter().copied().collect()
    }

    /// Number of slides that can currently be undone.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.history.len()
    }

    /// Recorded slides from oldest to newest.
    pub fn undo_history(&self) -> impl Iterator<Item = &UndoRecord> + '_ {
        self.history.iter()
    }

    /// Forgets every recorded slide.
    pub fn clear_undo_history(&mut self) {
        self.history.clear();
    }

    /// Whether a slide is animating.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Slide currently animating, if any.
    #[must_use]
    pub fn visual(&self) -> Option<SlideVisual> {
        let animation = self.animation?;
        let progress = if self.config.slide_duration.is_zero() {
            1.0
        } else {
            (animation.elapsed.as_secs_f32() / self.config.slide_duration.as_secs_f32())
                .clamp(0.0, 1.0)
        };
        Some(SlideVisual {
            board: animation.board,
            from: animation.from,
            to: animation.to,
            progress,
        })
    }

    fn sync(&mut self, boards: BoardsView<'_>) {
        if self.board != boards.active() {
            self.rescan(boards);
        }
    }

    fn rescan(&mut self, boards: BoardsView<'_>) {
        if self.animation.take().is_some() {
            debug!("board changed during a slide; animation discarded");
        }
        self.history.clear();
        self.board = boards.active();
        self.empty = boards
            .active_grid()
            .map(|grid| grid.cells_of_kind(TileKind::Empty).collect())
            .unwrap_or_default();
        debug!(board = ?self.board, empty = self.empty.len(), "empty cells rescanned");
    }

    fn begin(&mut self, board: BoardIndex, from: CellCoord, to: CellCoord, origin: SlideOrigin) {
        self.animation = Some(Animation {
            board,
            from,
            to,
            origin,
            elapsed: Duration::ZERO,
        });
    }

    fn advance(&mut self, elapsed: Duration, out: &mut Vec<Command>) {
        let Some(mut animation) = self.animation else {
            return;
        };
        animation.elapsed = animation.elapsed.saturating_add(elapsed);
        if animation.elapsed < self.config.slide_duration {
            self.animation = Some(animation);
            return;
        }

        self.animation = None;
        let _ = self.empty.remove(&animation.to);
        let _ = self.empty.insert(animation.from);
        info!(
            board = %animation.board,
            from = %animation.from,
            to = %animation.to,
            origin = ?animation.origin,
            "tile slid"
        );
        out.push(Command::SwapTiles {
            board: animation.board,
            from: animation.from,
            to: animation.to,
            origin: animation.origin,
        });
    }
}

impl Default for Sliding {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
