//! Resolution chaining from a freshly entered cell to a fixed point.

use tilewalk_core::{BoardCell, BoardsView, Direction, VisualHint};
use tilewalk_system_effects::{resolve_current, EffectResult, ResolutionContext};
use tracing::warn;

/// Hop performed by a tile effect during a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainHop {
    /// Location reached by the hop.
    pub to: BoardCell,
    /// Heading held on arrival.
    pub direction: Direction,
    /// Presentation hint for the hop.
    pub visual: VisualHint,
}

/// Every hop and the final state produced by chaining tile effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    /// Hops in the order they occur.
    pub hops: Vec<ChainHop>,
    /// State after the last resolver call.
    pub settled: ResolutionContext,
    /// Result reported by the last resolver call.
    pub result: EffectResult,
}

/// Resolves tile effects starting at `start` until the position stops changing.
///
/// A chain exceeding `max_hops` hops fails.
#[must_use]
pub fn resolve_chain(start: ResolutionContext, boards: BoardsView<'_>, max_hops: usize) -> Chain {
    let mut context = start;
    let mut hops = Vec::new();
    loop {
        let resolution = resolve_current(context, boards);
        let moved = resolution.context.moved_from(&context);
        context = resolution.context;
        if moved {
            hops.push(ChainHop {
                to: BoardCell::new(context.board, context.cell),
                direction: context.direction,
                visual: resolution.visual.unwrap_or(VisualHint::Default),
            });
        }
        if resolution.result != EffectResult::Continue || !moved {
            return Chain {
                hops,
                settled: context,
                result: resolution.result,
            };
        }
        if hops.len() >= max_hops {
            warn!(max_hops, cell = %context.cell, "tile effects chained without settling");
            return Chain {
                hops,
                settled: context,
                result: EffectResult::Fail,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_chain;
    use tilewalk_core::{
        BoardIndex, BoardsView, CellCoord, Direction, Grid, TileInstance, TileKind, VisualHint,
    };
    use tilewalk_system_effects::{EffectResult, ResolutionContext};

    #[test]
    fn jump_chains_into_goal() {
        let grids = [Grid::from_tiles([
            (
                CellCoord::new(0, 0),
                TileInstance::new(TileKind::JumpForward).with_jump_distance(1),
            ),
            (CellCoord::new(2, 0), TileInstance::new(TileKind::GoalTile)),
        ])];
        let boards = BoardsView::new(&grids, Some(BoardIndex::new(0)));

        let chain = resolve_chain(
            ResolutionContext::new(BoardIndex::new(0), CellCoord::new(0, 0), Direction::East),
            boards,
            8,
        );

        assert_eq!(chain.result, EffectResult::Win);
        assert_eq!(chain.hops.len(), 1);
        assert_eq!(chain.hops[0].visual, VisualHint::Jump);
        assert_eq!(chain.settled.cell, CellCoord::new(2, 0));
    }

    #[test]
    fn rotation_settles_without_hops() {
        let grids = [Grid::from_tiles([(
            CellCoord::new(0, 0),
            TileInstance::new(TileKind::RotateRight90),
        )])];
        let boards = BoardsView::new(&grids, Some(BoardIndex::new(0)));

        let chain = resolve_chain(
            ResolutionContext::new(BoardIndex::new(0), CellCoord::new(0, 0), Direction::North),
            boards,
            8,
        );

        assert_eq!(chain.result, EffectResult::Continue);
        assert!(chain.hops.is_empty());
        assert_eq!(chain.settled.direction, Direction::East);
    }

    #[test]
    fn chains_longer_than_the_limit_fail() {
        let grids = [Grid::from_tiles(
            (0..6).map(|x| (CellCoord::new(x, 0), TileInstance::new(TileKind::JumpForward))),
        )];
        let boards = BoardsView::new(&grids, Some(BoardIndex::new(0)));

        let chain = resolve_chain(
            ResolutionContext::new(BoardIndex::new(0), CellCoord::new(0, 0), Direction::East),
            boards,
            3,
        );

        assert_eq!(chain.result, EffectResult::Fail);
        assert_eq!(chain.hops.len(), 3);
    }
}
