#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure tile-effect resolution.
//!
//! [`resolve`] maps the character's chain state and the tile it stands on to
//! a new chain state plus an [`EffectResult`]. It never touches the world;
//! board switches are reported through [`Resolution::board_switch`] and
//! applied by the caller.

use tilewalk_core::{
    BoardIndex, BoardsView, CellCoord, Direction, LinkScope, TileInstance, TileKind, VisualHint,
};
use tracing::{debug, warn};

/// Outcome of resolving a single tile effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectResult {
    /// The run keeps going.
    Continue,
    /// The character reached a goal.
    Win,
    /// The run failed.
    Fail,
}

/// Chain state threaded through successive resolver calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResolutionContext {
    /// Board the character is on.
    pub board: BoardIndex,
    /// Cell the character stands on.
    pub cell: CellCoord,
    /// Current heading.
    pub direction: Direction,
    /// Set after a teleport or portal hop so the landing tile does not bounce
    /// the character straight back.
    pub just_arrived: bool,
}

impl ResolutionContext {
    /// Creates a context for a character that just stepped onto `cell`.
    #[must_use]
    pub const fn new(board: BoardIndex, cell: CellCoord, direction: Direction) -> Self {
        Self {
            board,
            cell,
            direction,
            just_arrived: false,
        }
    }

    /// Whether this context stands on a different cell or board than `other`.
    #[must_use]
    pub fn moved_from(&self, other: &Self) -> bool {
        self.cell != other.cell || self.board != other.board
    }
}

/// Result of one resolver transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Chain state after the effect.
    pub context: ResolutionContext,
    /// Whether the run continues, wins, or fails.
    pub result: EffectResult,
    /// Presentation hint for a hop performed by the effect.
    pub visual: Option<VisualHint>,
    /// Board the caller must activate before playing the hop.
    pub board_switch: Option<BoardIndex>,
}

impl Resolution {
    const fn settled(context: ResolutionContext, result: EffectResult) -> Self {
        Self {
            context,
            result,
            visual: None,
            board_switch: None,
        }
    }
}

/// Resolves the tile under the character in `context`.
#[must_use]
pub fn resolve_current(context: ResolutionContext, boards: BoardsView<'_>) -> Resolution {
    resolve(context, boards.tile(context.board, context.cell), boards)
}

/// Applies the effect of `tile` to `context`.
///
/// A missing tile fails the run.
#[must_use]
pub fn resolve(
    mut context: ResolutionContext,
    tile: Option<&TileInstance>,
    boards: BoardsView<'_>,
) -> Resolution {
    let Some(tile) = tile else {
        debug!(board = %context.board, cell = %context.cell, "no tile under character");
        return Resolution::settled(context, EffectResult::Fail);
    };

    match tile.kind() {
        TileKind::Normal | TileKind::StartingTile | TileKind::Locked => {
            Resolution::settled(context, EffectResult::Continue)
        }
        TileKind::GoalTile => Resolution::settled(context, EffectResult::Win),
        TileKind::Block | TileKind::Empty => Resolution::settled(context, EffectResult::Fail),
        TileKind::RotateLeft90 => {
            context.direction = context.direction.rotated_left();
            Resolution::settled(context, EffectResult::Continue)
        }
        TileKind::RotateRight90 => {
            context.direction = context.direction.rotated_right();
            Resolution::settled(context, EffectResult::Continue)
        }
        TileKind::Rotate180 => {
            context.direction = context.direction.reversed();
            Resolution::settled(context, EffectResult::Continue)
        }
        TileKind::Teleport => {
            follow_link(context, tile, LinkScope::SameBoard(context.board), boards)
        }
        TileKind::Portal => {
            follow_link(context, tile, LinkScope::OtherBoards(context.board), boards)
        }
        TileKind::JumpForward => jump(context, tile, boards),
        kind @ (TileKind::JumpVertical | TileKind::SpeedUp | TileKind::Trigger | TileKind::Door) => {
            warn!(?kind, "tile effect not implemented; treating as normal");
            Resolution::settled(context, EffectResult::Continue)
        }
    }
}

fn follow_link(
    mut context: ResolutionContext,
    tile: &TileInstance,
    scope: LinkScope,
    boards: BoardsView<'_>,
) -> Resolution {
    if context.just_arrived {
        context.just_arrived = false;
        return Resolution::settled(context, EffectResult::Continue);
    }

    let Some(target) = boards.find_linked_tile(scope, tile.kind(), tile.link(), context.cell)
    else {
        warn!(
            kind = ?tile.kind(),
            link = tile.link().get(),
            cell = %context.cell,
            "no paired tile found"
        );
        return Resolution::settled(context, EffectResult::Fail);
    };

    let board_switch = (target.board != context.board).then_some(target.board);
    context.board = target.board;
    context.cell = target.cell;
    context.direction = target.exit_direction;
    context.just_arrived = true;
    Resolution {
        context,
        result: EffectResult::Continue,
        visual: Some(VisualHint::Teleport),
        board_switch,
    }
}

fn jump(mut context: ResolutionContext, tile: &TileInstance, boards: BoardsView<'_>) -> Resolution {
    let distance = i32::try_from(tile.jump_distance())
        .unwrap_or(i32::MAX)
        .saturating_add(1);
    let landing = context.cell.offset(context.direction, distance);
    match boards.tile(context.board, landing) {
        Some(target) if target.is_walkable() => {
            context.cell = landing;
            Resolution {
                context,
                result: EffectResult::Continue,
                visual: Some(VisualHint::Jump),
                board_switch: None,
            }
        }
        _ => {
            debug!(cell = %landing, "jump landing missing or blocked");
            Resolution::settled(context, EffectResult::Fail)
        }
    }
}
