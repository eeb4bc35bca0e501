#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tilewalk.
//!
//! The world owns every loaded board, the active-board selection, and the
//! committed position of the character. It mutates only in response to
//! [`Command`] values passed to [`apply`] and reports every change as an
//! [`Event`].

mod registry;

use tilewalk_core::{
    BoardCell, BoardChangeCause, BoardIndex, CharacterStart, Command, Direction, Event,
    RunOutcome, SlideOrigin,
};
use tracing::{debug, info, warn};

use registry::{BoardChange, BoardRegistry};

/// Committed location of the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterPresence {
    at: BoardCell,
    spawn_direction: Direction,
}

impl CharacterPresence {
    /// Board and cell the character occupies.
    #[must_use]
    pub const fn at(&self) -> BoardCell {
        self.at
    }

    /// Heading the character was spawned with.
    #[must_use]
    pub const fn spawn_direction(&self) -> Direction {
        self.spawn_direction
    }
}

#[derive(Debug)]
struct LoadedLevel {
    id: String,
    start: Option<CharacterStart>,
}

/// Represents the authoritative Tilewalk world state.
#[derive(Debug)]
pub struct World {
    registry: BoardRegistry,
    level: Option<LoadedLevel>,
    character: Option<CharacterPresence>,
    outcome: Option<RunOutcome>,
    tick_index: u64,
}

impl World {
    /// Creates a world with no level loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: BoardRegistry::new(),
            level: None,
            character: None,
            outcome: None,
            tick_index: 0,
        }
    }

    fn despawn(&mut self, out_events: &mut Vec<Event>) {
        if self.character.take().is_some() {
            out_events.push(Event::CharacterDespawned);
        }
    }

    fn activate(
        &mut self,
        board: BoardIndex,
        cause: BoardChangeCause,
        out_events: &mut Vec<Event>,
    ) -> bool {
        match self.registry.set_active(board) {
            Ok(change) => {
                if let Some(change) = change {
                    announce_board_change(change, cause, out_events);
                }
                true
            }
            Err(reason) => {
                warn!(board = %board, error = %reason, "board activation rejected");
                out_events.push(Event::BoardActivationRejected { board, reason });
                false
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn announce_board_change(change: BoardChange, cause: BoardChangeCause, out: &mut Vec<Event>) {
    debug!(previous = ?change.previous, next = %change.next, ?cause, "active board changed");
    out.push(Event::ActiveBoardChanged {
        previous: change.previous,
        next: change.next,
        cause,
    });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { level, start } => {
            if let Err(error) = level.validate() {
                warn!(%error, "refusing to load level");
                return;
            }
            world.despawn(out_events);
            world.outcome = None;
            let requested = start.map_or(BoardIndex::new(0), |start| start.board);
            let Some(active) = world.registry.load(level.build_grids(), requested) else {
                return;
            };
            info!(level = %level.id, boards = world.registry.len(), %active, "level loaded");
            out_events.push(Event::LevelLoaded {
                level: level.id.clone(),
                board_count: world.registry.len(),
                active,
            });
            world.level = Some(LoadedLevel {
                id: level.id,
                start,
            });
        }
        Command::UnloadLevel => {
            world.despawn(out_events);
            world.registry.clear();
            world.outcome = None;
            if world.level.take().is_some() {
                out_events.push(Event::LevelUnloaded);
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::SetActiveBoard { board, cause } => {
            let _ = world.activate(board, cause, out_events);
        }
        Command::CycleActiveBoard { cycle } => {
            if let Some(change) = world.registry.cycle(cycle) {
                announce_board_change(change, BoardChangeCause::Player, out_events);
            }
        }
        Command::PlaceCharacter { start } => {
            if !world.registry.contains(start.board) {
                warn!(board = %start.board, "cannot place character on a missing board");
                return;
            }
            world.despawn(out_events);
            let _ = world.activate(start.board, BoardChangeCause::Character, out_events);
            world.character = Some(CharacterPresence {
                at: start.location(),
                spawn_direction: start.direction,
            });
            world.outcome = None;
            out_events.push(Event::CharacterSpawned {
                at: start.location(),
                direction: start.direction,
            });
        }
        Command::RemoveCharacter => world.despawn(out_events),
        Command::CommitCharacter { at } => {
            let Some(from) = world.character.map(|presence| presence.at) else {
                warn!(%at, "commit ignored without a character");
                return;
            };
            if !world.activate(at.board, BoardChangeCause::Character, out_events) {
                return;
            }
            if let Some(presence) = world.character.as_mut() {
                presence.at = at;
            }
            out_events.push(Event::CharacterMoved { from, to: at });
        }
        Command::BeginCrossing { to } => {
            let Some(from) = world.character.map(|presence| presence.at) else {
                warn!(%to, "crossing ignored without a character");
                return;
            };
            if !world.registry.contains(to.board) || from.board == to.board {
                warn!(%from, %to, "crossing must target another loaded board");
                return;
            }
            debug!(%from, %to, "character crossing boards");
            out_events.push(Event::CrossingStarted { from, to });
        }
        Command::ConcludeRun { outcome } => {
            let Some(at) = world.character.map(|presence| presence.at) else {
                warn!(?outcome, "run concluded without a character");
                return;
            };
            world.outcome = Some(outcome);
            info!(?outcome, %at, "run concluded");
            out_events.push(match outcome {
                RunOutcome::GoalReached => Event::GoalReached { at },
                RunOutcome::MoveFailed => Event::MoveFailed { at },
            });
        }
        Command::SwapTiles {
            board,
            from,
            to,
            origin,
        } => {
            if !world.registry.swap_tiles(board, from, to) {
                warn!(%board, %from, %to, "tile swap refused");
                return;
            }
            out_events.push(match origin {
                SlideOrigin::Player => Event::TileMoved { board, from, to },
                SlideOrigin::Undo => Event::TileMoveUndone { board, from, to },
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tilewalk_core::{
        BoardCell, BoardIndex, BoardsView, CellCoord, CharacterStart, RunOutcome, TileInstance,
    };

    use super::{CharacterPresence, World};

    /// Captures a read-only view over every loaded board.
    #[must_use]
    pub fn boards_view(world: &World) -> BoardsView<'_> {
        world.registry.view()
    }

    /// Currently active board, if a level is loaded.
    #[must_use]
    pub fn active_board(world: &World) -> Option<BoardIndex> {
        world.registry.active()
    }

    /// Number of loaded boards.
    #[must_use]
    pub fn board_count(world: &World) -> usize {
        world.registry.len()
    }

    /// Tile stored at a cell of the provided board.
    #[must_use]
    pub fn tile(world: &World, board: BoardIndex, cell: CellCoord) -> Option<&TileInstance> {
        world.registry.view().tile(board, cell)
    }

    /// Identifier of the loaded level.
    #[must_use]
    pub fn level_id(world: &World) -> Option<&str> {
        world.level.as_ref().map(|level| level.id.as_str())
    }

    /// Start location recorded when the level was loaded.
    #[must_use]
    pub fn character_start(world: &World) -> Option<CharacterStart> {
        world.level.as_ref().and_then(|level| level.start)
    }

    /// Committed character state, if a character is spawned.
    #[must_use]
    pub fn character(world: &World) -> Option<CharacterPresence> {
        world.character
    }

    /// Committed character location, if a character is spawned.
    #[must_use]
    pub fn character_location(world: &World) -> Option<BoardCell> {
        world.character.map(|presence| presence.at)
    }

    /// Whether the character stands on the active board.
    #[must_use]
    pub fn character_visible(world: &World) -> bool {
        match (world.character, world.registry.active()) {
            (Some(presence), Some(active)) => presence.at.board == active,
            _ => false,
        }
    }

    /// Outcome of the most recent run since the character was spawned.
    #[must_use]
    pub fn last_outcome(world: &World) -> Option<RunOutcome> {
        world.outcome
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tilewalk_core::{
        BoardCycle, BoardDefinition, CellCoord, LevelDefinition, RegistryError, TileKind,
        TilePlacement,
    };

    fn two_board_level() -> LevelDefinition {
        let board = |kind| BoardDefinition {
            name: String::new(),
            tiles: vec![
                TilePlacement::new(CellCoord::new(0, 0), kind),
                TilePlacement::new(CellCoord::new(1, 0), TileKind::Empty),
            ],
        };
        LevelDefinition {
            id: "pair".to_owned(),
            start_direction: Direction::East,
            start: None,
            boards: vec![board(TileKind::StartingTile), board(TileKind::Normal)],
        }
    }

    fn loaded_world(start: Option<CharacterStart>) -> (World, Vec<Event>) {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadLevel {
                level: two_board_level(),
                start,
            },
            &mut events,
        );
        (world, events)
    }

    fn start_on(board: usize) -> CharacterStart {
        CharacterStart::new(
            BoardIndex::new(board),
            CellCoord::new(0, 0),
            Direction::East,
        )
    }

    #[test]
    fn load_level_activates_start_board() {
        let (world, events) = loaded_world(Some(start_on(1)));

        assert_eq!(
            events,
            vec![Event::LevelLoaded {
                level: "pair".to_owned(),
                board_count: 2,
                active: BoardIndex::new(1),
            }]
        );
        assert_eq!(query::active_board(&world), Some(BoardIndex::new(1)));
        assert_eq!(query::character_start(&world), Some(start_on(1)));
        assert_eq!(
            query::tile(&world, BoardIndex::new(0), CellCoord::new(0, 0)).map(|t| t.kind()),
            Some(TileKind::StartingTile)
        );
    }

    #[test]
    fn invalid_level_is_ignored() {
        let mut world = World::new();
        let mut events = Vec::new();
        let mut level = two_board_level();
        level.boards.clear();

        apply(&mut world, Command::LoadLevel { level, start: None }, &mut events);

        assert!(events.is_empty(), "invalid level should emit nothing");
        assert_eq!(query::board_count(&world), 0);
    }

    #[test]
    fn out_of_range_activation_reports_rejection() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetActiveBoard {
                board: BoardIndex::new(5),
                cause: BoardChangeCause::Player,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::BoardActivationRejected {
                board: BoardIndex::new(5),
                reason: RegistryError::OutOfRange {
                    index: BoardIndex::new(5),
                    count: 2,
                },
            }]
        );
        assert_eq!(query::active_board(&world), Some(BoardIndex::new(0)));
    }

    #[test]
    fn cycling_announces_player_change() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CycleActiveBoard {
                cycle: BoardCycle::Next,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ActiveBoardChanged {
                previous: Some(BoardIndex::new(0)),
                next: BoardIndex::new(1),
                cause: BoardChangeCause::Player,
            }]
        );
    }

    #[test]
    fn commit_across_boards_switches_active_board() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceCharacter { start: start_on(0) },
            &mut events,
        );
        events.clear();

        let destination = BoardCell::new(BoardIndex::new(1), CellCoord::new(1, 0));
        apply(
            &mut world,
            Command::CommitCharacter { at: destination },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::ActiveBoardChanged {
                    previous: Some(BoardIndex::new(0)),
                    next: BoardIndex::new(1),
                    cause: BoardChangeCause::Character,
                },
                Event::CharacterMoved {
                    from: start_on(0).location(),
                    to: destination,
                },
            ]
        );
        assert!(query::character_visible(&world));
    }

    #[test]
    fn crossing_is_announced_only_toward_another_board() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();
        let destination = BoardCell::new(BoardIndex::new(1), CellCoord::new(1, 0));
        apply(
            &mut world,
            Command::BeginCrossing { to: destination },
            &mut events,
        );
        assert!(events.is_empty(), "no character to cross");

        apply(
            &mut world,
            Command::PlaceCharacter { start: start_on(0) },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::BeginCrossing {
                to: BoardCell::new(BoardIndex::new(0), CellCoord::new(1, 0)),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::BeginCrossing {
                to: BoardCell::new(BoardIndex::new(7), CellCoord::new(1, 0)),
            },
            &mut events,
        );
        assert!(events.is_empty(), "{events:?}");

        apply(
            &mut world,
            Command::BeginCrossing { to: destination },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CrossingStarted {
                from: start_on(0).location(),
                to: destination,
            }]
        );
        assert_eq!(query::active_board(&world), Some(BoardIndex::new(0)));
        assert_eq!(
            query::character_location(&world),
            Some(start_on(0).location())
        );
    }

    #[test]
    fn character_is_hidden_while_player_views_another_board() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceCharacter { start: start_on(0) },
            &mut events,
        );
        assert!(query::character_visible(&world));

        apply(
            &mut world,
            Command::SetActiveBoard {
                board: BoardIndex::new(1),
                cause: BoardChangeCause::Player,
            },
            &mut events,
        );
        assert!(!query::character_visible(&world));
    }

    #[test]
    fn swap_origin_selects_event() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();
        let board = BoardIndex::new(1);
        let (from, to) = (CellCoord::new(0, 0), CellCoord::new(1, 0));

        apply(
            &mut world,
            Command::SwapTiles {
                board,
                from,
                to,
                origin: SlideOrigin::Player,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SwapTiles {
                board,
                from: to,
                to: from,
                origin: SlideOrigin::Undo,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::TileMoved { board, from, to },
                Event::TileMoveUndone {
                    board,
                    from: to,
                    to: from,
                },
            ]
        );
        assert_eq!(
            query::tile(&world, board, from).map(|t| t.kind()),
            Some(TileKind::Normal)
        );
    }

    #[test]
    fn conclude_run_reports_outcome_at_character() {
        let (mut world, _) = loaded_world(None);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceCharacter { start: start_on(0) },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::ConcludeRun {
                outcome: RunOutcome::MoveFailed,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MoveFailed {
                at: start_on(0).location()
            }]
        );
        assert_eq!(query::last_outcome(&world), Some(RunOutcome::MoveFailed));
    }

    #[test]
    fn tick_advances_time() {
        let mut world = World::new();
        let mut events = Vec::new();
        let dt = Duration::from_millis(16);

        apply(&mut world, Command::Tick { dt }, &mut events);

        assert_eq!(events, vec![Event::TimeAdvanced { dt }]);
        assert_eq!(query::tick_index(&world), 1);
    }
}
