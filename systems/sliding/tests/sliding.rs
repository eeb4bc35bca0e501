use std::time::Duration;

use tilewalk_core::{
    BoardChangeCause, BoardDefinition, BoardIndex, CellCoord, Command, Direction, Event,
    LevelDefinition, TileKind, TilePlacement,
};
use tilewalk_system_sliding::{Config, Sliding, UndoRecord};
use tilewalk_world::{self as world, query, World};

const SLIDE: Duration = Duration::from_millis(150);

struct Harness {
    world: World,
    sliding: Sliding,
    log: Vec<Event>,
}

impl Harness {
    fn new(config: Config, boards: Vec<Vec<TilePlacement>>) -> Self {
        let mut harness = Self {
            world: World::new(),
            sliding: Sliding::new(config),
            log: Vec::new(),
        };
        let level = LevelDefinition {
            id: "sliding".to_owned(),
            start_direction: Direction::East,
            start: None,
            boards: boards
                .into_iter()
                .map(|tiles| BoardDefinition {
                    name: String::new(),
                    tiles,
                })
                .collect(),
        };
        harness.pump(vec![Command::LoadLevel { level, start: None }]);
        harness
    }

    fn single(config: Config, tiles: Vec<TilePlacement>) -> Self {
        Self::new(config, vec![tiles])
    }

    fn pump(&mut self, mut commands: Vec<Command>) {
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.sliding
                .handle(&events, query::boards_view(&self.world), &mut commands);
            self.log.extend(events);
        }
    }

    fn slide(&mut self, tile: CellCoord, direction: Direction) -> bool {
        let accepted = self.sliding.try_slide_in_direction(
            query::boards_view(&self.world),
            tile,
            direction,
        );
        self.pump(vec![Command::Tick { dt: SLIDE }]);
        accepted
    }

    fn kind_at(&self, x: i32, y: i32) -> Option<TileKind> {
        query::tile(&self.world, BoardIndex::new(0), CellCoord::new(x, y)).map(|tile| tile.kind())
    }
}

fn tile(x: i32, y: i32, kind: TileKind) -> TilePlacement {
    TilePlacement::new(CellCoord::new(x, y), kind)
}

fn row() -> Vec<TilePlacement> {
    vec![
        tile(0, 0, TileKind::Normal),
        tile(1, 0, TileKind::Empty),
        tile(2, 0, TileKind::GoalTile),
        tile(1, 1, TileKind::RotateLeft90),
    ]
}

#[test]
fn level_load_tracks_empty_cells() {
    let harness = Harness::single(Config::default(), row());
    assert_eq!(harness.sliding.empty_positions(), vec![CellCoord::new(1, 0)]);
}

#[test]
fn slide_into_empty_cell_swaps_tiles() {
    let mut harness = Harness::single(Config::default(), row());

    assert!(harness.slide(CellCoord::new(0, 0), Direction::East));

    assert_eq!(harness.kind_at(0, 0), Some(TileKind::Empty));
    assert_eq!(harness.kind_at(1, 0), Some(TileKind::Normal));
    assert_eq!(harness.sliding.empty_positions(), vec![CellCoord::new(0, 0)]);
    assert!(harness.log.contains(&Event::TileMoved {
        board: BoardIndex::new(0),
        from: CellCoord::new(0, 0),
        to: CellCoord::new(1, 0),
    }));
    assert_eq!(harness.sliding.undo_count(), 1);
}

#[test]
fn slide_waits_for_animation_before_swapping() {
    let mut harness = Harness::single(Config::default(), row());
    let boards = query::boards_view(&harness.world);
    assert!(harness
        .sliding
        .try_slide_in_direction(boards, CellCoord::new(0, 0), Direction::East));

    harness.pump(vec![Command::Tick {
        dt: Duration::from_millis(60),
    }]);

    assert!(harness.sliding.is_animating());
    let visual = harness.sliding.visual().expect("slide in flight");
    assert!((visual.progress - 0.4).abs() < 1e-3, "progress {}", visual.progress);
    assert_eq!(harness.kind_at(0, 0), Some(TileKind::Normal));

    let boards = query::boards_view(&harness.world);
    assert!(
        !harness
            .sliding
            .try_slide_in_direction(boards, CellCoord::new(1, 1), Direction::South),
        "second slide must wait for the first"
    );
}

#[test]
fn anchored_locked_and_blocked_slides_are_refused() {
    let mut locked = tile(1, 1, TileKind::Normal);
    locked.locked = true;
    let mut harness = Harness::single(
        Config::default(),
        vec![
            tile(0, 0, TileKind::StartingTile),
            tile(1, 0, TileKind::Empty),
            tile(2, 0, TileKind::GoalTile),
            locked,
            tile(1, -1, TileKind::Normal),
            tile(0, -1, TileKind::Normal),
        ],
    );

    assert!(!harness.slide(CellCoord::new(0, 0), Direction::East), "starting tile");
    assert!(!harness.slide(CellCoord::new(2, 0), Direction::West), "goal tile");
    assert!(!harness.slide(CellCoord::new(1, 1), Direction::South), "locked tile");
    assert!(!harness.slide(CellCoord::new(0, -1), Direction::East), "occupied target");
    assert!(!harness.slide(CellCoord::new(5, 5), Direction::East), "vacant cell");

    assert_eq!(harness.sliding.undo_count(), 0);
    assert_eq!(harness.sliding.empty_positions(), vec![CellCoord::new(1, 0)]);
}

#[test]
fn try_slide_probes_neighbours_for_the_gap() {
    let mut harness = Harness::single(Config::default(), row());
    let boards = query::boards_view(&harness.world);

    assert!(harness.sliding.try_slide(boards, CellCoord::new(1, 1)));
    harness.pump(vec![Command::Tick { dt: SLIDE }]);

    assert_eq!(harness.kind_at(1, 0), Some(TileKind::RotateLeft90));
    assert_eq!(harness.sliding.empty_positions(), vec![CellCoord::new(1, 1)]);
}

#[test]
fn undo_history_keeps_only_the_most_recent_slides() {
    let mut harness = Harness::single(Config::new(SLIDE, 3), row());

    for index in 0..5 {
        let (tile, direction) = if index % 2 == 0 {
            (CellCoord::new(0, 0), Direction::East)
        } else {
            (CellCoord::new(1, 0), Direction::West)
        };
        assert!(harness.slide(tile, direction), "slide {index} should succeed");
    }

    assert_eq!(harness.sliding.undo_count(), 3);
    assert_eq!(
        harness.sliding.undo_history().last(),
        Some(&UndoRecord {
            origin: CellCoord::new(0, 0),
            destination: CellCoord::new(1, 0),
        })
    );

    let moved_before_undo = count_moves(&harness.log);
    let boards = query::boards_view(&harness.world);
    assert!(harness.sliding.undo(boards));
    harness.pump(vec![Command::Tick { dt: SLIDE }]);

    assert_eq!(harness.sliding.undo_count(), 2);
    assert_eq!(harness.kind_at(0, 0), Some(TileKind::Normal));
    assert_eq!(harness.kind_at(1, 0), Some(TileKind::Empty));
    assert_eq!(count_moves(&harness.log), moved_before_undo, "undo is silent");
    assert!(harness.log.contains(&Event::TileMoveUndone {
        board: BoardIndex::new(0),
        from: CellCoord::new(1, 0),
        to: CellCoord::new(0, 0),
    }));
}

#[test]
fn undo_with_empty_history_does_nothing() {
    let mut harness = Harness::single(Config::default(), row());
    let boards = query::boards_view(&harness.world);
    assert!(!harness.sliding.undo(boards));
    assert!(!harness.sliding.is_animating());
}

#[test]
fn board_change_rescans_and_clears_history() {
    let mut harness = Harness::new(
        Config::default(),
        vec![
            vec![tile(0, 0, TileKind::Normal), tile(1, 0, TileKind::Empty)],
            vec![tile(4, 4, TileKind::Empty), tile(5, 5, TileKind::Empty)],
        ],
    );
    assert!(harness.slide(CellCoord::new(0, 0), Direction::East));
    assert_eq!(harness.sliding.undo_count(), 1);

    harness.pump(vec![Command::SetActiveBoard {
        board: BoardIndex::new(1),
        cause: BoardChangeCause::Player,
    }]);

    assert_eq!(harness.sliding.undo_count(), 0);
    assert_eq!(
        harness.sliding.empty_positions(),
        vec![CellCoord::new(4, 4), CellCoord::new(5, 5)]
    );
}

#[test]
fn board_change_discards_slide_in_flight() {
    let mut harness = Harness::new(
        Config::default(),
        vec![
            vec![tile(0, 0, TileKind::Normal), tile(1, 0, TileKind::Empty)],
            vec![tile(0, 0, TileKind::Normal)],
        ],
    );
    let boards = query::boards_view(&harness.world);
    assert!(harness
        .sliding
        .try_slide_in_direction(boards, CellCoord::new(0, 0), Direction::East));

    harness.pump(vec![Command::SetActiveBoard {
        board: BoardIndex::new(1),
        cause: BoardChangeCause::Player,
    }]);
    harness.pump(vec![Command::Tick { dt: SLIDE }]);

    assert!(!harness.sliding.is_animating());
    assert_eq!(harness.kind_at(0, 0), Some(TileKind::Normal));
    assert_eq!(count_moves(&harness.log), 0);
}

fn count_moves(log: &[Event]) -> usize {
    log.iter()
        .filter(|event| matches!(event, Event::TileMoved { .. }))
        .count()
}

#[test]
fn empty_tiles_never_slide() {
    let mut harness = Harness::single(
        Config::default(),
        vec![
            tile(0, 0, TileKind::Empty),
            tile(1, 0, TileKind::Empty),
            tile(2, 0, TileKind::Normal),
        ],
    );

    assert!(!harness.slide(CellCoord::new(0, 0), Direction::East));
    assert_eq!(harness.sliding.undo_count(), 0);
    assert_eq!(
        harness.sliding.empty_positions(),
        vec![CellCoord::new(0, 0), CellCoord::new(1, 0)]
    );

    assert!(harness.slide(CellCoord::new(2, 0), Direction::West));
    assert!(harness.slide(CellCoord::new(1, 0), Direction::West));
    assert_eq!(harness.kind_at(0, 0), Some(TileKind::Normal));
    assert_eq!(
        harness.sliding.empty_positions(),
        vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]
    );
}

#[test]
fn clearing_history_leaves_the_board_untouched() {
    let mut harness = Harness::single(Config::default(), row());
    assert!(harness.slide(CellCoord::new(0, 0), Direction::East));

    harness.sliding.clear_undo_history();

    assert_eq!(harness.sliding.undo_count(), 0);
    assert!(!harness.sliding.undo(query::boards_view(&harness.world)));
    assert_eq!(harness.kind_at(1, 0), Some(TileKind::Normal));
    assert_eq!(harness.sliding.empty_positions(), vec![CellCoord::new(0, 0)]);
}
