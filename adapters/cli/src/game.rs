//! Wires the world and the systems into a headless game loop.

use std::time::Duration;

use anyhow::Result;
use tilewalk_core::{BoardCell, Command, Event, LevelDefinition};
use tilewalk_rendering::{BoardLayout, CharacterPose, Presenter, Scene, TextFrame};
use tilewalk_system_bootstrap::{Bootstrap, LevelProgression};
use tilewalk_system_movement::Movement;
use tilewalk_system_session::{Directive, GamePhase, Session};
use tilewalk_system_sliding::Sliding;
use tilewalk_world::{self as world, query, World};
use tracing::{debug, info, warn};

use crate::level_file::SlideStep;

/// How a single level attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunReport {
    pub(crate) level: String,
    pub(crate) phase: GamePhase,
    pub(crate) ticks: u64,
    pub(crate) location: Option<BoardCell>,
}

impl RunReport {
    pub(crate) fn won(&self) -> bool {
        self.phase == GamePhase::Win
    }

    pub(crate) fn summary(&self) -> String {
        let outcome = match self.phase {
            GamePhase::Win => "win",
            GamePhase::Fail => "fail",
            _ => "unfinished",
        };
        let location = self
            .location
            .map_or_else(|| "nowhere".to_owned(), |at| at.to_string());
        format!(
            "level {}: {outcome} after {} ticks at {location}",
            self.level, self.ticks
        )
    }
}

/// World, systems and presenter for one play-through of a level list.
pub(crate) struct Game<P> {
    world: World,
    movement: Movement,
    sliding: Sliding,
    session: Session,
    progression: LevelProgression,
    bootstrap: Bootstrap,
    layout: BoardLayout,
    presenter: P,
    tick: Duration,
}

impl<P: Presenter> Game<P> {
    pub(crate) fn new(
        levels: Vec<LevelDefinition>,
        movement: tilewalk_system_movement::Config,
        sliding: tilewalk_system_sliding::Config,
        tick: Duration,
        presenter: P,
    ) -> Self {
        // Setup directives repeat once the first level loads.
        let mut ignored = Vec::new();
        let session = Session::new(&mut ignored);
        Self {
            world: World::new(),
            movement: Movement::new(movement),
            sliding: Sliding::new(sliding),
            session,
            progression: LevelProgression::new(levels),
            bootstrap: Bootstrap,
            layout: BoardLayout::default(),
            presenter,
            tick,
        }
    }

    /// Loads the next level in the list.
    pub(crate) fn load_next(&mut self) -> Result<()> {
        let mut commands = Vec::new();
        self.progression.load_next(&mut commands)?;
        let _ = self.pump(commands);
        Ok(())
    }

    /// Slides a tile and waits for the slide to finish.
    pub(crate) fn slide(&mut self, step: SlideStep) -> bool {
        if !self.session.input_enabled() {
            warn!(cell = %step.cell, "tile input is disabled");
            return false;
        }
        let accepted = self.sliding.try_slide_in_direction(
            query::boards_view(&self.world),
            step.cell,
            step.direction,
        );
        if !accepted {
            warn!(cell = %step.cell, direction = ?step.direction, "slide refused");
            return false;
        }
        self.settle_slide();
        true
    }

    /// Reverts the latest slide.
    pub(crate) fn undo(&mut self) -> bool {
        if !self.session.input_enabled() {
            return false;
        }
        let undone = self.sliding.undo(query::boards_view(&self.world));
        if undone {
            self.settle_slide();
        }
        undone
    }

    /// Starts the run and ticks until it ends or the budget runs out.
    pub(crate) fn play(&mut self, max_ticks: u64, frames: bool) -> Result<RunReport> {
        let mut directives = Vec::new();
        if !self.session.play(&mut directives) {
            warn!(phase = ?self.session.phase(), "play requested outside setup");
        }
        let mut commands = Vec::new();
        self.dispatch(directives, &mut commands);
        let _ = self.pump(commands);

        let mut ticks = 0;
        while ticks < max_ticks && !self.finished() {
            let events = self.pump(vec![Command::Tick { dt: self.tick }]);
            ticks += 1;
            let stepped = events
                .iter()
                .any(|event| matches!(event, Event::CharacterMoved { .. }));
            if frames && stepped {
                self.present(format!("tick {ticks}"))?;
            }
        }

        let report = RunReport {
            level: query::level_id(&self.world).unwrap_or("unnamed").to_owned(),
            phase: self.session.phase(),
            ticks,
            location: query::character_location(&self.world),
        };
        info!(level = %report.level, phase = ?report.phase, ticks, "run finished");
        self.present(report.summary())?;
        Ok(report)
    }

    fn finished(&self) -> bool {
        matches!(self.session.phase(), GamePhase::Win | GamePhase::Fail)
    }

    fn settle_slide(&mut self) {
        while self.sliding.is_animating() {
            if let Some(slide) = self.sliding.visual() {
                let position = self.layout.sample_slide(slide.from, slide.to, slide.progress);
                debug!(progress = slide.progress, ?position, "tile sliding");
            }
            let _ = self.pump(vec![Command::Tick { dt: self.tick }]);
        }
    }

    fn present(&mut self, status: String) -> Result<()> {
        let boards = query::boards_view(&self.world);
        let (Some(board), Some(grid)) = (boards.active(), boards.active_grid()) else {
            return Ok(());
        };
        let character = query::character_location(&self.world).filter(|at| at.board == board);
        let pose = match self.movement.visual() {
            Some(hop) => Some(self.layout.sample_character(
                hop.visual,
                hop.from.cell,
                hop.to.cell,
                hop.progress,
            )),
            None => character.map(|at| {
                CharacterPose::new(self.layout.character_position(at.cell), 1.0)
            }),
        };
        let frame = TextFrame::render(board, grid, character.map(|at| at.cell));
        self.presenter.present(&Scene::new(status, frame, pose))
    }

    fn pump(&mut self, mut commands: Vec<Command>) -> Vec<Event> {
        let mut log = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.movement
                .handle(&events, query::boards_view(&self.world), &mut commands);
            self.sliding
                .handle(&events, query::boards_view(&self.world), &mut commands);
            let mut directives = Vec::new();
            self.session.handle(&events, &mut directives);
            self.dispatch(directives, &mut commands);
            log.extend(events);
        }
        log
    }

    fn dispatch(&mut self, directives: Vec<Directive>, commands: &mut Vec<Command>) {
        for directive in directives {
            match directive {
                Directive::SpawnCharacter => {
                    let start = self.bootstrap.spawn_point(&self.world);
                    self.movement
                        .spawn_character(start, query::boards_view(&self.world), commands);
                }
                Directive::StartMoving => self.movement.start_moving(),
                Directive::StopMoving => self.movement.stop_moving(),
                Directive::SetInputEnabled(enabled) => debug!(enabled, "tile input toggled"),
            }
        }
    }
}
