#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tilewalk levels headlessly.

mod cli;
mod game;
mod level_file;

use std::{io, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use tilewalk_rendering::TextPresenter;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{cli::Cli, game::Game, level_file::LevelFile};

/// Entry point for the Tilewalk command-line interface.
fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let files = cli
        .levels
        .iter()
        .map(|path| LevelFile::load(path))
        .collect::<Result<Vec<_>>>()?;
    let (levels, solutions): (Vec<_>, Vec<_>) = files
        .into_iter()
        .map(|file| (file.level, file.solution))
        .unzip();
    info!(count = levels.len(), "levels loaded");

    let movement = cli.movement_config();
    info!(
        step = ?movement.step_duration(),
        pause = ?movement.step_pause(),
        "movement cadence"
    );
    let mut game = Game::new(
        levels,
        movement,
        cli.sliding_config(),
        cli.tick(),
        TextPresenter::new(io::stdout().lock()),
    );

    let mut all_won = true;
    for solution in &solutions {
        game.load_next()?;
        let script = if cli.slides.is_empty() {
            solution
        } else {
            &cli.slides
        };
        for step in script {
            let _ = game.slide(*step);
        }
        for _ in 0..cli.undo {
            if !game.undo() {
                warn!("nothing left to undo");
                break;
            }
        }
        let report = game.play(cli.max_ticks, cli.frames)?;
        all_won &= report.won();
    }

    Ok(if all_won {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}
