//! Command-line arguments for the tilewalk binary.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::level_file::SlideStep;

/// Plays tile puzzle levels headlessly and reports how each run ends.
#[derive(Parser, Debug)]
#[command(name = "tilewalk")]
#[command(about = "Plays tile puzzle levels headlessly", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// Level files, played in order
    #[arg(required = true, value_name = "LEVEL")]
    pub(crate) levels: Vec<PathBuf>,

    /// Simulated milliseconds advanced per tick
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) tick_ms: u64,

    /// Ticks a level may run before it is abandoned
    #[arg(long, default_value_t = 10_000)]
    pub(crate) max_ticks: u64,

    /// Milliseconds a single step takes
    #[arg(long, default_value_t = 300)]
    pub(crate) step_ms: u64,

    /// Milliseconds the character rests between steps
    #[arg(long, default_value_t = 50)]
    pub(crate) step_pause_ms: u64,

    /// Milliseconds a tile slide takes
    #[arg(long, default_value_t = 150)]
    pub(crate) slide_ms: u64,

    /// Slides remembered for undo
    #[arg(long, default_value_t = 20)]
    pub(crate) undo_limit: usize,

    /// Slide applied before play, as `x,y:direction`. Replaces level solutions
    #[arg(long = "slide", value_name = "X,Y:DIR")]
    pub(crate) slides: Vec<SlideStep>,

    /// Slides undone after the script and before play
    #[arg(long, default_value_t = 0)]
    pub(crate) undo: usize,

    /// Print a frame after every committed step
    #[arg(long)]
    pub(crate) frames: bool,
}

impl Cli {
    pub(crate) fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub(crate) fn movement_config(&self) -> tilewalk_system_movement::Config {
        tilewalk_system_movement::Config::new(
            Duration::from_millis(self.step_ms),
            Duration::from_millis(self.step_pause_ms),
        )
    }

    pub(crate) fn sliding_config(&self) -> tilewalk_system_sliding::Config {
        tilewalk_system_sliding::Config::new(Duration::from_millis(self.slide_ms), self.undo_limit)
    }
}
