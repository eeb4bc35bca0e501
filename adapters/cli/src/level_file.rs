//! TOML level files.

use std::{fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;
use tilewalk_core::{CellCoord, Direction, LevelDefinition};

/// Level plus the slides that solve it.
#[derive(Debug, Deserialize)]
pub(crate) struct LevelFile {
    #[serde(flatten)]
    pub(crate) level: LevelDefinition,
    #[serde(default)]
    pub(crate) solution: Vec<SlideStep>,
}

impl LevelFile {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid level file {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content).context("failed to parse level TOML")?;
        file.level.validate()?;
        Ok(file)
    }
}

/// One scripted slide: the tile at `cell` moves one cell toward `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct SlideStep {
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SlideStepError {
    #[error("expected `x,y:direction`, got `{0}`")]
    Shape(String),
    #[error("`{0}` is not an integer coordinate")]
    Coordinate(String),
    #[error("unknown direction `{0}`")]
    Direction(String),
}

impl FromStr for SlideStep {
    type Err = SlideStepError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (cell, direction) = value
            .split_once(':')
            .ok_or_else(|| SlideStepError::Shape(value.to_owned()))?;
        let (x, y) = cell
            .split_once(',')
            .ok_or_else(|| SlideStepError::Shape(value.to_owned()))?;
        let coordinate = |part: &str| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| SlideStepError::Coordinate(part.trim().to_owned()))
        };
        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Direction::North,
            "s" | "south" => Direction::South,
            "e" | "east" => Direction::East,
            "w" | "west" => Direction::West,
            other => return Err(SlideStepError::Direction(other.to_owned())),
        };
        Ok(Self {
            cell: CellCoord::new(coordinate(x)?, coordinate(y)?),
            direction,
        })
    }
}
