#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tilewalk adapters.
//!
//! Adapters translate simulation state into a [`Scene`]: a text frame of the
//! active board plus the sampled world-space pose of the character. A
//! [`Presenter`] puts scenes in front of the player.

mod pose;
mod text;

use anyhow::{Context, Result as AnyResult};
use std::io::Write;

pub use pose::{BoardLayout, CharacterPose};
pub use text::{glyph, TextFrame};

/// Everything a presenter needs to show one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Status line shown above the board.
    pub status: String,
    /// Text rendering of the active board.
    pub frame: TextFrame,
    /// Sampled character pose, when a character is visible.
    pub character: Option<CharacterPose>,
}

impl Scene {
    /// Creates a new scene.
    #[must_use]
    pub fn new<T>(status: T, frame: TextFrame, character: Option<CharacterPose>) -> Self
    where
        T: Into<String>,
    {
        Self {
            status: status.into(),
            frame,
            character,
        }
    }
}

/// Backend capable of presenting scenes.
pub trait Presenter {
    /// Presents one scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Presenter that writes scenes as plain text.
#[derive(Debug)]
pub struct TextPresenter<W> {
    writer: W,
}

impl<W: Write> TextPresenter<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        writeln!(self.writer, "{}", scene.status).context("failed to write status line")?;
        if let Some(pose) = scene.character {
            writeln!(
                self.writer,
                "character at ({:.2}, {:.2}, {:.2}) scale {:.2}",
                pose.position.x, pose.position.y, pose.position.z, pose.scale
            )
            .context("failed to write character pose")?;
        }
        write!(self.writer, "{}", scene.frame).context("failed to write board frame")?;
        self.writer.flush().context("failed to flush presenter output")
    }
}
