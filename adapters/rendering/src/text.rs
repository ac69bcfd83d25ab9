//! Plain-text backend that writes frames to any [`Write`] sink.

use std::io::Write;

use anyhow::{Context, Result as AnyResult};

use crate::{Presentation, RenderingBackend};

/// Backend that prints every presented frame as text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
    show_board: bool,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing to `writer`; the board is drawn only when `show_board` is set.
    #[must_use]
    pub fn new(writer: W, show_board: bool) -> Self {
        Self { writer, show_board }
    }

    /// Mutable access to the underlying writer for lines printed between frames.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the backend, yielding the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let scene = &presentation.scene;
        writeln!(self.writer, "== {} ==", presentation.title)
            .context("failed to write frame title")?;
        writeln!(
            self.writer,
            "profit {} [{}/{}]",
            scene.profit, scene.profit_bar.fill, scene.profit_bar.height
        )
        .context("failed to write profit line")?;
        if let Some(leader) = scene.leader() {
            writeln!(
                self.writer,
                "leader robot {} ({}) at {} with {}",
                leader.id.get(),
                leader.kind.label(),
                leader.position,
                leader.earnings
            )
            .context("failed to write leader line")?;
        }

        if self.show_board {
            for line in scene.board_lines() {
                writeln!(self.writer, "{line}").context("failed to write board row")?;
            }
        }

        self.writer.flush().context("failed to flush frame")
    }
}
