//! The terminal output sink.
//!
//! A [`Surface`] paints a list of lines as a single buffered write and then moves the
//! cursor back up to the first line, so the next paint overwrites the same region
//! instead of scrolling. When the board is cleared the cursor is moved back down past
//! the vacated block so that later output lands below it.

use std::io::{self, Write};

use crossterm::{
    cursor::{MoveDown, MoveUp},
    queue,
};

/// Sink for rendered frames.
pub(crate) struct Surface {
    out: Box<dyn Write + Send>,
}

impl Surface {
    pub(crate) fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub(crate) fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Writes every line newline-terminated, followed by a cursor-up over all of them.
    ///
    /// Nothing is written for an empty frame.
    pub(crate) fn paint(&mut self, lines: &[String]) -> io::Result<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut frame = Vec::with_capacity(lines.iter().map(|l| l.len() + 1).sum::<usize>() + 8);
        for line in lines {
            frame.extend_from_slice(line.as_bytes());
            frame.push(b'\n');
        }
        queue!(frame, MoveUp(rows(lines.len())))?;

        self.out.write_all(&frame)?;
        self.out.flush()
    }

    /// Moves the cursor down past `n` previously painted lines.
    pub(crate) fn release(&mut self, n: usize) -> io::Result<()> {
        if n == 0 {
            return Ok(());
        }

        let mut seq = Vec::with_capacity(8);
        queue!(seq, MoveDown(rows(n)))?;

        self.out.write_all(&seq)?;
        self.out.flush()
    }
}

// Terminals cannot address more rows than fit in a u16 anyway.
fn rows(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
