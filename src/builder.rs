//! Fluent interface for constructing [`Board`] instances.
//!
//! [`Board::new`] covers the common case of a board painting to standard output with a
//! one second refresh. The [`BoardBuilder`] adds control over:
//!
//! * **Bar width:** clamped the same way as [`Board::new`].
//! * **Refresh interval:** how long the background thread sleeps between paints.
//! * **Output sink:** any `Write + Send` destination, which is how tests capture frames.

use std::{io::Write, time::Duration};

use crate::{
    Board,
    board::DEFAULT_REFRESH_INTERVAL,
    lane::BarLen,
};

/// A builder for [`Board`] instances.
pub struct BoardBuilder {
    bar_len: Option<usize>,
    interval: Duration,
    output: Option<Box<dyn Write + Send>>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self {
            bar_len: None,
            interval: DEFAULT_REFRESH_INTERVAL,
            output: None,
        }
    }
}

impl BoardBuilder {
    /// Starts a builder with the default width, interval and standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bar width. Values outside `[10, 79]` fall back to 30.
    #[must_use]
    pub const fn bar_len(mut self, bar_len: usize) -> Self {
        self.bar_len = Some(bar_len);
        self
    }

    /// Sets the delay between two automatic repaints.
    #[must_use]
    pub const fn refresh_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Paints to `output` instead of standard output.
    #[must_use]
    pub fn output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Consumes the builder and returns the board.
    #[must_use]
    pub fn build(self) -> Board {
        let bar_len = BarLen::new(self.bar_len);
        let output = self
            .output
            .unwrap_or_else(|| Box::new(std::io::stdout()));
        Board::with_output(bar_len, self.interval, output)
    }
}
