//! Lane state and the line renderer.
//!
//! A [`Lane`] is one row of a [`Board`](crate::Board). It keeps its status text, the
//! bounded total (or `0` for an indeterminate lane), the last reported count, and a
//! cached rendered line. The cached line is recomputed on every mutation so that a
//! repaint only has to copy strings out of the registry.
//!
//! # Rendering
//!
//! [`render_line`] is the pure formatting function used by the registry:
//!
//! ```
//! use lane_board::lane::render_line;
//!
//! assert_eq!(render_line("copy", 4, 2, 10), "[=====-----]  50.0% - copy");
//! assert_eq!(render_line("Downloading", 0, 7, 10), "Downloading");
//! ```

use std::{fmt, time::Duration};

use compact_str::CompactString;
use web_time::Instant;

/// Default bar width, used whenever a requested width is missing or out of range.
pub const DEFAULT_BAR_LEN: usize = 30;

/// Smallest accepted bar width.
pub const MIN_BAR_LEN: usize = 10;

/// Largest accepted bar width.
pub const MAX_BAR_LEN: usize = 79;

/// Identifier of a lane within one board.
///
/// Ids are handed out by a per-board monotonically increasing counter, so they are
/// unique for the lifetime of the board and sort in insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneId(pub(crate) u64);

impl LaneId {
    /// Returns the raw numeric value of the id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane#{}", self.0)
    }
}

/// A validated progress bar width in glyphs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BarLen(usize);

impl BarLen {
    /// Accepts widths in `[MIN_BAR_LEN, MAX_BAR_LEN]`; anything else becomes
    /// [`DEFAULT_BAR_LEN`].
    #[must_use]
    pub fn new(len: Option<usize>) -> Self {
        match len {
            Some(len) if (MIN_BAR_LEN..=MAX_BAR_LEN).contains(&len) => Self(len),
            _ => Self(DEFAULT_BAR_LEN),
        }
    }

    /// Returns the width in glyphs.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for BarLen {
    fn default() -> Self {
        Self(DEFAULT_BAR_LEN)
    }
}

/// Formats one display line.
///
/// * `total == 0`: the status is returned verbatim.
/// * otherwise: `[===---]  xx.x% - status`, with the filled part rounded half-to-even
///   and clamped to `bar_len` so an overshooting `count` still draws a full bar.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn render_line(status: &str, total: u64, count: u64, bar_len: usize) -> String {
    if total == 0 {
        return status.to_owned();
    }

    let filled = ((bar_len as f64 * count as f64 / total as f64).round_ties_even() as usize)
        .min(bar_len);
    let percent = 100.0 * count as f64 / total as f64;

    format!(
        "[{}{}] {percent:>5.1}% - {status}",
        "=".repeat(filled),
        "-".repeat(bar_len - filled)
    )
}

/// Registry entry for one lane.
#[derive(Debug)]
pub(crate) struct Lane {
    pub(crate) status: CompactString,
    pub(crate) total: u64,
    pub(crate) count: u64,
    pub(crate) line: String,
    pub(crate) added: Instant,
}

impl Lane {
    pub(crate) fn new(status: CompactString, total: u64) -> Self {
        // Bounded lanes stay blank until their first numeric update.
        let line = if total == 0 {
            status.to_string()
        } else {
            String::new()
        };

        Self {
            status,
            total,
            count: 0,
            line,
            added: Instant::now(),
        }
    }

    pub(crate) fn set_status(&mut self, status: CompactString, total: u64) {
        self.status = status;
        self.total = total;
        // Placeholder for bounded lanes until the next count arrives.
        self.line = self.status.to_string();
    }

    /// Returns `false` when the lane is indeterminate and the count was ignored.
    pub(crate) fn set_count(&mut self, count: u64, bar_len: usize) -> bool {
        if self.total == 0 {
            return false;
        }
        self.count = count;
        self.line = render_line(&self.status, self.total, count, bar_len);
        true
    }

    pub(crate) fn snapshot(&self, id: LaneId) -> LaneSnapshot {
        LaneSnapshot {
            id,
            status: self.status.clone(),
            total: self.total,
            count: self.count,
            line: self.line.clone(),
            elapsed: self.added.elapsed(),
        }
    }
}

/// A plain-data copy of one lane, taken under the registry lock.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LaneSnapshot {
    id: LaneId,
    status: CompactString,
    total: u64,
    count: u64,
    line: String,
    elapsed: Duration,
}

impl LaneSnapshot {
    /// Returns the lane id.
    #[must_use]
    pub const fn id(&self) -> LaneId {
        self.id
    }

    /// Returns the status text.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Returns the total, `0` for indeterminate lanes.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the last stored count.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Returns the cached display line, without a trailing newline.
    #[must_use]
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Time since the lane was added.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns `true` if the lane has no bounded total.
    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        self.total == 0
    }
}
