//! A lane id bundled with the board it belongs to.

use std::fmt;

use compact_str::CompactString;

use crate::{Board, LaneId};

/// A cheap, clonable handle to one lane of a [`Board`].
///
/// Handing a `LaneHandle` to a worker saves it from carrying the board and the id
/// separately. Like raw ids, a handle whose lane was cleared keeps working as a no-op.
#[derive(Clone)]
pub struct LaneHandle {
    board: Board,
    id: LaneId,
}

impl fmt::Debug for LaneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneHandle").field("id", &self.id).finish()
    }
}

impl LaneHandle {
    pub(crate) const fn new(board: Board, id: LaneId) -> Self {
        Self { board, id }
    }

    /// Returns the lane id.
    #[must_use]
    pub const fn id(&self) -> LaneId {
        self.id
    }

    /// Returns the board the lane lives on.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// See [`Board::update_status`].
    pub fn set_status(&self, status: impl Into<CompactString>, total: u64) {
        self.board.update_status(self.id, status, total);
    }

    /// See [`Board::update_progress`].
    pub fn set_progress(&self, count: u64) {
        self.board.update_progress(self.id, count);
    }

    /// See [`Board::advance`].
    pub fn inc(&self, delta: u64) {
        self.board.advance(self.id, delta);
    }

    /// Returns `false` once the lane has been cleared.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.board.contains(self.id)
    }
}
