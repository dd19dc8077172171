//! Iterator adapters that report progress to a board lane.
//!
//! [`LaneIteratorExt::lane_in`] adds a lane to a [`Board`] and advances it by one for
//! every item the iterator yields.
//!
//! # Heuristics
//!
//! The adapter checks [`Iterator::size_hint`]:
//! * An exact size creates a bounded lane with that total.
//! * Unknown bounds create an indeterminate lane that shows only its status.
//!
//! # Example
//!
//! ```
//! use lane_board::{Board, LaneIteratorExt};
//!
//! let board = Board::builder().output(std::io::sink()).build();
//! let sum: u32 = [1, 2, 3].into_iter().lane_in(&board, "summing").sum();
//!
//! assert_eq!(sum, 6);
//! assert!(board.snapshot()[0].contains("100.0%"));
//! ```

use compact_str::CompactString;

use crate::{Board, LaneHandle};

/// An iterator adapter that advances a lane on every item.
pub struct LaneIter<I> {
    iter: I,
    lane: LaneHandle,
}

impl<I> LaneIter<I> {
    /// Wraps `iter`, reporting to `lane`.
    pub const fn new(iter: I, lane: LaneHandle) -> Self {
        Self { iter, lane }
    }

    /// Returns the lane this iterator reports to.
    pub const fn lane(&self) -> &LaneHandle {
        &self.lane
    }
}

impl<I: Iterator> Iterator for LaneIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.iter.next();
        if item.is_some() {
            self.lane.inc(1);
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Extension trait to attach a board lane to any iterator.
pub trait LaneIteratorExt: Iterator + Sized {
    /// Adds a lane named `status` to `board` and wraps the iterator.
    fn lane_in(self, board: &Board, status: impl Into<CompactString>) -> LaneIter<Self> {
        let lane = board.add(status, exact_len(&self));
        LaneIter::new(self, lane)
    }

    /// Wraps the iterator using an existing lane.
    fn lane_with(self, lane: LaneHandle) -> LaneIter<Self> {
        LaneIter::new(self, lane)
    }
}

impl<I: Iterator> LaneIteratorExt for I {}

/// Total for a lane tracking `iter`, or `0` when its length is not known exactly.
fn exact_len<I: Iterator>(iter: &I) -> u64 {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => lower as u64,
        _ => 0,
    }
}
