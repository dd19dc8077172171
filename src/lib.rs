//! # `lane_board`
//!
//! A thread-safe board of progress lanes that repaints in place on the terminal.
//!
//! Worker threads report progress to their own lane; a background thread periodically
//! paints every lane as one block and moves the cursor back to the top of it, so the
//! block is redrawn in place instead of scrolling.
//!
//! * **Instance-scoped**: every [`Board`] owns its registry, id counter and output sink.
//! * **Concurrent**: boards are cheap to clone ([`Arc`](std::sync::Arc)-based) and all
//!   lane mutations are serialized by one short critical section that never does I/O.
//! * **Tolerant**: updates through stale or unknown lane ids are silently ignored.
//!
//! ## Example
//!
//! ```no_run
//! use std::thread;
//!
//! use lane_board::Board;
//!
//! let board = Board::new(Some(40));
//! let lane = board.add("Task 1", 100);
//! board.start_auto_refresh()?;
//!
//! let worker = thread::spawn(move || {
//!     for i in 1..=100 {
//!         lane.set_progress(i);
//!     }
//! });
//! worker.join().unwrap();
//!
//! board.clear_all()?;
//! board.stop_auto_refresh();
//! # Ok::<(), lane_board::Error>(())
//! ```
//!
//! ## Modules
//!
//! * [`board`]: The lane registry, snapshots and painting.
//! * [`builder`]: Fluent construction of a [`Board`].
//! * [`handle`]: [`LaneHandle`], a lane id bound to its board.
//! * [`iter`]: Extension traits for tracking iterators on a lane.
//! * [`lane`]: Lane ids, bar widths, snapshots and the line renderer.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod board;
pub mod builder;
mod error;
pub mod handle;
pub mod iter;
pub mod lane;
mod refresh;
mod surface;

pub use board::Board;
pub use builder::BoardBuilder;
pub use error::{Error, Result};
pub use handle::LaneHandle;
pub use iter::{LaneIter, LaneIteratorExt};
pub use lane::{LaneId, LaneSnapshot};
