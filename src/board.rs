//! The lane registry and its display.
//!
//! A [`Board`] owns an ordered registry of lanes, the sink they are painted to, and an
//! optional background refresh thread. Worker threads mutate lanes by id; the refresh
//! thread (or an explicit [`Board::flush`]) takes a snapshot and paints it in place.
//!
//! # Synchronization Strategy
//!
//! * **Registry:** one [`Mutex`](parking_lot::Mutex) guards the whole lane map. Every
//!   mutation and every snapshot happens under it, so no reader ever sees a lane whose
//!   status changed but whose cached line did not. The lock is held only for string
//!   formatting and copying, never for I/O.
//! * **Surface:** a second mutex serializes terminal writes. It is always acquired
//!   *before* the registry lock, which keeps a refresh tick from painting a snapshot
//!   that was taken before a concurrent [`Board::clear_all`].
//! * **Clear:** lanes are taken out of the registry *before* the final frame is painted,
//!   so a lane added while the clear is in progress is either painted and counted or
//!   left for the next frame, never dropped unseen.
//! * **Ids:** handed out by an atomic counter, so they never collide.

use std::{
    collections::BTreeMap,
    fmt,
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use compact_str::CompactString;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    BoardBuilder, LaneHandle, Result,
    lane::{BarLen, Lane, LaneId, LaneSnapshot},
    refresh::Refresher,
    surface::Surface,
};

/// Default interval between two automatic repaints.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// State shared by every clone of a [`Board`] and by its refresh thread.
pub(crate) struct Shared {
    pub(crate) bar_len: BarLen,
    pub(crate) interval: Duration,
    next_id: AtomicU64,
    lanes: Mutex<BTreeMap<LaneId, Lane>>,
    surface: Mutex<Surface>,
    pub(crate) refresher: Refresher,
}

/// A thread-safe, cheaply clonable multi-lane progress board.
///
/// Each board is independent: it has its own registry, id counter and output sink, so
/// several boards can coexist in one process.
///
/// # Examples
///
/// ```
/// use lane_board::Board;
///
/// let board = Board::builder().bar_len(10).output(std::io::sink()).build();
///
/// let copy = board.add_lane("copy", 4);
/// board.update_progress(copy, 2);
///
/// assert_eq!(board.snapshot(), vec!["[=====-----]  50.0% - copy".to_owned()]);
/// ```
#[derive(Clone)]
pub struct Board {
    pub(crate) shared: Arc<Shared>,
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("bar_len", &self.bar_len())
            .field("lanes", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Board {
    /// Creates a board painting to standard output.
    ///
    /// `bar_len` outside `[10, 79]`, or `None`, falls back to a width of 30.
    #[must_use]
    pub fn new(bar_len: Option<usize>) -> Self {
        Self::from_parts(
            BarLen::new(bar_len),
            DEFAULT_REFRESH_INTERVAL,
            Surface::stdout(),
        )
    }

    /// Starts a [`BoardBuilder`] for a custom width, interval or sink.
    #[must_use]
    pub fn builder() -> BoardBuilder {
        BoardBuilder::new()
    }

    pub(crate) fn from_parts(bar_len: BarLen, interval: Duration, surface: Surface) -> Self {
        Self {
            shared: Arc::new(Shared {
                bar_len,
                interval,
                next_id: AtomicU64::new(1),
                lanes: Mutex::new(BTreeMap::new()),
                surface: Mutex::new(surface),
                refresher: Refresher::default(),
            }),
        }
    }

    pub(crate) fn with_output(
        bar_len: BarLen,
        interval: Duration,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self::from_parts(bar_len, interval, Surface::new(out))
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Adds a lane and returns its id.
    ///
    /// A `total` of `0` creates an indeterminate lane that only shows `status`.
    pub fn add_lane(&self, status: impl Into<CompactString>, total: u64) -> LaneId {
        let id = LaneId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let lane = Lane::new(status.into(), total);

        let previous = self.shared.lanes.lock().insert(id, lane);
        debug_assert!(previous.is_none(), "lane id {id} allocated twice");

        debug!(%id, total, "lane added");
        id
    }

    /// Adds a lane and returns a handle bound to it.
    pub fn add(&self, status: impl Into<CompactString>, total: u64) -> LaneHandle {
        let id = self.add_lane(status, total);
        LaneHandle::new(self.clone(), id)
    }

    /// Replaces the status and total of a lane.
    ///
    /// With `total > 0` the status is shown as a placeholder until the next count
    /// arrives; with `total == 0` the lane becomes indeterminate. Unknown ids are
    /// ignored, since a worker may still hold an id from before a [`clear_all`](Self::clear_all).
    pub fn update_status(&self, id: LaneId, status: impl Into<CompactString>, total: u64) {
        let status = status.into();
        match self.shared.lanes.lock().get_mut(&id) {
            Some(lane) => lane.set_status(status, total),
            None => trace!(%id, "status update for unknown lane ignored"),
        }
    }

    /// Stores a new count for a bounded lane and re-renders its line.
    ///
    /// Ignored for unknown ids and indeterminate lanes.
    pub fn update_progress(&self, id: LaneId, count: u64) {
        let bar_len = self.shared.bar_len.get();
        match self.shared.lanes.lock().get_mut(&id) {
            Some(lane) => {
                if !lane.set_count(count, bar_len) {
                    trace!(%id, "progress update for indeterminate lane ignored");
                }
            }
            None => trace!(%id, "progress update for unknown lane ignored"),
        }
    }

    /// Adds `delta` to a bounded lane's count in one critical section.
    ///
    /// Same no-op rules as [`update_progress`](Self::update_progress).
    pub fn advance(&self, id: LaneId, delta: u64) {
        let bar_len = self.shared.bar_len.get();
        if let Some(lane) = self.shared.lanes.lock().get_mut(&id) {
            let count = lane.count.saturating_add(delta);
            lane.set_count(count, bar_len);
        }
    }

    /// Returns every lane's rendered line, in insertion order.
    ///
    /// The copy is taken under the registry lock, so it reflects one consistent
    /// point in time.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.shared
            .lanes
            .lock()
            .values()
            .map(|lane| lane.line.clone())
            .collect()
    }

    /// Returns a structured copy of every lane, in insertion order.
    #[must_use]
    pub fn lanes(&self) -> Vec<LaneSnapshot> {
        self.shared
            .lanes
            .lock()
            .iter()
            .map(|(id, lane)| lane.snapshot(*id))
            .collect()
    }

    /// Returns `true` if `id` refers to a live lane.
    #[must_use]
    pub fn contains(&self, id: LaneId) -> bool {
        self.shared.lanes.lock().contains_key(&id)
    }

    /// Returns the number of live lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.lanes.lock().len()
    }

    /// Returns `true` if the board has no lanes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shared.lanes.lock().is_empty()
    }

    /// Returns the bar width in glyphs.
    #[must_use]
    pub fn bar_len(&self) -> usize {
        self.shared.bar_len.get()
    }

    /// Returns the automatic refresh interval.
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.shared.interval
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Paints the current snapshot and moves the cursor back to its first line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink rejects the write.
    pub fn flush(&self) -> Result<()> {
        let mut surface = self.shared.surface.lock();
        let lines = self.snapshot();
        surface.paint(&lines)?;
        Ok(())
    }

    /// Paints one final frame, moves the cursor below it, and removes every lane.
    ///
    /// The lanes are removed first and the removed set is what gets painted, so the
    /// cursor-down always matches the painted line count.
    ///
    /// Returns the number of lanes that were cleared. Lane ids issued before the
    /// clear stay dead; updates through them are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the sink rejects the write. The
    /// registry is emptied either way.
    pub fn clear_all(&self) -> Result<usize> {
        let mut surface = self.shared.surface.lock();
        let lines: Vec<String> = std::mem::take(&mut *self.shared.lanes.lock())
            .into_values()
            .map(|lane| lane.line)
            .collect();

        let n = lines.len();
        debug!(lanes = n, "clearing board");

        surface.paint(&lines)?;
        surface.release(n)?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, thread, time::Duration};

    use crate::{
        Board, BoardBuilder,
        lane::{BarLen, LaneId, render_line},
        surface::tests::Capture,
    };

    fn board(bar_len: usize) -> (Board, Capture) {
        let capture = Capture::default();
        let board = BoardBuilder::new()
            .bar_len(bar_len)
            .output(capture.clone())
            .build();
        (board, capture)
    }

    /// Construction
    /// Widths outside [10, 79] silently fall back to 30.
    #[test]
    fn test_new_bar_len() {
        assert_eq!(Board::new(Some(10)).bar_len(), 10);
        assert_eq!(Board::new(Some(79)).bar_len(), 79);
        assert_eq!(Board::new(Some(80)).bar_len(), 30);
        assert_eq!(Board::new(Some(3)).bar_len(), 30);
        assert_eq!(Board::new(None).bar_len(), 30);
        assert_eq!(Board::default().bar_len(), BarLen::default().get());
    }

    /// Id Uniqueness Under Contention
    /// 10,000 concurrent adds produce 10,000 distinct ids and lanes.
    #[test]
    fn test_concurrent_add_lane_unique() {
        let (board, _capture) = board(30);
        let mut handles = vec![];

        for t in 0..8 {
            let board = board.clone();
            handles.push(thread::spawn(move || {
                (0..1250)
                    .map(|i| board.add_lane(format!("t{t}-{i}"), 10))
                    .collect::<Vec<LaneId>>()
            }));
        }

        let ids: Vec<LaneId> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<LaneId> = ids.iter().copied().collect();

        assert_eq!(ids.len(), 10_000);
        assert_eq!(unique.len(), ids.len(), "lane ids must never collide");
        assert_eq!(board.len(), 10_000);
    }

    /// Indeterminate Lanes
    /// Progress updates leave the status line untouched.
    #[test]
    fn test_progress_on_indeterminate_is_noop() {
        let (board, _capture) = board(10);
        let id = board.add_lane("Downloading", 0);

        board.update_progress(id, 3);
        board.advance(id, 3);

        assert_eq!(board.snapshot(), vec!["Downloading".to_owned()]);
        assert_eq!(board.lanes()[0].count(), 0);
    }

    /// Bar Extremes
    /// count == total fills the bar, count == 0 empties it.
    #[test]
    fn test_full_and_empty_bars() {
        let (board, _capture) = board(20);
        let id = board.add_lane("job", 9);

        board.update_progress(id, 9);
        let full = &board.snapshot()[0];
        assert!(full.starts_with(&format!("[{}]", "=".repeat(20))));
        assert!(full.contains("100.0%"));

        board.update_progress(id, 0);
        let empty = &board.snapshot()[0];
        assert!(empty.starts_with(&format!("[{}]", "-".repeat(20))));
        assert!(empty.contains("0.0%"));
    }

    /// Unknown Ids
    /// Updates through an id that is not registered change nothing.
    #[test]
    fn test_update_unknown_id() {
        let (board, _capture) = board(10);
        let id = board.add_lane("a", 4);
        board.update_progress(id, 1);

        let before = board.snapshot();
        let ghost = LaneId(9_999);
        board.update_status(ghost, "ghost", 3);
        board.update_progress(ghost, 2);
        board.advance(ghost, 1);

        assert_eq!(board.snapshot(), before);
        assert!(!board.contains(ghost));
    }

    /// Status Transitions
    /// Indeterminate lanes can become bounded and back.
    #[test]
    fn test_status_transitions() {
        let (board, _capture) = board(10);
        let id = board.add_lane("Downloading 1", 0);

        board.update_status(id, "Processing", 4);
        assert_eq!(board.snapshot(), vec!["Processing".to_owned()]);

        board.update_progress(id, 1);
        board.advance(id, 1);
        assert_eq!(
            board.snapshot(),
            vec!["[=====-----]  50.0% - Processing".to_owned()]
        );

        board.update_status(id, "Waiting", 0);
        board.update_progress(id, 4);
        assert_eq!(board.snapshot(), vec!["Waiting".to_owned()]);
    }

    /// End-to-End Rendering
    /// The canonical 10-wide scenario, plus an indeterminate neighbour.
    #[test]
    fn test_end_to_end_lines() {
        let (board, _capture) = board(10);
        let a = board.add_lane("A", 4);
        let b = board.add_lane("Downloading", 0);

        board.update_progress(a, 2);
        let lines = board.snapshot();
        assert!(lines[0].contains("[=====-----]"));
        assert!(lines[0].contains("50.0%"));
        assert_eq!(lines[1], "Downloading");

        board.update_progress(a, 4);
        let lines = board.snapshot();
        assert!(lines[0].contains("[==========]"));
        assert!(lines[0].contains("100.0%"));

        let lanes = board.lanes();
        assert_eq!(lanes[0].id(), a);
        assert_eq!(lanes[1].id(), b);
        assert!(lanes[1].is_indeterminate());
    }

    /// Flush Output
    /// A flush writes the lines followed by a cursor-up over all of them.
    #[test]
    fn test_flush_writes_frame() {
        let (board, capture) = board(10);
        let a = board.add_lane("A", 4);
        board.add_lane("B", 0);
        board.update_progress(a, 4);

        board.flush().unwrap();

        assert_eq!(
            capture.contents(),
            "[==========] 100.0% - A\nB\n\x1b[2A"
        );
    }

    /// Clear All
    /// Final frame, cursor-down by the prior lane count, then an empty registry.
    #[test]
    fn test_clear_all() {
        let (board, capture) = board(10);
        let a = board.add_lane("A", 2);
        board.add_lane("B", 0);
        board.add_lane("C", 5);
        board.update_progress(a, 1);

        let cleared = board.clear_all().unwrap();

        assert_eq!(cleared, 3);
        assert!(board.snapshot().is_empty());
        assert!(board.is_empty());
        assert_eq!(
            capture.take(),
            "[=====-----]  50.0% - A\nB\n\n\x1b[3A\x1b[3B"
        );

        // Stale ids are tolerated and new lanes get fresh ids.
        board.update_progress(a, 2);
        let fresh = board.add_lane("D", 0);
        assert_ne!(fresh, a);
        assert_eq!(board.snapshot(), vec!["D".to_owned()]);

        // An empty board paints nothing.
        board.clear_all().unwrap();
        assert_eq!(board.clear_all().unwrap(), 0);
    }

    /// Independent Boards
    /// Two boards in one process share no lanes.
    #[test]
    fn test_boards_are_independent() {
        let (first, _c1) = board(10);
        let (second, _c2) = board(10);

        first.add_lane("only here", 0);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    /// Concurrent Updates
    /// Workers hammering distinct lanes leave each lane at its last value.
    #[test]
    fn test_concurrent_updates() {
        let (board, _capture) = board(10);
        let ids: Vec<LaneId> = (0..4).map(|i| board.add_lane(format!("w{i}"), 100)).collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let board = board.clone();
                thread::spawn(move || {
                    for n in 1..=100 {
                        board.update_progress(id, n);
                        if n % 25 == 0 {
                            thread::sleep(Duration::from_millis(1));
                        }
                    }
                })
            })
            .collect();

        // Every line seen mid-run is a complete rendering of some count.
        let rendered: Vec<HashSet<String>> = (0..4)
            .map(|i| {
                (0..=100)
                    .map(|n| render_line(&format!("w{i}"), 100, n, 10))
                    .chain([String::new()])
                    .collect()
            })
            .collect();
        for _ in 0..50 {
            for (i, line) in board.snapshot().iter().enumerate() {
                assert!(rendered[i].contains(line), "torn line for w{i}: {line:?}");
            }
        }

        for h in handles {
            h.join().unwrap();
        }

        for lane in board.lanes() {
            assert_eq!(lane.count(), 100);
            assert!(lane.line().starts_with("[==========] 100.0%"));
        }
    }
}
