//! Periodic repaint on a background thread.
//!
//! [`Board::start_auto_refresh`] spawns one thread that sleeps for the board's refresh
//! interval and then paints a snapshot, over and over. Because the next wait starts
//! only after a paint finishes, ticks are spaced by `interval + paint time`.
//!
//! # Shutdown
//!
//! The sleep is a condition-variable wait, so [`Board::stop_auto_refresh`] wakes the
//! thread immediately and joins it: once it returns, no further tick will fire. The
//! thread only holds a [`Weak`] reference to the board, so dropping the last board
//! handle also ends the loop.

use std::{
    sync::{Arc, Weak},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::{Board, Result, board::Shared};

/// Stop signal for one run of the refresh thread.
#[derive(Default)]
struct Signal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl Signal {
    fn stop(&self) {
        *self.stopped.lock() = true;
        self.wake.notify_all();
    }

    /// Sleeps for `interval` unless stopped first. Returns `true` once stopped.
    fn wait(&self, interval: Duration) -> bool {
        let deadline = Instant::now() + interval;
        let mut stopped = self.stopped.lock();
        while !*stopped {
            if self.wake.wait_until(&mut stopped, deadline).timed_out() {
                break;
            }
        }
        *stopped
    }
}

struct Running {
    signal: Arc<Signal>,
    handle: JoinHandle<()>,
}

/// Refresh thread bookkeeping owned by a board.
#[derive(Default)]
pub(crate) struct Refresher {
    running: Mutex<Option<Running>>,
}

impl Drop for Refresher {
    fn drop(&mut self) {
        // The thread may be the one dropping the board, so wake it but never join here.
        if let Some(running) = self.running.get_mut().take() {
            running.signal.stop();
        }
    }
}

fn run(board: Weak<Shared>, signal: Arc<Signal>, interval: Duration) {
    debug!(?interval, "auto refresh started");
    loop {
        if signal.wait(interval) {
            break;
        }
        let Some(shared) = board.upgrade() else {
            break;
        };
        if let Err(err) = (Board { shared }).flush() {
            warn!(%err, "refresh tick failed");
        }
    }
    debug!("auto refresh stopped");
}

impl Board {
    /// Starts repainting the board every refresh interval on a background thread.
    ///
    /// Calling this while the thread is already running does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the thread cannot be spawned.
    pub fn start_auto_refresh(&self) -> Result<()> {
        let mut running = self.shared.refresher.running.lock();
        if running.is_some() {
            debug!("auto refresh already running");
            return Ok(());
        }

        let signal = Arc::new(Signal::default());
        let handle = thread::Builder::new().name("lane-board-refresh".into()).spawn({
            let board = Arc::downgrade(&self.shared);
            let signal = signal.clone();
            let interval = self.shared.interval;
            move || run(board, signal, interval)
        })?;

        *running = Some(Running { signal, handle });
        Ok(())
    }

    /// Stops the refresh thread and waits for it to exit.
    ///
    /// A tick already painting is allowed to finish; none starts afterwards. Does
    /// nothing if auto refresh is not running.
    pub fn stop_auto_refresh(&self) {
        let Some(Running { signal, handle }) = self.shared.refresher.running.lock().take() else {
            return;
        };

        signal.stop();
        if handle.join().is_err() {
            warn!("refresh thread panicked");
        }
    }

    /// Returns `true` while the refresh thread is running.
    #[must_use]
    pub fn is_auto_refreshing(&self) -> bool {
        self.shared.refresher.running.lock().is_some()
    }
}
