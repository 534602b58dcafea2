//! # Inventory Refresh
//!
//! After the rules change, every client is still showing stacks renamed
//! with the old ones. The refresh task re-sends full inventories so the
//! rewriter can run again with the new table.
//!
//! ```text
//! reload / edit ──► force_refresh() ──► pending = true
//!                                           │
//!      periodic run() ◄─────────────────────┘
//!          │ pending? swap to false
//!          ▼
//!      resend_inventory(player) for every online player
//! ```
//!
//! Many reloads between two passes collapse into one refresh.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::server::ServerHandle;

/// Default interval between refresh passes (one server tick).
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_millis(50);

/// Re-sends inventories once per requested refresh.
pub struct RefreshInventoryTask {
    server: Arc<dyn ServerHandle>,
    pending: AtomicBool,
    passes: AtomicU64,
}

impl RefreshInventoryTask {
    /// Creates an idle task.
    #[must_use]
    pub fn new(server: Arc<dyn ServerHandle>) -> Self {
        Self {
            server,
            pending: AtomicBool::new(false),
            passes: AtomicU64::new(0),
        }
    }

    /// Requests a refresh on the next pass.
    pub fn force_refresh(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Returns true if a refresh has been requested but not run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Number of passes that actually refreshed.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes.load(Ordering::Relaxed)
    }

    /// Runs one pass. Returns the number of players refreshed.
    pub fn run(&self) -> usize {
        if !self.pending.swap(false, Ordering::AcqRel) {
            return 0;
        }

        let players = self.server.online_players();
        for player in &players {
            self.server.resend_inventory(player);
        }
        self.passes.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Refreshed inventories of {} player(s)", players.len());
        players.len()
    }

    /// Runs [`RefreshInventoryTask::run`] every `period` on a background
    /// thread until the returned handle is stopped or dropped.
    #[must_use]
    pub fn start(self: &Arc<Self>, period: Duration) -> RefreshHandle {
        let (stop, stopped) = bounded::<()>(1);
        let task = Arc::clone(self);

        let thread = thread::spawn(move || loop {
            match stopped.recv_timeout(period) {
                Err(RecvTimeoutError::Timeout) => {
                    task.run();
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        RefreshHandle {
            stop: Some(stop),
            thread: Some(thread),
        }
    }
}

impl std::fmt::Debug for RefreshInventoryTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshInventoryTask")
            .field("pending", &self.is_pending())
            .field("passes", &self.passes())
            .finish_non_exhaustive()
    }
}

/// Owner of a running refresh thread.
#[derive(Debug)]
pub struct RefreshHandle {
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Stops the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects the channel and ends the loop.
        self.stop.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Inventory refresh thread panicked");
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
