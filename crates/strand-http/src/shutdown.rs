//! Graceful shutdown coordination.
//!
//! A [`ShutdownController`] links a blocking serve loop with any number of
//! threads that may ask it to stop. `shutdown` flips the stop flag and
//! then blocks until the serve loop has drained its in-flight connections
//! and marked itself stopped. Shutdown of an idle or already-stopped
//! controller returns immediately; repeated calls are safe.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

/// Lifecycle phase of the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No serve loop is running.
    Idle,
    /// A serve loop is accepting connections.
    Running,
    /// The most recent serve loop has fully stopped.
    Stopped,
}

struct Inner {
    stop: AtomicBool,
    phase: Mutex<Phase>,
    stopped: Condvar,
}

/// Shared handle coordinating stop requests with the serve loop.
#[derive(Clone)]
pub struct ShutdownController {
    inner: Arc<Inner>,
}

impl ShutdownController {
    /// Create a controller in the `Idle` phase.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                stop: AtomicBool::new(false),
                phase: Mutex::new(Phase::Idle),
                stopped: Condvar::new(),
            }),
        }
    }

    /// Called by the serve loop before accepting. Re-arms the stop flag
    /// so a controller can outlive several serve cycles.
    pub fn begin(&self) {
        self.inner.stop.store(false, Ordering::SeqCst);
        *self.inner.phase.lock() = Phase::Running;
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.inner.stop.load(Ordering::SeqCst)
    }

    /// Called by the serve loop once the accept loop has exited and all
    /// in-flight connections have drained.
    pub fn mark_stopped(&self) {
        let mut phase = self.inner.phase.lock();
        *phase = Phase::Stopped;
        self.inner.stopped.notify_all();
    }

    /// Request a stop and block until the transport is no longer running.
    ///
    /// Returns immediately when nothing is serving. Safe to call from any
    /// thread, concurrently with an active serve call, and repeatedly.
    pub fn shutdown(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        let mut phase = self.inner.phase.lock();
        while *phase == Phase::Running {
            self.inner.stopped.wait(&mut phase);
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        *self.inner.phase.lock()
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownController")
            .field("phase", &self.phase())
            .field("stop_requested", &self.should_stop())
            .finish()
    }
}
