//! Frame-coalescing scheduler.
//!
//! A [`FrameThrottle`] wraps an action so that any number of
//! [`schedule`](FrameThrottle::schedule) calls issued before the next refresh
//! boundary collapse into a single run of the action at that boundary. The
//! action reads whatever state is current when it runs; the calls that
//! triggered it are not replayed.
//!
//! # Example
//!
//! ```
//! use rivet_stickers_core::{FrameThrottle, ManualFrameClock};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualFrameClock::new());
//! let runs = Arc::new(AtomicUsize::new(0));
//!
//! let runs_clone = runs.clone();
//! let throttle = FrameThrottle::new(clock.clone(), move || {
//!     runs_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert!(throttle.schedule());
//! assert!(!throttle.schedule()); // dropped, already pending
//! clock.advance();
//! assert_eq!(runs.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::frame::FrameClock;

/// The wrapped action type.
type ThrottledAction = Box<dyn Fn() + Send + Sync + 'static>;

struct ThrottleInner {
    clock: Arc<dyn FrameClock>,
    action: ThrottledAction,
    /// Set from the first `schedule()` until the action has finished.
    pending: AtomicBool,
    /// Number of `schedule()` calls dropped because a run was pending.
    coalesced: AtomicU64,
    /// Number of completed runs.
    executions: AtomicU64,
}

impl ThrottleInner {
    fn run(&self) {
        (self.action)();
        self.executions.fetch_add(1, Ordering::SeqCst);
        self.pending.store(false, Ordering::SeqCst);
    }
}

/// Runs an action at most once per refresh boundary.
///
/// Cloning a `FrameThrottle` yields another handle to the same pending state.
#[derive(Clone)]
pub struct FrameThrottle {
    inner: Arc<ThrottleInner>,
}

impl FrameThrottle {
    /// Wrap `action` so it runs on `clock`'s refresh boundaries.
    pub fn new<F>(clock: Arc<dyn FrameClock>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ThrottleInner {
                clock,
                action: Box::new(action),
                pending: AtomicBool::new(false),
                coalesced: AtomicU64::new(0),
                executions: AtomicU64::new(0),
            }),
        }
    }

    /// Request a run of the action at the next refresh boundary.
    ///
    /// Returns `true` if a frame was requested, `false` if the call was
    /// dropped because a run is already pending.
    pub fn schedule(&self) -> bool {
        if self
            .inner
            .pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            self.inner.coalesced.fetch_add(1, Ordering::SeqCst);
            tracing::trace!(target: "rivet_stickers_core::throttle", "run already pending, coalescing");
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let request = self.inner.clock.request_frame(Box::new(move || inner.run()));
        tracing::trace!(target: "rivet_stickers_core::throttle", request = request.as_u64(), "frame requested");
        true
    }

    /// Whether a run is scheduled and has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Number of completed runs.
    pub fn executions(&self) -> u64 {
        self.inner.executions.load(Ordering::SeqCst)
    }

    /// Number of `schedule()` calls absorbed by an already pending run.
    pub fn coalesced(&self) -> u64 {
        self.inner.coalesced.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for FrameThrottle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameThrottle")
            .field("pending", &self.is_pending())
            .field("executions", &self.executions())
            .finish()
    }
}
