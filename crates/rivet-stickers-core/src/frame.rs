//! Refresh boundary abstraction.
//!
//! Sticker elements never render synchronously. They ask a [`FrameClock`] to
//! run a callback at the next refresh boundary, the point where the host would
//! repaint. Hosts back the trait with whatever pacing primitive they have
//! (an animation-frame callback, a compositor tick, a test loop).
//!
//! [`ManualFrameClock`] is the deterministic implementation used by headless
//! hosts and tests: each call to [`ManualFrameClock::advance`] is one refresh
//! boundary.
//!
//! # Example
//!
//! ```
//! use rivet_stickers_core::{FrameClock, ManualFrameClock};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let clock = ManualFrameClock::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let hits_clone = hits.clone();
//! clock.request_frame(Box::new(move || {
//!     hits_clone.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! // Nothing runs until the boundary.
//! assert_eq!(hits.load(Ordering::SeqCst), 0);
//! assert_eq!(clock.advance(), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A unique identifier for a frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(u64);

impl FrameRequestId {
    /// Get the raw u64 value of this request ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Global counter for generating unique request IDs.
static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> FrameRequestId {
    FrameRequestId(NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
}

/// A boxed callback to run at a refresh boundary.
pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;

/// Injectable "next refresh boundary" scheduling capability.
///
/// Implementations must run each callback exactly once, at the next boundary,
/// and never synchronously inside [`request_frame`](Self::request_frame).
pub trait FrameClock: Send + Sync {
    /// Queue `callback` for the next refresh boundary.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;
}

/// Internal request data.
struct FrameRequest {
    id: FrameRequestId,
    callback: FrameCallback,
}

/// A frame clock driven explicitly by the host.
///
/// Requests made while a boundary is being processed run at the following
/// boundary, which matches how animation-frame callbacks behave.
pub struct ManualFrameClock {
    /// Callbacks waiting for the next boundary.
    pending: Mutex<VecDeque<FrameRequest>>,
    /// Number of boundaries processed so far.
    frame_index: AtomicU64,
}

impl ManualFrameClock {
    /// Create a clock with no pending callbacks.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            frame_index: AtomicU64::new(0),
        }
    }

    /// Process one refresh boundary.
    ///
    /// Runs every callback requested before this call, in request order, and
    /// returns how many ran.
    #[tracing::instrument(skip(self), target = "rivet_stickers_core::frame", level = "trace")]
    pub fn advance(&self) -> usize {
        // Take the batch out so callbacks can request the next frame.
        let batch = std::mem::take(&mut *self.pending.lock());
        let frame = self.frame_index.fetch_add(1, Ordering::SeqCst) + 1;
        let count = batch.len();

        tracing::trace!(target: "rivet_stickers_core::frame", frame, count, "refresh boundary");
        for request in batch {
            (request.callback)();
        }
        count
    }

    /// Process boundaries until nothing is pending or `max_frames` is reached.
    ///
    /// Returns the number of boundaries processed.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.has_pending() {
            self.advance();
            frames += 1;
        }
        if self.has_pending() {
            crate::sticker_warn!(frames, "frame clock still busy after frame limit");
        }
        frames
    }

    /// Cancel a pending request.
    ///
    /// Returns `true` if the request was found and cancelled.
    pub fn cancel(&self, id: FrameRequestId) -> bool {
        let mut pending = self.pending.lock();
        if let Some(pos) = pending.iter().position(|r| r.id == id) {
            pending.remove(pos);
            crate::sticker_debug!(request = id.0, "frame request cancelled");
            true
        } else {
            false
        }
    }

    /// Check if any callbacks are waiting for the next boundary.
    pub fn has_pending(&self) -> bool {
        !self.pending.lock().is_empty()
    }

    /// Number of callbacks waiting for the next boundary.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Number of boundaries processed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index.load(Ordering::SeqCst)
    }
}

impl FrameClock for ManualFrameClock {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let id = next_request_id();
        self.pending.lock().push_back(FrameRequest { id, callback });
        id
    }
}

impl Default for ManualFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ManualFrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualFrameClock")
            .field("pending", &self.pending_count())
            .field("frame_index", &self.frame_index())
            .finish()
    }
}
