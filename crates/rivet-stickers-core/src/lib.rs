//! Core systems for Rivet Stickers.
//!
//! This crate provides the host-independent primitives the sticker element is
//! built on:
//!
//! - **Signal/Slot System**: Synchronous publish/subscribe with snapshot delivery
//! - **Property System**: Values that report whether a write changed them
//! - **Frame Clock**: Injectable "next refresh boundary" capability
//! - **Frame Throttle**: Collapses repeated update requests into one run per boundary
//! - **Logging**: `tracing` targets, span names and helper macros
//!
//! # Signal/Slot Example
//!
//! ```
//! use rivet_stickers_core::Signal;
//!
//! let registered = Signal::<String>::new();
//!
//! let conn_id = registered.connect(|name| {
//!     println!("Sticker registered: {}", name);
//! });
//!
//! registered.emit("flag".to_string());
//! registered.disconnect(conn_id);
//! ```
//!
//! # Frame Throttle Example
//!
//! ```
//! use rivet_stickers_core::{FrameThrottle, ManualFrameClock};
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualFrameClock::new());
//! let throttle = FrameThrottle::new(clock.clone(), || println!("render"));
//!
//! throttle.schedule();
//! throttle.schedule();
//! throttle.schedule();
//!
//! // One refresh boundary, one render.
//! clock.advance();
//! assert_eq!(throttle.executions(), 1);
//! ```

pub mod frame;
pub mod logging;
pub mod property;
pub mod signal;
pub mod throttle;

pub use frame::{FrameCallback, FrameClock, FrameRequestId, ManualFrameClock};
pub use logging::PerfSpan;
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use throttle::FrameThrottle;
