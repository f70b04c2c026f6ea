//! Logging facilities for Rivet Stickers.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Target and span name constants for filtering
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Rivet Stickers uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("rivet_stickers=debug,rivet_stickers_core=trace")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout Rivet Stickers for tracing.
pub mod span_names {
    /// Refresh boundary processing span.
    pub const FRAME: &str = "rivet_stickers::frame";
    /// Signal emission span.
    pub const SIGNAL: &str = "rivet_stickers::signal";
    /// Sticker registration span.
    pub const REGISTER: &str = "rivet_stickers::register";
    /// Element update span.
    pub const UPDATE: &str = "rivet_stickers::update";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core primitives target.
    pub const CORE: &str = "rivet_stickers_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "rivet_stickers_core::signal";
    /// Frame clock target.
    pub const FRAME: &str = "rivet_stickers_core::frame";
    /// Frame throttle target.
    pub const THROTTLE: &str = "rivet_stickers_core::throttle";
    /// Sticker registry target.
    pub const REGISTRY: &str = "rivet_stickers::registry";
    /// Content validator target.
    pub const VALIDATE: &str = "rivet_stickers::validate";
    /// Display element target.
    pub const ELEMENT: &str = "rivet_stickers::element";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "rivet_stickers::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! sticker_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "rivet_stickers_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sticker_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "rivet_stickers_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sticker_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "rivet_stickers_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sticker_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "rivet_stickers_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! sticker_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "rivet_stickers_core", $($arg)*)
    };
}
