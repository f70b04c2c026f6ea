//! The sticker registry.
//!
//! [`StickerRegistry`] maps sticker names to validated content and announces
//! every successful registration through a [`Signal`]. Registration is
//! all-or-nothing: content is validated before any state changes, and a failed
//! call leaves the registry exactly as it was and notifies nobody.
//!
//! Elements receive the registry they render from at construction. For code
//! that wants one process-wide instance, [`global_registry`] lazily creates a
//! default registry that lives for the rest of the process.
//!
//! # Example
//!
//! ```
//! use rivet_stickers::{StickerConfig, StickerRegistry};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let registry = StickerRegistry::new(StickerConfig::default());
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let seen_clone = seen.clone();
//! let _subscription = registry.subscribe(move |_name| {
//!     seen_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! registry.register("flag", r#"<svg><path d="M0 0"/></svg>"#)?;
//! assert!(registry.register("bad", "<div/>").is_err());
//!
//! assert_eq!(registry.names(), vec!["flag".to_string()]);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! # Ok::<(), rivet_stickers::StickerError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use parking_lot::RwLock;
use rivet_stickers_core::logging::targets;
use rivet_stickers_core::{ConnectionGuard, Signal};

use crate::config::StickerConfig;
use crate::error::Result;
use crate::manifest::StickerManifest;
use crate::markup::SvgElement;
use crate::validate::Validator;

/// A registered sticker.
///
/// Cloning is cheap; the content is shared and never mutated after
/// registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker {
    name: String,
    content: Arc<SvgElement>,
    revision: u64,
}

impl Sticker {
    /// The registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized root `<svg>`.
    pub fn content(&self) -> &SvgElement {
        &self.content
    }

    /// Shared handle to the normalized content.
    pub fn content_arc(&self) -> Arc<SvgElement> {
        Arc::clone(&self.content)
    }

    /// Registry revision at which this entry was stored.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Serialized content.
    pub fn to_markup(&self) -> String {
        self.content.to_markup()
    }
}

/// Name to content store with change notification.
pub struct StickerRegistry {
    validator: Validator,
    entries: RwLock<IndexMap<String, Sticker>>,
    revision: AtomicU64,
    registered: Signal<String>,
}

impl StickerRegistry {
    /// Creates an empty registry validating with `config`'s defaults.
    pub fn new(config: StickerConfig) -> Self {
        Self::with_validator(Validator::from_config(&config))
    }

    /// Creates an empty registry with a specific validator.
    pub fn with_validator(validator: Validator) -> Self {
        Self {
            validator,
            entries: RwLock::new(IndexMap::new()),
            revision: AtomicU64::new(0),
            registered: Signal::new(),
        }
    }

    /// The validator applied on registration.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Validates `markup` and stores it under `name`.
    ///
    /// Replaces any existing entry with the same name; the name keeps its
    /// original position in [`names`](Self::names). Subscribers are notified
    /// after the entry is stored. On error nothing is stored and nobody is
    /// notified.
    pub fn register(&self, name: &str, markup: &str) -> Result<()> {
        let span = tracing::debug_span!(target: targets::REGISTRY, "register", sticker = name);
        let _enter = span.enter();

        let content = match self.validator.validate(name, markup) {
            Ok(content) => Arc::new(content),
            Err(err) => {
                tracing::warn!(target: targets::REGISTRY, error = %err, "sticker rejected");
                return Err(err);
            }
        };

        let replaced = {
            let mut entries = self.entries.write();
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            let sticker = Sticker {
                name: name.to_string(),
                content,
                revision,
            };
            entries.insert(name.to_string(), sticker).is_some()
        };

        tracing::debug!(target: targets::REGISTRY, replaced, "sticker registered");
        self.registered.emit(name.to_string());
        Ok(())
    }

    /// Looks up a sticker by name.
    pub fn get(&self, name: &str) -> Option<Sticker> {
        self.entries.read().get(name).cloned()
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names in first-registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    /// Number of registered stickers.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of successful registrations so far.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Calls `listener` with the name of every subsequent successful
    /// registration until the returned [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let guard = self.registered.connect_scoped(move |name: &String| listener(name.as_str()));
        tracing::trace!(target: targets::REGISTRY, "subscriber added");
        Subscription { guard }
    }

    /// The signal emitted after each successful registration.
    pub fn registered(&self) -> &Signal<String> {
        &self.registered
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registered.connection_count()
    }

    /// Snapshot of the registered names for external tooling.
    pub fn manifest(&self) -> StickerManifest {
        StickerManifest::new(self.names())
    }
}

impl Default for StickerRegistry {
    fn default() -> Self {
        Self::new(StickerConfig::default())
    }
}

impl fmt::Debug for StickerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickerRegistry")
            .field("len", &self.len())
            .field("revision", &self.revision())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle to a registry subscription.
///
/// Delivery stops when the handle is dropped or
/// [`unsubscribe`](Self::unsubscribe) is called.
#[derive(Debug)]
pub struct Subscription {
    guard: ConnectionGuard<String>,
}

impl Subscription {
    /// Stops delivery. Returns `true` if the subscription was still live.
    pub fn unsubscribe(mut self) -> bool {
        self.guard.disconnect()
    }

    /// Whether this subscription has not been cancelled.
    pub fn is_active(&self) -> bool {
        self.guard.id().is_some()
    }
}

// ============================================================================
// Process-wide registry
// ============================================================================

static GLOBAL_REGISTRY: OnceLock<Arc<StickerRegistry>> = OnceLock::new();

/// The process-wide registry, created with the default configuration on first
/// use and never torn down.
pub fn global_registry() -> &'static Arc<StickerRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| {
        tracing::debug!(target: targets::REGISTRY, "creating global sticker registry");
        Arc::new(StickerRegistry::default())
    })
}

/// Registers a sticker in the process-wide registry.
pub fn register_sticker(name: &str, markup: &str) -> Result<()> {
    global_registry().register(name, markup)
}

/// Names registered in the process-wide registry, in registration order.
pub fn get_stickers() -> Vec<String> {
    global_registry().names()
}
