//! The sticker display element.
//!
//! A [`StickerElement`] renders the registry entry named by its `name`
//! attribute. It moves between three states:
//!
//! - [`ElementState::Detached`]: initial and terminal. Nothing is observed.
//! - [`ElementState::AttachedIdle`]: subscribed to the registry, no update
//!   scheduled.
//! - [`ElementState::UpdatePending`]: an update will run at the next refresh
//!   boundary.
//!
//! Attaching, changing `name`, and any registry notification schedule an
//! update through a [`FrameThrottle`], so bursts of triggers inside one
//! refresh window produce a single update. The update reads the state current
//! when it runs and does nothing if the requested name is not registered or is
//! already rendered.
//!
//! # Example
//!
//! ```
//! use rivet_stickers::{ElementOptions, StickerElement, StickerRegistry};
//! use rivet_stickers_core::ManualFrameClock;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(StickerRegistry::default());
//! let clock = Arc::new(ManualFrameClock::new());
//!
//! let element = StickerElement::new(registry.clone(), clock.clone(), ElementOptions::default());
//! element.set_attribute("name", "flag");
//! element.attach();
//!
//! registry.register("flag", r#"<svg><path d="M0 0"/></svg>"#)?;
//! clock.advance();
//!
//! assert_eq!(element.rendered_name().as_deref(), Some("flag"));
//! # Ok::<(), rivet_stickers::StickerError>(())
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use rivet_stickers_core::logging::{span_names, targets};
use rivet_stickers_core::{FrameClock, FrameThrottle, PerfSpan, Property};

use crate::config::{RenderKey, RenderTarget, StickerConfig};
use crate::host::ElementDefinition;
use crate::markup::SvgElement;
use crate::registry::{StickerRegistry, Subscription};

/// The observed attribute holding the requested sticker name.
pub const NAME_ATTRIBUTE: &str = "name";

/// Lifecycle state of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementState {
    /// Not attached; nothing is observed.
    Detached,
    /// Attached with no update scheduled.
    AttachedIdle,
    /// Attached with an update scheduled for the next refresh boundary.
    UpdatePending,
}

/// Per-element rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementOptions {
    /// What decides that the current render is up to date.
    pub render_key: RenderKey,
    /// Where rendered content is placed.
    pub render_target: RenderTarget,
}

impl ElementOptions {
    /// Options taken from a configuration.
    pub fn from_config(config: &StickerConfig) -> Self {
        Self {
            render_key: config.render_key,
            render_target: config.render_target,
        }
    }

    /// Set the render key.
    pub fn with_render_key(mut self, render_key: RenderKey) -> Self {
        self.render_key = render_key;
        self
    }

    /// Set the render target.
    pub fn with_render_target(mut self, render_target: RenderTarget) -> Self {
        self.render_target = render_target;
        self
    }
}

/// Content currently shown by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSticker {
    /// Where the content was placed.
    pub target: RenderTarget,
    /// The sticker name that was rendered.
    pub name: String,
    /// Registry revision of the rendered entry.
    pub revision: u64,
    /// A private deep copy of the registered content.
    pub content: SvgElement,
    /// Serialized `content`.
    pub markup: String,
}

/// Unique identifier for an element, used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct RenderState {
    name: Option<String>,
    revision: Option<u64>,
    output: Option<RenderedSticker>,
}

struct ElementShared {
    id: ElementId,
    registry: Arc<StickerRegistry>,
    options: ElementOptions,
    requested: Property<Option<String>>,
    attributes: RwLock<IndexMap<String, String>>,
    attached: AtomicBool,
    subscription: Mutex<Option<Subscription>>,
    render: Mutex<RenderState>,
    render_count: AtomicU64,
    throttle: FrameThrottle,
}

impl ElementShared {
    fn request_update(&self) -> bool {
        if !self.attached.load(Ordering::SeqCst) {
            return false;
        }
        self.throttle.schedule()
    }

    /// Reconciles the output with the requested name. Runs on a refresh
    /// boundary.
    fn update(&self) {
        let _perf = PerfSpan::new(span_names::UPDATE);

        // A frame requested before detach may still fire.
        if !self.attached.load(Ordering::SeqCst) {
            tracing::trace!(target: targets::ELEMENT, element = self.id.0, "detached, skipping update");
            return;
        }

        let Some(name) = self.requested.get() else {
            return;
        };
        let Some(sticker) = self.registry.get(&name) else {
            tracing::trace!(target: targets::ELEMENT, element = self.id.0, sticker = %name, "not registered yet");
            return;
        };

        let mut render = self.render.lock();
        let same_name = render.name.as_deref() == Some(name.as_str());
        let current = match self.options.render_key {
            RenderKey::Name => same_name,
            RenderKey::Revision => same_name && render.revision == Some(sticker.revision()),
        };
        if current {
            return;
        }

        let content = sticker.content().clone();
        let markup = content.to_markup();
        render.output = Some(RenderedSticker {
            target: self.options.render_target,
            name: name.clone(),
            revision: sticker.revision(),
            content,
            markup,
        });
        render.name = Some(name);
        render.revision = Some(sticker.revision());
        drop(render);

        self.render_count.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(
            target: targets::ELEMENT,
            element = self.id.0,
            sticker = sticker.name(),
            revision = sticker.revision(),
            "rendered sticker"
        );
    }
}

/// An element displaying one registered sticker.
///
/// Dropping the element detaches it.
pub struct StickerElement {
    shared: Arc<ElementShared>,
}

impl StickerElement {
    /// Creates a detached element rendering from `registry`, paced by `clock`.
    pub fn new(
        registry: Arc<StickerRegistry>,
        clock: Arc<dyn FrameClock>,
        options: ElementOptions,
    ) -> Self {
        let shared = Arc::new_cyclic(|weak: &Weak<ElementShared>| {
            let weak = weak.clone();
            let throttle = FrameThrottle::new(clock, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.update();
                }
            });

            ElementShared {
                id: ElementId::next(),
                registry,
                options,
                requested: Property::new(None),
                attributes: RwLock::new(IndexMap::new()),
                attached: AtomicBool::new(false),
                subscription: Mutex::new(None),
                render: Mutex::new(RenderState::default()),
                render_count: AtomicU64::new(0),
                throttle,
            }
        });

        Self { shared }
    }

    /// This element's identifier.
    pub fn id(&self) -> ElementId {
        self.shared.id
    }

    /// The element's options.
    pub fn options(&self) -> ElementOptions {
        self.shared.options
    }

    /// The registry this element renders from.
    pub fn registry(&self) -> &Arc<StickerRegistry> {
        &self.shared.registry
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Sets an attribute. Names are ASCII case-insensitive.
    ///
    /// Only `name` is observed; changing it while attached schedules an
    /// update. Other attributes such as `theme` and `size` are stored as given.
    pub fn set_attribute(&self, key: &str, value: impl Into<String>) {
        let key = key.to_ascii_lowercase();
        let value = value.into();
        self.shared.attributes.write().insert(key.clone(), value.clone());
        if ElementDefinition::STICKER.observes(&key) {
            self.observed_changed(Some(value));
        }
    }

    /// Removes an attribute, returning its previous value.
    pub fn remove_attribute(&self, key: &str) -> Option<String> {
        let key = key.to_ascii_lowercase();
        let old = self.shared.attributes.write().shift_remove(&key);
        if old.is_some() && ElementDefinition::STICKER.observes(&key) {
            self.observed_changed(None);
        }
        old
    }

    /// Gets an attribute value.
    pub fn attribute(&self, key: &str) -> Option<String> {
        self.shared
            .attributes
            .read()
            .get(&key.to_ascii_lowercase())
            .cloned()
    }

    /// All attributes in the order they were first set.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.shared
            .attributes
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The requested sticker name.
    pub fn requested_name(&self) -> Option<String> {
        self.shared.requested.get()
    }

    fn observed_changed(&self, value: Option<String>) {
        if self.shared.requested.set(value) {
            tracing::trace!(target: targets::ELEMENT, element = self.shared.id.0, "requested name changed");
            self.shared.request_update();
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attaches the element: subscribes to the registry and schedules an
    /// update. Returns `false` if it was already attached.
    pub fn attach(&self) -> bool {
        if self
            .shared
            .attached
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let weak = Arc::downgrade(&self.shared);
        let subscription = self.shared.registry.subscribe(move |_name| {
            // Any registration may satisfy the request.
            if let Some(shared) = weak.upgrade() {
                shared.request_update();
            }
        });
        *self.shared.subscription.lock() = Some(subscription);

        tracing::debug!(target: targets::ELEMENT, element = self.shared.id.0, "attached");
        self.shared.request_update();
        true
    }

    /// Detaches the element and stops observing the registry. Returns `false`
    /// if it was not attached.
    ///
    /// An update already scheduled still fires but changes nothing.
    pub fn detach(&self) -> bool {
        if self
            .shared
            .attached
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let subscription = self.shared.subscription.lock().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }

        tracing::debug!(target: targets::ELEMENT, element = self.shared.id.0, "detached");
        true
    }

    /// Whether the element is attached.
    pub fn is_attached(&self) -> bool {
        self.shared.attached.load(Ordering::SeqCst)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ElementState {
        if !self.is_attached() {
            ElementState::Detached
        } else if self.shared.throttle.is_pending() {
            ElementState::UpdatePending
        } else {
            ElementState::AttachedIdle
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The content currently shown, if anything has been rendered.
    pub fn output(&self) -> Option<RenderedSticker> {
        self.shared.render.lock().output.clone()
    }

    /// The last rendered sticker name.
    pub fn rendered_name(&self) -> Option<String> {
        self.shared.render.lock().name.clone()
    }

    /// Registry revision of the last render.
    pub fn rendered_revision(&self) -> Option<u64> {
        self.shared.render.lock().revision
    }

    /// Number of renders performed.
    pub fn render_count(&self) -> u64 {
        self.shared.render_count.load(Ordering::SeqCst)
    }

    /// Number of updates that have run, including ones that skipped.
    pub fn update_count(&self) -> u64 {
        self.shared.throttle.executions()
    }
}

impl Drop for StickerElement {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for StickerElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickerElement")
            .field("id", &self.shared.id)
            .field("state", &self.state())
            .field("requested", &self.requested_name())
            .field("rendered", &self.rendered_name())
            .finish()
    }
}
