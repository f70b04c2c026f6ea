//! Element type definition and the host that instantiates elements.
//!
//! A [`StickerHost`] plays the part of the environment that owns element
//! instances: it defines the `rvt-sticker` element type once, creates elements
//! that share its registry, clock and configuration, and accepts sticker
//! registrations only after the type has been defined.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rivet_stickers_core::logging::targets;
use rivet_stickers_core::FrameClock;

use crate::config::StickerConfig;
use crate::element::{ElementOptions, StickerElement, NAME_ATTRIBUTE};
use crate::error::{Result, StickerError};
use crate::registry::{global_registry, StickerRegistry};

/// Static description of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDefinition {
    /// Tag name the element is addressed by.
    pub tag_name: &'static str,
    /// Attributes whose changes trigger an update.
    pub observed_attributes: &'static [&'static str],
    /// Package name used as the prefix of error messages.
    pub package_name: &'static str,
}

impl ElementDefinition {
    /// The sticker element.
    pub const STICKER: ElementDefinition = ElementDefinition {
        tag_name: "rvt-sticker",
        observed_attributes: &[NAME_ATTRIBUTE],
        package_name: "Rivet Stickers",
    };

    /// Returns true if changes to `attribute` are observed.
    pub fn observes(&self, attribute: &str) -> bool {
        self.observed_attributes
            .iter()
            .any(|observed| observed.eq_ignore_ascii_case(attribute))
    }
}

/// Outcome of a batch registration.
#[derive(Debug, Default)]
pub struct RegistrationReport {
    /// Names registered successfully, in call order.
    pub registered: Vec<String>,
    /// Names that failed, with their errors.
    pub failed: Vec<(String, StickerError)>,
}

impl RegistrationReport {
    /// Returns true if every registration succeeded.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Owner of the sticker element type and its instances.
pub struct StickerHost {
    registry: Arc<StickerRegistry>,
    clock: Arc<dyn FrameClock>,
    config: StickerConfig,
    defined: AtomicBool,
}

impl StickerHost {
    /// Creates a host around an explicit registry.
    pub fn new(registry: Arc<StickerRegistry>, clock: Arc<dyn FrameClock>, config: StickerConfig) -> Self {
        Self {
            registry,
            clock,
            config,
            defined: AtomicBool::new(false),
        }
    }

    /// Creates a host around the process-wide registry.
    pub fn with_global_registry(clock: Arc<dyn FrameClock>, config: StickerConfig) -> Self {
        Self::new(Arc::clone(global_registry()), clock, config)
    }

    /// The element type this host defines.
    pub fn definition(&self) -> &'static ElementDefinition {
        &ElementDefinition::STICKER
    }

    /// Defines the element type. Returns `false` if it was already defined.
    pub fn define(&self) -> bool {
        let newly = self
            .defined
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if newly {
            tracing::info!(target: targets::ELEMENT, tag = ElementDefinition::STICKER.tag_name, "element type defined");
        }
        newly
    }

    /// Whether [`define`](Self::define) has been called.
    pub fn is_defined(&self) -> bool {
        self.defined.load(Ordering::SeqCst)
    }

    /// Creates a detached element sharing this host's registry and clock.
    pub fn create_element(&self) -> Result<StickerElement> {
        self.ensure_defined()?;
        Ok(StickerElement::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.clock),
            ElementOptions::from_config(&self.config),
        ))
    }

    /// Registers a sticker once the element type is defined.
    pub fn register_sticker(&self, name: &str, markup: &str) -> Result<()> {
        self.ensure_defined()?;
        self.registry.register(name, markup)
    }

    /// Registers each `(name, markup)` pair independently.
    ///
    /// A failing pair does not stop the others.
    pub fn register_all<I, N, M>(&self, stickers: I) -> Result<RegistrationReport>
    where
        I: IntoIterator<Item = (N, M)>,
        N: AsRef<str>,
        M: AsRef<str>,
    {
        self.ensure_defined()?;
        let mut report = RegistrationReport::default();
        for (name, markup) in stickers {
            let name = name.as_ref();
            match self.registry.register(name, markup.as_ref()) {
                Ok(()) => report.registered.push(name.to_string()),
                Err(err) => report.failed.push((name.to_string(), err)),
            }
        }
        Ok(report)
    }

    /// Names currently registered, in registration order.
    pub fn get_stickers(&self) -> Vec<String> {
        self.registry.names()
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<StickerRegistry> {
        &self.registry
    }

    /// The host configuration.
    pub fn config(&self) -> &StickerConfig {
        &self.config
    }

    fn ensure_defined(&self) -> Result<()> {
        if self.is_defined() {
            Ok(())
        } else {
            Err(StickerError::NotDefined)
        }
    }
}

impl fmt::Debug for StickerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickerHost")
            .field("tag", &ElementDefinition::STICKER.tag_name)
            .field("defined", &self.is_defined())
            .field("registry", &self.registry)
            .finish()
    }
}
