//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use rivet_stickers::{ElementOptions, StickerElement, StickerRegistry};
use rivet_stickers_core::ManualFrameClock;

pub const FLAG: &str = r#"<svg><path d="M0 0"/></svg>"#;
pub const FLAG_RED: &str = r#"<svg fill="red"><path d="M0 0"/></svg>"#;

/// Routes log output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Fixture {
    pub registry: Arc<StickerRegistry>,
    pub clock: Arc<ManualFrameClock>,
}

impl Fixture {
    pub fn new() -> Self {
        init_tracing();
        Self {
            registry: Arc::new(StickerRegistry::default()),
            clock: Arc::new(ManualFrameClock::new()),
        }
    }

    pub fn element(&self, options: ElementOptions) -> StickerElement {
        StickerElement::new(self.registry.clone(), self.clock.clone(), options)
    }

    /// An attached element requesting `name`.
    pub fn attached(&self, name: &str) -> StickerElement {
        let element = self.element(ElementOptions::default());
        element.set_attribute("name", name);
        element.attach();
        element
    }
}
