//! Rivet Stickers: a registry of named SVG icons and the elements that show them.
//!
//! This crate provides:
//!
//! - **Registry**: name to validated content, with change notification
//! - **Validation**: one `<svg>` root per sticker, with default presentation
//!   attributes filled in
//! - **Elements**: the `rvt-sticker` display element, re-rendering at most
//!   once per refresh boundary
//! - **Host**: defines the element type and gates registration on it
//! - **Manifest**: JSON listing of registered names for picker tooling
//!
//! # Example
//!
//! ```
//! use rivet_stickers::prelude::*;
//! use rivet_stickers_core::ManualFrameClock;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualFrameClock::new());
//! let registry = Arc::new(StickerRegistry::default());
//! let host = StickerHost::new(registry, clock.clone(), StickerConfig::default());
//! host.define();
//!
//! let element = host.create_element()?;
//! element.set_attribute("name", "flag");
//! element.set_attribute("theme", "dark");
//! element.attach();
//!
//! host.register_sticker("flag", r#"<svg><path d="M0 0"/></svg>"#)?;
//! clock.advance();
//!
//! let output = element.output().expect("rendered");
//! assert_eq!(output.content.attribute("aria-hidden"), Some("true"));
//! # Ok::<(), StickerError>(())
//! ```

pub mod config;
pub mod element;
pub mod host;
pub mod manifest;
pub mod markup;
pub mod registry;
pub mod validate;

mod error;

pub use config::{RenderKey, RenderTarget, SizingMode, StickerConfig};
pub use element::{ElementId, ElementOptions, ElementState, RenderedSticker, StickerElement};
pub use error::{Result, StickerError};
pub use host::{ElementDefinition, RegistrationReport, StickerHost};
pub use manifest::StickerManifest;
pub use markup::{MarkupError, SvgElement, SvgNode};
pub use registry::{
    get_stickers, global_registry, register_sticker, Sticker, StickerRegistry, Subscription,
};
pub use validate::{DefaultAttributes, Validator};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{RenderKey, RenderTarget, SizingMode, StickerConfig};
    pub use crate::element::{ElementOptions, ElementState, StickerElement};
    pub use crate::error::{Result, StickerError};
    pub use crate::host::StickerHost;
    pub use crate::registry::{Sticker, StickerRegistry, Subscription};
    pub use rivet_stickers_core::{FrameClock, FrameThrottle, ManualFrameClock};
}
