//! Sticker configuration.
//!
//! [`StickerConfig`] collects the policies that vary between deployments of the
//! element: how the validator sizes the root `<svg>`, which fill token it
//! defaults to, and how elements decide whether a render is stale.
//!
//! Configuration can be built in code or read from TOML:
//!
//! ```
//! use rivet_stickers::{RenderKey, SizingMode, StickerConfig};
//!
//! let config = StickerConfig::from_toml_str(r#"
//!     sizing_mode = "fixed"
//!     size = 48
//!     render_key = "revision"
//! "#)?;
//!
//! assert_eq!(config.sizing_mode, SizingMode::Fixed);
//! assert_eq!(config.size, 48);
//! assert_eq!(config.render_key, RenderKey::Revision);
//! assert_eq!(config.fill, "currentColor");
//! # Ok::<(), rivet_stickers::StickerError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

/// Default intrinsic size (and viewBox extent) of a sticker.
pub const DEFAULT_SIZE: u32 = 80;

/// Default fill token applied to the root `<svg>`.
pub const DEFAULT_FILL: &str = "currentColor";

/// How the validator defaults the root's `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Fill the container: `100%`.
    #[default]
    Fill,
    /// Use the configured size as a fixed number of user units.
    Fixed,
}

/// What an element compares to decide that its render is already current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKey {
    /// Skip when the requested name was already rendered, even if the
    /// registry entry was replaced since.
    #[default]
    Name,
    /// Skip only when the same registration revision was already rendered.
    Revision,
}

/// Where an element places rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    /// Replace the element's own children.
    #[default]
    Light,
    /// Render into an isolated sub-tree owned by the element.
    Shadow,
}

/// Sticker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerConfig {
    /// Sizing policy for the root `width`/`height` defaults.
    pub sizing_mode: SizingMode,
    /// Intrinsic size in user units; also the viewBox extent.
    pub size: u32,
    /// Fill applied when the root has no `fill` attribute.
    pub fill: String,
    /// Staleness check used by elements.
    pub render_key: RenderKey,
    /// Where elements place rendered content.
    pub render_target: RenderTarget,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            sizing_mode: SizingMode::default(),
            size: DEFAULT_SIZE,
            fill: DEFAULT_FILL.to_string(),
            render_key: RenderKey::default(),
            render_target: RenderTarget::default(),
        }
    }
}

impl StickerConfig {
    /// Parse a configuration from a TOML document.
    ///
    /// Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| StickerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StickerError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Serialize the configuration to a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StickerError::Config(e.to_string()))
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(StickerError::Config("size must be greater than zero".into()));
        }
        if self.fill.trim().is_empty() {
            return Err(StickerError::Config("fill must not be empty".into()));
        }
        Ok(())
    }

    /// Set the sizing mode.
    pub fn with_sizing_mode(mut self, sizing_mode: SizingMode) -> Self {
        self.sizing_mode = sizing_mode;
        self
    }

    /// Set the intrinsic size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the default fill.
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
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
