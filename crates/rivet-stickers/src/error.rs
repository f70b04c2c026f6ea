//! Error types for Rivet Stickers.

use std::path::PathBuf;

/// Result type alias for sticker operations.
pub type Result<T> = std::result::Result<T, StickerError>;

/// Errors that can occur while registering or configuring stickers.
///
/// The three validation variants are integration errors: they point at a bad
/// icon source and are never retried. A failed registration leaves the
/// registry exactly as it was.
#[derive(Debug, thiserror::Error)]
pub enum StickerError {
    /// The sticker name was empty.
    #[error("Rivet Stickers: Name must be a non-empty string.")]
    InvalidName,

    /// The content did not parse to exactly one root element.
    #[error("Rivet Stickers ({name}): Content must contain one SVG element ({reason}).")]
    MalformedContent { name: String, reason: String },

    /// The single root element is not an `<svg>` element.
    #[error("Rivet Stickers ({name}): Content must be a SVG element, found <{found}>.")]
    WrongRootType { name: String, found: String },

    /// Registration went through a host before the element type was defined.
    #[error("Rivet Stickers: the sticker element type has not been defined")]
    NotDefined,

    /// Invalid configuration value or document.
    #[error("Invalid sticker configuration: {0}")]
    Config(String),

    /// File I/O error.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest (de)serialization error.
    #[error("Sticker manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl StickerError {
    /// Create a malformed content error.
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedContent {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a wrong root type error.
    pub fn wrong_root(name: impl Into<String>, found: impl Into<String>) -> Self {
        Self::WrongRootType {
            name: name.into(),
            found: found.into(),
        }
    }

    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from content validation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName | Self::MalformedContent { .. } | Self::WrongRootType { .. }
        )
    }
}
