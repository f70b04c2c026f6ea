//! Name listing for picker tooling.
//!
//! The manifest serializes to a plain JSON array of names, for example
//! `["flag","heart"]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

/// Ordered list of registered sticker names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerManifest {
    names: Vec<String>,
}

impl StickerManifest {
    /// Creates a manifest from names in registration order.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// The listed names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of listed names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names are listed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns true if `name` is listed.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// A copy sorted by name, the order used for build-time listings.
    pub fn sorted(&self) -> Self {
        let mut names = self.names.clone();
        names.sort();
        Self { names }
    }

    /// Serializes to a compact JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes to an indented JSON array.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON array of names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a manifest file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StickerError::io(path, e))?;
        Self::from_json(&json)
    }
}

impl FromIterator<String> for StickerManifest {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json() {
        let manifest = StickerManifest::new(vec!["flag".into(), "heart".into()]);
        assert_eq!(manifest.to_json().unwrap(), r#"["flag","heart"]"#);
    }

    #[test]
    fn test_from_json() {
        let manifest = StickerManifest::from_json(r#"[ "b", "a" ]"#).unwrap();
        assert_eq!(manifest.names(), ["b", "a"]);
        assert!(manifest.contains("a"));
        assert_eq!(manifest.sorted().names(), ["a", "b"]);
    }

    #[test]
    fn test_from_json_rejects_objects() {
        let err = StickerManifest::from_json(r#"{"names": []}"#).unwrap_err();
        assert!(matches!(err, StickerError::Manifest(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StickerManifest::load("/nonexistent/stickers.json").unwrap_err();
        assert!(matches!(err, StickerError::Io { .. }));
    }

    #[test]
    fn test_collect() {
        let manifest: StickerManifest = ["x", "y"].iter().map(|s| s.to_string()).collect();
        assert_eq!(manifest.len(), 2);
        assert!(!manifest.is_empty());
    }
}
