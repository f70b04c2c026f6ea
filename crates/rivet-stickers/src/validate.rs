//! Content validation and default presentation attributes.
//!
//! A sticker source must parse to exactly one root element, and that element
//! must be an `<svg>`. Once accepted, the root is normalized by filling in any
//! missing presentation attributes from a [`DefaultAttributes`] policy.
//! Attributes already present in the source are never overwritten, so
//! normalizing twice is the same as normalizing once.

use rivet_stickers_core::logging::targets;

use crate::config::{SizingMode, StickerConfig};
use crate::error::{Result, StickerError};
use crate::markup::{parse_fragment, SvgElement, SvgNode};

/// Expected root tag of every sticker.
pub const SVG_TAG: &str = "svg";

/// Namespace applied to the root when the source omits `xmlns`.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Ordered set of attributes applied to a root `<svg>` when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAttributes {
    entries: Vec<(String, String)>,
}

impl DefaultAttributes {
    /// Builds the default set for a configuration.
    pub fn from_config(config: &StickerConfig) -> Self {
        let extent = match config.sizing_mode {
            SizingMode::Fill => "100%".to_string(),
            SizingMode::Fixed => config.size.to_string(),
        };
        let view_box = format!("0 0 {size} {size}", size = config.size);

        let entries = [
            ("aria-hidden", "true".to_string()),
            ("fill", config.fill.clone()),
            ("focusable", "false".to_string()),
            ("height", extent.clone()),
            ("viewBox", view_box),
            ("width", extent),
            ("xmlns", SVG_NAMESPACE.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self { entries }
    }

    /// Returns the default value for an attribute.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates the defaults in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets every missing default on `root`, returning how many were added.
    pub fn apply(&self, root: &mut SvgElement) -> usize {
        let mut added = 0;
        for (name, value) in &self.entries {
            if root.set_attribute_if_absent(name, value) {
                added += 1;
            }
        }
        added
    }
}

impl Default for DefaultAttributes {
    fn default() -> Self {
        Self::from_config(&StickerConfig::default())
    }
}

/// Checks sticker sources and normalizes their root element.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    defaults: DefaultAttributes,
}

impl Validator {
    /// Creates a validator applying `defaults`.
    pub fn new(defaults: DefaultAttributes) -> Self {
        Self { defaults }
    }

    /// Creates a validator from a configuration.
    pub fn from_config(config: &StickerConfig) -> Self {
        Self::new(DefaultAttributes::from_config(config))
    }

    /// The default attribute policy.
    pub fn defaults(&self) -> &DefaultAttributes {
        &self.defaults
    }

    /// Validates `markup` registered under `name` and returns the normalized root.
    pub fn validate(&self, name: &str, markup: &str) -> Result<SvgElement> {
        if name.is_empty() {
            return Err(StickerError::InvalidName);
        }

        let nodes = parse_fragment(markup).map_err(|e| StickerError::malformed(name, e.to_string()))?;

        let mut elements = nodes.into_iter().filter_map(|node| match node {
            SvgNode::Element(el) => Some(el),
            _ => None,
        });
        let root = match (elements.next(), elements.next()) {
            (Some(root), None) => root,
            (None, _) => return Err(StickerError::malformed(name, "found no elements")),
            (Some(_), Some(_)) => {
                let count = 2 + elements.count();
                return Err(StickerError::malformed(name, format!("found {count} elements")));
            }
        };

        if !root.name().eq_ignore_ascii_case(SVG_TAG) {
            return Err(StickerError::wrong_root(name, root.name()));
        }

        let mut root = root;
        let added = self.normalize(&mut root);
        tracing::trace!(target: targets::VALIDATE, sticker = name, added, "sticker content validated");
        Ok(root)
    }

    /// Applies the default attributes to an already accepted root.
    pub fn normalize(&self, root: &mut SvgElement) -> usize {
        self.defaults.apply(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_in_order() {
        let root = Validator::default()
            .validate("flag", r#"<svg><path d="M0 0"/></svg>"#)
            .unwrap();

        let attrs: Vec<_> = root.attributes().collect();
        assert_eq!(
            attrs,
            vec![
                ("aria-hidden", "true"),
                ("fill", "currentColor"),
                ("focusable", "false"),
                ("height", "100%"),
                ("viewBox", "0 0 80 80"),
                ("width", "100%"),
                ("xmlns", SVG_NAMESPACE),
            ]
        );
    }

    #[test]
    fn test_author_attributes_preserved() {
        let root = Validator::default()
            .validate("flag", r#"<svg fill="red" viewBox="0 0 24 24"/>"#)
            .unwrap();
        assert_eq!(root.attribute("fill"), Some("red"));
        assert_eq!(root.attribute("viewBox"), Some("0 0 24 24"));
        assert_eq!(root.attribute("focusable"), Some("false"));
    }

    #[test]
    fn test_fixed_sizing() {
        let config = StickerConfig::default()
            .with_sizing_mode(SizingMode::Fixed)
            .with_size(48);
        let root = Validator::from_config(&config).validate("flag", "<svg/>").unwrap();
        assert_eq!(root.attribute("width"), Some("48"));
        assert_eq!(root.attribute("height"), Some("48"));
        assert_eq!(root.attribute("viewBox"), Some("0 0 48 48"));
    }

    #[test]
    fn test_empty_name() {
        let err = Validator::default().validate("", "<svg/>").unwrap_err();
        assert!(matches!(err, StickerError::InvalidName));
    }

    #[test]
    fn test_no_root_element() {
        for markup in ["", "just text", "<!-- comment -->"] {
            let err = Validator::default().validate("flag", markup).unwrap_err();
            assert!(
                matches!(err, StickerError::MalformedContent { .. }),
                "{markup:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_two_root_elements() {
        let err = Validator::default().validate("flag", "<svg/><svg/>").unwrap_err();
        assert!(matches!(err, StickerError::MalformedContent { .. }));
    }

    #[test]
    fn test_unparseable_markup() {
        let err = Validator::default().validate("flag", "<svg><g></svg>").unwrap_err();
        assert!(matches!(err, StickerError::MalformedContent { .. }));
    }

    #[test]
    fn test_wrong_root() {
        let err = Validator::default().validate("flag", "<div/>").unwrap_err();
        match err {
            StickerError::WrongRootType { name, found } => {
                assert_eq!(name, "flag");
                assert_eq!(found, "div");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_root_tag_case_insensitive() {
        assert!(Validator::default().validate("flag", "<SVG></SVG>").is_ok());
    }

    #[test]
    fn test_comment_beside_root_is_accepted() {
        let root = Validator::default()
            .validate("flag", "<!-- generated --><svg/>")
            .unwrap();
        assert_eq!(root.name(), "svg");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let validator = Validator::default();
        let once = validator.validate("flag", r#"<svg width="10"/>"#).unwrap();

        let mut twice = once.clone();
        assert_eq!(validator.normalize(&mut twice), 0);
        assert_eq!(once, twice);

        let revalidated = validator.validate("flag", &once.to_markup()).unwrap();
        assert_eq!(once, revalidated);
    }
}
