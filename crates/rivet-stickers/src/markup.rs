//! Owned SVG fragment trees.
//!
//! Sticker sources are small SVG documents. This module parses markup into an
//! owned tree of [`SvgNode`]s with `quick-xml`, lets the validator edit the
//! root's attributes, and serializes the tree back to compact markup. Cloning
//! an [`SvgElement`] is a deep clone; elements render from such clones so the
//! registry's copy is never shared with an output.
//!
//! # Example
//!
//! ```
//! use rivet_stickers::markup::{parse_fragment, SvgNode};
//!
//! let nodes = parse_fragment(r#"<svg><path d="M0 0"/></svg>"#)?;
//! let SvgNode::Element(svg) = &nodes[0] else { unreachable!() };
//!
//! assert_eq!(svg.name(), "svg");
//! assert_eq!(svg.child_element_count(), 1);
//! assert_eq!(svg.to_markup(), r#"<svg><path d="M0 0"/></svg>"#);
//! # Ok::<(), rivet_stickers::markup::MarkupError>(())
//! ```

use std::fmt;
use std::io::Write;

use indexmap::IndexMap;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Errors produced while parsing markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// The XML reader rejected the input.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// An attribute could not be read.
    #[error("invalid attribute: {0}")]
    Attribute(String),

    /// The input ended inside an element.
    #[error("unclosed element <{0}>")]
    Unclosed(String),

    /// A closing tag did not match the open element.
    #[error("expected </{expected}>, found </{found}>")]
    MismatchedClose { expected: String, found: String },

    /// A closing tag appeared with no open element.
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),
}

// ============================================================================
// SvgNode
// ============================================================================

/// A node in a parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgNode {
    /// An element node
    Element(SvgElement),
    /// A text node (unescaped)
    Text(String),
    /// A comment node
    Comment(String),
    /// A CDATA section
    CData(String),
}

impl SvgNode {
    /// Returns this node as an element, if it is one.
    pub fn as_element(&self) -> Option<&SvgElement> {
        if let SvgNode::Element(el) = self {
            Some(el)
        } else {
            None
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, SvgNode::Element(_))
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) {
        match self {
            SvgNode::Element(el) => el.write_to(writer),
            SvgNode::Text(text) => {
                let _ = writer.write_event(Event::Text(BytesText::new(text)));
            }
            SvgNode::Comment(comment) => {
                let _ = writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())));
            }
            SvgNode::CData(content) => {
                let _ = writer.write_event(Event::CData(BytesCData::new(content.as_str())));
            }
        }
    }
}

impl From<SvgElement> for SvgNode {
    fn from(element: SvgElement) -> Self {
        SvgNode::Element(element)
    }
}

// ============================================================================
// SvgElement
// ============================================================================

/// An element with a tag name, ordered attributes and children.
///
/// Attribute order is preserved from the source; attributes added later are
/// appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgElement {
    /// Qualified tag name as written in the source.
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<SvgNode>,
}

impl SvgElement {
    /// Creates a new element with the specified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style child appender.
    pub fn with_child(mut self, child: impl Into<SvgNode>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Returns the tag name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the local part of the tag name (after any prefix).
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    /// Gets an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Returns true if the element has the specified attribute.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Sets an attribute value, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Sets an attribute only if it is absent.
    ///
    /// Returns `true` if the attribute was added.
    pub fn set_attribute_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.has_attribute(name) {
            return false;
        }
        self.attributes.insert(name.to_string(), value.to_string());
        true
    }

    /// Removes an attribute.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Returns an iterator over all attributes in order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of attributes.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    /// Returns child elements only.
    pub fn child_elements(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(SvgNode::as_element)
    }

    /// Returns the number of child elements.
    pub fn child_element_count(&self) -> usize {
        self.children.iter().filter(|n| n.is_element()).count()
    }

    /// Adds a child node.
    pub fn add_child(&mut self, child: impl Into<SvgNode>) {
        self.children.push(child.into());
    }

    /// Converts the element to compact markup.
    pub fn to_markup(&self) -> String {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer);
        String::from_utf8(writer.into_inner()).unwrap_or_default()
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            let _ = writer.write_event(Event::Empty(start));
        } else {
            let _ = writer.write_event(Event::Start(start));
            for child in &self.children {
                child.write_to(writer);
            }
            let _ = writer.write_event(Event::End(BytesEnd::new(self.name.as_str())));
        }
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parses markup into its top-level nodes.
///
/// XML declarations, doctypes and processing instructions are skipped, and
/// whitespace-only text between top-level nodes is dropped. Whitespace inside
/// elements is kept.
pub fn parse_fragment(markup: &str) -> Result<Vec<SvgNode>, MarkupError> {
    let mut reader = Reader::from_str(markup);
    let mut open: Vec<SvgElement> = Vec::new();
    let mut roots: Vec<SvgNode> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| MarkupError::Syntax(e.to_string()))?;

        match event {
            Event::Start(start) => open.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut open, &mut roots, SvgNode::Element(element));
            }
            Event::End(end) => {
                let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let Some(element) = open.pop() else {
                    return Err(MarkupError::UnexpectedClose(found));
                };
                if element.name != found {
                    return Err(MarkupError::MismatchedClose {
                        expected: element.name,
                        found,
                    });
                }
                attach(&mut open, &mut roots, SvgNode::Element(element));
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| MarkupError::Syntax(e.to_string()))?
                    .into_owned();
                if open.is_empty() && content.trim().is_empty() {
                    continue;
                }
                attach(&mut open, &mut roots, SvgNode::Text(content));
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                attach(&mut open, &mut roots, SvgNode::CData(content));
            }
            Event::Comment(comment) => {
                let content = String::from_utf8_lossy(&comment).into_owned();
                attach(&mut open, &mut roots, SvgNode::Comment(content));
            }
            Event::Eof => break,
            // Declarations, doctypes and processing instructions carry no content.
            _ => {}
        }
    }

    if let Some(element) = open.pop() {
        return Err(MarkupError::Unclosed(element.name));
    }
    Ok(roots)
}

/// Appends a finished node to the innermost open element, or to the roots.
fn attach(open: &mut [SvgElement], roots: &mut Vec<SvgNode>, node: SvgNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<SvgElement, MarkupError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = SvgElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::Attribute(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MarkupError::Attribute(e.to_string()))?
            .into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}
