//! Markup Node representation
//!
//! Nodes link to each other by NodeId (u32) index, and carry the byte
//! ranges the merger cuts out of the source.

use super::span::TextSpan;
use crate::core::attributes::Attribute;

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of markup node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment, including bogus `<?...>` declarations
    Comment,
    /// `<!DOCTYPE ...>`
    DocType,
}

/// A node in the document arena
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Lowercased tag name for elements, empty otherwise
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// From the first byte of the start tag to the last byte of the end tag
    pub span: TextSpan,
    /// Between the start tag and the end tag; equals `span` for leaves
    pub inner: TextSpan,
}

impl Node {
    /// Create the document root node
    pub fn document(len: usize) -> Self {
        let span = TextSpan::new(0, len);
        Node::leaf(NodeKind::Document, span, None)
    }

    /// Create an element whose end is not yet known
    pub fn element(
        name: String,
        attributes: Vec<Attribute>,
        start_tag: TextSpan,
        parent: Option<NodeId>,
    ) -> Self {
        Node {
            kind: NodeKind::Element,
            name,
            attributes,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            span: start_tag,
            inner: TextSpan::new(start_tag.end, start_tag.end),
        }
    }

    /// Create a text, comment or doctype node
    pub fn leaf(kind: NodeKind, span: TextSpan, parent: Option<NodeId>) -> Self {
        Node {
            kind,
            name: String::new(),
            attributes: Vec::new(),
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            span,
            inner: span,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Element with the given (lowercase) tag name
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.is_element() && self.name == tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}
