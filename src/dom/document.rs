//! Markup Document - Arena-based tree with source locations
//!
//! Builds a tree from the token stream with a small subset of the HTML
//! tree-construction rules:
//! - void elements never take children
//! - an end tag closes the nearest open element of the same name, and
//!   everything opened inside it
//! - unmatched end tags are dropped
//! - `<p>` and `<li>` are implicitly closed the way browsers close them
//!
//! Every node keeps the byte span it occupies in the original text.

use super::node::{Node, NodeId, NodeKind};
use super::span::TextSpan;
use super::Locator;
use crate::core::tokenizer::{TokenKind, Tokenizer};

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Opening any of these closes an open `<p>`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "details", "div", "dl", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// A parsed document stored in arena format
pub struct Document<'a> {
    /// Original input, for span extraction
    input: &'a str,
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<Node>,
}

impl<'a> Document<'a> {
    /// Parse a document. Parsing is lenient and never fails.
    pub fn parse(input: &'a str) -> Self {
        let mut doc = Document {
            input,
            nodes: Vec::with_capacity(input.len() / 16 + 1),
        };
        doc.nodes.push(Node::document(input.len()));
        doc.build_from_tokens();
        tracing::debug!("Parsed {} nodes from {} bytes", doc.nodes.len(), input.len());
        doc
    }

    fn build_from_tokens(&mut self) {
        let mut stack: Vec<NodeId> = vec![0];

        for token in Tokenizer::new(self.input.as_bytes()) {
            let (start, end) = token.span;
            match token.kind {
                TokenKind::StartTag => {
                    let name = token.name.unwrap_or_default();
                    self.close_implied(&name, start, &mut stack);

                    let parent_id = *stack.last().unwrap_or(&0);
                    let node = Node::element(
                        name,
                        token.attributes,
                        TextSpan::new(start, end),
                        Some(parent_id),
                    );
                    let is_void = token.self_closing || VOID_ELEMENTS.contains(&node.name.as_str());
                    let node_id = self.push_child(parent_id, node);
                    if !is_void {
                        stack.push(node_id);
                    }
                }

                TokenKind::EndTag => {
                    let name = token.name.unwrap_or_default();
                    let matched = stack
                        .iter()
                        .rposition(|&id| id != 0 && self.nodes[id as usize].name == name);
                    match matched {
                        Some(index) => {
                            while stack.len() > index + 1 {
                                if let Some(id) = stack.pop() {
                                    self.close_at(id, start, start);
                                }
                            }
                            if let Some(id) = stack.pop() {
                                self.close_at(id, start, end);
                            }
                        }
                        None => {
                            tracing::trace!("Dropping unmatched </{}> at byte {}", name, start);
                        }
                    }
                }

                TokenKind::Text | TokenKind::Comment | TokenKind::DocType => {
                    let kind = match token.kind {
                        TokenKind::Text => NodeKind::Text,
                        TokenKind::Comment => NodeKind::Comment,
                        _ => NodeKind::DocType,
                    };
                    let parent_id = *stack.last().unwrap_or(&0);
                    let node = Node::leaf(kind, TextSpan::new(start, end), Some(parent_id));
                    self.push_child(parent_id, node);
                }

                TokenKind::Eof => {}
            }
        }

        // Anything still open runs to the end of input
        let len = self.input.len();
        while stack.len() > 1 {
            if let Some(id) = stack.pop() {
                self.close_at(id, len, len);
            }
        }
    }

    /// Close elements that the start tag `name` implicitly ends
    fn close_implied(&mut self, name: &str, at: usize, stack: &mut Vec<NodeId>) {
        let Some(&top) = stack.last() else { return };
        let top_name = self.nodes[top as usize].name.as_str();
        let closes = (top_name == "p" && CLOSES_PARAGRAPH.contains(&name))
            || (top_name == "li" && name == "li");
        if closes {
            stack.pop();
            self.close_at(top, at, at);
        }
    }

    /// Record where an element's content and markup end
    fn close_at(&mut self, id: NodeId, inner_end: usize, outer_end: usize) {
        let node = &mut self.nodes[id as usize];
        node.inner.end = inner_end.max(node.inner.start);
        node.span.end = outer_end.max(node.inner.end);
    }

    /// Append a node to the arena and link it as the last child of `parent_id`
    fn push_child(&mut self, parent_id: NodeId, mut node: Node) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        let last_child = self.nodes[parent_id as usize].last_child;
        node.prev_sibling = last_child;
        self.nodes.push(node);

        if let Some(last_child_id) = last_child {
            self.nodes[last_child_id as usize].next_sibling = Some(node_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(node_id);
        }
        self.nodes[parent_id as usize].last_child = Some(node_id);
        node_id
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        0
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.get_node(id)
            .filter(|n| n.is_element())
            .map(|n| n.name.as_str())
    }

    /// Whether `id` is an element with tag name `tag`
    pub fn is(&self, id: NodeId, tag: &str) -> bool {
        self.get_node(id).is_some_and(|n| n.is(tag))
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get_node(id)?.attribute(name)
    }

    /// The element's `id` attribute
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get_attribute(id, "id")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get_node(id)?.parent
    }

    /// The markup of the node itself, tags included
    pub fn outer_html(&self, id: NodeId) -> &'a str {
        self.get_node(id).map_or("", |n| n.span.slice(self.input))
    }

    /// The raw markup between an element's start and end tags
    pub fn inner_html(&self, id: NodeId) -> &'a str {
        self.get_node(id).map_or("", |n| n.inner.slice(self.input))
    }

    /// Iterate over all children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_, 'a> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Iterate over element children of a node
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(move |&child| self.get_node(child).is_some_and(Node::is_element))
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// The next sibling that is an element, skipping text and comments
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get_node(id)?.next_sibling;
        while let Some(sibling) = current {
            let node = self.get_node(sibling)?;
            if node.is_element() {
                return Some(sibling);
            }
            current = node.next_sibling;
        }
        None
    }

    /// The node itself, then each ancestor up to the document node
    pub fn ancestors_or_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.get_node(id).map(|_| id), move |&current| {
            self.parent(current)
        })
    }

    /// Iterate over all descendants of a node in document order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_, 'a> {
        let mut stack = Vec::new();
        self.push_children_reversed(id, &mut stack);
        DescendantIter { doc: self, stack }
    }

    fn push_children_reversed(&self, id: NodeId, stack: &mut Vec<NodeId>) {
        let mut child = self.get_node(id).and_then(|n| n.last_child);
        while let Some(cid) = child {
            stack.push(cid);
            child = self.get_node(cid).and_then(|n| n.prev_sibling);
        }
    }
}

impl<'a> Locator for Document<'a> {
    fn locate(&self, id: NodeId) -> Option<TextSpan> {
        self.get_node(id).map(|n| n.span)
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d, 'a> {
    doc: &'d Document<'a>,
    next: Option<NodeId>,
}

impl<'d, 'a> Iterator for ChildIter<'d, 'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Preorder iterator over descendant nodes
pub struct DescendantIter<'d, 'a> {
    doc: &'d Document<'a>,
    stack: Vec<NodeId>,
}

impl<'d, 'a> Iterator for DescendantIter<'d, 'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.doc.push_children_reversed(current, &mut self.stack);
        Some(current)
    }
}
