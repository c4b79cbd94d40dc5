//! DOM Module - Arena-based markup document
//!
//! Implements the document representation the rewrite pipeline reads:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cheap parent/sibling traversal
//! - Byte spans on every node, so any node can be located in the source

pub mod document;
pub mod node;
pub mod span;

pub use document::Document;
pub use node::{Node, NodeId, NodeKind};
pub use span::TextSpan;

/// Maps a parsed node back to its location in the source text
pub trait Locator {
    /// Byte range from the start of the node's start tag to the end of its
    /// end tag, or `None` for an unknown node
    fn locate(&self, id: NodeId) -> Option<TextSpan>;
}
