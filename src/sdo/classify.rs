//! Clause classification and shape validation
//!
//! Turns grammar/algorithm candidates into the clauses that can be
//! consolidated. A clause is accepted only if it has exactly this shape:
//!
//! ```text
//! <h1>(Static|Runtime) Semantics: Name</h1>
//! (<p>With parameter…</p> | <emu-note> | <emu-see-also-para>)*
//! (<emu-grammar> <emu-note>* <emu-alg> <emu-note>*)+
//! <emu-clause>?
//! ```
//!
//! Anything else is a `Violation`: the rules below were written against a
//! near-uniform document, and a clause that does not fit them needs to be
//! looked at rather than guessed at.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::candidates::Candidate;
use crate::dom::{Document, NodeId};
use crate::error::Violation;

static OPERATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:Static|Runtime) Semantics: ([A-Za-z0-9_]+)$").expect("valid header pattern")
});

/// Headers of clauses that are already grouped the way they should be
/// (the `HasCallInTailPosition` rule sets)
const PREGROUPED_HEADERS: &[&str] = &["Statement Rules", "Expression Rules"];

/// Operations that are never consolidated:
/// - `NumericValue` carries a lot of prose between its cases
/// - `StringValue` is three unrelated operations sharing a name
/// - `Evaluation` and `Early Errors` stay where they are
pub const EXCLUDED_OPERATIONS: &[&str] = &["NumericValue", "StringValue", "Evaluation", "Early Errors"];

/// One validated, mergeable operation clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// The `emu-clause` element
    pub element: NodeId,
    /// Operation name, e.g. `BoundNames`
    pub operation: String,
    /// Raw header markup, e.g. `Static Semantics: BoundNames`
    pub header: String,
}

/// Extract the operation name from a clause header
pub fn operation_name(header: &str) -> Option<&str> {
    OPERATION_HEADER
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Classify candidates into validated clauses, in document order
pub fn classify(doc: &Document<'_>, candidates: &[Candidate]) -> Result<Vec<Clause>, Violation> {
    let mut clauses = Vec::new();
    let mut seen_parents = HashSet::new();

    for candidate in candidates {
        let Some(parent) = doc.parent(candidate.grammar) else {
            continue;
        };
        if !seen_parents.insert(parent) {
            continue;
        }
        if candidate.is_excluded() {
            tracing::trace!("Skipping clause in excluded region: {:?}", doc.element_id(parent));
            continue;
        }
        if let Some(clause) = classify_clause(doc, parent)? {
            clauses.push(clause);
        }
    }

    tracing::debug!("Classified {} operation clauses", clauses.len());
    Ok(clauses)
}

fn classify_clause(doc: &Document<'_>, parent: NodeId) -> Result<Option<Clause>, Violation> {
    let header_node = doc.first_element_child(parent);
    let header_node = match header_node {
        Some(h1) if doc.is(h1, "h1") => h1,
        other => {
            return Err(Violation::ExpectedHeader {
                found: describe(doc, other),
            })
        }
    };

    let header = doc.inner_html(header_node);
    if PREGROUPED_HEADERS.contains(&header) {
        return Ok(None);
    }

    let operation = operation_name(header).ok_or_else(|| Violation::UnrecognizedHeader {
        header: header.to_string(),
    })?;
    if EXCLUDED_OPERATIONS.contains(&operation) {
        tracing::trace!("Skipping excluded operation {}", operation);
        return Ok(None);
    }

    validate_shape(doc, parent, header_node, operation)?;

    let enclosing = doc.parent(parent).unwrap_or(doc.root());
    if doc.element_children(enclosing).nth(1).is_none() {
        return Err(Violation::SoleChild {
            operation: operation.to_string(),
        });
    }

    Ok(Some(Clause {
        element: parent,
        operation: operation.to_string(),
        header: header.to_string(),
    }))
}

/// Check everything after the header against the accepted clause shape
fn validate_shape(
    doc: &Document<'_>,
    clause: NodeId,
    header: NodeId,
    operation: &str,
) -> Result<(), Violation> {
    let unexpected = |found: Option<NodeId>| Violation::UnexpectedNode {
        operation: operation.to_string(),
        found: describe(doc, found),
        clause: doc.inner_html(clause).to_string(),
    };

    let mut pointer = skip_preamble(doc, doc.next_element_sibling(header));
    if !is(doc, pointer, "emu-grammar") {
        return Err(unexpected(pointer));
    }

    while let Some(grammar) = pointer.filter(|&id| doc.is(id, "emu-grammar")) {
        let next = skip_notes(doc, doc.next_element_sibling(grammar));
        match next {
            Some(alg) if doc.is(alg, "emu-alg") => {
                pointer = skip_notes(doc, doc.next_element_sibling(alg));
            }
            _ => break,
        }
    }

    // A clause may end with one nested helper clause
    if is(doc, pointer, "emu-clause") {
        pointer = pointer.and_then(|id| doc.next_element_sibling(id));
    }
    if pointer.is_some() {
        return Err(unexpected(pointer));
    }
    Ok(())
}

/// Skip parameter paragraphs, notes and see-also placeholders
fn skip_preamble(doc: &Document<'_>, mut pointer: Option<NodeId>) -> Option<NodeId> {
    while let Some(id) = pointer {
        let skip = match doc.tag_name(id) {
            Some("p") => doc.inner_html(id).starts_with("With parameter"),
            Some("emu-note" | "emu-see-also-para") => true,
            _ => false,
        };
        if !skip {
            break;
        }
        pointer = doc.next_element_sibling(id);
    }
    pointer
}

fn skip_notes(doc: &Document<'_>, mut pointer: Option<NodeId>) -> Option<NodeId> {
    while let Some(id) = pointer.filter(|&id| doc.is(id, "emu-note")) {
        pointer = doc.next_element_sibling(id);
    }
    pointer
}

#[inline]
fn is(doc: &Document<'_>, node: Option<NodeId>, tag: &str) -> bool {
    node.is_some_and(|id| doc.is(id, tag))
}

fn describe(doc: &Document<'_>, node: Option<NodeId>) -> String {
    match node.and_then(|id| doc.tag_name(id)) {
        Some(tag) => tag.to_string(),
        None => "end of clause".to_string(),
    }
}
