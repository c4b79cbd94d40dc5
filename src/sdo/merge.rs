//! Clause merging
//!
//! Works on source lines rather than on the tree, so that everything
//! inside the merged clause is byte-for-byte what the editor wrote, only
//! re-indented. The tree is used for one thing: finding where each clause
//! starts and ends.

use once_cell::sync::Lazy;
use regex::Regex;

use super::group::ClauseGroup;
use crate::dom::{Locator, TextSpan};
use crate::error::Violation;

static CLAUSE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *<emu-clause.*>$").expect("valid clause open pattern"));

static CLAUSE_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *</emu-clause>$").expect("valid clause close pattern"));

static WITH_PARAMETER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *<p>With parameter").expect("valid parameter pattern"));

static SEE_ALSO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<emu-see-also-para op="[A-Za-z0-9_]+"></emu-see-also-para>"#)
        .expect("valid see-also pattern")
});

/// Indentation of the merged clause's tags inside its parent
const CLAUSE_INDENT: &str = "  ";
/// Indentation of the merged clause's body
const BODY_INDENT: &str = "    ";

/// A consolidated clause, ready to be spliced into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedClause {
    pub operation: String,
    /// Section id derived from the first member's header
    pub id: String,
    /// Full clause markup, ending in a newline
    pub text: String,
    /// Spans of the member clauses to delete, in document order
    pub removals: Vec<TextSpan>,
}

/// Derive a section id from a clause header
///
/// `Static Semantics: BoundNames` becomes `sec-static-semantics-boundnames`.
/// Words of the operation name are run together, not hyphenated; that is
/// the convention existing ids follow.
pub fn section_id(header: &str) -> String {
    let mut id = String::from("sec-");
    let name = if let Some(rest) = header.strip_prefix("Static Semantics: ") {
        id.push_str("static-semantics-");
        rest
    } else if let Some(rest) = header.strip_prefix("Runtime Semantics: ") {
        id.push_str("runtime-semantics-");
        rest
    } else {
        header
    };
    id.push_str(&name.to_lowercase());
    id
}

/// Widen a clause's span to take its line's indentation and the newline
/// after it. If a blank line follows, that goes too; otherwise the
/// newline before the clause does, so no stray blank line is left behind.
pub fn removal_span(source: &str, span: TextSpan) -> TextSpan {
    let bytes = source.as_bytes();
    let mut start = span.start.min(bytes.len());
    while start > 0 && bytes[start - 1] == b' ' {
        start -= 1;
    }
    let mut end = (span.end + 1).min(bytes.len());
    if bytes.get(end) == Some(&b'\n') {
        end += 1;
    } else if start > 0 && bytes[start - 1] == b'\n' {
        start -= 1;
    }
    TextSpan::new(start, end)
}

/// Merge every clause of `group` into one clause
pub fn merge(
    source: &str,
    locator: &impl Locator,
    group: &ClauseGroup,
) -> Result<MergedClause, Violation> {
    let mut merged: Vec<&str> = Vec::new();
    let mut footer: Vec<&str> = Vec::new();
    let mut removals = Vec::with_capacity(group.len());

    for (position, clause) in group.clauses.iter().enumerate() {
        let span = locator.locate(clause.element).ok_or(Violation::Unlocated)?;
        let removal = removal_span(source, span);
        removals.push(removal);

        let mut lines = clause_body(removal.slice(source))?;

        if position > 0 {
            lines.remove(0);
            let repeats_parameters = lines.first().is_some_and(|l| WITH_PARAMETER.is_match(l))
                && merged.get(1).is_some_and(|l| WITH_PARAMETER.is_match(l));
            if repeats_parameters {
                lines.remove(0);
            }
        }

        lines.retain(|line| !SEE_ALSO.is_match(line));

        if lines.last() == Some(&"</emu-clause>") {
            let open = lines[..lines.len() - 1]
                .iter()
                .rposition(|line| line.starts_with("<emu-clause"))
                .ok_or_else(|| Violation::TrailingClause {
                    lines: lines.join("\n"),
                })?;
            footer.extend(lines.drain(open..));
        }

        merged.extend(lines);
    }
    merged.extend(footer);

    let header = group
        .clauses
        .first()
        .map(|c| c.header.as_str())
        .unwrap_or_default();
    let id = section_id(header);

    let mut text = format!(
        "{CLAUSE_INDENT}<emu-clause id=\"{id}\" type=\"sdo\" aoid=\"{}\">\n",
        group.operation
    );
    for line in &merged {
        if !line.is_empty() {
            text.push_str(BODY_INDENT);
            text.push_str(line);
        }
        text.push('\n');
    }
    text.push_str(CLAUSE_INDENT);
    text.push_str("</emu-clause>\n");

    tracing::debug!(
        "Merged {} clauses of {} into {} lines",
        group.len(),
        group.operation,
        merged.len()
    );

    Ok(MergedClause {
        operation: group.operation.clone(),
        id,
        text,
        removals,
    })
}

/// Strip a clause down to its body lines, de-indented, header first
fn clause_body(text: &str) -> Result<Vec<&str>, Violation> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.first() == Some(&"") {
        lines.remove(0);
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }

    let first = lines.first().copied().ok_or(Violation::EmptyClause)?;
    if !CLAUSE_OPEN.is_match(first) {
        return Err(Violation::ClauseStart {
            line: first.to_string(),
        });
    }
    let last = lines.last().copied().unwrap_or_default();
    if lines.len() < 2 || !CLAUSE_CLOSE.is_match(last) {
        return Err(Violation::ClauseEnd {
            line: last.to_string(),
        });
    }
    let body = &lines[1..lines.len() - 1];

    let indent = body
        .iter()
        .find(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start_matches(' ').len())
        .ok_or(Violation::EmptyClause)?;
    let prefix = " ".repeat(indent);

    let body = body
        .iter()
        .map(|&line| {
            if line.is_empty() {
                Ok(line)
            } else {
                line.strip_prefix(prefix.as_str())
                    .ok_or_else(|| Violation::Indentation {
                        indent,
                        line: line.to_string(),
                    })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    match body.first() {
        Some(line) if line.starts_with("<h1>") => Ok(body),
        other => Err(Violation::MissingHeaderLine {
            line: other.copied().unwrap_or_default().to_string(),
        }),
    }
}
