//! Document splicing

use memchr::memmem;

use crate::dom::TextSpan;
use crate::error::Violation;

/// The line every merged clause is inserted in front of
pub const ANCHOR: &str = "<!-- insert sdos here -->\n";

/// Delete `removals` from `source` and insert `clause` before the anchor
///
/// Overlapping or touching spans are cut as one, so no byte outside the
/// spans is removed. Spans are then removed from the highest offset down,
/// which keeps the lower offsets valid.
pub fn rewrite(source: &str, removals: &[TextSpan], clause: &str) -> Result<String, Violation> {
    let count = memmem::find_iter(source.as_bytes(), ANCHOR.as_bytes()).count();
    if count != 1 {
        return Err(Violation::Anchor {
            marker: ANCHOR.trim_end().to_string(),
            count,
        });
    }

    let mut text = source.to_string();
    for span in coalesce(removals).iter().rev() {
        text.replace_range(span.start..span.end, "");
    }

    // Removed spans never contain the anchor, so it is still there once
    let at = text.find(ANCHOR).ok_or(Violation::Anchor {
        marker: ANCHOR.trim_end().to_string(),
        count: 0,
    })?;
    text.insert_str(at, clause);
    text.insert(at, '\n');
    Ok(text)
}

/// Sort spans by start and union every run that overlaps or touches
///
/// Two clauses on adjacent lines both claim the newline between them.
fn coalesce(removals: &[TextSpan]) -> Vec<TextSpan> {
    let mut spans = removals.to_vec();
    spans.sort_by_key(|span| span.start);

    let mut merged: Vec<TextSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}
