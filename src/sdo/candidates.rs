//! Grammar/algorithm pair discovery
//!
//! A candidate is an `emu-grammar` whose next element sibling is an
//! `emu-alg`. Grammars typed `example` or `definition` are illustrations,
//! not operation cases, and are never candidates.

use crate::dom::{Document, NodeId};

/// Section holding the string-processing operations
pub const TEXT_PROCESSING_ID: &str = "sec-text-processing";

/// Annex of web-browser-only features
pub const WEB_BROWSER_ANNEX_ID: &str = "sec-additional-ecmascript-features-for-web-browsers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub grammar: NodeId,
    pub algorithm: NodeId,
    pub in_text_region: bool,
    pub in_annex_region: bool,
}

impl Candidate {
    #[inline]
    pub fn is_excluded(&self) -> bool {
        self.in_text_region || self.in_annex_region
    }
}

/// Find every grammar/algorithm pair in document order
pub fn scan(doc: &Document<'_>) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for grammar in doc.descendants(doc.root()) {
        if !doc.is(grammar, "emu-grammar") {
            continue;
        }
        if matches!(doc.get_attribute(grammar, "type"), Some("example" | "definition")) {
            continue;
        }
        let Some(algorithm) = doc.next_element_sibling(grammar) else {
            continue;
        };
        if !doc.is(algorithm, "emu-alg") {
            continue;
        }

        let (in_text_region, in_annex_region) = region_of(doc, grammar);
        candidates.push(Candidate {
            grammar,
            algorithm,
            in_text_region,
            in_annex_region,
        });
    }

    tracing::debug!("Found {} grammar/algorithm pairs", candidates.len());
    candidates
}

/// Walk up from `node`. The text-processing section wins outright; the
/// annex is only recorded, since the text section may still enclose it.
fn region_of(doc: &Document<'_>, node: NodeId) -> (bool, bool) {
    let mut in_annex = false;
    for ancestor in doc.ancestors_or_self(node) {
        match doc.element_id(ancestor) {
            Some(TEXT_PROCESSING_ID) => return (true, in_annex),
            Some(WEB_BROWSER_ANNEX_ID) => in_annex = true,
            _ => {}
        }
    }
    (false, in_annex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_found_in_order() {
        let doc = Document::parse(
            "<emu-clause><h1>x</h1>\
             <emu-grammar>A : a</emu-grammar>\n<emu-alg>1. Return 1.</emu-alg>\
             <emu-grammar>B : b</emu-grammar><emu-alg>1. Return 2.</emu-alg>\
             </emu-clause>",
        );
        let found = scan(&doc);
        assert_eq!(found.len(), 2);
        assert_eq!(doc.inner_html(found[0].grammar), "A : a");
        assert_eq!(doc.inner_html(found[1].algorithm), "1. Return 2.");
        assert!(!found[0].is_excluded());
    }

    #[test]
    fn test_example_and_definition_grammars_skipped() {
        let doc = Document::parse(
            "<div><emu-grammar type=\"example\">A</emu-grammar><emu-alg>1.</emu-alg>\
             <emu-grammar type=\"definition\">B</emu-grammar><emu-alg>1.</emu-alg>\
             <emu-grammar type=\"reference\">C</emu-grammar><emu-alg>1.</emu-alg></div>",
        );
        let found = scan(&doc);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.inner_html(found[0].grammar), "C");
    }

    #[test]
    fn test_grammar_without_algorithm_skipped() {
        let doc = Document::parse(
            "<div><emu-grammar>A</emu-grammar><p>prose</p><emu-alg>1.</emu-alg>\
             <emu-grammar>B</emu-grammar></div>",
        );
        assert!(scan(&doc).is_empty());
    }

    #[test]
    fn test_regions_marked() {
        let doc = Document::parse(
            "<emu-clause id=\"sec-text-processing\"><emu-clause>\
             <emu-grammar>A</emu-grammar><emu-alg>1.</emu-alg></emu-clause></emu-clause>\
             <emu-annex id=\"sec-additional-ecmascript-features-for-web-browsers\"><emu-annex>\
             <emu-grammar>B</emu-grammar><emu-alg>1.</emu-alg></emu-annex></emu-annex>",
        );
        let found = scan(&doc);
        assert_eq!(found.len(), 2);
        assert!(found[0].in_text_region);
        assert!(!found[0].in_annex_region);
        assert!(!found[1].in_text_region);
        assert!(found[1].in_annex_region);
        assert!(found.iter().all(Candidate::is_excluded));
    }

    #[test]
    fn test_annex_inside_text_region() {
        let doc = Document::parse(
            "<section id=\"sec-text-processing\">\
             <section id=\"sec-additional-ecmascript-features-for-web-browsers\">\
             <emu-grammar>A</emu-grammar><emu-alg>1.</emu-alg></section></section>",
        );
        let found = scan(&doc);
        assert!(found[0].in_text_region);
        assert!(found[0].in_annex_region);
    }
}
