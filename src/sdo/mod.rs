//! Syntax-directed operation consolidation
//!
//! The pipeline for one step:
//! - candidates: find grammar/algorithm pairs and the region they sit in
//! - classify: map pairs to their clause and validate the clause shape
//! - group: bucket clauses by operation name
//! - merge: build the consolidated clause text for one group
//! - rewrite: cut the old clauses and insert the new one at the anchor
//!
//! The driver repeats the step until no operation is defined twice.

pub mod candidates;
pub mod classify;
pub mod driver;
pub mod group;
pub mod merge;
pub mod rewrite;

pub use candidates::Candidate;
pub use classify::Clause;
pub use driver::{Driver, Step};
pub use group::ClauseGroup;
pub use merge::MergedClause;

use crate::dom::Document;
use crate::error::Violation;

/// The groups a step would consolidate, first one first
pub fn plan(doc: &Document<'_>) -> Result<Vec<ClauseGroup>, Violation> {
    let candidates = candidates::scan(doc);
    let clauses = classify::classify(doc, &candidates)?;
    Ok(group::group(clauses))
}
